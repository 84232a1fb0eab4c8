use alien_shooter::abilities::{Ability, AbilityKind};
use alien_shooter::aliens::{Alien, AlienKind};
use alien_shooter::bullet::Bullet;
use alien_shooter::compute::*;
use alien_shooter::config::{AlienSpec, GameConfig};
use alien_shooter::entities::GameStatus;
use alien_shooter::error::AbilityError;
use alien_shooter::events::GameEvent;
use alien_shooter::geometry::{PlayArea, Vec2};
use alien_shooter::powerup::{PowerUp, PowerUpKind};
use alien_shooter::stats::StatKind;
use alien_shooter::upgrades::UpgradeSnapshot;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Ship is 5 x 2 and sits at (50, 49): x 47.5..52.5, y 48..50.

fn area() -> PlayArea {
    PlayArea::new(0.0, 0.0, 100.0, 50.0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// No trickle, no level timer, no loot: only what a test places happens.
fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.spawn.initial_delay_ms = f32::INFINITY;
    config.spawn.level_duration_ms = 0.0;
    config.loot.base_chance_percent = 0.0;
    config
}

fn make_session(config: GameConfig) -> Session {
    Session::new(config, &UpgradeSnapshot::default(), area())
}

fn scout() -> AlienSpec {
    GameConfig::default().aliens.scout
}

fn place_alien(session: &mut Session, spec: &AlienSpec, x: f32, y: f32) {
    let alien = Alien::new(AlienKind::Scout, spec, Vec2::new(x, y), &area());
    session.arena_mut().aliens.push(alien);
}

fn place_bullet(session: &mut Session, x: f32, y: f32) {
    let config = session.config().bullet;
    let bullet = Bullet::new(Vec2::new(x, y), &area(), &config);
    session.arena_mut().bullets.push(bullet);
}

fn place_powerup(session: &mut Session, kind: PowerUpKind, x: f32, y: f32) {
    let config = session.config().powerup;
    let powerup = PowerUp::new(kind, Vec2::new(x, y), &area(), &config);
    session.arena_mut().powerups.push(powerup);
}

fn count_events(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

// ── Basics ────────────────────────────────────────────────────────────────────

#[test]
fn fresh_session_is_playing_at_level_one() {
    let session = make_session(GameConfig::default());
    assert_eq!(session.status(), GameStatus::Playing);
    assert_eq!(session.level(), 1);
    assert_eq!(session.credits_earned(), 0);
    assert!(session.aliens().is_empty());
    assert_eq!(session.ship().hit_points(), 10);
}

#[test]
fn negative_dt_does_not_advance_time() {
    let mut session = make_session(quiet_config());
    session.tick(-1.0, &mut seeded_rng());
    assert_eq!(session.elapsed_ms(), 0.0);
}

#[test]
fn manual_fire_respects_cooldown() {
    let mut session = make_session(quiet_config());
    let mut rng = seeded_rng();
    assert!(session.fire_bullet());
    assert!(!session.fire_bullet());
    assert_eq!(session.bullets().len(), 1);

    session.tick(1.0, &mut rng);
    assert!(session.fire_bullet());
}

#[test]
fn trickle_fills_the_sky_over_time() {
    let mut session = make_session(GameConfig::default());
    let mut rng = seeded_rng();
    for _ in 0..30 {
        session.tick(0.1, &mut rng); // 3 s, first spawn at 2.5 s
    }
    assert_eq!(session.aliens().len(), 1);
}

// ── Bullets ───────────────────────────────────────────────────────────────────

#[test]
fn bullet_hits_only_one_of_two_overlapping_aliens() {
    let mut session = make_session(quiet_config());
    place_alien(&mut session, &scout(), 50.0, 20.0);
    place_alien(&mut session, &scout(), 50.0, 20.0);
    place_bullet(&mut session, 50.0, 21.0);

    let events = session.tick(0.0, &mut seeded_rng());

    assert_eq!(session.aliens().len(), 1);
    assert_eq!(session.aliens()[0].hp, 1);
    assert!(session.bullets().is_empty());
    assert_eq!(count_events(&events, |e| matches!(e, GameEvent::AlienKilled { .. })), 1);
    assert_eq!(session.credits_earned(), 1);
}

#[test]
fn dead_alien_is_not_hit_again_in_the_same_tick() {
    let mut session = make_session(quiet_config());
    place_alien(&mut session, &scout(), 50.0, 20.0);
    place_bullet(&mut session, 50.0, 21.0);
    place_bullet(&mut session, 50.0, 20.5);

    session.tick(0.0, &mut seeded_rng());

    assert!(session.aliens().is_empty());
    assert_eq!(session.bullets().len(), 1, "second bullet flies on");
    assert_eq!(session.arena().kills(), 1);
    assert_eq!(session.credits_earned(), 1);
}

#[test]
fn bullet_leaves_through_the_top() {
    let mut session = make_session(quiet_config());
    place_bullet(&mut session, 50.0, 5.0);
    session.tick(1.0, &mut seeded_rng());
    assert!(session.bullets().is_empty());
}

#[test]
fn kill_awards_credits_and_rolls_loot_exactly_once() {
    let mut config = quiet_config();
    config.loot.base_chance_percent = 100.0;
    let mut session = make_session(config);
    let tough = AlienSpec {
        hp: 2,
        credit_value: 5,
        ..scout()
    };
    place_alien(&mut session, &tough, 50.0, 20.0);
    place_bullet(&mut session, 50.0, 21.0);
    place_bullet(&mut session, 50.0, 20.5);
    let mut rng = seeded_rng();

    // Two hits of 1: the first only wounds
    let events = session.tick(0.0, &mut rng);

    assert!(session.aliens().is_empty());
    assert_eq!(session.credits_earned(), 5);
    assert_eq!(session.arena().drops().rolls(), 1);
    assert_eq!(session.powerups().len(), 1);
    assert_eq!(count_events(&events, |e| matches!(e, GameEvent::AlienKilled { .. })), 1);
    assert_eq!(count_events(&events, |e| matches!(e, GameEvent::LootDropped(_))), 1);

    session.tick(0.1, &mut rng);
    assert_eq!(session.credits_earned(), 5);
    assert_eq!(session.arena().drops().rolls(), 1);
}

#[test]
fn fire_power_is_bullet_damage() {
    let mut session = make_session(quiet_config());
    session.ship_mut().improve_stat(StatKind::FirePower, 1);
    let tough = AlienSpec { hp: 2, ..scout() };
    place_alien(&mut session, &tough, 50.0, 20.0);
    place_bullet(&mut session, 50.0, 21.0);

    session.tick(0.0, &mut seeded_rng());
    assert!(session.aliens().is_empty());
}

#[test]
fn fast_bullet_cannot_skip_over_an_alien() {
    // 100 high: a bullet covers 3.96 per 33 ms tick, more than the 3 units
    // of height over which it and a scout overlap.
    let tall = PlayArea::new(0.0, 0.0, 200.0, 100.0);
    let config = quiet_config();
    let mut missed = Vec::new();
    for step in 0..20 {
        let start_y = 60.0 + step as f32 * 0.2;
        let mut session = Session::new(config.clone(), &UpgradeSnapshot::default(), tall);
        let alien = Alien::new(AlienKind::Scout, &scout(), Vec2::new(100.0, 30.0), &tall);
        session.arena_mut().aliens.push(alien);
        let bullet = Bullet::new(Vec2::new(100.0, start_y), &tall, &config.bullet);
        session.arena_mut().bullets.push(bullet);
        let mut rng = seeded_rng();

        for _ in 0..40 {
            session.tick(0.033, &mut rng);
        }
        if !session.aliens().is_empty() {
            missed.push(start_y);
        }
    }
    assert!(missed.is_empty(), "bullets from {missed:?} flew through");
}

#[test]
fn bullet_strikes_the_lowest_alien_on_its_path() {
    let mut session = make_session(quiet_config());
    place_alien(&mut session, &scout(), 50.0, 10.0);
    place_alien(&mut session, &scout(), 50.0, 14.0);
    place_bullet(&mut session, 50.0, 18.0);

    // 60 per second: the path from 18 up to 6 crosses both in one update
    session.tick(0.2, &mut seeded_rng());

    assert_eq!(session.aliens().len(), 1);
    assert!(session.aliens()[0].entity.pos.y < 12.0, "upper alien survives");
    assert!(session.bullets().is_empty());
}

// ── Ship contact ──────────────────────────────────────────────────────────────

#[test]
fn ramming_alien_hurts_ship_without_reward() {
    let mut config = quiet_config();
    config.loot.base_chance_percent = 100.0;
    let mut session = make_session(config);
    place_alien(&mut session, &scout(), 50.0, 47.5);

    let events = session.tick(0.0, &mut seeded_rng());

    assert_eq!(session.ship().hit_points(), 9);
    assert!(session.aliens().is_empty());
    assert_eq!(session.credits_earned(), 0);
    assert_eq!(session.arena().drops().rolls(), 0);
    assert!(session.powerups().is_empty());
    assert_eq!(count_events(&events, |e| matches!(e, GameEvent::AlienKilled { .. })), 0);
}

#[test]
fn alien_reaching_the_bottom_damages_the_ship() {
    let mut session = make_session(quiet_config());
    place_alien(&mut session, &scout(), 10.0, 48.9);

    session.tick(1.0, &mut seeded_rng());

    assert_eq!(session.ship().hit_points(), 9);
    assert!(session.aliens().is_empty());
    assert_eq!(session.credits_earned(), 0);
}

#[test]
fn session_ends_exactly_once() {
    let mut config = quiet_config();
    config.ship.hit_points = 1;
    let mut session = make_session(config);
    place_alien(&mut session, &scout(), 10.0, 48.9);
    place_alien(&mut session, &scout(), 30.0, 48.9);
    let mut rng = seeded_rng();

    let events = session.tick(1.0, &mut rng);

    let ended = count_events(&events, |e| matches!(e, GameEvent::SessionEnded { .. }));
    assert_eq!(ended, 1);
    assert_eq!(session.status(), GameStatus::GameOver);
    assert!(session.ship().is_destroyed());

    // Frozen from now on
    for _ in 0..5 {
        assert!(session.tick(1.0, &mut rng).is_empty());
    }
    assert!(!session.fire_bullet());
}

#[test]
fn nothing_is_scored_in_the_tick_the_ship_dies() {
    let mut config = quiet_config();
    config.ship.hit_points = 1;
    config.loot.base_chance_percent = 100.0;
    let mut session = make_session(config);
    place_alien(&mut session, &scout(), 50.0, 47.5);
    place_alien(&mut session, &scout(), 50.0, 20.0);
    place_bullet(&mut session, 50.0, 21.0);

    let events = session.tick(0.0, &mut seeded_rng());

    assert_eq!(session.status(), GameStatus::GameOver);
    assert_eq!(count_events(&events, |e| matches!(e, GameEvent::AlienKilled { .. })), 0);
    assert_eq!(count_events(&events, |e| matches!(e, GameEvent::LootDropped(_))), 0);
    assert!(matches!(
        events.last(),
        Some(GameEvent::SessionEnded { credits_earned: 0 })
    ));
    assert_eq!(session.credits_earned(), 0);
    assert_eq!(session.arena().drops().rolls(), 0);
    assert!(session.powerups().is_empty());
    assert_eq!(session.aliens().len(), 1, "the shot alien is untouched");
}

// ── Powerups ──────────────────────────────────────────────────────────────────

#[test]
fn touching_a_powerup_applies_it() {
    let mut session = make_session(quiet_config());
    let kind = PowerUpKind::ImproveStat {
        stat: StatKind::FireRate,
        amount: 2,
    };
    place_powerup(&mut session, kind, 50.0, 48.5);

    let events = session.tick(0.0, &mut seeded_rng());

    assert_eq!(session.ship().stat(StatKind::FireRate), 5);
    assert!(session.powerups().is_empty());
    assert!(events.contains(&GameEvent::PowerUpCollected { kind, applied: true }));
    assert!(events.contains(&GameEvent::StatChanged(StatKind::FireRate)));
}

#[test]
fn ability_powerup_without_room_is_wasted() {
    let mut session = make_session(quiet_config());
    session
        .ship_mut()
        .add_ability(Ability::new(AbilityKind::Shockwave))
        .unwrap();
    let kind = PowerUpKind::AddAbility(AbilityKind::Barrage);
    place_powerup(&mut session, kind, 50.0, 48.5);

    let events = session.tick(0.0, &mut seeded_rng());

    assert!(session.powerups().is_empty());
    assert!(events.contains(&GameEvent::PowerUpCollected { kind, applied: false }));
    let slot = &session.ship().active_slots()[0];
    assert_eq!(slot.ability().map(|a| a.kind()), Some(AbilityKind::Shockwave));
}

#[test]
fn missed_powerup_expires_at_the_bottom() {
    let mut session = make_session(quiet_config());
    let kind = PowerUpKind::ImproveStat {
        stat: StatKind::Thrust,
        amount: 1,
    };
    place_powerup(&mut session, kind, 10.0, 49.0);

    session.tick(1.0, &mut seeded_rng());

    assert!(session.powerups().is_empty());
    assert_eq!(session.ship().stat(StatKind::Thrust), 5);
}

// ── Abilities ─────────────────────────────────────────────────────────────────

fn charging_session(kind: AbilityKind) -> Session {
    let mut config = quiet_config();
    config.ship.base_charge_ms = 100.0;
    let mut session = make_session(config);
    session.ship_mut().add_ability(Ability::new(kind)).unwrap();
    session
}

#[test]
fn shockwave_discharges_after_full_charge() {
    let mut session = charging_session(AbilityKind::Shockwave);
    for x in [20.0, 50.0, 80.0] {
        place_alien(&mut session, &scout(), x, 5.0);
    }
    let mut rng = seeded_rng();

    session.start_ability_charge();
    session.tick(0.05, &mut rng);
    assert_eq!(session.aliens().len(), 3);

    let events = session.tick(0.05, &mut rng);
    assert!(session.aliens().is_empty());
    assert_eq!(session.arena().kills(), 3);
    assert!(events.contains(&GameEvent::AbilitiesDischarged(vec![AbilityKind::Shockwave])));

    // Used up: the slot is empty and disabled
    let slot = &session.ship().active_slots()[0];
    assert!(slot.is_empty());
    assert!(!slot.is_enabled());
}

#[test]
fn barrage_fires_a_spread_of_bullets() {
    let mut session = charging_session(AbilityKind::Barrage);
    let mut rng = seeded_rng();
    session.start_ability_charge();
    session.tick(0.05, &mut rng);
    session.tick(0.05, &mut rng);

    let bullets = session.bullets();
    assert_eq!(bullets.len(), session.config().abilities.barrage_bullets);
    let xs: Vec<f32> = bullets.iter().map(|b| b.entity.pos.x).collect();
    assert!(xs.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn repair_restores_hit_points() {
    let mut session = charging_session(AbilityKind::Repair);
    session.ship_mut().take_damage(5);
    let mut rng = seeded_rng();
    session.start_ability_charge();
    session.tick(0.1, &mut rng);
    assert_eq!(session.ship().hit_points(), 8);
}

#[test]
fn aborted_charge_has_no_effect() {
    let mut session = charging_session(AbilityKind::Shockwave);
    place_alien(&mut session, &scout(), 50.0, 5.0);
    let mut rng = seeded_rng();

    session.start_ability_charge();
    session.tick(0.05, &mut rng);
    session.stop_ability_charge();
    session.tick(1.0, &mut rng);

    assert_eq!(session.aliens().len(), 1);
    let slot = &session.ship().active_slots()[0];
    assert_eq!(slot.ability().map(|a| a.kind()), Some(AbilityKind::Shockwave));
}

#[test]
fn disabled_active_does_not_discharge() {
    let mut session = charging_session(AbilityKind::Shockwave);
    place_alien(&mut session, &scout(), 50.0, 5.0);
    session.toggle_active_ability(0).unwrap();
    let mut rng = seeded_rng();

    session.start_ability_charge();
    let events = session.tick(0.2, &mut rng);

    assert_eq!(session.aliens().len(), 1);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::AbilitiesDischarged(_))));
    let slot = &session.ship().active_slots()[0];
    assert_eq!(slot.ability().map(|a| a.kind()), Some(AbilityKind::Shockwave));
}

#[test]
fn spear_fires_on_its_own_faster_than_base_rate() {
    let mut session = make_session(quiet_config());
    session.ship_mut().add_ability(Ability::new(AbilityKind::Spear)).unwrap();
    let mut rng = seeded_rng();

    // 3000 ms / (3 + 1) = 750 ms between shots
    session.tick(0.0, &mut rng);
    assert_eq!(session.bullets().len(), 1);
    session.tick(0.5, &mut rng);
    assert_eq!(session.bullets().len(), 1);
    session.tick(0.25, &mut rng);
    assert_eq!(session.bullets().len(), 2);
}

#[test]
fn disabled_passive_stays_quiet() {
    let mut session = make_session(quiet_config());
    session.ship_mut().add_ability(Ability::new(AbilityKind::Spear)).unwrap();
    session.toggle_passive_ability(0).unwrap();
    session.tick(0.0, &mut seeded_rng());
    assert!(session.bullets().is_empty());
}

#[test]
fn regeneration_heals_over_time() {
    let mut session = make_session(quiet_config());
    session
        .ship_mut()
        .add_ability(Ability::new(AbilityKind::Regeneration))
        .unwrap();
    session.ship_mut().take_damage(3);
    let mut rng = seeded_rng();

    session.tick(4.0, &mut rng);
    assert_eq!(session.ship().hit_points(), 7);
    session.tick(4.0, &mut rng);
    assert_eq!(session.ship().hit_points(), 8);
}

#[test]
fn magnet_pulls_powerups_toward_the_ship() {
    let mut session = make_session(quiet_config());
    session.ship_mut().add_ability(Ability::new(AbilityKind::Magnet)).unwrap();
    let kind = PowerUpKind::ImproveStat {
        stat: StatKind::Thrust,
        amount: 1,
    };
    place_powerup(&mut session, kind, 10.0, 10.0);

    session.tick(1.0, &mut seeded_rng());

    // 0.15 of the width per second
    assert_relative_eq!(session.powerups()[0].entity.pos.x, 25.0, epsilon = 1e-3);
}

#[test]
fn refused_toggle_reports_why_and_changes_nothing() {
    let mut session = make_session(quiet_config());
    assert_eq!(session.toggle_active_ability(2), Err(AbilityError::SlotLocked));
    assert!(matches!(
        session.toggle_passive_ability(9),
        Err(AbilityError::SlotOutOfRange { index: 9, .. })
    ));

    let events = session.tick(0.0, &mut seeded_rng());
    assert!(!events.contains(&GameEvent::AbilitySlotsChanged));
    assert!(session.ship().active_slots()[2].is_locked());
}

// ── Levels ────────────────────────────────────────────────────────────────────

#[test]
fn level_timer_raises_level_and_launches_wave() {
    let mut config = quiet_config();
    config.spawn.level_duration_ms = 1000.0;
    let mut session = make_session(config);
    let mut rng = seeded_rng();

    let events = session.tick(0.6, &mut rng);
    assert!(events.is_empty());

    let events = session.tick(0.6, &mut rng);
    assert_eq!(session.level(), 2);
    assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    assert!(events.contains(&GameEvent::WaveSpawned { level: 2, count: 5 }));
    assert_eq!(session.aliens().len(), 5);
}

#[test]
fn level_up_without_wave_only_reports_level() {
    let mut config = quiet_config();
    config.spawn.waves.clear();
    let mut session = make_session(config);

    assert_eq!(session.level_up(), 2);
    let events = session.tick(0.0, &mut seeded_rng());
    assert_eq!(events, vec![GameEvent::LevelUp { level: 2 }]);
    assert!(session.aliens().is_empty());
}

#[test]
fn seeded_sessions_replay_identically() {
    let run = || {
        let mut session = make_session(GameConfig::default());
        let mut rng = seeded_rng();
        session.set_moving_right(true);
        for _ in 0..300 {
            session.fire_bullet();
            session.tick(0.05, &mut rng);
        }
        (
            session.credits_earned(),
            session.aliens().iter().map(|a| a.entity.pos).collect::<Vec<_>>(),
        )
    };
    assert_eq!(run(), run());
}
