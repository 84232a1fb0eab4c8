//! The per-frame game loop.
//!
//! A [`Session`] is one play-through.  All randomness comes in through the
//! `rng` argument of [`Session::tick`], so a seeded RNG replays a session
//! exactly (the tests rely on this).

use log::info;
use rand::Rng;

use crate::abilities::Ability;
use crate::aliens::Alien;
use crate::bullet::Bullet;
use crate::config::GameConfig;
use crate::entities::GameStatus;
use crate::error::AbilityError;
use crate::events::GameEvent;
use crate::geometry::PlayArea;
use crate::powerup::PowerUp;
use crate::ship::Ship;
use crate::spawn::SpawnManager;
use crate::stats::StatKind;
use crate::upgrades::UpgradeSnapshot;
use crate::world::{Arena, World};

#[derive(Clone, Debug)]
pub struct Session {
    config: GameConfig,
    area: PlayArea,
    ship: Ship,
    arena: Arena,
    spawner: SpawnManager,
    status: GameStatus,
    level_elapsed_ms: f32,
    elapsed_ms: f32,
}

impl Session {
    pub fn new(config: GameConfig, upgrades: &UpgradeSnapshot, area: PlayArea) -> Self {
        let ship = Ship::new(&config.ship, &config.bullet, upgrades, area);
        let arena = Arena::new(area, &config, upgrades);
        let spawner = SpawnManager::new(&config.spawn);
        Self {
            config,
            area,
            ship,
            arena,
            spawner,
            status: GameStatus::Playing,
            level_elapsed_ms: 0.0,
            elapsed_ms: 0.0,
        }
    }

    // ── Read-only views ───────────────────────────────────────────────────────

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn aliens(&self) -> &[Alien] {
        &self.arena.aliens
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.arena.bullets
    }

    pub fn powerups(&self) -> &[PowerUp] {
        &self.arena.powerups
    }

    pub fn spawner(&self) -> &SpawnManager {
        &self.spawner
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn area(&self) -> PlayArea {
        self.area
    }

    pub fn level(&self) -> u32 {
        self.spawner.level()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn credits_earned(&self) -> u64 {
        self.arena.credits_earned()
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    // ── Mutable access for scripted setups (tests, demos) ─────────────────────

    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn set_moving_left(&mut self, on: bool) {
        self.ship.set_moving_left(on);
    }

    pub fn set_moving_right(&mut self, on: bool) {
        self.ship.set_moving_right(on);
    }

    pub fn set_destination_from_pointer(&mut self, x: f32) {
        self.ship.set_destination_from_pointer(x);
    }

    pub fn release_pointer(&mut self) {
        self.ship.release_pointer();
    }

    /// Manual shot.  Returns whether a bullet left the ship.
    pub fn fire_bullet(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        match self.ship.fire_bullet(0) {
            Some(bullet) => {
                self.arena.bullets.push(bullet);
                true
            }
            None => false,
        }
    }

    pub fn start_ability_charge(&mut self) {
        self.ship.start_charge();
    }

    pub fn stop_ability_charge(&mut self) {
        self.ship.stop_charge();
    }

    pub fn toggle_active_ability(&mut self, index: usize) -> Result<bool, AbilityError> {
        self.ship.toggle_active_ability(index)
    }

    pub fn toggle_passive_ability(&mut self, index: usize) -> Result<bool, AbilityError> {
        self.ship.toggle_passive_ability(index)
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    /// Advance the simulation by `dt` seconds and return what changed.
    /// Once the session has ended this does nothing.
    pub fn tick<R: Rng>(&mut self, dt: f32, rng: &mut R) -> Vec<GameEvent> {
        if self.status != GameStatus::Playing {
            return Vec::new();
        }
        let dt = dt.max(0.0);
        let dt_ms = dt * 1000.0;
        self.elapsed_ms += dt_ms;

        // 1. Ship steering, movement and gun cooldown
        self.ship.update(dt);

        // 2. Abilities
        self.resolve_abilities(dt_ms, rng);

        // 3-6. Contact, descent, bullets, falling powerups
        self.advance_entities(dt, rng);

        // 7. Drop everything that died this tick
        self.arena.sweep();

        // 8-9. Spawning and level progress
        if !self.ship.is_destroyed() {
            self.advance_level(dt_ms, rng);
        }

        // 10. Collect events; the session ends exactly once
        let mut events = self.ship.drain_events();
        events.append(&mut self.arena.drain_events());
        if self.ship.is_destroyed() {
            self.status = GameStatus::GameOver;
            let credits_earned = self.arena.credits_earned();
            info!("session over: {} credits earned", credits_earned);
            events.push(GameEvent::SessionEnded { credits_earned });
        }
        events
    }

    /// Moves everything that can touch something else.  Stops as soon as the
    /// ship is destroyed, so nothing is scored or dropped after that.
    fn advance_entities<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        // 3. Ship contact with aliens and powerups
        self.collide_ship_with_aliens();
        self.collect_powerups();
        if self.ship.is_destroyed() {
            return;
        }

        // 4. Aliens descend; those reaching the bottom hit the ship
        for alien in self.arena.aliens.iter_mut().filter(|a| a.is_alive()) {
            alien.update(dt);
            if alien.reached_bottom() {
                self.ship.take_damage(alien.damage);
                alien.destroy();
            }
        }
        if self.ship.is_destroyed() {
            return;
        }

        // 5. Bullets: one hit each, or gone off the top
        self.update_bullets(dt, rng);

        // 6. Powerups fall; unclaimed ones expire at the bottom
        for powerup in self.arena.powerups.iter_mut().filter(|p| !p.is_claimed()) {
            powerup.update(dt);
            if powerup.reached_bottom() {
                powerup.claim();
            }
        }
    }

    fn advance_level<R: Rng>(&mut self, dt_ms: f32, rng: &mut R) {
        // 8. Random trickle
        if let Some(alien) = self
            .spawner
            .update(dt_ms, &self.area, &self.config.aliens, rng)
        {
            self.arena.aliens.push(alien);
        }

        // 9. Level timer
        self.level_elapsed_ms += dt_ms;
        let duration = self.config.spawn.level_duration_ms;
        if duration > 0.0 && self.level_elapsed_ms >= duration {
            self.level_elapsed_ms -= duration;
            self.level_up();
        }
    }

    /// Tighten the trickle and launch the scripted wave for the new level.
    pub fn level_up(&mut self) -> u32 {
        let level = self.spawner.level_up();
        let wave = self
            .spawner
            .spawn_wave(level, &self.area, &self.config.aliens);
        self.arena.push_event(GameEvent::LevelUp { level });
        if !wave.is_empty() {
            self.arena.push_event(GameEvent::WaveSpawned {
                level,
                count: wave.len(),
            });
            self.arena.aliens.extend(wave);
        }
        level
    }

    fn resolve_abilities<R: Rng>(&mut self, dt_ms: f32, rng: &mut R) {
        let discharged: Vec<Ability> = if self.ship.advance_charge(dt_ms) {
            self.ship.take_armed_actives()
        } else {
            Vec::new()
        };
        let passives = self.ship.armed_passives();

        let mut world = World {
            arena: &mut self.arena,
            config: &self.config,
            rng,
            dt_ms,
        };
        for ability in &discharged {
            ability.fire(&mut self.ship, &mut world);
        }
        for ability in &passives {
            ability.fire(&mut self.ship, &mut world);
        }

        if !discharged.is_empty() {
            let kinds = discharged.iter().map(Ability::kind).collect();
            self.arena.push_event(GameEvent::AbilitiesDischarged(kinds));
        }
    }

    /// Ramming: the alien deals its damage and is gone, with no credits or loot.
    fn collide_ship_with_aliens(&mut self) {
        for alien in self.arena.aliens.iter_mut().filter(|a| a.is_alive()) {
            if alien.entity.overlaps(&self.ship.entity) {
                self.ship.take_damage(alien.damage);
                alien.destroy();
            }
        }
    }

    fn collect_powerups(&mut self) {
        let mut collected = Vec::new();
        for powerup in self.arena.powerups.iter_mut().filter(|p| !p.is_claimed()) {
            if powerup.entity.overlaps(&self.ship.entity) {
                let applied = powerup.apply(&mut self.ship);
                powerup.claim();
                collected.push(GameEvent::PowerUpCollected {
                    kind: powerup.kind,
                    applied,
                });
            }
        }
        for event in collected {
            self.arena.push_event(event);
        }
    }

    fn update_bullets<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        let fire_power = self.ship.stat(StatKind::FirePower);
        for i in 0..self.arena.bullets.len() {
            if self.arena.bullets[i].is_spent() {
                continue;
            }
            self.arena.bullets[i].update(dt);
            if let Some(target) = self.arena.bullets[i].first_hit(&self.arena.aliens) {
                self.arena.damage_alien(target, fire_power, rng);
                self.arena.bullets[i].spend();
            } else if self.arena.bullets[i].passed_top() {
                self.arena.bullets[i].spend();
            }
        }
    }
}
