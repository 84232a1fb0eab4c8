use alien_shooter::aliens::AlienKind;
use alien_shooter::config::{AlienCatalog, SpawnConfig};
use alien_shooter::geometry::{PlayArea, Vec2};
use alien_shooter::loot::Weighted;
use alien_shooter::spawn::*;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn area() -> PlayArea {
    PlayArea::new(0.0, 0.0, 100.0, 50.0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn only(level: u32, kind: AlienKind) -> LevelWeights {
    LevelWeights {
        level,
        weights: vec![Weighted { kind, weight: 1 }],
    }
}

/// Spawns on every call: scouts from level 1, brutes from level 3.
fn instant_config() -> SpawnConfig {
    SpawnConfig {
        initial_delay_ms: 0.0,
        trickle: vec![only(1, AlienKind::Scout), only(3, AlienKind::Brute)],
        waves: Vec::new(),
        ..Default::default()
    }
}

// ── Trickle ───────────────────────────────────────────────────────────────────

#[test]
fn trickle_waits_for_the_delay() {
    let mut spawner = SpawnManager::new(&SpawnConfig::default());
    let catalog = AlienCatalog::default();
    let mut rng = seeded_rng();

    assert!(spawner.update(1000.0, &area(), &catalog, &mut rng).is_none());
    assert!(spawner.update(1000.0, &area(), &catalog, &mut rng).is_none());
    let alien = spawner
        .update(500.0, &area(), &catalog, &mut rng)
        .expect("2500 ms elapsed");
    assert_eq!(alien.kind, AlienKind::Scout);
    assert_relative_eq!(spawner.cooldown_ms(), 0.0);

    // The next one needs the full delay again
    assert!(spawner.update(2499.0, &area(), &catalog, &mut rng).is_none());
    assert!(spawner.update(1.0, &area(), &catalog, &mut rng).is_some());
}

#[test]
fn trickle_spawns_above_the_top_within_the_width() {
    let mut spawner = SpawnManager::new(&instant_config());
    let catalog = AlienCatalog::default();
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let alien = spawner.update(0.0, &area(), &catalog, &mut rng).unwrap();
        assert!(alien.entity.pos.x >= 1.5 && alien.entity.pos.x <= 98.5);
        assert_relative_eq!(alien.entity.pos.y, -1.0);
        assert!(alien.is_alive());
        assert!(!alien.reached_bottom());
    }
}

#[test]
fn trickle_uses_highest_table_not_above_level() {
    let mut spawner = SpawnManager::new(&instant_config());
    let catalog = AlienCatalog::default();
    let mut rng = seeded_rng();
    let mut next_kind = |spawner: &mut SpawnManager| {
        spawner
            .update(0.0, &area(), &catalog, &mut rng)
            .map(|a| a.kind)
    };

    assert_eq!(next_kind(&mut spawner), Some(AlienKind::Scout));
    assert_eq!(spawner.level_up(), 2);
    assert_eq!(next_kind(&mut spawner), Some(AlienKind::Scout));
    assert_eq!(spawner.level_up(), 3);
    assert_eq!(next_kind(&mut spawner), Some(AlienKind::Brute));

    // Far past the last table: the last one keeps being used
    while spawner.level() < 50 {
        spawner.level_up();
    }
    assert_eq!(next_kind(&mut spawner), Some(AlienKind::Brute));
}

#[test]
fn levels_below_the_first_table_fall_back_to_it() {
    let config = SpawnConfig {
        trickle: vec![only(4, AlienKind::Grunt)],
        ..instant_config()
    };
    let mut spawner = SpawnManager::new(&config);
    let alien = spawner
        .update(0.0, &area(), &AlienCatalog::default(), &mut seeded_rng())
        .unwrap();
    assert_eq!(alien.kind, AlienKind::Grunt);
}

#[test]
fn empty_trickle_spawns_nothing() {
    let config = SpawnConfig {
        trickle: Vec::new(),
        ..instant_config()
    };
    let mut spawner = SpawnManager::new(&config);
    let mut rng = seeded_rng();
    for _ in 0..10 {
        assert!(spawner
            .update(100.0, &area(), &AlienCatalog::default(), &mut rng)
            .is_none());
    }
}

// ── Level progression ─────────────────────────────────────────────────────────

#[test]
fn level_up_tightens_the_delay() {
    let mut spawner = SpawnManager::new(&SpawnConfig::default());
    assert_eq!(spawner.level(), 1);
    assert_eq!(spawner.level_up(), 2);
    assert_relative_eq!(spawner.spawn_delay_ms(), 2375.0, epsilon = 1e-3);

    let mut last = spawner.spawn_delay_ms();
    for _ in 0..20 {
        spawner.level_up();
        assert!(spawner.spawn_delay_ms() < last);
        last = spawner.spawn_delay_ms();
    }
    assert_eq!(spawner.level(), 22);
}

#[test]
fn delay_factor_above_one_is_ignored() {
    let config = SpawnConfig {
        delay_factor: 1.5,
        ..Default::default()
    };
    let mut spawner = SpawnManager::new(&config);
    spawner.level_up();
    assert_relative_eq!(spawner.spawn_delay_ms(), 2500.0);
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[test]
fn wave_is_laid_out_around_the_centre() {
    let config = SpawnConfig {
        waves: vec![WaveSpec {
            level: 2,
            kind: AlienKind::Grunt,
            offsets: vec![Vec2::new(0.0, 0.0), Vec2::new(-2.0, 0.0), Vec2::new(2.0, -1.0)],
        }],
        ..Default::default()
    };
    let spawner = SpawnManager::new(&config);
    let wave = spawner.spawn_wave(2, &area(), &AlienCatalog::default());

    assert_eq!(wave.len(), 3);
    assert!(wave.iter().all(|a| a.kind == AlienKind::Grunt));
    // Offsets are in alien widths/heights (grunt is 3 x 2)
    assert_relative_eq!(wave[0].entity.pos.x, 50.0);
    assert_relative_eq!(wave[0].entity.pos.y, -1.0);
    assert_relative_eq!(wave[1].entity.pos.x, 44.0);
    assert_relative_eq!(wave[2].entity.pos.x, 56.0);
    assert_relative_eq!(wave[2].entity.pos.y, -3.0);
}

#[test]
fn levels_without_a_wave_spawn_nothing() {
    let spawner = SpawnManager::new(&SpawnConfig::default());
    let catalog = AlienCatalog::default();
    assert!(spawner.spawn_wave(1, &area(), &catalog).is_empty());
    assert!(spawner.spawn_wave(3, &area(), &catalog).is_empty());
    assert_eq!(spawner.spawn_wave(2, &area(), &catalog).len(), 5);
}
