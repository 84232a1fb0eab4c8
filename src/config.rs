//! Gameplay tunables.
//!
//! Every section falls back to its defaults field by field, so a config file
//! only needs the values it wants to change.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityKind;
use crate::aliens::AlienKind;
use crate::error::ConfigError;
use crate::geometry::Vec2;
use crate::loot::Weighted;
use crate::spawn::{LevelWeights, WaveSpec};
use crate::stats::StatKind;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ship: ShipConfig,
    pub bullet: BulletConfig,
    pub powerup: PowerUpConfig,
    pub abilities: AbilityConfig,
    pub aliens: AlienCatalog,
    pub spawn: SpawnConfig,
    pub loot: LootConfig,
    pub upgrades: UpgradeConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub hit_points: i32,
    pub thrust: i32,
    pub fire_power: i32,
    pub fire_rate: i32,
    pub width: f32,
    pub height: f32,
    /// Fraction of the play-area width crossed per second at the reference thrust.
    pub base_speed: f32,
    /// Divided by Fire Rate to get the gap between shots.
    pub base_fire_delay_ms: f32,
    pub base_charge_ms: f32,
    /// Charge time multiplier per Charge Time upgrade level.
    pub charge_reduction: f32,
    pub active_slots: usize,
    pub passive_slots: usize,
    /// Slots usable before any unlock upgrade.
    pub unlocked_active_slots: usize,
    pub unlocked_passive_slots: usize,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            hit_points: 10,
            thrust: 5,
            fire_power: 1,
            fire_rate: 3,
            width: 5.0,
            height: 2.0,
            base_speed: 0.6,
            base_fire_delay_ms: 3000.0,
            base_charge_ms: 2000.0,
            charge_reduction: 0.9,
            active_slots: 3,
            passive_slots: 4,
            unlocked_active_slots: 1,
            unlocked_passive_slots: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub width: f32,
    pub height: f32,
    /// Fraction of the play-area height travelled per second.
    pub speed: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self { width: 1.0, height: 1.0, speed: 1.2 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub width: f32,
    pub height: f32,
    pub fall_speed: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self { width: 1.0, height: 1.0, fall_speed: 0.08 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    /// Shockwave damage as a multiple of Fire Power.
    pub shockwave_multiplier: i32,
    pub barrage_bullets: usize,
    pub repair_amount: i32,
    /// Time per regenerated hit point at level 1.
    pub regen_interval_ms: f32,
    /// Fraction of the play-area width a powerup is pulled per second, per level.
    pub magnet_speed: f32,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            shockwave_multiplier: 2,
            barrage_bullets: 7,
            repair_amount: 3,
            regen_interval_ms: 8000.0,
            magnet_speed: 0.15,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlienSpec {
    pub hp: i32,
    pub damage: i32,
    pub credit_value: u64,
    pub width: f32,
    pub height: f32,
    /// Fraction of the play-area height descended per second.
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlienCatalog {
    pub scout: AlienSpec,
    pub grunt: AlienSpec,
    pub brute: AlienSpec,
}

impl AlienCatalog {
    pub fn get(&self, kind: AlienKind) -> &AlienSpec {
        match kind {
            AlienKind::Scout => &self.scout,
            AlienKind::Grunt => &self.grunt,
            AlienKind::Brute => &self.brute,
        }
    }
}

impl Default for AlienCatalog {
    fn default() -> Self {
        Self {
            scout: AlienSpec { hp: 1, damage: 1, credit_value: 1, width: 3.0, height: 2.0, speed: 0.08 },
            grunt: AlienSpec { hp: 3, damage: 2, credit_value: 3, width: 3.0, height: 2.0, speed: 0.06 },
            brute: AlienSpec { hp: 8, damage: 4, credit_value: 10, width: 5.0, height: 2.0, speed: 0.04 },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub initial_delay_ms: f32,
    /// Trickle delay multiplier applied on every level-up.
    pub delay_factor: f32,
    pub level_duration_ms: f32,
    pub trickle: Vec<LevelWeights>,
    pub waves: Vec<WaveSpec>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        let w = |kind, weight| Weighted { kind, weight };
        let plus = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(-1.5, 0.0),
            Vec2::new(1.5, 0.0),
            Vec2::new(0.0, -1.5),
            Vec2::new(0.0, 1.5),
        ];
        let line = (-2..=2).map(|i| Vec2::new(i as f32 * 1.5, 0.0)).collect();
        let vee = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(-1.5, -1.0),
            Vec2::new(1.5, -1.0),
            Vec2::new(-3.0, -2.0),
            Vec2::new(3.0, -2.0),
        ];
        Self {
            initial_delay_ms: 2500.0,
            delay_factor: 0.95,
            level_duration_ms: 30_000.0,
            trickle: vec![
                LevelWeights { level: 1, weights: vec![w(AlienKind::Scout, 1)] },
                LevelWeights {
                    level: 3,
                    weights: vec![w(AlienKind::Scout, 3), w(AlienKind::Grunt, 1)],
                },
                LevelWeights {
                    level: 6,
                    weights: vec![
                        w(AlienKind::Scout, 3),
                        w(AlienKind::Grunt, 2),
                        w(AlienKind::Brute, 1),
                    ],
                },
            ],
            waves: vec![
                WaveSpec { level: 2, kind: AlienKind::Scout, offsets: plus.clone() },
                WaveSpec { level: 4, kind: AlienKind::Grunt, offsets: line },
                WaveSpec { level: 6, kind: AlienKind::Scout, offsets: vee },
                WaveSpec { level: 8, kind: AlienKind::Brute, offsets: plus },
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub base_chance_percent: f32,
    /// Added to the chance for every Luck upgrade level.
    pub luck_bonus_percent: f32,
    /// Subdivisions of one percent used by the roll.
    pub precision: u32,
    pub ability_weight: u32,
    pub stat_weight: u32,
    pub abilities: Vec<Weighted<AbilityKind>>,
    pub stats: Vec<Weighted<StatKind>>,
    pub stat_amount: i32,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            base_chance_percent: 10.0,
            luck_bonus_percent: 1.0,
            precision: 100,
            ability_weight: 1,
            stat_weight: 3,
            abilities: AbilityKind::ALL
                .iter()
                .map(|&kind| Weighted { kind, weight: 1 })
                .collect(),
            stats: vec![
                Weighted { kind: StatKind::HitPoints, weight: 2 },
                Weighted { kind: StatKind::Thrust, weight: 1 },
                Weighted { kind: StatKind::FirePower, weight: 1 },
                Weighted { kind: StatKind::FireRate, weight: 1 },
            ],
            stat_amount: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    pub base_cost: u64,
    pub cost_growth: f64,
    pub max_stat_level: u32,
    pub max_charge_level: u32,
    pub max_luck_level: u32,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            base_cost: 10,
            cost_growth: 1.5,
            max_stat_level: 10,
            max_charge_level: 10,
            max_luck_level: 10,
        }
    }
}
