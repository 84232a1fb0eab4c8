//! Persistent, credit-bought upgrades.
//!
//! A session only ever sees an [`UpgradeSnapshot`]; buying happens between
//! sessions through [`Progress`].

use std::io::ErrorKind;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ProgressError;
use crate::stats::StatKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    HitPoints,
    Thrust,
    FirePower,
    FireRate,
    ActiveSlot,
    PassiveSlot,
    ChargeTime,
    Luck,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 8] = [
        UpgradeKind::HitPoints,
        UpgradeKind::Thrust,
        UpgradeKind::FirePower,
        UpgradeKind::FireRate,
        UpgradeKind::ActiveSlot,
        UpgradeKind::PassiveSlot,
        UpgradeKind::ChargeTime,
        UpgradeKind::Luck,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::HitPoints => "Hit Points",
            UpgradeKind::Thrust => "Thrust",
            UpgradeKind::FirePower => "Fire Power",
            UpgradeKind::FireRate => "Fire Rate",
            UpgradeKind::ActiveSlot => "Active Slot",
            UpgradeKind::PassiveSlot => "Passive Slot",
            UpgradeKind::ChargeTime => "Charge Time",
            UpgradeKind::Luck => "Luck",
        }
    }
}

/// Upgrade levels as seen by one session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeSnapshot {
    pub hit_points: u32,
    pub thrust: u32,
    pub fire_power: u32,
    pub fire_rate: u32,
    pub active_slot_unlocks: u32,
    pub passive_slot_unlocks: u32,
    pub charge_time_level: u32,
    pub luck_level: u32,
}

impl UpgradeSnapshot {
    pub fn stat_level(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::HitPoints => self.hit_points,
            StatKind::Thrust => self.thrust,
            StatKind::FirePower => self.fire_power,
            StatKind::FireRate => self.fire_rate,
        }
    }

    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::HitPoints => self.hit_points,
            UpgradeKind::Thrust => self.thrust,
            UpgradeKind::FirePower => self.fire_power,
            UpgradeKind::FireRate => self.fire_rate,
            UpgradeKind::ActiveSlot => self.active_slot_unlocks,
            UpgradeKind::PassiveSlot => self.passive_slot_unlocks,
            UpgradeKind::ChargeTime => self.charge_time_level,
            UpgradeKind::Luck => self.luck_level,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::HitPoints => &mut self.hit_points,
            UpgradeKind::Thrust => &mut self.thrust,
            UpgradeKind::FirePower => &mut self.fire_power,
            UpgradeKind::FireRate => &mut self.fire_rate,
            UpgradeKind::ActiveSlot => &mut self.active_slot_unlocks,
            UpgradeKind::PassiveSlot => &mut self.passive_slot_unlocks,
            UpgradeKind::ChargeTime => &mut self.charge_time_level,
            UpgradeKind::Luck => &mut self.luck_level,
        }
    }
}

/// Credits banked across sessions and the upgrades bought with them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub credits: u64,
    pub upgrades: UpgradeSnapshot,
}

impl Progress {
    /// A missing file is a fresh start, not an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProgressError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProgressError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn snapshot(&self) -> UpgradeSnapshot {
        self.upgrades.clone()
    }

    pub fn deposit(&mut self, credits: u64) {
        self.credits = self.credits.saturating_add(credits);
    }

    pub fn max_level(kind: UpgradeKind, config: &GameConfig) -> u32 {
        let ship = &config.ship;
        let limits = &config.upgrades;
        match kind {
            UpgradeKind::HitPoints
            | UpgradeKind::Thrust
            | UpgradeKind::FirePower
            | UpgradeKind::FireRate => limits.max_stat_level,
            UpgradeKind::ActiveSlot => {
                ship.active_slots.saturating_sub(ship.unlocked_active_slots) as u32
            }
            UpgradeKind::PassiveSlot => {
                ship.passive_slots.saturating_sub(ship.unlocked_passive_slots) as u32
            }
            UpgradeKind::ChargeTime => limits.max_charge_level,
            UpgradeKind::Luck => limits.max_luck_level,
        }
    }

    /// Price of the next level: `base_cost * cost_growth ^ level`, rounded.
    pub fn cost(&self, kind: UpgradeKind, config: &GameConfig) -> u64 {
        let limits = &config.upgrades;
        let level = self.upgrades.level(kind) as i32;
        (limits.base_cost as f64 * limits.cost_growth.powi(level)).round() as u64
    }

    /// Buy one level.  Returns the credits spent.
    pub fn purchase(&mut self, kind: UpgradeKind, config: &GameConfig) -> Result<u64, ProgressError> {
        if self.upgrades.level(kind) >= Self::max_level(kind, config) {
            return Err(ProgressError::MaxLevel(kind));
        }
        let cost = self.cost(kind, config);
        if cost > self.credits {
            return Err(ProgressError::InsufficientCredits {
                cost,
                available: self.credits,
            });
        }
        self.credits -= cost;
        let level = self.upgrades.level_mut(kind);
        *level += 1;
        info!("bought {} level {} for {} credits", kind.label(), *level, cost);
        Ok(cost)
    }
}
