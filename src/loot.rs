//! Weighted random tables and the powerup drop policy.

use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::abilities::AbilityKind;
use crate::config::LootConfig;
use crate::powerup::PowerUpKind;
use crate::stats::StatKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weighted<T> {
    pub kind: T,
    pub weight: u32,
}

/// Picks one of its entries with probability proportional to its weight.
/// A table with no positive weight never picks anything.
#[derive(Clone, Debug)]
pub struct WeightedTable<T> {
    items: Vec<T>,
    index: Option<WeightedIndex<u32>>,
}

impl<T: Copy> WeightedTable<T> {
    pub fn new(entries: &[Weighted<T>]) -> Self {
        Self {
            items: entries.iter().map(|e| e.kind).collect(),
            index: WeightedIndex::new(entries.iter().map(|e| e.weight)).ok(),
        }
    }

    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<T> {
        self.index.as_ref().map(|dist| self.items[dist.sample(rng)])
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DropCategory {
    Ability,
    Stat,
}

/// Decides whether a dead alien leaves a powerup, and which.
#[derive(Clone, Debug)]
pub struct RandomDropManager {
    chance_percent: f32,
    precision: u32,
    categories: WeightedTable<DropCategory>,
    abilities: WeightedTable<AbilityKind>,
    stats: WeightedTable<StatKind>,
    stat_amount: i32,
    rolls: u64,
}

impl RandomDropManager {
    pub fn new(config: &LootConfig, luck_level: u32) -> Self {
        let abilities = WeightedTable::new(&config.abilities);
        let stats = WeightedTable::new(&config.stats);
        // A category whose table has nothing to pick never wins the category
        // roll, so a won chance roll always falls through to the other one.
        let weight_if_any = |empty: bool, weight: u32| if empty { 0 } else { weight };
        Self {
            chance_percent: config.base_chance_percent
                + luck_level as f32 * config.luck_bonus_percent,
            precision: config.precision.max(1),
            categories: WeightedTable::new(&[
                Weighted {
                    kind: DropCategory::Ability,
                    weight: weight_if_any(abilities.is_empty(), config.ability_weight),
                },
                Weighted {
                    kind: DropCategory::Stat,
                    weight: weight_if_any(stats.is_empty(), config.stat_weight),
                },
            ]),
            abilities,
            stats,
            stat_amount: config.stat_amount,
            rolls: 0,
        }
    }

    /// Base chance plus the Luck bonus, in percent.
    pub fn chance_percent(&self) -> f32 {
        self.chance_percent
    }

    /// How many drop rolls have been made.
    pub fn rolls(&self) -> u64 {
        self.rolls
    }

    /// The chance is compared against a uniform roll over
    /// `0..100 * precision`, which keeps fractional percents meaningful.
    pub fn roll<R: Rng>(&mut self, rng: &mut R) -> Option<PowerUpKind> {
        self.rolls += 1;
        let threshold = (self.chance_percent.max(0.0) * self.precision as f32).round() as u64;
        let roll = rng.gen_range(0..100 * u64::from(self.precision));
        if roll >= threshold {
            return None;
        }
        let Some(category) = self.categories.pick(rng) else {
            debug!("loot roll {} won but no drop table has anything to give", roll);
            return None;
        };
        let drop = match category {
            DropCategory::Ability => PowerUpKind::AddAbility(self.abilities.pick(rng)?),
            DropCategory::Stat => PowerUpKind::ImproveStat {
                stat: self.stats.pick(rng)?,
                amount: self.stat_amount,
            },
        };
        debug!("loot roll {} dropped {:?}", roll, drop);
        Some(drop)
    }
}
