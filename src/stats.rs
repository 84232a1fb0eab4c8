//! Named integer attributes of the ship.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownStat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    HitPoints,
    Thrust,
    FirePower,
    FireRate,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [
        StatKind::HitPoints,
        StatKind::Thrust,
        StatKind::FirePower,
        StatKind::FireRate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatKind::HitPoints => "Hit Points",
            StatKind::Thrust => "Thrust",
            StatKind::FirePower => "Fire Power",
            StatKind::FireRate => "Fire Rate",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKind {
    type Err = UnknownStat;

    /// Accepts the display name ("Fire Rate") or the snake_case key ("fire_rate").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(' ', "_");
        match key.as_str() {
            "hit_points" | "hp" => Ok(StatKind::HitPoints),
            "thrust" => Ok(StatKind::Thrust),
            "fire_power" => Ok(StatKind::FirePower),
            "fire_rate" => Ok(StatKind::FireRate),
            _ => Err(UnknownStat(s.to_string())),
        }
    }
}

/// A single value.  It may go negative (Hit Points after a heavy hit); what a
/// non-positive value means is up to the owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stat {
    pub kind: StatKind,
    pub value: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stats {
    hit_points: Stat,
    thrust: Stat,
    fire_power: Stat,
    fire_rate: Stat,
}

impl Stats {
    pub fn new(hit_points: i32, thrust: i32, fire_power: i32, fire_rate: i32) -> Self {
        Self {
            hit_points: Stat { kind: StatKind::HitPoints, value: hit_points },
            thrust: Stat { kind: StatKind::Thrust, value: thrust },
            fire_power: Stat { kind: StatKind::FirePower, value: fire_power },
            fire_rate: Stat { kind: StatKind::FireRate, value: fire_rate },
        }
    }

    pub fn get(&self, kind: StatKind) -> i32 {
        self.stat(kind).value
    }

    pub fn stat(&self, kind: StatKind) -> &Stat {
        match kind {
            StatKind::HitPoints => &self.hit_points,
            StatKind::Thrust => &self.thrust,
            StatKind::FirePower => &self.fire_power,
            StatKind::FireRate => &self.fire_rate,
        }
    }

    /// Raw mutation.  Owners that derive values from a stat must go through
    /// their own wrapper so the derived values are refreshed.
    pub(crate) fn add(&mut self, kind: StatKind, amount: i32) -> i32 {
        let stat = match kind {
            StatKind::HitPoints => &mut self.hit_points,
            StatKind::Thrust => &mut self.thrust,
            StatKind::FirePower => &mut self.fire_power,
            StatKind::FireRate => &mut self.fire_rate,
        };
        stat.value = stat.value.saturating_add(amount);
        stat.value
    }
}
