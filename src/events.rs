//! Notifications produced during a tick for the presentation layer.
//!
//! The simulation never calls into rendering.  It queues these and hands the
//! whole list back once the tick is over.

use crate::abilities::AbilityKind;
use crate::aliens::AlienKind;
use crate::geometry::Vec2;
use crate::powerup::PowerUpKind;
use crate::stats::StatKind;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    StatChanged(StatKind),
    AbilitySlotsChanged,
    AbilitiesDischarged(Vec<AbilityKind>),
    AlienKilled { kind: AlienKind, credits: u64, at: Vec2 },
    LootDropped(PowerUpKind),
    PowerUpCollected { kind: PowerUpKind, applied: bool },
    LevelUp { level: u32 },
    WaveSpawned { level: u32, count: usize },
    SessionEnded { credits_earned: u64 },
}
