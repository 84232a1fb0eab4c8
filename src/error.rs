//! Error types for the gameplay core.
//!
//! None of these end a session; callers log them and carry on.

use thiserror::Error;

use crate::upgrades::UpgradeKind;

/// Why an ability could not be placed or a slot could not be toggled.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityError {
    #[error("slot {index} does not exist (ship has {len})")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("slot is locked")]
    SlotLocked,

    #[error("ability does not fit this slot type")]
    WrongSlotType,

    #[error("slot is occupied")]
    SlotOccupied,

    #[error("no eligible slot for ability")]
    NoEligibleSlot,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown stat: {0}")]
pub struct UnknownStat(pub String);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("upgrade costs {cost} credits, only {available} available")]
    InsufficientCredits { cost: u64, available: u64 },

    #[error("{0:?} is already at its maximum level")]
    MaxLevel(UpgradeKind),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
