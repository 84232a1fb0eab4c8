//! Ability slots on the ship.
//!
//! A slot is typed (active or passive) and may be locked.  It decides on its
//! own whether an incoming ability is inserted, merged into the current one,
//! replaces it, or is rejected; the ship only chooses which slot to offer it to.

use crate::abilities::Ability;
use crate::error::AbilityError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotType {
    Active,
    Passive,
}

impl SlotType {
    pub fn fits(self, ability: &Ability) -> bool {
        match self {
            SlotType::Active => ability.is_active(),
            SlotType::Passive => !ability.is_active(),
        }
    }
}

/// What happened to a slot when an ability was accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Inserted,
    /// The same passive kind was already present; its level went up by one.
    LeveledUp,
    /// A disabled passive was displaced.  Carries the old ability.
    Replaced(Ability),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    slot_type: SlotType,
    locked: bool,
    ability: Option<Ability>,
    enabled: bool,
}

impl Slot {
    pub fn new(slot_type: SlotType, locked: bool) -> Self {
        Self {
            slot_type,
            locked,
            ability: None,
            enabled: true,
        }
    }

    pub fn slot_type(&self) -> SlotType {
        self.slot_type
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_empty(&self) -> bool {
        self.ability.is_none()
    }

    pub fn ability(&self) -> Option<&Ability> {
        self.ability.as_ref()
    }

    /// The ability if this slot should fire it this tick.
    pub fn armed(&self) -> Option<&Ability> {
        if self.enabled && !self.locked {
            self.ability.as_ref()
        } else {
            None
        }
    }

    /// Dry run of [`Slot::insert`].
    pub fn check(&self, ability: &Ability) -> Result<(), AbilityError> {
        if self.locked {
            return Err(AbilityError::SlotLocked);
        }
        if !self.slot_type.fits(ability) {
            return Err(AbilityError::WrongSlotType);
        }
        match (self.slot_type, &self.ability) {
            (_, None) => Ok(()),
            (SlotType::Passive, Some(current)) if current.kind() == ability.kind() => Ok(()),
            (SlotType::Passive, Some(_)) if !self.enabled => Ok(()),
            _ => Err(AbilityError::SlotOccupied),
        }
    }

    pub fn insert(&mut self, ability: Ability) -> Result<Placement, AbilityError> {
        self.check(&ability)?;
        let placement = match self.ability.as_mut() {
            Some(current) if current.kind() == ability.kind() => {
                current.level_up();
                return Ok(Placement::LeveledUp);
            }
            Some(current) => Placement::Replaced(*current),
            None => Placement::Inserted,
        };
        self.ability = Some(ability);
        self.enabled = true;
        Ok(placement)
    }

    /// Remove the ability and disable the slot (after an active discharge).
    pub fn take(&mut self) -> Option<Ability> {
        self.enabled = false;
        self.ability.take()
    }

    /// Flip the enabled flag; returns the new state.
    pub fn toggle(&mut self) -> Result<bool, AbilityError> {
        if self.locked {
            return Err(AbilityError::SlotLocked);
        }
        self.enabled = !self.enabled;
        Ok(self.enabled)
    }
}
