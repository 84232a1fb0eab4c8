use serde::{Deserialize, Serialize};

use crate::abilities::{Ability, AbilityKind};
use crate::config::PowerUpConfig;
use crate::entities::{step_axis, Entity};
use crate::geometry::{Padding, PlayArea, Vec2};
use crate::ship::Ship;
use crate::stats::StatKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    ImproveStat { stat: StatKind, amount: i32 },
    AddAbility(AbilityKind),
}

/// A pickup falling from where an alien died.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub entity: Entity,
    pub kind: PowerUpKind,
    claimed: bool,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, at: Vec2, area: &PlayArea, config: &PowerUpConfig) -> Self {
        let size = Vec2::new(config.width, config.height);
        let bounds = area.bounds(Padding::inset(size));
        let mut entity = Entity::new(at, size, bounds, area.scaled_speed(config.fall_speed));
        entity.destination = Some(Vec2::new(entity.pos.x, bounds.bottom));
        Self {
            entity,
            kind,
            claimed: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.entity.update(dt);
    }

    pub fn reached_bottom(&self) -> bool {
        self.entity.pos.y >= self.entity.bounds.bottom
    }

    /// Drift horizontally toward `x` by at most `max_step`.
    pub fn pull_toward(&mut self, x: f32, max_step: f32) {
        let bounds = self.entity.bounds;
        let new_x = step_axis(self.entity.pos.x, x, max_step).max(bounds.left).min(bounds.right);
        self.entity.pos.x = new_x;
        if let Some(dest) = self.entity.destination.as_mut() {
            dest.x = new_x;
        }
    }

    /// Give the effect to the ship.  Returns whether it took hold (an ability
    /// with no free slot is wasted).
    pub fn apply(&self, ship: &mut Ship) -> bool {
        match self.kind {
            PowerUpKind::ImproveStat { stat, amount } => {
                ship.improve_stat(stat, amount);
                true
            }
            PowerUpKind::AddAbility(kind) => ship.add_ability(Ability::new(kind)).is_ok(),
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Mark for removal, whether picked up or lost off the bottom.
    pub fn claim(&mut self) {
        self.claimed = true;
    }
}
