use serde::{Deserialize, Serialize};

use crate::config::AlienSpec;
use crate::entities::Entity;
use crate::geometry::{Padding, PlayArea, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlienKind {
    Scout,
    Grunt,
    Brute,
}

/// An invader descending straight toward the bottom of the play area.
#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub entity: Entity,
    pub kind: AlienKind,
    pub hp: i32,
    pub damage: i32,
    pub credit_value: u64,
    removed: bool,
}

impl Alien {
    pub fn new(kind: AlienKind, spec: &AlienSpec, pos: Vec2, area: &PlayArea) -> Self {
        let size = Vec2::new(spec.width, spec.height);
        // Aliens enter from above, so the top bound reaches a full screen up.
        let bounds = area.bounds(Padding {
            top: -area.height,
            right: size.x / 2.0,
            bottom: size.y / 2.0,
            left: size.x / 2.0,
        });
        let mut entity = Entity::new(pos, size, bounds, area.scaled_speed(spec.speed));
        entity.destination = Some(Vec2::new(entity.pos.x, bounds.bottom));
        Self {
            entity,
            kind,
            hp: spec.hp,
            damage: spec.damage,
            credit_value: spec.credit_value,
            removed: false,
        }
    }

    /// Where a freshly spawned alien of this size sits: just above the top edge.
    pub fn spawn_y(spec: &AlienSpec, area: &PlayArea) -> f32 {
        area.top - spec.height / 2.0
    }

    pub fn update(&mut self, dt: f32) {
        self.entity.update(dt);
    }

    pub fn reached_bottom(&self) -> bool {
        self.entity.pos.y >= self.entity.bounds.bottom
    }

    /// Returns `true` only on the hit that kills it; a dead alien ignores
    /// further damage.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        self.hp <= 0
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0 && !self.removed
    }

    /// Remove without a kill (boundary crossing or ramming the ship).
    pub fn destroy(&mut self) {
        self.removed = true;
    }
}
