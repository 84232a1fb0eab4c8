//! The moving/colliding base shared by the ship, aliens, bullets and powerups.

use crate::geometry::{Bounds, Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Centre of the entity.
    pub pos: Vec2,
    /// Width and height of the collision box.
    pub size: Vec2,
    pub bounds: Bounds,
    pub destination: Option<Vec2>,
    /// Units per second on each axis.
    pub speed: Vec2,
}

impl Entity {
    /// The starting position is clamped into `bounds`.
    pub fn new(pos: Vec2, size: Vec2, bounds: Bounds, speed: Vec2) -> Self {
        Self {
            pos: bounds.clamp(pos),
            size,
            bounds,
            destination: None,
            speed,
        }
    }

    /// Advance toward `destination` without overshooting, then clamp into
    /// `bounds`.  Each axis is stepped independently.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        if let Some(dest) = self.destination {
            self.pos.x = step_axis(self.pos.x, dest.x, self.speed.x * dt);
            self.pos.y = step_axis(self.pos.y, dest.y, self.speed.y * dt);
        }
        self.pos = self.bounds.clamp(self.pos);
    }

    pub fn rect(&self) -> Rect {
        Rect {
            center: self.pos,
            size: self.size,
        }
    }

    pub fn overlaps(&self, other: &Entity) -> bool {
        self.rect().overlaps(&other.rect())
    }

    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.size.y / 2.0)
    }

    pub fn at_destination(&self) -> bool {
        self.destination.map_or(false, |d| d == self.pos)
    }
}

/// Move `from` toward `to` by at most `max_step`, landing exactly on `to`
/// once it is within reach.
pub fn step_axis(from: f32, to: f32, max_step: f32) -> f32 {
    let remaining = to - from;
    let max_step = max_step.max(0.0);
    if remaining.abs() <= max_step {
        to
    } else {
        from + max_step.copysign(remaining)
    }
}
