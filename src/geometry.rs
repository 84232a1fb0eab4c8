//! Continuous 2-D coordinates for the play field.
//!
//! `y` grows downwards, so a rectangle's `top` is numerically smaller than
//! its `bottom`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle an entity's centre is allowed to occupy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Bounds {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: clamp_axis(p.x, self.left, self.right),
            y: clamp_axis(p.y, self.top, self.bottom),
        }
    }
}

/// Like `f32::clamp`, but tolerates an inverted range (an entity wider than
/// the area) by collapsing onto the midpoint instead of panicking.
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        return (lo + hi) / 2.0;
    }
    v.max(lo).min(hi)
}

/// Extra room added around the play area when deriving an entity's bounds.
/// Positive values shrink the bounds, negative values let the entity travel
/// past the edge (aliens start above the top, bullets leave through it).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    /// Keeps a body of the given size fully inside the area.
    pub fn inset(size: Vec2) -> Self {
        Self {
            top: size.y / 2.0,
            right: size.x / 2.0,
            bottom: size.y / 2.0,
            left: size.x / 2.0,
        }
    }
}

/// The visible playfield.  Every speed in the game is a fraction of this
/// rectangle per second, so gameplay feels the same at any size or aspect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }

    pub fn bounds(&self, padding: Padding) -> Bounds {
        Bounds {
            top: self.top + padding.top,
            right: self.right() - padding.right,
            bottom: self.bottom() - padding.bottom,
            left: self.left + padding.left,
        }
    }

    /// Per-axis speed (units per second) for a base speed expressed as a
    /// fraction of the area crossed per second.
    pub fn scaled_speed(&self, fraction: f32) -> Vec2 {
        Vec2 {
            x: fraction * self.width,
            y: fraction * self.height,
        }
    }
}

/// Collision rectangle centred on an entity's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn left(&self) -> f32 {
        self.center.x - self.size.x / 2.0
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.size.x / 2.0
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}
