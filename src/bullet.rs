use crate::aliens::Alien;
use crate::config::BulletConfig;
use crate::entities::Entity;
use crate::geometry::{Padding, PlayArea, Rect, Vec2};

/// A projectile flying straight up from where it was fired.  It ends either
/// by hitting one alien or by leaving through the top of the play area.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub entity: Entity,
    /// Height before the last update.
    prev_y: f32,
    spent: bool,
}

impl Bullet {
    pub fn new(origin: Vec2, area: &PlayArea, config: &BulletConfig) -> Self {
        let size = Vec2::new(config.width, config.height);
        // Free to travel half its height past the top edge, i.e. fully off-screen.
        let bounds = area.bounds(Padding {
            top: -size.y / 2.0,
            right: size.x / 2.0,
            bottom: 0.0,
            left: size.x / 2.0,
        });
        let mut entity = Entity::new(origin, size, bounds, area.scaled_speed(config.speed));
        entity.destination = Some(Vec2::new(entity.pos.x, bounds.top));
        Self {
            prev_y: entity.pos.y,
            entity,
            spent: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.prev_y = self.entity.pos.y;
        self.entity.update(dt);
    }

    /// Everything the bullet passed through during the last update.  A fast
    /// bullet on a tall area can travel further than an alien is high in one
    /// tick, so hits are tested against this instead of the end position.
    pub fn swept_rect(&self) -> Rect {
        let now = self.entity.rect();
        let half = self.entity.size.y / 2.0;
        let top = now.top().min(self.prev_y - half);
        let bottom = now.bottom().max(self.prev_y + half);
        Rect {
            center: Vec2::new(self.entity.pos.x, (top + bottom) / 2.0),
            size: Vec2::new(self.entity.size.x, bottom - top),
        }
    }

    pub fn passed_top(&self) -> bool {
        self.entity.pos.y <= self.entity.bounds.top
    }

    /// Index of the first live alien along the path of the last update: the
    /// lowest one, since bullets fly upward.  Ties go to the earlier index.
    pub fn first_hit(&self, aliens: &[Alien]) -> Option<usize> {
        let path = self.swept_rect();
        let mut hit: Option<(usize, f32)> = None;
        for (i, alien) in aliens.iter().enumerate() {
            let rect = alien.entity.rect();
            if !alien.is_alive() || !rect.overlaps(&path) {
                continue;
            }
            if hit.map_or(true, |(_, lowest)| rect.bottom() > lowest) {
                hit = Some((i, rect.bottom()));
            }
        }
        hit.map(|(i, _)| i)
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    pub fn spend(&mut self) {
        self.spent = true;
    }
}
