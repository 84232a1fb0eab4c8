//! Abilities the ship can carry in its slots.
//!
//! Each [`AbilityKind`] has a fixed definition (name, description, whether it
//! is active or passive).  An [`Ability`] is one installed instance of a kind
//! plus its level.  Active abilities discharge once when a charge completes;
//! passive abilities fire every tick and grow stronger with level.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bullet::Bullet;
use crate::geometry::Vec2;
use crate::ship::Ship;
use crate::stats::StatKind;
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    // Active
    Shockwave,
    Barrage,
    Repair,
    // Passive
    Spear,
    Regeneration,
    Magnet,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 6] = [
        AbilityKind::Shockwave,
        AbilityKind::Barrage,
        AbilityKind::Repair,
        AbilityKind::Spear,
        AbilityKind::Regeneration,
        AbilityKind::Magnet,
    ];

    pub fn is_active(self) -> bool {
        matches!(
            self,
            AbilityKind::Shockwave | AbilityKind::Barrage | AbilityKind::Repair
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::Shockwave => "Shockwave",
            AbilityKind::Barrage => "Barrage",
            AbilityKind::Repair => "Repair",
            AbilityKind::Spear => "Spear",
            AbilityKind::Regeneration => "Regeneration",
            AbilityKind::Magnet => "Magnet",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AbilityKind::Shockwave => "Damages every alien on screen.",
            AbilityKind::Barrage => "Fires a wall of bullets across the sky.",
            AbilityKind::Repair => "Restores hit points.",
            AbilityKind::Spear => "Fires automatically, faster with each level.",
            AbilityKind::Regeneration => "Slowly restores hit points.",
            AbilityKind::Magnet => "Pulls falling powerups toward the ship.",
        }
    }
}

/// An installed ability.  `level` starts at 1 and only matters for passive
/// kinds, which merge duplicates by levelling up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ability {
    kind: AbilityKind,
    level: u32,
}

impl Ability {
    pub fn new(kind: AbilityKind) -> Self {
        Self { kind, level: 1 }
    }

    pub fn kind(&self) -> AbilityKind {
        self.kind
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_active()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    pub(crate) fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    /// Apply this ability's effect once.
    pub fn fire<R: Rng>(&self, ship: &mut Ship, world: &mut World<'_, R>) {
        let tuning = world.config.abilities;
        let level = self.level.max(1) as f32;
        match self.kind {
            AbilityKind::Shockwave => {
                let damage = ship.stat(StatKind::FirePower) * tuning.shockwave_multiplier;
                let killed = world.arena.damage_all_aliens(damage, world.rng);
                debug!("shockwave for {} damage killed {}", damage, killed);
            }
            AbilityKind::Barrage => {
                let area = world.arena.area();
                let count = tuning.barrage_bullets;
                let y = ship.entity.top_center().y;
                for i in 0..count {
                    let x = area.left + area.width * (i as f32 + 0.5) / count as f32;
                    let bullet = Bullet::new(Vec2::new(x, y), &area, &world.config.bullet);
                    world.arena.bullets.push(bullet);
                }
            }
            AbilityKind::Repair => ship.improve_stat(StatKind::HitPoints, tuning.repair_amount),
            AbilityKind::Spear => {
                if let Some(bullet) = ship.fire_bullet(self.level as i32) {
                    world.arena.bullets.push(bullet);
                }
            }
            AbilityKind::Regeneration => {
                ship.regenerate(world.dt_ms, tuning.regen_interval_ms / level);
            }
            AbilityKind::Magnet => {
                let area = world.arena.area();
                let pull = area.scaled_speed(tuning.magnet_speed * level).x * world.dt_ms / 1000.0;
                world.arena.pull_powerups(ship.entity.pos.x, pull);
            }
        }
    }
}
