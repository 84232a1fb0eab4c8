//! Live entity collections and the context handed to ability effects.

use log::debug;
use rand::Rng;

use crate::aliens::Alien;
use crate::bullet::Bullet;
use crate::config::{GameConfig, PowerUpConfig};
use crate::events::GameEvent;
use crate::geometry::PlayArea;
use crate::loot::RandomDropManager;
use crate::powerup::PowerUp;
use crate::upgrades::UpgradeSnapshot;

/// Everything an ability may touch besides the ship itself.
pub struct World<'a, R: Rng> {
    pub arena: &'a mut Arena,
    pub config: &'a GameConfig,
    pub rng: &'a mut R,
    /// Length of the current tick.
    pub dt_ms: f32,
}

/// Aliens, bullets and powerups in play, plus the session's credit ledger.
///
/// Entities are never removed while a tick walks the collections.  They are
/// flagged dead/spent/claimed and dropped in one [`Arena::sweep`] at the end.
#[derive(Clone, Debug)]
pub struct Arena {
    pub aliens: Vec<Alien>,
    pub bullets: Vec<Bullet>,
    pub powerups: Vec<PowerUp>,
    area: PlayArea,
    powerup: PowerUpConfig,
    drops: RandomDropManager,
    credits_earned: u64,
    kills: u32,
    events: Vec<GameEvent>,
}

impl Arena {
    pub fn new(area: PlayArea, config: &GameConfig, upgrades: &UpgradeSnapshot) -> Self {
        Self {
            aliens: Vec::new(),
            bullets: Vec::new(),
            powerups: Vec::new(),
            area,
            powerup: config.powerup,
            drops: RandomDropManager::new(&config.loot, upgrades.luck_level),
            credits_earned: 0,
            kills: 0,
            events: Vec::new(),
        }
    }

    pub fn area(&self) -> PlayArea {
        self.area
    }

    pub fn credits_earned(&self) -> u64 {
        self.credits_earned
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn drops(&self) -> &RandomDropManager {
        &self.drops
    }

    /// Hit one alien.  On the killing blow its credits are banked and one loot
    /// roll is made at its position.  Returns whether it died.
    pub fn damage_alien<R: Rng>(&mut self, index: usize, amount: i32, rng: &mut R) -> bool {
        let Some(alien) = self.aliens.get_mut(index) else {
            return false;
        };
        if !alien.take_damage(amount) {
            return false;
        }
        let (kind, credits, at) = (alien.kind, alien.credit_value, alien.entity.pos);
        self.credits_earned = self.credits_earned.saturating_add(credits);
        self.kills += 1;
        self.events.push(GameEvent::AlienKilled { kind, credits, at });
        debug!("{:?} killed at ({:.1}, {:.1}) for {} credits", kind, at.x, at.y, credits);

        if let Some(drop) = self.drops.roll(rng) {
            self.powerups.push(PowerUp::new(drop, at, &self.area, &self.powerup));
            self.events.push(GameEvent::LootDropped(drop));
        }
        true
    }

    /// Hit every live alien once.  Returns how many died.
    pub fn damage_all_aliens<R: Rng>(&mut self, amount: i32, rng: &mut R) -> usize {
        (0..self.aliens.len())
            .filter(|&i| self.damage_alien(i, amount, rng))
            .count()
    }

    pub fn pull_powerups(&mut self, x: f32, max_step: f32) {
        for powerup in self.powerups.iter_mut().filter(|p| !p.is_claimed()) {
            powerup.pull_toward(x, max_step);
        }
    }

    pub fn sweep(&mut self) {
        self.aliens.retain(Alien::is_alive);
        self.bullets.retain(|b| !b.is_spent());
        self.powerups.retain(|p| !p.is_claimed());
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
