//! The player ship: stats, steering, fire-rate gating, the active-ability
//! charge cycle and the ability slots.

use log::{debug, info, warn};

use crate::abilities::Ability;
use crate::bullet::Bullet;
use crate::config::{BulletConfig, ShipConfig};
use crate::entities::Entity;
use crate::error::AbilityError;
use crate::events::GameEvent;
use crate::geometry::{Padding, PlayArea, Vec2};
use crate::slots::{Placement, Slot, SlotType};
use crate::stats::{StatKind, Stats};
use crate::upgrades::UpgradeSnapshot;

/// Thrust at which the ship moves at exactly its base speed.
pub const THRUST_REFERENCE: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChargeState {
    Idle,
    Charging { elapsed_ms: f32 },
}

#[derive(Clone, Debug)]
pub struct Ship {
    pub entity: Entity,
    stats: Stats,
    area: PlayArea,
    bullet: BulletConfig,
    base_speed: f32,
    base_fire_delay_ms: f32,
    /// Time since the last bullet left the ship.
    fire_elapsed_ms: f32,
    charge: ChargeState,
    charge_required_ms: f32,
    active_slots: Vec<Slot>,
    passive_slots: Vec<Slot>,
    moving_left: bool,
    moving_right: bool,
    pointer_x: Option<f32>,
    regen_elapsed_ms: f32,
    destroyed: bool,
    events: Vec<GameEvent>,
}

impl Ship {
    pub fn new(
        config: &ShipConfig,
        bullet: &BulletConfig,
        upgrades: &UpgradeSnapshot,
        area: PlayArea,
    ) -> Self {
        let bonus = |stat| upgrades.stat_level(stat) as i32;
        let stats = Stats::new(
            config.hit_points + bonus(StatKind::HitPoints),
            config.thrust + bonus(StatKind::Thrust),
            config.fire_power + bonus(StatKind::FirePower),
            config.fire_rate + bonus(StatKind::FireRate),
        );

        let size = Vec2::new(config.width, config.height);
        let bounds = area.bounds(Padding::inset(size));
        let entity = Entity::new(
            Vec2::new(area.center_x(), bounds.bottom),
            size,
            bounds,
            Vec2::default(),
        );

        let unlocked_active =
            (config.unlocked_active_slots + upgrades.active_slot_unlocks as usize).min(config.active_slots);
        let unlocked_passive =
            (config.unlocked_passive_slots + upgrades.passive_slot_unlocks as usize).min(config.passive_slots);

        let mut ship = Self {
            entity,
            destroyed: stats.get(StatKind::HitPoints) <= 0,
            stats,
            area,
            bullet: *bullet,
            base_speed: config.base_speed,
            base_fire_delay_ms: config.base_fire_delay_ms,
            // Ready to shoot straight away at any Fire Rate of 1 or more.
            fire_elapsed_ms: config.base_fire_delay_ms,
            charge: ChargeState::Idle,
            charge_required_ms: config.base_charge_ms
                * config.charge_reduction.powi(upgrades.charge_time_level as i32),
            active_slots: (0..config.active_slots)
                .map(|i| Slot::new(SlotType::Active, i >= unlocked_active))
                .collect(),
            passive_slots: (0..config.passive_slots)
                .map(|i| Slot::new(SlotType::Passive, i >= unlocked_passive))
                .collect(),
            moving_left: false,
            moving_right: false,
            pointer_x: None,
            regen_elapsed_ms: 0.0,
            events: Vec::new(),
        };
        ship.refresh_derived();
        ship
    }

    // ── Stats ─────────────────────────────────────────────────────────────────

    pub fn stat(&self, kind: StatKind) -> i32 {
        self.stats.get(kind)
    }

    pub fn hit_points(&self) -> i32 {
        self.stats.get(StatKind::HitPoints)
    }

    /// Change a stat and re-derive everything computed from it.
    /// A destroyed ship no longer changes.
    pub fn improve_stat(&mut self, kind: StatKind, amount: i32) {
        if self.destroyed || amount == 0 {
            return;
        }
        let value = self.stats.add(kind, amount);
        self.refresh_derived();
        self.events.push(GameEvent::StatChanged(kind));
        if kind == StatKind::HitPoints && value <= 0 {
            self.destroyed = true;
            info!("ship destroyed");
        }
    }

    /// [`Ship::improve_stat`] by display or key name.  Unknown names are ignored.
    pub fn improve_stat_named(&mut self, name: &str, amount: i32) -> bool {
        match name.parse::<StatKind>() {
            Ok(kind) => {
                self.improve_stat(kind, amount);
                true
            }
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    /// Returns `true` only for the hit that destroys the ship.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.destroyed {
            return false;
        }
        self.improve_stat(StatKind::HitPoints, -amount.max(0));
        self.destroyed
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn refresh_derived(&mut self) {
        let thrust = self.stats.get(StatKind::Thrust).max(0) as f32;
        self.entity.speed = self
            .area
            .scaled_speed(self.base_speed * thrust / THRUST_REFERENCE);
    }

    /// Heal one hit point per `interval_ms` of accumulated time.
    pub(crate) fn regenerate(&mut self, dt_ms: f32, interval_ms: f32) {
        if self.destroyed || interval_ms <= 0.0 {
            return;
        }
        self.regen_elapsed_ms += dt_ms.max(0.0);
        let mut healed = 0;
        while self.regen_elapsed_ms >= interval_ms {
            self.regen_elapsed_ms -= interval_ms;
            healed += 1;
        }
        self.improve_stat(StatKind::HitPoints, healed);
    }

    // ── Steering ──────────────────────────────────────────────────────────────

    pub fn set_moving_left(&mut self, on: bool) {
        self.moving_left = on;
    }

    pub fn set_moving_right(&mut self, on: bool) {
        self.moving_right = on;
    }

    /// While a pointer drag is active it overrides the direction keys.
    pub fn set_destination_from_pointer(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    pub fn release_pointer(&mut self) {
        self.pointer_x = None;
    }

    pub fn steer(&mut self) {
        let bounds = self.entity.bounds;
        let y = self.entity.pos.y;
        self.entity.destination = if let Some(x) = self.pointer_x {
            Some(bounds.clamp(Vec2::new(x, y)))
        } else {
            match (self.moving_left, self.moving_right) {
                (true, false) => Some(Vec2::new(bounds.left, y)),
                (false, true) => Some(Vec2::new(bounds.right, y)),
                _ => None,
            }
        };
    }

    /// Steer, move and let the gun cool down.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.steer();
        self.entity.update(dt);
        self.fire_elapsed_ms += dt * 1000.0;
    }

    // ── Firing ────────────────────────────────────────────────────────────────

    /// Required gap between shots, or `None` when the effective rate is not
    /// positive (the ship cannot fire at all).
    pub fn fire_delay_ms(&self, bonus: i32) -> Option<f32> {
        let rate = self.stats.get(StatKind::FireRate).saturating_add(bonus);
        (rate > 0).then(|| self.base_fire_delay_ms / rate as f32)
    }

    pub fn fire_elapsed_ms(&self) -> f32 {
        self.fire_elapsed_ms
    }

    /// Emit a bullet from the nose if the cooldown allows it.
    pub fn fire_bullet(&mut self, bonus: i32) -> Option<Bullet> {
        if self.destroyed {
            return None;
        }
        let delay = self.fire_delay_ms(bonus)?;
        if self.fire_elapsed_ms < delay {
            return None;
        }
        self.fire_elapsed_ms = 0.0;
        Some(Bullet::new(self.entity.top_center(), &self.area, &self.bullet))
    }

    // ── Active ability charge ─────────────────────────────────────────────────

    /// Idle -> Charging.  Calling it mid-charge keeps the progress.
    pub fn start_charge(&mut self) {
        if self.charge == ChargeState::Idle {
            self.charge = ChargeState::Charging { elapsed_ms: 0.0 };
        }
    }

    /// Abort without any effect.
    pub fn stop_charge(&mut self) {
        self.charge = ChargeState::Idle;
    }

    pub fn charge_state(&self) -> ChargeState {
        self.charge
    }

    pub fn charge_required_ms(&self) -> f32 {
        self.charge_required_ms
    }

    /// Fraction of the charge completed, while charging.
    pub fn charge_progress(&self) -> Option<f32> {
        match self.charge {
            ChargeState::Idle => None,
            ChargeState::Charging { elapsed_ms } if self.charge_required_ms > 0.0 => {
                Some((elapsed_ms / self.charge_required_ms).min(1.0))
            }
            ChargeState::Charging { .. } => Some(1.0),
        }
    }

    /// Returns `true` on the tick the charge completes; the state is back to
    /// idle by then.
    pub fn advance_charge(&mut self, dt_ms: f32) -> bool {
        if let ChargeState::Charging { elapsed_ms } = &mut self.charge {
            *elapsed_ms += dt_ms.max(0.0);
            if *elapsed_ms >= self.charge_required_ms {
                self.charge = ChargeState::Idle;
                return true;
            }
        }
        false
    }

    /// Empty every enabled active slot, returning what was in them.
    pub fn take_armed_actives(&mut self) -> Vec<Ability> {
        let fired: Vec<Ability> = self
            .active_slots
            .iter_mut()
            .filter(|slot| slot.armed().is_some())
            .filter_map(Slot::take)
            .collect();
        if !fired.is_empty() {
            self.events.push(GameEvent::AbilitySlotsChanged);
        }
        fired
    }

    pub fn armed_passives(&self) -> Vec<Ability> {
        self.passive_slots
            .iter()
            .filter_map(|slot| slot.armed().copied())
            .collect()
    }

    // ── Slots ─────────────────────────────────────────────────────────────────

    pub fn active_slots(&self) -> &[Slot] {
        &self.active_slots
    }

    pub fn passive_slots(&self) -> &[Slot] {
        &self.passive_slots
    }

    /// First empty unlocked active slot.  Returns its index.
    pub fn add_active_ability(&mut self, ability: Ability) -> Result<usize, AbilityError> {
        if !ability.is_active() {
            return Err(AbilityError::WrongSlotType);
        }
        let index = self
            .active_slots
            .iter()
            .position(|s| !s.is_locked() && s.is_empty())
            .ok_or(AbilityError::NoEligibleSlot)?;
        self.active_slots[index].insert(ability)?;
        debug!("{} installed in active slot {}", ability.name(), index);
        self.events.push(GameEvent::AbilitySlotsChanged);
        Ok(index)
    }

    /// Merge into the same kind, else the first empty slot, else displace the
    /// first disabled one.  Merging wins even when an empty slot is free.
    pub fn add_passive_ability(&mut self, ability: Ability) -> Result<(usize, Placement), AbilityError> {
        if ability.is_active() {
            return Err(AbilityError::WrongSlotType);
        }
        let slots = &self.passive_slots;
        let index = slots
            .iter()
            .position(|s| s.ability().map_or(false, |a| a.kind() == ability.kind()))
            .or_else(|| slots.iter().position(|s| !s.is_locked() && s.is_empty()))
            .or_else(|| slots.iter().position(|s| !s.is_locked() && !s.is_empty() && !s.is_enabled()))
            .ok_or(AbilityError::NoEligibleSlot)?;
        let placement = self.passive_slots[index].insert(ability)?;
        debug!("{} -> passive slot {}: {:?}", ability.name(), index, placement);
        self.events.push(GameEvent::AbilitySlotsChanged);
        Ok((index, placement))
    }

    /// Route to the active or passive policy by the ability's kind.
    pub fn add_ability(&mut self, ability: Ability) -> Result<usize, AbilityError> {
        let result = if ability.is_active() {
            self.add_active_ability(ability)
        } else {
            self.add_passive_ability(ability).map(|(index, _)| index)
        };
        if let Err(e) = &result {
            debug!("{} not installed: {}", ability.name(), e);
        }
        result
    }

    /// Returns the slot's new enabled state.
    pub fn toggle_active_ability(&mut self, index: usize) -> Result<bool, AbilityError> {
        let enabled = toggle_slot(&mut self.active_slots, index)?;
        self.events.push(GameEvent::AbilitySlotsChanged);
        Ok(enabled)
    }

    pub fn toggle_passive_ability(&mut self, index: usize) -> Result<bool, AbilityError> {
        let enabled = toggle_slot(&mut self.passive_slots, index)?;
        self.events.push(GameEvent::AbilitySlotsChanged);
        Ok(enabled)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

fn toggle_slot(slots: &mut [Slot], index: usize) -> Result<bool, AbilityError> {
    let len = slots.len();
    slots
        .get_mut(index)
        .ok_or(AbilityError::SlotOutOfRange { index, len })?
        .toggle()
}
