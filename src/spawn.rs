//! When and what aliens enter play.
//!
//! Two channels feed the arena: a random trickle on a cooldown that tightens
//! every level, and scripted formations that arrive when a level starts.

use std::collections::{BTreeMap, HashMap};

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::aliens::{Alien, AlienKind};
use crate::config::{AlienCatalog, SpawnConfig};
use crate::geometry::{PlayArea, Vec2};
use crate::loot::{Weighted, WeightedTable};

/// Trickle weights in force from `level` until the next entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelWeights {
    pub level: u32,
    pub weights: Vec<Weighted<AlienKind>>,
}

/// A formation spawned all at once when `level` is reached.  Offsets are in
/// multiples of the alien's size, relative to a point centred just above the
/// play area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveSpec {
    pub level: u32,
    pub kind: AlienKind,
    pub offsets: Vec<Vec2>,
}

#[derive(Clone, Debug)]
pub struct SpawnManager {
    level: u32,
    cooldown_ms: f32,
    delay_ms: f32,
    delay_factor: f32,
    trickle: BTreeMap<u32, WeightedTable<AlienKind>>,
    waves: HashMap<u32, WaveSpec>,
}

impl SpawnManager {
    pub fn new(config: &SpawnConfig) -> Self {
        Self {
            level: 1,
            cooldown_ms: 0.0,
            delay_ms: config.initial_delay_ms.max(0.0),
            // A factor above 1 would slow spawning down as levels rise.
            delay_factor: config.delay_factor.clamp(0.0, 1.0),
            trickle: config
                .trickle
                .iter()
                .map(|t| (t.level, WeightedTable::new(&t.weights)))
                .collect(),
            waves: config.waves.iter().map(|w| (w.level, w.clone())).collect(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn spawn_delay_ms(&self) -> f32 {
        self.delay_ms
    }

    pub fn cooldown_ms(&self) -> f32 {
        self.cooldown_ms
    }

    /// The table for `level`, or for the highest defined level below it.
    fn table_for(&self, level: u32) -> Option<&WeightedTable<AlienKind>> {
        self.trickle
            .range(..=level)
            .next_back()
            .or_else(|| self.trickle.iter().next())
            .map(|(_, table)| table)
    }

    /// Random trickle: at most one alien per call, once the cooldown has
    /// reached the current delay.
    pub fn update<R: Rng>(
        &mut self,
        dt_ms: f32,
        area: &PlayArea,
        catalog: &AlienCatalog,
        rng: &mut R,
    ) -> Option<Alien> {
        self.cooldown_ms += dt_ms.max(0.0);
        if self.cooldown_ms < self.delay_ms {
            return None;
        }
        self.cooldown_ms = 0.0;

        let kind = self.table_for(self.level)?.pick(rng)?;
        let spec = catalog.get(kind);
        let lo = area.left + spec.width / 2.0;
        let hi = area.right() - spec.width / 2.0;
        let x = if lo < hi { rng.gen_range(lo..hi) } else { area.center_x() };
        debug!("trickle spawn {:?} at x={:.1}", kind, x);
        Some(Alien::new(kind, spec, Vec2::new(x, Alien::spawn_y(spec, area)), area))
    }

    /// Advance the level and tighten the trickle cadence.  Returns the new level.
    pub fn level_up(&mut self) -> u32 {
        self.level += 1;
        self.delay_ms *= self.delay_factor;
        info!("level {} (spawn delay {:.0} ms)", self.level, self.delay_ms);
        self.level
    }

    /// Every alien of the formation registered for `level`, or none.
    pub fn spawn_wave(&self, level: u32, area: &PlayArea, catalog: &AlienCatalog) -> Vec<Alien> {
        let Some(wave) = self.waves.get(&level) else {
            return Vec::new();
        };
        let spec = catalog.get(wave.kind);
        let anchor = Vec2::new(area.center_x(), Alien::spawn_y(spec, area));
        let aliens: Vec<Alien> = wave
            .offsets
            .iter()
            .map(|o| {
                let pos = Vec2::new(anchor.x + o.x * spec.width, anchor.y + o.y * spec.height);
                Alien::new(wave.kind, spec, pos, area)
            })
            .collect();
        debug!("wave for level {}: {} x {:?}", level, aliens.len(), wave.kind);
        aliens
    }
}
