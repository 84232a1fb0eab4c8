//! Gameplay core for a top-down arcade shooter.
//!
//! Everything in this crate is pure simulation: a [`compute::Session`] owns the
//! ship, the live aliens/bullets/powerups and the spawn schedule, and advances
//! them once per frame.  Rendering, input devices and persistence live in the
//! binary.

pub mod abilities;
pub mod aliens;
pub mod bullet;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod geometry;
pub mod loot;
pub mod powerup;
pub mod ship;
pub mod slots;
pub mod spawn;
pub mod stats;
pub mod upgrades;
pub mod world;
