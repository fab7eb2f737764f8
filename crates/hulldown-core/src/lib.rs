//! # Hulldown Core
//!
//! Collision and sensing engine for hulldown, a scripted tank combat
//! simulation.
//!
//! Autonomous tanks fight on a rectangular battlefield until one side is
//! destroyed. This crate provides the deterministic, tick-driven core of
//! that game: physical contact detection between tanks, walls and bullets,
//! and radar-cone perception feeding the tanks' sensor events.
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): tanks and bullets, each with a fixed set of
//!   notification callbacks the resolver invokes
//! - **World** ([`world`]): the driver-owned store with deterministic
//!   iteration order
//! - **Resolver** ([`resolver`]): order-sensitive collision checks and radar
//!   scans over per-tick registries
//! - **Simulation** ([`simulation`]): the tick loop, match lifecycle and
//!   scoring
//!
//! ## Usage
//!
//! ```
//! use hulldown_core::{Simulation, TankDefinition};
//!
//! let mut sim = Simulation::new(500.0, 500.0, 42);
//! sim.add_tank(TankDefinition::new("alpha"))?;
//! sim.add_tank(TankDefinition::new("bravo"))?;
//! sim.start()?;
//! sim.run_frame();
//! # Ok::<(), hulldown_core::SimulationError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod battlefield;
pub mod entity;
pub mod resolver;
pub mod simulation;
pub mod world;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use battlefield::Battlefield;
pub use entity::{
    Bullet, BulletEvent, BulletId, BulletSink, Tank, TankEvent, TankId, TankSink,
};
pub use resolver::{CollisionResolver, Impact, RADAR_HALF_APERTURE_DEG};
pub use simulation::{MatchStatus, Simulation, SimulationError, TankDefinition};
pub use world::World;
