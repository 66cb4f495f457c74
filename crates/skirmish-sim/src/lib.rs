//! Simulation driver for SKIRMISH.
//!
//! Owns the hecs ECS world, runs the tactical brains at a fixed tick rate,
//! delivers scheduled squad events and produces SimSnapshots.

pub mod engine;
pub mod scenario;
pub mod systems;
pub mod work_queue;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use skirmish_core as core;

#[cfg(test)]
mod tests;
