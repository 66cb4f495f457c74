//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World`. Per-agent state lives in
//! components; shared stores come in through `TacticalServices`.

pub mod cleanup;
pub mod combat;
pub mod delivery;
pub mod movement;
pub mod perception;
pub mod snapshot;
pub mod tactics;
