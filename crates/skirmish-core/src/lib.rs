//! Core types and definitions for the SKIRMISH tactical simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! positions and ids, components, commands, events, snapshots, constants,
//! configuration, the error type, and the contracts the decision layer
//! expects from its external collaborators. It has no dependency on an ECS
//! or any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod oracles;
pub mod state;
pub mod types;

pub use error::{TacticsError, TacticsResult};

#[cfg(test)]
mod tests;
