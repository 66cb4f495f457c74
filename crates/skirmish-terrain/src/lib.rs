//! Reference geometry for SKIRMISH.
//!
//! An obstacle field that answers ray queries, a walkable grid rasterised
//! from it, an A* navigator over that grid and a line-of-sight helper.

pub use skirmish_core as core;

pub mod grid;
pub mod los;
pub mod nav;
pub mod obstacles;

// Re-export key types for convenience.
pub use grid::NavGrid;
pub use los::has_line_of_sight;
pub use nav::GridNavigator;
pub use obstacles::{Obstacle, ObstacleField};
