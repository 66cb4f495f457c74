//! Intents: what a brain asks the world to do on its behalf.

use skirmish_core::enums::Gait;
use skirmish_core::types::{AgentId, Position};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Move toward a destination at the given gait.
    MoveTo { destination: Position, gait: Gait },
    /// Drop the current move target.
    Halt,
    /// Turn toward a point.
    FaceToward(Position),
    /// Open fire on a target.
    Fire { target: AgentId },
    /// Stop firing.
    CeaseFire,
}
