//! Error type shared by the decision core and its collaborators.
//!
//! Errors never cross a tick boundary: internal helpers return
//! [`TacticsResult`] and callers recover close to the source by falling back
//! to a degraded default.

use thiserror::Error;

use crate::types::{AgentId, Position, SquadId};

#[derive(Debug, Error)]
pub enum TacticsError {
    #[error("{0} is not available")]
    MissingDependency(&'static str),

    #[error("no path from {from:?} to {to:?}")]
    NoPath { from: Position, to: Position },

    #[error("no walkable ground near {0:?}")]
    NotWalkable(Position),

    #[error("agent {0} not found")]
    UnknownAgent(AgentId),

    #[error("squad {0} not found")]
    UnknownSquad(SquadId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration parse error")]
    ConfigParse(#[from] serde_json::Error),
}

/// Shorthand result type for the decision core.
pub type TacticsResult<T> = Result<T, TacticsError>;
