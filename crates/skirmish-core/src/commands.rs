//! Commands sent from outside the decision core into the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::SquadPoint;
use crate::types::{AgentId, Position, SquadId};

/// All externally issued agent and squad commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentCommand {
    /// The agent took damage, optionally from a known position.
    NotifyDamaged {
        agent: AgentId,
        amount: f64,
        from: Option<Position>,
    },
    /// Force the agent to fall back to a point.
    TriggerFallback { agent: AgentId, point: Position },
    /// The agent is under suppressive fire.
    TriggerSuppression {
        agent: AgentId,
        from: Option<Position>,
    },
    /// Force a panic episode.
    TriggerPanic { agent: AgentId },
    /// A squadmate asked the agent to check a position.
    NotifyEchoInvestigate { agent: AgentId, point: Position },
    /// The agent was blinded by a flash.
    NotifyBlinded { agent: AgentId },
    /// The agent heard something at a position.
    NotifySound { agent: AgentId, position: Position },
    /// Set a shared squad point of interest.
    SetSquadPoint {
        squad: SquadId,
        kind: SquadPoint,
        point: Position,
    },
    /// Kill the agent (it stays in the world until cleanup).
    Kill { agent: AgentId },
    /// Remove the agent from the world immediately.
    Despawn { agent: AgentId },
}
