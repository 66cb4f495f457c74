//! Events emitted by the decision core for observation and debugging.

use serde::{Deserialize, Serialize};

use crate::enums::{CombatState, PanicCause};
use crate::types::{AgentId, Position, SquadId};

/// Notable decisions made during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TacticalEvent {
    StateChanged {
        agent: AgentId,
        from: CombatState,
        to: CombatState,
    },
    TargetAcquired {
        agent: AgentId,
        target: AgentId,
    },
    TargetSwitched {
        agent: AgentId,
        from: AgentId,
        to: AgentId,
    },
    TargetLost {
        agent: AgentId,
    },
    SuppressionStarted {
        agent: AgentId,
    },
    SuppressionEnded {
        agent: AgentId,
    },
    PanicStarted {
        agent: AgentId,
        cause: PanicCause,
    },
    PanicEnded {
        agent: AgentId,
    },
    FallbackBroadcast {
        agent: AgentId,
        squad: SquadId,
        point: Position,
    },
    DangerBroadcast {
        agent: AgentId,
        squad: SquadId,
        position: Position,
    },
    Repath {
        agent: AgentId,
        destination: Position,
    },
    Escalated {
        agent: AgentId,
    },
    AgentKilled {
        agent: AgentId,
    },
}
