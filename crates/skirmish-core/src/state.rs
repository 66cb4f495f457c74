//! Simulation state snapshot: the visible state produced after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::{CombatState, Faction};
use crate::events::TacticalEvent;
use crate::oracles::DangerZone;
use crate::types::{AgentId, MapId, Position, SimTime, SquadId};

/// Complete observable state after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub map: Option<MapId>,
    pub agents: Vec<AgentView>,
    pub danger_zones: Vec<DangerZone>,
    pub events: Vec<TacticalEvent>,
}

/// One agent as seen from outside the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub squad: SquadId,
    pub faction: Faction,
    pub position: Position,
    pub alive: bool,
    pub health_ratio: f64,
    pub state: CombatState,
    pub target: Option<AgentId>,
    pub composure: f64,
    pub suppressed: bool,
    pub panicking: bool,
    pub escalated: bool,
}

impl SimSnapshot {
    /// Look up one agent by id.
    pub fn agent(&self, id: AgentId) -> Option<&AgentView> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Number of agents still alive on a given side.
    pub fn alive_count(&self, faction: Faction) -> usize {
        self.agents
            .iter()
            .filter(|a| a.alive && a.faction == faction)
            .count()
    }
}
