//! ECS components for agent entities.
//!
//! Components are plain data structs. Decision logic lives in the tactics
//! crate, world mutation lives in the simulation systems.

use serde::{Deserialize, Serialize};

use crate::enums::{Faction, Gait};
use crate::types::{AgentId, MapId, Position, SquadId};

/// Identity of an agent entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AgentTag {
    pub id: AgentId,
    pub faction: Faction,
}

/// Squad membership and the map the agent lives on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SquadTag {
    pub squad: SquadId,
    pub map: MapId,
}

/// Facing as a compass heading in radians (0 = North, clockwise).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Facing {
    pub heading: f64,
}

/// Health and injury state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vitals {
    /// Current health in [0, max].
    pub health: f64,
    pub max_health: f64,
    /// Health ratio under which the agent wants to withdraw and heal.
    pub heal_threshold: f64,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            health: 1.0,
            max_health: 1.0,
            heal_threshold: 0.45,
        }
    }
}

/// Movement order written from decision intents, consumed by locomotion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveOrder {
    pub destination: Position,
    pub gait: Gait,
}

/// Read-only personality traits. All scalars are in [0, 1] except
/// `engagement_range`, which is in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub aggression: f64,
    pub caution: f64,
    /// Tendency to stay close to and follow the squad.
    pub cohesion: f64,
    /// Willingness to accept exposure. High values retreat shorter distances.
    pub risk_tolerance: f64,
    pub accuracy_under_fire: f64,
    /// How erratic decisions are (propagation delay spread, echo noise).
    pub chaos_factor: f64,
    /// How strongly incoming fire affects the agent.
    pub suppression_sensitivity: f64,
    /// Distance under which Engage turns into Attack (meters).
    pub engagement_range: f64,
    pub flags: PersonalityFlags,
}

/// Boolean personality markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityFlags {
    /// Prefers concealed routes when withdrawing.
    pub silent_hunter: bool,
    pub frenzied: bool,
    pub stubborn: bool,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            aggression: 0.5,
            caution: 0.5,
            cohesion: 0.5,
            risk_tolerance: 0.5,
            accuracy_under_fire: 0.5,
            chaos_factor: 0.2,
            suppression_sensitivity: 0.5,
            engagement_range: 35.0,
            flags: PersonalityFlags::default(),
        }
    }
}

/// Combat tuning values raised by threat escalation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatTuning {
    /// Multiplier on tolerated weapon recoil.
    pub recoil_tolerance: f64,
    /// Distance at which enemies are noticed (meters).
    pub detection_distance: f64,
    /// Chance to break into a run when hit.
    pub run_on_damage_chance: f64,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            recoil_tolerance: 1.0,
            detection_distance: 90.0,
            run_on_damage_chance: 0.3,
        }
    }
}

/// Marks an agent that has been killed but not yet despawned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dead;
