//! Closed vocabularies: combat states, factions, triggers and materials.

use serde::{Deserialize, Serialize};

/// Per-agent combat state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatState {
    /// Routine movement, no known contact.
    #[default]
    Patrol,
    /// Moving to check a sound or a squad report.
    Investigate,
    /// Enemy known, maneuvering toward its last known position.
    Engage,
    /// Enemy within engagement range, actively fighting.
    Attack,
    /// Withdrawing to a fallback point.
    Fallback,
}

impl CombatState {
    /// Whether this state counts as "in combat" for outside queries.
    pub fn is_combat(&self) -> bool {
        matches!(
            self,
            CombatState::Engage | CombatState::Attack | CombatState::Fallback
        )
    }
}

/// Side an agent fights for. Agents of different factions are hostile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Blue,
    Red,
}

impl Faction {
    pub fn is_hostile_to(&self, other: Faction) -> bool {
        *self != other
    }
}

/// What caused a danger zone to be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DangerTrigger {
    /// A squadmate panicked here.
    Panic,
    /// Heavy incoming fire.
    Suppression,
    /// A squadmate died here.
    Casualty,
    /// Grenade or other blast.
    Explosion,
}

/// Why a panic episode started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanicCause {
    /// Damage left the agent under the critical health threshold.
    CriticalHealth,
    /// Flashbang or similar blinding effect.
    Blinded,
    /// The agent is standing in or near a squad danger zone.
    SquadDanger,
    /// Explicit command from outside the core.
    Forced,
}

impl PanicCause {
    /// Direct causes are the ones an unshakeable personality ignores.
    pub fn is_direct(&self) -> bool {
        matches!(self, PanicCause::CriticalHealth | PanicCause::Blinded)
    }
}

/// Surface material of a collider hit by a ray.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceMaterial {
    #[default]
    Concrete,
    Brick,
    Metal,
    Wood,
    Rock,
    Sandbag,
    Glass,
    Foliage,
    Cloth,
}

impl SurfaceMaterial {
    /// Whether the material stops bullets. Decorative surfaces do not.
    pub fn stops_fire(&self) -> bool {
        !matches!(
            self,
            SurfaceMaterial::Glass | SurfaceMaterial::Foliage | SurfaceMaterial::Cloth
        )
    }

    /// Whether the material blocks sight.
    pub fn is_opaque(&self) -> bool {
        !matches!(self, SurfaceMaterial::Glass)
    }
}

/// Locomotion speed requested by an intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gait {
    #[default]
    Walk,
    Sprint,
}

/// Voice line categories the decision layer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoiceTrigger {
    EnemySpotted,
    Investigating,
    FallingBack,
    Suppressed,
    Panicking,
    SquadDanger,
    AllClear,
    Escalated,
}

/// Built-in scenarios of the simulation driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioId {
    /// Two squads meeting across a walled yard.
    #[default]
    Skirmish,
    /// Defenders behind cover, attackers crossing open ground.
    Ambush,
}

/// Shared squad points of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquadPoint {
    Fallback,
    Loot,
    Extract,
}
