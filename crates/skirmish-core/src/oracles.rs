//! Contracts the decision layer expects from its collaborators.
//!
//! Every collaborator is optional from the decision layer's point of view:
//! a missing service degrades behavior, it never fails a tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::components::Vitals;
use crate::enums::{DangerTrigger, SurfaceMaterial, VoiceTrigger};
use crate::error::TacticsResult;
use crate::types::{AgentId, MapId, Position, SquadId};

/// Walkable-surface queries and path requests.
pub trait NavigationOracle: Send + Sync {
    /// Closest walkable point within `radius` of `point`.
    fn sample_walkable(&self, point: &Position, radius: f64) -> Option<Position>;

    /// Ordered path from `from` to `to`, both endpoints included.
    fn compute_path(&self, from: &Position, to: &Position) -> TacticsResult<Vec<Position>>;
}

/// One collider intersected by a ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    pub point: Position,
    pub distance: f64,
    pub material: SurfaceMaterial,
    /// Collider thickness along its thinnest axis (meters).
    pub thickness: f64,
    /// Trigger volumes are reported but never block anything.
    pub is_trigger: bool,
}

/// Ray queries against world geometry.
pub trait Raycaster: Send + Sync {
    /// Every hit along the ray within `max_distance`, nearest first.
    fn raycast_all(&self, origin: &Position, direction: DVec3, max_distance: f64) -> Vec<RayHit>;

    /// Nearest hit accepted by `accept`.
    fn first_hit(
        &self,
        origin: &Position,
        direction: DVec3,
        max_distance: f64,
        accept: &dyn Fn(&RayHit) -> bool,
    ) -> Option<RayHit> {
        self.raycast_all(origin, direction, max_distance)
            .into_iter()
            .find(|hit| accept(hit))
    }
}

/// Per-agent memory of contacts and areas.
pub trait TacticalMemory {
    fn record_enemy_position(&mut self, position: Position, now: f64);

    /// Last enemy position, if it has not expired.
    fn recent_enemy_memory(&self, now: f64) -> Option<Position>;

    fn was_recently_cleared(&self, position: &Position, now: f64) -> bool;

    fn mark_cleared(&mut self, position: Position, now: f64);

    /// Whether recent contact makes `position` a bad place to go.
    fn is_zone_unsafe(&self, position: &Position, now: f64) -> bool;
}

/// An area agents should avoid for a while.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DangerZone {
    pub position: Position,
    pub radius: f64,
    pub trigger: DangerTrigger,
    /// Intensity at creation, in [0, 1].
    pub intensity: f64,
    pub created_at: f64,
    pub lifetime: f64,
    /// Agent whose situation produced the zone, if any.
    pub source: Option<AgentId>,
}

impl DangerZone {
    pub fn is_expired(&self, now: f64) -> bool {
        now - self.created_at >= self.lifetime
    }

    /// Intensity after linear decay over the zone's lifetime.
    pub fn current_intensity(&self, now: f64) -> f64 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        let remaining = 1.0 - (now - self.created_at) / self.lifetime;
        self.intensity * remaining.clamp(0.0, 1.0)
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.position.horizontal_range_to(position) <= self.radius
    }
}

/// Map-scoped store of danger zones, shared by every agent on the map.
pub trait DangerZoneStore: Send + Sync {
    fn add_danger_zone(
        &self,
        map: MapId,
        position: Position,
        trigger: DangerTrigger,
        intensity: f64,
        source: Option<AgentId>,
        now: f64,
    );

    /// Live zones on `map`. Expired zones are never returned.
    fn zones_for_map(&self, map: MapId, now: f64) -> Vec<DangerZone>;
}

/// Group membership shared by all agents.
pub trait GroupRegistry: Send + Sync {
    fn register(&self, agent: AgentId, squad: SquadId);

    fn unregister(&self, agent: AgentId);

    /// Live members of `squad`, in id order.
    fn members(&self, squad: SquadId) -> Vec<AgentId>;
}

/// Fire-and-forget voice line requests.
pub trait VoiceNotifier: Send + Sync {
    fn say(&self, agent: AgentId, trigger: VoiceTrigger);
}

/// Health queries.
pub trait HealthProvider {
    /// Current health over maximum health, in [0, 1].
    fn health_ratio(&self) -> f64;

    fn should_heal(&self) -> bool;
}

impl HealthProvider for Vitals {
    fn health_ratio(&self) -> f64 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    fn should_heal(&self) -> bool {
        self.health > 0.0 && self.health_ratio() < self.heal_threshold
    }
}
