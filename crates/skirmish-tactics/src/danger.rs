//! Map-scoped danger-zone registry.
//!
//! Zones are sharded by map, each shard behind its own lock, so agents on
//! different maps never contend. Expired zones are pruned on read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use skirmish_core::config::DangerConfig;
use skirmish_core::enums::DangerTrigger;
use skirmish_core::oracles::{DangerZone, DangerZoneStore};
use skirmish_core::types::{AgentId, MapId, Position};

type Shard = Arc<Mutex<Vec<DangerZone>>>;

pub struct DangerZoneRegistry {
    config: DangerConfig,
    shards: RwLock<HashMap<MapId, Shard>>,
}

impl DangerZoneRegistry {
    pub fn new(config: DangerConfig) -> Self {
        Self {
            config,
            shards: RwLock::new(HashMap::new()),
        }
    }

    fn shard(&self, map: MapId) -> Shard {
        if let Some(shard) = self
            .shards
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(&map)
        {
            return Arc::clone(shard);
        }
        let mut shards = self.shards.write().unwrap_or_else(|p| p.into_inner());
        Arc::clone(shards.entry(map).or_default())
    }

    /// Drop every zone on `map`.
    pub fn clear_map(&self, map: MapId) {
        self.shards
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&map);
    }
}

impl Default for DangerZoneRegistry {
    fn default() -> Self {
        Self::new(DangerConfig::default())
    }
}

impl DangerZoneStore for DangerZoneRegistry {
    fn add_danger_zone(
        &self,
        map: MapId,
        position: Position,
        trigger: DangerTrigger,
        intensity: f64,
        source: Option<AgentId>,
        now: f64,
    ) {
        let zone = DangerZone {
            position,
            radius: self.config.radius_for(trigger),
            trigger,
            intensity: intensity.clamp(0.0, 1.0),
            created_at: now,
            lifetime: self.config.lifetime_secs,
            source,
        };
        tracing::debug!(%map, ?trigger, x = position.x, y = position.y, "danger zone recorded");
        let shard = self.shard(map);
        let mut zones = shard.lock().unwrap_or_else(|p| p.into_inner());
        zones.retain(|z| !z.is_expired(now));
        zones.push(zone);
    }

    fn zones_for_map(&self, map: MapId, now: f64) -> Vec<DangerZone> {
        let shard = self.shard(map);
        let mut zones = shard.lock().unwrap_or_else(|p| p.into_inner());
        zones.retain(|z| !z.is_expired(now));
        zones.clone()
    }
}

/// Cost multiplier for standing at `position`: 1.0 when no zone is near,
/// growing with the decayed intensity of every zone within `influence`
/// times its radius.
pub fn danger_penalty(zones: &[DangerZone], position: &Position, influence: f64, now: f64) -> f64 {
    zones.iter().fold(1.0, |penalty, zone| {
        let reach = zone.radius * influence;
        if reach <= 0.0 {
            return penalty;
        }
        let d = zone.position.horizontal_range_to(position);
        if d >= reach {
            return penalty;
        }
        penalty + zone.current_intensity(now) * (1.0 - d / reach)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zones_are_map_scoped() {
        let reg = DangerZoneRegistry::default();
        let p = Position::new(0.0, 0.0, 0.0);
        reg.add_danger_zone(MapId(1), p, DangerTrigger::Panic, 1.0, None, 0.0);
        assert_eq!(reg.zones_for_map(MapId(1), 0.0).len(), 1);
        assert!(reg.zones_for_map(MapId(2), 0.0).is_empty());
    }

    #[test]
    fn test_radius_by_trigger_and_expiry() {
        let reg = DangerZoneRegistry::default();
        let p = Position::new(0.0, 0.0, 0.0);
        reg.add_danger_zone(MapId(0), p, DangerTrigger::Explosion, 2.0, None, 5.0);
        let zones = reg.zones_for_map(MapId(0), 5.0);
        assert_eq!(zones[0].radius, 12.0);
        assert_eq!(zones[0].intensity, 1.0, "intensity is clamped");
        assert!(reg.zones_for_map(MapId(0), 25.0).is_empty());
    }

    #[test]
    fn test_danger_penalty_falls_off() {
        let zone = DangerZone {
            position: Position::new(0.0, 0.0, 0.0),
            radius: 5.0,
            trigger: DangerTrigger::Casualty,
            intensity: 1.0,
            created_at: 0.0,
            lifetime: 20.0,
            source: None,
        };
        let zones = [zone];
        let near = danger_penalty(&zones, &Position::new(1.0, 0.0, 0.0), 2.0, 0.0);
        let far = danger_penalty(&zones, &Position::new(8.0, 0.0, 0.0), 2.0, 0.0);
        let outside = danger_penalty(&zones, &Position::new(11.0, 0.0, 0.0), 2.0, 0.0);
        assert!(near > far);
        assert!(far > 1.0);
        assert_eq!(outside, 1.0);
    }
}
