//! Retreat planning and the per-squad fallback path cache.
//!
//! The planner samples candidate points on an arc facing away from the
//! threat, drops the ones that are crowded or dangerous, scores the rest by
//! distance over cover and asks the navigation oracle for a path to the
//! cheapest. It always returns something: when nothing works the agent gets
//! a straight line away from the threat.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use glam::DVec3;

use skirmish_core::components::Personality;
use skirmish_core::config::{CoverConfig, RetreatConfig};
use skirmish_core::oracles::{DangerZone, NavigationOracle, Raycaster, TacticalMemory};
use skirmish_core::types::{horizontal, rotate_about_up, AgentId, MapId, Position, SquadId};

use crate::cover::{is_exposed, score_cover};
use crate::danger::danger_penalty;

/// Where a fallback path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// Freshly computed by the navigation oracle.
    Planned,
    /// Reused from the squad cache.
    Cached,
    /// Degraded straight-line fallback.
    StraightLine,
}

/// Ordered points from the agent to a safe spot. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPath {
    pub points: Vec<Position>,
    pub source: PathSource,
}

impl FallbackPath {
    fn straight_line(origin: Position, point: Position) -> Self {
        Self {
            points: vec![origin, point],
            source: PathSource::StraightLine,
        }
    }

    /// Terminal point of the path.
    pub fn destination(&self) -> Position {
        self.points.last().copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
struct CachedPath {
    points: Vec<Position>,
    created_at: f64,
}

type Slot = Arc<Mutex<Option<CachedPath>>>;

/// Fallback paths shared by the members of a squad, keyed by (map, squad).
///
/// Each key has its own lock; the planner holds it for the whole plan so
/// squadmates asking at once compute a path only once.
pub struct RetreatPathCache {
    ttl: f64,
    clear_interval: f64,
    slots: RwLock<HashMap<(MapId, SquadId), Slot>>,
    last_clear: Mutex<f64>,
}

impl RetreatPathCache {
    pub fn new(config: &RetreatConfig) -> Self {
        Self {
            ttl: config.cache_ttl_secs,
            clear_interval: config.cache_clear_interval_secs,
            slots: RwLock::new(HashMap::new()),
            last_clear: Mutex::new(0.0),
        }
    }

    fn slot(&self, map: MapId, squad: SquadId) -> Slot {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(&(map, squad))
        {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().unwrap_or_else(|p| p.into_inner());
        Arc::clone(slots.entry((map, squad)).or_default())
    }

    /// Cached points for the key, if present and not expired.
    pub fn get(&self, map: MapId, squad: SquadId, now: f64) -> Option<Vec<Position>> {
        let slot = self.slot(map, squad);
        let guard = slot.lock().unwrap_or_else(|p| p.into_inner());
        guard
            .as_ref()
            .filter(|c| now - c.created_at < self.ttl)
            .map(|c| c.points.clone())
    }

    pub fn store(&self, map: MapId, squad: SquadId, points: Vec<Position>, now: f64) {
        let slot = self.slot(map, squad);
        *slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(CachedPath {
            points,
            created_at: now,
        });
    }

    pub fn invalidate(&self, map: MapId, squad: SquadId) {
        let slot = self.slot(map, squad);
        *slot.lock().unwrap_or_else(|p| p.into_inner()) = None;
    }

    /// Flush everything once the clear interval has elapsed. Call once per tick.
    pub fn maintain(&self, now: f64) {
        let mut last = self.last_clear.lock().unwrap_or_else(|p| p.into_inner());
        if now - *last < self.clear_interval {
            return;
        }
        *last = now;
        let mut slots = self.slots.write().unwrap_or_else(|p| p.into_inner());
        if !slots.is_empty() {
            tracing::debug!(entries = slots.len(), "retreat path cache cleared");
        }
        slots.clear();
    }

    /// Number of keys holding a live path.
    pub fn len(&self, now: f64) -> usize {
        self.slots
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .values()
            .filter(|slot| {
                slot.lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .as_ref()
                    .is_some_and(|c| now - c.created_at < self.ttl)
            })
            .count()
    }

    pub fn is_empty(&self, now: f64) -> bool {
        self.len(now) == 0
    }
}

/// Everything the planner needs to know about the requesting agent.
pub struct RetreatRequest<'a> {
    pub agent: AgentId,
    pub map: MapId,
    pub squad: SquadId,
    pub origin: Position,
    /// Direction from the agent toward the threat.
    pub threat_direction: DVec3,
    pub personality: &'a Personality,
    pub composure: f64,
    /// Current positions of the other squad members.
    pub squadmates: &'a [Position],
    pub memory: &'a dyn TacticalMemory,
    pub now: f64,
}

/// A scored retreat candidate.
#[derive(Debug, Clone, Copy)]
pub struct RetreatCandidate {
    pub point: Position,
    pub cover: f64,
    pub cost: f64,
}

/// Retreat planner over optional collaborators.
pub struct RetreatPlanner<'a> {
    pub retreat: &'a RetreatConfig,
    pub cover: &'a CoverConfig,
    pub navigation: Option<&'a dyn NavigationOracle>,
    pub raycaster: Option<&'a dyn Raycaster>,
    pub danger_zones: &'a [DangerZone],
    pub cache: Option<&'a RetreatPathCache>,
}

impl RetreatPlanner<'_> {
    /// Plan a fallback path. Always returns at least two points.
    pub fn plan(&self, req: &RetreatRequest<'_>) -> FallbackPath {
        let Some(cache) = self.cache else {
            return self.plan_fresh(req);
        };

        let slot = cache.slot(req.map, req.squad);
        let mut guard = slot.lock().unwrap_or_else(|p| p.into_inner());

        if let Some(cached) = guard.as_ref() {
            if req.now - cached.created_at < cache.ttl && self.is_still_valid(&cached.points, req)
            {
                return FallbackPath {
                    points: cached.points.clone(),
                    source: PathSource::Cached,
                };
            }
            tracing::debug!(agent = %req.agent, squad = %req.squad, "cached retreat path dropped");
            *guard = None;
        }

        let path = self.plan_fresh(req);
        if path.source == PathSource::Planned {
            *guard = Some(CachedPath {
                points: path.points.clone(),
                created_at: req.now,
            });
        }
        path
    }

    /// A cached path is stale when its first leg is blocked from where the
    /// requester stands or its end point became unsafe.
    fn is_still_valid(&self, points: &[Position], req: &RetreatRequest<'_>) -> bool {
        let Some(terminal) = points.last() else {
            return false;
        };
        if req.memory.is_zone_unsafe(terminal, req.now)
            || self.danger_zones.iter().any(|z| z.contains(terminal))
        {
            return false;
        }
        let first = points.get(1).unwrap_or(terminal);
        !self.segment_blocked(&req.origin, first)
    }

    fn segment_blocked(&self, from: &Position, to: &Position) -> bool {
        let Some(raycaster) = self.raycaster else {
            return false;
        };
        let delta = to.to_vec() - from.to_vec();
        let len = delta.length();
        if len < 1e-6 {
            return false;
        }
        let start = Position::new(from.x, from.y, from.z + self.cover.ray_height);
        raycaster
            .first_hit(&start, delta / len, len, &|hit| !hit.is_trigger)
            .is_some()
    }

    fn retreat_distance(&self, personality: &Personality) -> f64 {
        let t = personality.risk_tolerance.clamp(0.0, 1.0);
        self.retreat.max_distance + (self.retreat.min_distance - self.retreat.max_distance) * t
    }

    fn reverse_direction(threat_direction: DVec3) -> DVec3 {
        let toward = horizontal(threat_direction);
        if toward == DVec3::ZERO {
            -DVec3::Y
        } else {
            -toward
        }
    }

    /// Sample, filter and score candidates, cheapest first.
    pub fn candidates(&self, req: &RetreatRequest<'_>) -> Vec<RetreatCandidate> {
        let reverse = Self::reverse_direction(req.threat_direction);
        let distance = self.retreat_distance(req.personality);
        let n = self.retreat.sample_count;
        let arc = self.retreat.sample_arc_deg.to_radians();

        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let angle = if n > 1 {
                -arc / 2.0 + arc * i as f64 / (n - 1) as f64
            } else {
                0.0
            };
            let raw = req.origin.offset(rotate_about_up(reverse, angle), distance);
            let point = match self.navigation {
                Some(nav) => match nav.sample_walkable(&raw, self.retreat.walkable_radius) {
                    Some(p) => p,
                    None => continue,
                },
                None => raw,
            };

            if req
                .squadmates
                .iter()
                .any(|m| m.horizontal_range_to(&point) < self.retreat.squad_spacing)
            {
                continue;
            }
            if self.danger_zones.iter().any(|z| z.contains(&point))
                || req.memory.is_zone_unsafe(&point, req.now)
            {
                continue;
            }

            let cover = match self.raycaster {
                Some(rc) => score_cover(rc, self.cover, &req.origin, &point, req.threat_direction),
                None => self.cover.min_score,
            };
            let sneak = match self.raycaster {
                Some(rc)
                    if req.personality.flags.silent_hunter
                        && is_exposed(rc, self.cover, &point, req.threat_direction) =>
                {
                    self.retreat.sneak_exposed_factor
                }
                _ => 1.0,
            };
            let danger = danger_penalty(
                self.danger_zones,
                &point,
                self.retreat.danger_influence,
                req.now,
            );
            let composure = req.composure.clamp(0.0, 1.0);
            let travel = req.origin.horizontal_range_to(&point);
            let cost = (travel / cover.max(self.retreat.cover_floor))
                * danger
                * sneak
                * (1.0 + (1.0 - composure));

            out.push(RetreatCandidate { point, cover, cost });
        }
        out.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        out
    }

    fn plan_fresh(&self, req: &RetreatRequest<'_>) -> FallbackPath {
        let candidates = self.candidates(req);

        if let Some(nav) = self.navigation {
            for c in &candidates {
                match nav.compute_path(&req.origin, &c.point) {
                    Ok(points) if !points.is_empty() => {
                        return FallbackPath {
                            points,
                            source: PathSource::Planned,
                        };
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::debug!(agent = %req.agent, %err, "retreat candidate unreachable");
                    }
                }
            }
        } else if let Some(best) = candidates.first() {
            return FallbackPath::straight_line(req.origin, best.point);
        }

        let reverse = Self::reverse_direction(req.threat_direction);
        let point = req.origin.offset(reverse, self.retreat_distance(req.personality));
        tracing::warn!(agent = %req.agent, "no retreat candidate worked, using straight line");
        FallbackPath::straight_line(req.origin, point)
    }
}
