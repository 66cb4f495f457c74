//! Axis-aligned obstacles with surface materials.

use glam::DVec3;

use skirmish_core::enums::SurfaceMaterial;
use skirmish_core::oracles::{RayHit, Raycaster};
use skirmish_core::types::Position;

/// Directions shorter than this are treated as zero.
const RAY_EPSILON: f64 = 1e-9;

/// An axis-aligned box in sim space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub min: DVec3,
    pub max: DVec3,
    pub material: SurfaceMaterial,
    /// Trigger volumes are reported by rays but block nothing.
    pub is_trigger: bool,
}

impl Obstacle {
    /// Box from two opposite ground corners and a height.
    pub fn new(a: (f64, f64), b: (f64, f64), height: f64, material: SurfaceMaterial) -> Self {
        Self {
            min: DVec3::new(a.0.min(b.0), a.1.min(b.1), 0.0),
            max: DVec3::new(a.0.max(b.0), a.1.max(b.1), height.max(0.0)),
            material,
            is_trigger: false,
        }
    }

    pub fn trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Thinnest horizontal extent (meters).
    pub fn thickness(&self) -> f64 {
        (self.max.x - self.min.x).min(self.max.y - self.min.y)
    }

    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Whether the footprint covers a ground point, grown by `margin`.
    pub fn covers_ground(&self, x: f64, y: f64, margin: f64) -> bool {
        x >= self.min.x - margin
            && x <= self.max.x + margin
            && y >= self.min.y - margin
            && y <= self.max.y + margin
    }

    /// Entry distance of a ray along unit `dir`, slab method.
    pub fn intersect(&self, origin: DVec3, dir: DVec3) -> Option<f64> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < RAY_EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }
        if t_max < t_min.max(0.0) {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

/// The static geometry of one map.
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn add(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Whether a ground point lies inside (or within `margin` of) a
    /// movement-blocking obstacle.
    pub fn blocks_ground(&self, x: f64, y: f64, margin: f64) -> bool {
        self.obstacles
            .iter()
            .any(|o| !o.is_trigger && o.covers_ground(x, y, margin))
    }
}

impl Raycaster for ObstacleField {
    fn raycast_all(&self, origin: &Position, direction: DVec3, max_distance: f64) -> Vec<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == DVec3::ZERO || max_distance <= 0.0 {
            return Vec::new();
        }
        let o = origin.to_vec();
        let mut hits: Vec<RayHit> = self
            .obstacles
            .iter()
            .filter_map(|ob| {
                let t = ob.intersect(o, dir)?;
                (t <= max_distance).then(|| RayHit {
                    point: Position::from_vec(o + dir * t),
                    distance: t,
                    material: ob.material,
                    thickness: ob.thickness(),
                    is_trigger: ob.is_trigger,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
