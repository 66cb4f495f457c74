//! Fundamental geometric, identifier, and simulation time types.

use std::fmt;

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

/// World-space point in meters: x East, y North, z up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Per-tick displacement rate in m/s, same axes as [`Position`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Fixed-step clock shared by every system in a session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    pub tick: u64,
    /// Seconds since the session started.
    pub elapsed_secs: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance in meters.
    pub fn range_to(&self, other: &Position) -> f64 {
        self.to_vec().distance(other.to_vec())
    }

    /// Distance on the ground plane, height ignored.
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Compass bearing to `other` (radians, North = 0, clockwise).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        compass(other.x - self.x, other.y - self.y)
    }

    /// Horizontal unit vector pointing at `other`, or zero when co-located.
    pub fn direction_to(&self, other: &Position) -> DVec3 {
        horizontal(other.to_vec() - self.to_vec())
    }

    /// Point `distance` meters away along `direction` (need not be normalized).
    pub fn offset(&self, direction: DVec3, distance: f64) -> Position {
        Position::from_vec(self.to_vec() + direction.normalize_or_zero() * distance)
    }

    pub fn to_vec(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn from_vec(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<DVec3> for Position {
    fn from(v: DVec3) -> Self {
        Position::from_vec(v)
    }
}

impl From<Position> for DVec3 {
    fn from(p: Position) -> Self {
        p.to_vec()
    }
}

impl Velocity {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn speed(&self) -> f64 {
        self.to_vec().length()
    }

    pub fn horizontal_speed(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Compass direction of travel; meaningless while stationary.
    pub fn heading(&self) -> f64 {
        compass(self.x, self.y)
    }

    pub fn to_vec(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn from_vec(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl SimTime {
    /// Length of one step in seconds.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * self.dt();
    }
}

fn compass(east: f64, north: f64) -> f64 {
    east.atan2(north).rem_euclid(std::f64::consts::TAU)
}

/// Project onto the ground plane and normalize. Zero stays zero.
pub fn horizontal(v: DVec3) -> DVec3 {
    DVec3::new(v.x, v.y, 0.0).normalize_or_zero()
}

/// Rotate `v` counter-clockwise about the up axis by `angle` radians.
pub fn rotate_about_up(v: DVec3, angle: f64) -> DVec3 {
    DMat3::from_rotation_z(angle) * v
}

/// Unit facing vector from a compass heading (0 = North, clockwise).
pub fn heading_to_direction(heading: f64) -> DVec3 {
    DVec3::new(heading.sin(), heading.cos(), 0.0)
}

/// Generate a typed id wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty), $label:literal;) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        $vis struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

typed_id! {
    /// Identifier of one agent for the lifetime of a simulation session.
    pub struct AgentId(u32), "agent";
}

typed_id! {
    /// Group identifier shared by the members of a squad.
    pub struct SquadId(u32), "squad";
}

typed_id! {
    /// Map (level) identifier; danger zones and path caches are scoped by it.
    pub struct MapId(u32), "map";
}
