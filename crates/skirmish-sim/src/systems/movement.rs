//! Locomotion: follow grid paths toward the current move order.
//!
//! A new order is turned into waypoints by the navigation oracle; if no path
//! exists the agent walks straight at the destination. Steps that would end
//! inside an obstacle are refused, which the brain sees as being stuck.

use hecs::World;

use skirmish_core::components::{Dead, Facing, MoveOrder};
use skirmish_core::constants::{DT, SPRINT_SPEED, WALK_SPEED};
use skirmish_core::enums::Gait;
use skirmish_core::oracles::NavigationOracle;
use skirmish_core::types::{Position, Velocity};
use skirmish_terrain::ObstacleField;

/// Distance at which an intermediate waypoint counts as reached (meters).
const WAYPOINT_RADIUS: f64 = 0.25;
/// The final waypoint is the order's destination and is reached exactly.
const ARRIVAL_EPSILON: f64 = 1e-6;

/// Current move order and the waypoints left to reach it.
#[derive(Debug, Clone, Default)]
pub struct Locomotion {
    pub order: Option<MoveOrder>,
    /// Remaining waypoints, next first. The destination is the last one.
    pub waypoints: Vec<Position>,
}

impl Locomotion {
    /// Replace the order, planning waypoints from `from`.
    pub fn assign(&mut self, order: MoveOrder, from: &Position, nav: Option<&dyn NavigationOracle>) {
        let path = nav.map(|n| n.compute_path(from, &order.destination));
        self.waypoints = match path {
            Some(Ok(points)) => points.into_iter().skip(1).collect(),
            Some(Err(e)) => {
                tracing::trace!(error = %e, "no grid path, walking straight");
                vec![order.destination]
            }
            None => vec![order.destination],
        };
        if self.waypoints.is_empty() {
            self.waypoints.push(order.destination);
        }
        self.order = Some(order);
    }

    pub fn clear(&mut self) {
        self.order = None;
        self.waypoints.clear();
    }
}

pub fn speed_for(gait: Gait) -> f64 {
    match gait {
        Gait::Walk => WALK_SPEED,
        Gait::Sprint => SPRINT_SPEED,
    }
}

/// Advance every live agent one tick along its waypoints.
pub fn run(world: &mut World, terrain: &ObstacleField) {
    for (_entity, (pos, vel, facing, loco, dead)) in world.query_mut::<(
        &mut Position,
        &mut Velocity,
        &mut Facing,
        &mut Locomotion,
        Option<&Dead>,
    )>() {
        *vel = Velocity::default();
        if dead.is_some() {
            continue;
        }
        let Some(order) = loco.order else {
            continue;
        };

        while let Some(next) = loco.waypoints.first() {
            let radius = if loco.waypoints.len() == 1 {
                ARRIVAL_EPSILON
            } else {
                WAYPOINT_RADIUS
            };
            if pos.horizontal_range_to(next) > radius {
                break;
            }
            loco.waypoints.remove(0);
        }
        let Some(next) = loco.waypoints.first().copied() else {
            loco.clear();
            continue;
        };

        let dir = pos.direction_to(&next);
        let speed = speed_for(order.gait);
        let remaining = pos.horizontal_range_to(&next);
        let moved = if remaining <= speed * DT {
            Position::new(next.x, next.y, pos.z)
        } else {
            pos.offset(dir, speed * DT)
        };
        if terrain.blocks_ground(moved.x, moved.y, 0.0) {
            continue;
        }
        *pos = moved;
        *vel = Velocity::from_vec(dir * speed);
        facing.heading = vel.heading();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::enums::SurfaceMaterial;
    use skirmish_terrain::Obstacle;

    fn mover(world: &mut World, at: Position, to: Position, gait: Gait) -> hecs::Entity {
        let mut loco = Locomotion::default();
        loco.assign(MoveOrder { destination: to, gait }, &at, None);
        world.spawn((at, Velocity::default(), Facing::default(), loco))
    }

    #[test]
    fn test_walk_and_sprint_speeds() {
        let mut world = World::new();
        let walker = mover(
            &mut world,
            Position::new(0.0, 0.0, 0.0),
            Position::new(0.0, 100.0, 0.0),
            Gait::Walk,
        );
        let sprinter = mover(
            &mut world,
            Position::new(10.0, 0.0, 0.0),
            Position::new(10.0, 100.0, 0.0),
            Gait::Sprint,
        );
        let field = ObstacleField::new();
        for _ in 0..30 {
            run(&mut world, &field);
        }
        let w = *world.get::<&Position>(walker).unwrap();
        let s = *world.get::<&Position>(sprinter).unwrap();
        assert!((w.y - WALK_SPEED).abs() < 1e-6);
        assert!((s.y - SPRINT_SPEED).abs() < 1e-6);
        let facing = world.get::<&Facing>(walker).unwrap().heading;
        assert!(facing.abs() < 1e-9);
    }

    #[test]
    fn test_order_cleared_on_arrival() {
        let mut world = World::new();
        let e = mover(
            &mut world,
            Position::new(0.0, 0.0, 0.0),
            Position::new(1.0, 0.0, 0.0),
            Gait::Sprint,
        );
        let field = ObstacleField::new();
        for _ in 0..30 {
            run(&mut world, &field);
        }
        let loco = world.get::<&Locomotion>(e).unwrap();
        assert!(loco.order.is_none());
        let pos = *world.get::<&Position>(e).unwrap();
        assert!((pos.x - 1.0).abs() < ARRIVAL_EPSILON);
        assert_eq!(world.get::<&Velocity>(e).unwrap().speed(), 0.0);
    }

    #[test]
    fn test_obstacle_stops_straight_walk() {
        let mut world = World::new();
        let e = mover(
            &mut world,
            Position::new(0.0, 0.0, 0.0),
            Position::new(0.0, 10.0, 0.0),
            Gait::Sprint,
        );
        let field = ObstacleField::new().with(Obstacle::new(
            (-5.0, 3.0),
            (5.0, 4.0),
            2.0,
            SurfaceMaterial::Concrete,
        ));
        for _ in 0..60 {
            run(&mut world, &field);
        }
        let pos = *world.get::<&Position>(e).unwrap();
        assert!(pos.y < 3.0);
        assert_eq!(world.get::<&Velocity>(e).unwrap().speed(), 0.0);
    }
}
