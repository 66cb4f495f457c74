//! Grid navigator: A* over a NavGrid.

use pathfinding::prelude::astar;

use skirmish_core::error::{TacticsError, TacticsResult};
use skirmish_core::oracles::NavigationOracle;
use skirmish_core::types::Position;

use crate::grid::{Cell, NavGrid};

/// Orthogonal step cost.
const STRAIGHT_COST: u32 = 10;
/// Diagonal step cost (10 * sqrt 2, rounded).
const DIAGONAL_COST: u32 = 14;

const NEIGHBOURS: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Navigation oracle over a walkability grid.
#[derive(Debug, Clone)]
pub struct GridNavigator {
    grid: NavGrid,
}

impl GridNavigator {
    pub fn new(grid: NavGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }

    fn offset(&self, cell: Cell, dx: i64, dy: i64) -> Option<Cell> {
        let col = cell.0 as i64 + dx;
        let row = cell.1 as i64 + dy;
        if col < 0 || row < 0 {
            return None;
        }
        let next = (col as u32, row as u32);
        self.grid.is_walkable(next).then_some(next)
    }

    /// Walkable neighbours with step costs. Diagonals may not cut corners.
    fn successors(&self, cell: Cell) -> Vec<(Cell, u32)> {
        NEIGHBOURS
            .iter()
            .filter_map(|&(dx, dy)| {
                let next = self.offset(cell, dx, dy)?;
                if dx != 0 && dy != 0 {
                    self.offset(cell, dx, 0)?;
                    self.offset(cell, 0, dy)?;
                    Some((next, DIAGONAL_COST))
                } else {
                    Some((next, STRAIGHT_COST))
                }
            })
            .collect()
    }

    /// Walkable cell nearest to `point` within `radius`.
    fn nearest_walkable(&self, point: &Position, radius: f64) -> Option<Cell> {
        let size = self.grid.cell_size;
        let reach = (radius / size).ceil().max(0.0) as i64;
        let col = ((point.x - self.grid.origin_x) / size).floor() as i64;
        let row = ((point.y - self.grid.origin_y) / size).floor() as i64;

        let mut best: Option<(f64, Cell)> = None;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let (c, r) = (col + dx, row + dy);
                if c < 0 || r < 0 {
                    continue;
                }
                let cell = (c as u32, r as u32);
                if !self.grid.is_walkable(cell) {
                    continue;
                }
                let d = self.grid.center_of(cell).horizontal_range_to(point);
                if d > radius + size * 0.5 {
                    continue;
                }
                if best.map_or(true, |(bd, _)| d < bd) {
                    best = Some((d, cell));
                }
            }
        }
        best.map(|(_, cell)| cell)
    }
}

fn octile(a: Cell, b: Cell) -> u32 {
    let dx = a.0.abs_diff(b.0);
    let dy = a.1.abs_diff(b.1);
    STRAIGHT_COST * dx.max(dy) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dy)
}

impl NavigationOracle for GridNavigator {
    fn sample_walkable(&self, point: &Position, radius: f64) -> Option<Position> {
        if let Some(cell) = self.grid.cell_of(point) {
            if self.grid.is_walkable(cell) {
                return Some(Position::new(point.x, point.y, 0.0));
            }
        }
        self.nearest_walkable(point, radius)
            .map(|cell| self.grid.center_of(cell))
    }

    fn compute_path(&self, from: &Position, to: &Position) -> TacticsResult<Vec<Position>> {
        let start = self
            .grid
            .cell_of(from)
            .filter(|c| self.grid.is_walkable(*c))
            .ok_or(TacticsError::NotWalkable(*from))?;
        let goal = self
            .grid
            .cell_of(to)
            .filter(|c| self.grid.is_walkable(*c))
            .ok_or(TacticsError::NotWalkable(*to))?;

        let (cells, _cost) = astar(
            &start,
            |c| self.successors(*c),
            |c| octile(*c, goal),
            |c| *c == goal,
        )
        .ok_or(TacticsError::NoPath {
            from: *from,
            to: *to,
        })?;

        // Interior cells only; the exact endpoints bracket the path.
        let mut points = Vec::with_capacity(cells.len() + 1);
        points.push(*from);
        if cells.len() > 2 {
            points.extend(cells[1..cells.len() - 1].iter().map(|c| self.grid.center_of(*c)));
        }
        points.push(*to);
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacles::{Obstacle, ObstacleField};
    use skirmish_core::enums::SurfaceMaterial;

    fn walled() -> GridNavigator {
        // Wall across x in [-8, 8] at y in [0, 1], open at both ends.
        let field = ObstacleField::new().with(Obstacle::new(
            (-8.0, 0.0),
            (8.0, 1.0),
            2.5,
            SurfaceMaterial::Concrete,
        ));
        GridNavigator::new(NavGrid::from_obstacles(&field, -20.0, -20.0, 1.0, 40, 40, 0.3))
    }

    #[test]
    fn test_path_goes_around_wall() {
        let nav = walled();
        let from = Position::new(0.5, -5.5, 0.0);
        let to = Position::new(0.5, 6.5, 0.0);
        let path = nav.compute_path(&from, &to).unwrap();
        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));
        // Detour must leave the wall's x span.
        assert!(path.iter().any(|p| p.x.abs() > 8.0));
        for p in &path[1..path.len() - 1] {
            let cell = nav.grid().cell_of(p).unwrap();
            assert!(nav.grid().is_walkable(cell));
        }
    }

    #[test]
    fn test_straight_path_in_open() {
        let nav = GridNavigator::new(NavGrid::open(-10.0, -10.0, 1.0, 20, 20));
        let path = nav
            .compute_path(&Position::new(-5.5, 0.5, 0.0), &Position::new(5.5, 0.5, 0.0))
            .unwrap();
        assert!(path.iter().all(|p| (p.y - 0.5).abs() < 1e-9));
        assert_eq!(path.len(), 12);
    }

    #[test]
    fn test_unwalkable_endpoints_rejected() {
        let nav = walled();
        let err = nav
            .compute_path(&Position::new(0.5, 0.5, 0.0), &Position::new(0.5, 6.5, 0.0))
            .unwrap_err();
        assert!(matches!(err, TacticsError::NotWalkable(_)));
        let err = nav
            .compute_path(&Position::new(0.5, -5.5, 0.0), &Position::new(500.0, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, TacticsError::NotWalkable(_)));
    }

    #[test]
    fn test_enclosed_goal_has_no_path() {
        let mut grid = NavGrid::open(0.0, 0.0, 1.0, 10, 10);
        for col in 0..10 {
            grid.set_walkable((col, 5), false);
        }
        let nav = GridNavigator::new(grid);
        let err = nav
            .compute_path(&Position::new(2.5, 2.5, 0.0), &Position::new(2.5, 8.5, 0.0))
            .unwrap_err();
        assert!(matches!(err, TacticsError::NoPath { .. }));
    }

    #[test]
    fn test_sample_walkable_snaps_out_of_wall() {
        let nav = walled();
        let inside = Position::new(0.5, 0.5, 0.0);
        let snapped = nav.sample_walkable(&inside, 3.0).unwrap();
        let cell = nav.grid().cell_of(&snapped).unwrap();
        assert!(nav.grid().is_walkable(cell));
        assert!(snapped.horizontal_range_to(&inside) <= 3.5);

        let open = Position::new(10.2, 10.7, 1.0);
        let same = nav.sample_walkable(&open, 3.0).unwrap();
        assert!((same.x - 10.2).abs() < 1e-9 && same.z == 0.0);

        assert!(nav.sample_walkable(&Position::new(500.0, 500.0, 0.0), 3.0).is_none());
    }
}
