//! NavGrid: walkable cells rasterised from an obstacle field.

use skirmish_core::types::Position;

use crate::obstacles::ObstacleField;

/// Grid cell as (column, row).
pub type Cell = (u32, u32);

/// Walkability grid over a rectangular area of the ground plane.
#[derive(Debug, Clone)]
pub struct NavGrid {
    /// Southwest corner of cell (0, 0).
    pub origin_x: f64,
    pub origin_y: f64,
    /// Cell edge length (meters).
    pub cell_size: f64,
    pub width: u32,
    pub height: u32,
    /// Row-major, south to north.
    walkable: Vec<bool>,
}

impl NavGrid {
    /// Fully walkable grid.
    pub fn open(origin_x: f64, origin_y: f64, cell_size: f64, width: u32, height: u32) -> Self {
        Self {
            origin_x,
            origin_y,
            cell_size: cell_size.max(0.1),
            width,
            height,
            walkable: vec![true; (width as usize) * (height as usize)],
        }
    }

    /// Rasterise `field`: a cell is blocked when its center lies within
    /// `clearance` of a solid obstacle footprint.
    pub fn from_obstacles(
        field: &ObstacleField,
        origin_x: f64,
        origin_y: f64,
        cell_size: f64,
        width: u32,
        height: u32,
        clearance: f64,
    ) -> Self {
        let mut grid = Self::open(origin_x, origin_y, cell_size, width, height);
        for row in 0..height {
            for col in 0..width {
                let c = grid.center_of((col, row));
                if field.blocks_ground(c.x, c.y, clearance) {
                    grid.set_walkable((col, row), false);
                }
            }
        }
        grid
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let (col, row) = cell;
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    /// Cell containing a position, or None outside the grid.
    pub fn cell_of(&self, pos: &Position) -> Option<Cell> {
        let col = ((pos.x - self.origin_x) / self.cell_size).floor();
        let row = ((pos.y - self.origin_y) / self.cell_size).floor();
        if col < 0.0 || row < 0.0 || col >= self.width as f64 || row >= self.height as f64 {
            return None;
        }
        Some((col as u32, row as u32))
    }

    /// Ground-level center of a cell.
    pub fn center_of(&self, cell: Cell) -> Position {
        Position::new(
            self.origin_x + (cell.0 as f64 + 0.5) * self.cell_size,
            self.origin_y + (cell.1 as f64 + 0.5) * self.cell_size,
            0.0,
        )
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.walkable[i])
    }

    pub fn set_walkable(&mut self, cell: Cell, walkable: bool) {
        if let Some(i) = self.index(cell) {
            self.walkable[i] = walkable;
        }
    }

    /// Number of walkable cells.
    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|w| **w).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacles::Obstacle;
    use skirmish_core::enums::SurfaceMaterial;

    #[test]
    fn test_cell_mapping() {
        let grid = NavGrid::open(-10.0, -10.0, 1.0, 20, 20);
        assert_eq!(grid.cell_of(&Position::new(-10.0, -10.0, 0.0)), Some((0, 0)));
        assert_eq!(grid.cell_of(&Position::new(0.5, 0.5, 3.0)), Some((10, 10)));
        assert_eq!(grid.cell_of(&Position::new(10.0, 0.0, 0.0)), None);
        let c = grid.center_of((10, 10));
        assert!((c.x - 0.5).abs() < 1e-9 && (c.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rasterised_wall_blocks_cells() {
        let field = ObstacleField::new().with(Obstacle::new(
            (-2.0, 0.0),
            (2.0, 1.0),
            2.0,
            SurfaceMaterial::Concrete,
        ));
        let grid = NavGrid::from_obstacles(&field, -10.0, -10.0, 1.0, 20, 20, 0.3);
        assert!(!grid.is_walkable((10, 10)));
        assert!(grid.is_walkable((10, 15)));
        assert!(grid.walkable_count() < 400);
        assert!(!grid.is_walkable((99, 99)));
    }
}
