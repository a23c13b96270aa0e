//! Grid geometry
//!
//! The world is the viewport partitioned into square cells. Every entity sits
//! on a cell-aligned pixel coordinate, so a `Cell` is an `IVec2` whose
//! components are multiples of the cell size.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::CELL_SIZE;

/// A cell-aligned pixel position
pub type Cell = IVec2;

/// Number of whole cells that fit in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBounds {
    pub cols: i32,
    pub rows: i32,
}

/// Playfield dimensions in pixels
///
/// Width and height follow the viewport and may change mid-round. Nothing
/// caches them: every bounds check and spawn reads the current values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_cell_size(width, height, CELL_SIZE)
    }

    pub fn with_cell_size(width: i32, height: i32, cell_size: i32) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
            cell_size: cell_size.max(1),
        }
    }

    /// Apply a viewport resize
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
    }

    /// Snap a pixel coordinate to the cell containing it
    pub fn to_cell(&self, pixel: IVec2) -> Cell {
        IVec2::new(
            pixel.x.div_euclid(self.cell_size),
            pixel.y.div_euclid(self.cell_size),
        ) * self.cell_size
    }

    /// Pixel position of the cell at (col, row)
    pub fn cell_at(&self, col: i32, row: i32) -> Cell {
        IVec2::new(col, row) * self.cell_size
    }

    pub fn cell_bounds(&self) -> CellBounds {
        CellBounds {
            cols: self.width / self.cell_size,
            rows: self.height / self.cell_size,
        }
    }

    /// Whether a cell lies inside `[0, width) x [0, height)`
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Uniformly random cell among all whole cells in the viewport.
    ///
    /// Occupancy is not checked: the result may land on a snake or another
    /// pickup. A viewport smaller than one cell yields the origin.
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        let bounds = self.cell_bounds();
        if bounds.cols <= 0 || bounds.rows <= 0 {
            return IVec2::ZERO;
        }
        let col = rng.random_range(0..bounds.cols);
        let row = rng.random_range(0..bounds.rows);
        self.cell_at(col, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_to_cell_snaps_down() {
        let grid = Grid::new(400, 400);
        assert_eq!(grid.to_cell(IVec2::new(0, 0)), IVec2::new(0, 0));
        assert_eq!(grid.to_cell(IVec2::new(39, 21)), IVec2::new(20, 20));
        assert_eq!(grid.to_cell(IVec2::new(-1, 5)), IVec2::new(-20, 0));
    }

    #[test]
    fn test_cell_bounds_floor() {
        let grid = Grid::new(410, 399);
        assert_eq!(grid.cell_bounds(), CellBounds { cols: 20, rows: 19 });
    }

    #[test]
    fn test_in_bounds_edges() {
        let grid = Grid::new(400, 400);
        assert!(grid.in_bounds(IVec2::new(0, 0)));
        assert!(grid.in_bounds(IVec2::new(380, 380)));
        assert!(!grid.in_bounds(IVec2::new(400, 0)));
        assert!(!grid.in_bounds(IVec2::new(0, 400)));
        assert!(!grid.in_bounds(IVec2::new(-20, 0)));
    }

    #[test]
    fn test_resize_changes_bounds() {
        let mut grid = Grid::new(400, 400);
        assert!(grid.in_bounds(IVec2::new(300, 300)));
        grid.resize(200, 200);
        assert!(!grid.in_bounds(IVec2::new(300, 300)));
    }

    #[test]
    fn test_random_cell_aligned_and_inside() {
        let grid = Grid::new(410, 230);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let cell = grid.random_cell(&mut rng);
            assert!(grid.in_bounds(cell));
            assert_eq!(cell.x % 20, 0);
            assert_eq!(cell.y % 20, 0);
            // Partial trailing cells are never candidates
            assert!(cell.x < 400 && cell.y < 220);
        }
    }

    #[test]
    fn test_random_cell_degenerate_viewport() {
        let grid = Grid::new(10, 10);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(grid.random_cell(&mut rng), IVec2::ZERO);
    }
}
