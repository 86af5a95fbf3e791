use crate::Cell;

/// Fixed-size occupancy field for one round.
///
/// A cell is either free or blocked. Blocking is monotonic: walls and trail
/// cells never become free again until `reset()` starts the next round.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl Grid {
    /// Create a grid with the full perimeter already walled.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(
            width >= 3 && height >= 3,
            "grid must have interior cells, got {width}x{height}"
        );
        let mut grid = Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
        };
        grid.reset();
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Clear all occupancy, then wall the border rows and columns.
    pub fn reset(&mut self) {
        self.cells.fill(false);
        for x in 0..self.width {
            self.occupy(Cell::new(x, 0));
            self.occupy(Cell::new(x, self.height - 1));
        }
        for y in 0..self.height {
            self.occupy(Cell::new(0, y));
            self.occupy(Cell::new(self.width - 1, y));
        }
    }

    /// Whether the cell is a wall or trail. Out-of-range queries are a
    /// movement bug upstream; fail fast instead of masking it.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.cells[self.index(cell)]
    }

    /// Mark a cell blocked. Idempotent; never unblocks.
    pub fn occupy(&mut self, cell: Cell) {
        let i = self.index(cell);
        self.cells[i] = true;
    }

    fn index(&self, cell: Cell) -> usize {
        assert!(
            cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height,
            "cell ({}, {}) outside {}x{} grid",
            cell.x,
            cell.y,
            self.width,
            self.height
        );
        (cell.y * self.width + cell.x) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn perimeter_is_walled_after_reset() {
        let grid = Grid::new(8, 8);
        for x in 0..8 {
            assert!(grid.is_blocked(Cell::new(x, 0)), "top wall at x={x}");
            assert!(grid.is_blocked(Cell::new(x, 7)), "bottom wall at x={x}");
        }
        for y in 0..8 {
            assert!(grid.is_blocked(Cell::new(0, y)), "left wall at y={y}");
            assert!(grid.is_blocked(Cell::new(7, y)), "right wall at y={y}");
        }
    }

    #[test]
    fn interior_is_free_after_reset() {
        let grid = Grid::new(8, 8);
        for x in 1..7 {
            for y in 1..7 {
                assert!(!grid.is_blocked(Cell::new(x, y)), "interior ({x}, {y})");
            }
        }
    }

    #[test]
    fn occupy_is_idempotent() {
        let mut grid = Grid::new(8, 8);
        let cell = Cell::new(3, 4);
        grid.occupy(cell);
        assert!(grid.is_blocked(cell));
        grid.occupy(cell);
        grid.occupy(cell);
        assert!(grid.is_blocked(cell));
    }

    #[test]
    fn reset_frees_trail_cells_and_rewalls_border() {
        let mut grid = Grid::new(8, 8);
        grid.occupy(Cell::new(3, 3));
        grid.reset();
        assert!(!grid.is_blocked(Cell::new(3, 3)));
        assert!(grid.is_blocked(Cell::new(0, 0)));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_range_query_fails_fast() {
        let grid = Grid::new(8, 8);
        grid.is_blocked(Cell::new(8, 0));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn negative_coordinate_fails_fast() {
        let grid = Grid::new(8, 8);
        grid.is_blocked(Cell::new(0, -1));
    }

    #[test]
    fn rectangular_grid_walls_long_edges() {
        let grid = Grid::new(12, 6);
        assert!(grid.is_blocked(Cell::new(11, 3)));
        assert!(grid.is_blocked(Cell::new(5, 5)));
        assert!(!grid.is_blocked(Cell::new(5, 3)));
    }

    proptest! {
        /// Occupancy is monotonic: any sequence of occupy calls leaves every
        /// touched cell blocked.
        #[test]
        fn occupancy_is_monotonic(cells in proptest::collection::vec((0i32..16, 0i32..16), 1..64)) {
            let mut grid = Grid::new(16, 16);
            for &(x, y) in &cells {
                grid.occupy(Cell::new(x, y));
            }
            for &(x, y) in &cells {
                prop_assert!(grid.is_blocked(Cell::new(x, y)));
            }
        }
    }
}
