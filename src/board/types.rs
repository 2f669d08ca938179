//! Grid data structures.

use serde::{Deserialize, Serialize};

/// Contents of a single grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridCell {
    /// Placeholder while the layout is being built. Never present in a finished grid.
    #[default]
    Empty,
    Bomb,
    Diamond,
}

/// A square grid stored row-major: index = row * side + col.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    side: usize,
    cells: Vec<GridCell>,
}

impl Grid {
    /// Build a grid from an explicit layout.
    ///
    /// Panics if `cells.len()` is not `side * side`.
    pub fn from_cells(side: usize, cells: Vec<GridCell>) -> Self {
        assert_eq!(cells.len(), side * side, "grid must be square");
        Self { side, cells }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, index: usize) -> Option<GridCell> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn bomb_count(&self) -> usize {
        self.count(GridCell::Bomb)
    }

    pub fn diamond_count(&self) -> usize {
        self.count(GridCell::Diamond)
    }

    /// Indices of every bomb, in ascending order.
    pub fn bomb_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == GridCell::Bomb)
            .map(|(index, _)| index)
            .collect()
    }

    fn count(&self, kind: GridCell) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cells_counts() {
        let mut cells = vec![GridCell::Diamond; 16];
        cells[3] = GridCell::Bomb;
        cells[10] = GridCell::Bomb;
        let grid = Grid::from_cells(4, cells);

        assert_eq!(grid.side(), 4);
        assert_eq!(grid.total_cells(), 16);
        assert_eq!(grid.bomb_count(), 2);
        assert_eq!(grid.diamond_count(), 14);
        assert_eq!(grid.bomb_positions(), vec![3, 10]);
        assert_eq!(grid.get(3), Some(GridCell::Bomb));
        assert_eq!(grid.get(16), None);
    }

    #[test]
    #[should_panic(expected = "grid must be square")]
    fn test_from_cells_rejects_non_square() {
        Grid::from_cells(4, vec![GridCell::Diamond; 15]);
    }
}
