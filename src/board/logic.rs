//! Grid generation and neighbourhood queries.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Grid, GridCell};
use crate::core::GridSize;

/// Generate a layout with exactly `bomb_count` bombs and diamonds everywhere else.
///
/// Bomb positions are a uniform sample without replacement: every index is
/// shuffled and the first `bomb_count` become bombs.
pub fn generate_grid<R: Rng>(grid_size: GridSize, bomb_count: u32, rng: &mut R) -> Grid {
    let total_cells = grid_size.total_cells();
    let bomb_count = (bomb_count as usize).min(total_cells);

    let mut cells = vec![GridCell::Empty; total_cells];

    let mut positions: Vec<usize> = (0..total_cells).collect();
    positions.shuffle(rng);
    for &index in positions.iter().take(bomb_count) {
        cells[index] = GridCell::Bomb;
    }

    // Fill remaining cells with diamonds
    for cell in cells.iter_mut().filter(|cell| **cell == GridCell::Empty) {
        *cell = GridCell::Diamond;
    }

    Grid::from_cells(grid_size.side(), cells)
}

/// Indices of the (up to 8) cells surrounding `index`, clipped at the grid edges.
pub fn neighbor_indices(index: usize, side: usize) -> Vec<usize> {
    let row = (index / side) as i32;
    let col = (index % side) as i32;
    let mut neighbors = Vec::with_capacity(8);

    for d_row in -1i32..=1 {
        for d_col in -1i32..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }

            let new_row = row + d_row;
            let new_col = col + d_col;

            if new_row >= 0 && new_row < side as i32 && new_col >= 0 && new_col < side as i32 {
                neighbors.push(new_row as usize * side + new_col as usize);
            }
        }
    }

    neighbors
}

/// Number of bombs among the neighbours of `index`. The cell itself is not counted.
pub fn adjacent_bomb_count(grid: &Grid, index: usize) -> u32 {
    neighbor_indices(index, grid.side())
        .into_iter()
        .filter(|&n| grid.get(n) == Some(GridCell::Bomb))
        .count() as u32
}
