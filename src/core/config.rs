//! Round configuration: grid sizes, difficulty presets and validation.

use super::constants::{MAX_BOMB_RATIO, MIN_BET, MIN_BOMBS};
use crate::errors::GameError;
use serde::{Deserialize, Serialize};

/// Side length of the square grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridSize {
    Four,
    Five,
    Six,
}

impl GridSize {
    pub const ALL: [GridSize; 3] = [GridSize::Four, GridSize::Five, GridSize::Six];

    pub fn side(&self) -> usize {
        match self {
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
        }
    }

    pub fn total_cells(&self) -> usize {
        self.side() * self.side()
    }

    pub fn from_side(side: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.side() == side)
    }

    /// Parse the cell-count values offered by the grid selector (16, 25, 36).
    pub fn from_total_cells(cells: usize) -> Result<Self, GameError> {
        Self::ALL
            .into_iter()
            .find(|size| size.total_cells() == cells)
            .ok_or(GameError::UnsupportedGridSize(cells))
    }
}

/// Largest bomb count allowed on a grid: `floor(total_cells * 0.4)`.
pub fn max_bombs(grid_size: GridSize) -> u32 {
    (grid_size.total_cells() as f64 * MAX_BOMB_RATIO).floor() as u32
}

/// Named grid/bomb presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Difficulty::Easy)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Extreme => "Extreme",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }

    pub fn grid_size(&self) -> GridSize {
        match self {
            Self::Easy => GridSize::Four,
            Self::Medium => GridSize::Five,
            Self::Hard | Self::Extreme => GridSize::Six,
        }
    }

    pub fn bomb_count(&self) -> u32 {
        match self {
            Self::Easy => 2,
            Self::Medium => 5,
            Self::Hard => 8,
            Self::Extreme => 12,
        }
    }
}

/// Player-chosen parameters for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub grid_size: GridSize,
    pub bomb_count: u32,
    pub bet: u64,
}

impl RoundConfig {
    pub fn new(grid_size: GridSize, bomb_count: u32, bet: u64) -> Self {
        Self {
            grid_size,
            bomb_count,
            bet,
        }
    }

    pub fn from_difficulty(difficulty: Difficulty, bet: u64) -> Self {
        Self::new(difficulty.grid_size(), difficulty.bomb_count(), bet)
    }

    pub fn total_cells(&self) -> usize {
        self.grid_size.total_cells()
    }

    pub fn safe_cells(&self) -> usize {
        self.total_cells() - self.bomb_count as usize
    }

    /// Check the bet against the available credits and the bomb count against
    /// the grid. The bet is checked first.
    pub fn validate(&self, credits: u64) -> Result<(), GameError> {
        if self.bet < MIN_BET || self.bet > credits {
            return Err(GameError::InvalidBet {
                bet: self.bet,
                credits,
            });
        }

        let max = max_bombs(self.grid_size);
        if self.bomb_count < MIN_BOMBS || self.bomb_count > max {
            return Err(GameError::InvalidBombCount {
                requested: self.bomb_count,
                min: MIN_BOMBS,
                max,
            });
        }

        Ok(())
    }
}
