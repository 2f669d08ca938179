//! Round data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{Grid, GridCell};
use crate::core::{calculate_multiplier, effective_multiplier, potential_win, RoundConfig};
use crate::ledger::RoundResult;
use crate::power_ups::PowerUpKind;

/// Lifecycle of a round. `Idle` means no round has been started or the last one is settled
/// and a new one may begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    Idle,
    Active,
    Won,
    Lost,
    CashedOut,
}

impl RoundPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::CashedOut)
    }
}

/// Result of a single reveal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Round not active or the cell was already open.
    Ignored,
    /// An armed scanner intercepted the click; the cell stays hidden.
    Scanned { index: usize, adjacent_bombs: u32 },
    /// A diamond was found and the round continues.
    Diamond { index: usize, potential_win: u64 },
    /// The last diamond was found.
    Won { index: usize, payout: u64 },
    /// A bomb was hit.
    Lost { index: usize },
}

/// Credits settled when a round reaches a terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSettlement {
    pub result: RoundResult,
    /// Credits returned to the player (0 on loss).
    pub payout: u64,
    /// `payout - bet`.
    pub profit: i64,
}

/// A single round in progress (or just finished).
#[derive(Debug, Clone)]
pub struct RoundState {
    pub id: Uuid,
    pub config: RoundConfig,
    /// Hidden layout, fixed for the whole round.
    pub grid: Grid,
    /// One flag per cell, true once opened.
    pub revealed: Vec<bool>,
    pub revealed_diamonds: u32,
    pub phase: RoundPhase,
    /// Power-up currently in effect. Activating another one replaces it.
    pub active_power_up: Option<PowerUpKind>,
    /// Multiplier from bomb density, fixed at round start.
    pub base_multiplier: f64,
    /// Settlement recorded when the round ended.
    pub settlement: Option<RoundSettlement>,
}

impl RoundState {
    /// Create an active round over an already generated grid.
    pub fn new(id: Uuid, config: RoundConfig, grid: Grid) -> Self {
        let total_cells = grid.total_cells();
        Self {
            id,
            config,
            base_multiplier: calculate_multiplier(total_cells as u32, config.bomb_count),
            grid,
            revealed: vec![false; total_cells],
            revealed_diamonds: 0,
            phase: RoundPhase::Active,
            active_power_up: None,
            settlement: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn total_cells(&self) -> usize {
        self.grid.total_cells()
    }

    pub fn safe_cells(&self) -> u32 {
        self.grid.diamond_count() as u32
    }

    /// True while a scanner waits for its target cell.
    pub fn scanner_armed(&self) -> bool {
        self.active_power_up == Some(PowerUpKind::Scanner)
    }

    pub fn multiplier_doubled(&self) -> bool {
        self.active_power_up == Some(PowerUpKind::DoubleMultiplier)
    }

    pub fn effective_multiplier(&self) -> f64 {
        effective_multiplier(self.base_multiplier, self.multiplier_doubled())
    }

    /// Credits the player would receive by cashing out now.
    pub fn potential_win(&self) -> u64 {
        potential_win(
            self.config.bet,
            self.effective_multiplier(),
            self.revealed_diamonds,
        )
    }

    pub fn can_cash_out(&self) -> bool {
        self.is_active() && self.revealed_diamonds >= 1
    }

    /// Indices not yet opened, ascending.
    pub fn hidden_indices(&self) -> Vec<usize> {
        self.revealed
            .iter()
            .enumerate()
            .filter(|(_, open)| !**open)
            .map(|(index, _)| index)
            .collect()
    }

    /// Hidden cells that hold a diamond.
    pub fn hidden_diamonds(&self) -> Vec<usize> {
        self.hidden_indices()
            .into_iter()
            .filter(|&index| self.grid.get(index) == Some(GridCell::Diamond))
            .collect()
    }
}
