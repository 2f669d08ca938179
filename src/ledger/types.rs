//! Ledger data structures.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::core::STARTING_CREDITS;
use crate::power_ups::PowerUpInventory;

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Loss,
    CashOut,
}

impl RoundResult {
    /// Cash-outs count toward wins and streaks.
    pub fn counts_as_win(&self) -> bool {
        !matches!(self, Self::Loss)
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win => write!(f, "WIN"),
            Self::Loss => write!(f, "LOSS"),
            Self::CashOut => write!(f, "CASHOUT"),
        }
    }
}

/// Lifetime statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    /// Largest single-round profit.
    pub best_win: i64,
    /// Net profit across all rounds (may be negative).
    pub total_winnings: i64,
}

impl Stats {
    /// Percentage of rounds won, 0.0 before the first round.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins as f64 / self.games_played as f64 * 100.0
    }
}

/// One finished round in the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub round_id: Uuid,
    /// Unix seconds.
    pub timestamp: i64,
    pub bet: u64,
    pub result: RoundResult,
    pub profit: i64,
    /// Cell count of the grid (16, 25 or 36).
    pub grid_size: usize,
    pub bomb_count: u32,
}

/// A profitable round kept on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub timestamp: i64,
    pub profit: i64,
    pub bet: u64,
    /// `profit / bet`, two decimals.
    pub multiplier: f64,
}

/// Everything that survives between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLedger {
    pub credits: u64,
    pub stats: Stats,
    /// Most recent first.
    pub history: Vec<GameRecord>,
    /// Highest profit first.
    pub leaderboard: Vec<LeaderboardEntry>,
    pub power_ups: PowerUpInventory,
}

impl Default for PlayerLedger {
    fn default() -> Self {
        Self {
            credits: STARTING_CREDITS,
            stats: Stats::default(),
            history: Vec::new(),
            leaderboard: Vec::new(),
            power_ups: PowerUpInventory::default(),
        }
    }
}
