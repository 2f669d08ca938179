//! Ledger updates: credits, round recording and leaderboard upkeep.

use super::{GameRecord, LeaderboardEntry, PlayerLedger};
use crate::core::{round_to, HISTORY_CAP, LEADERBOARD_CAP};
use crate::errors::GameError;

impl PlayerLedger {
    /// Take a bet out of the balance. Rejected (and nothing changes) if it
    /// would overdraw the account or the bet is zero.
    pub fn debit(&mut self, bet: u64) -> Result<u64, GameError> {
        if bet == 0 || bet > self.credits {
            return Err(GameError::InvalidBet {
                bet,
                credits: self.credits,
            });
        }
        self.credits -= bet;
        Ok(self.credits)
    }

    /// Pay winnings into the balance. Returns the new balance.
    pub fn credit(&mut self, amount: u64) -> u64 {
        self.credits = self.credits.saturating_add(amount);
        self.credits
    }

    /// Record a finished round.
    ///
    /// Updates counters and streaks, prepends to the history (capped), and adds
    /// profitable rounds to the leaderboard (sorted by profit, capped).
    pub fn record_game(&mut self, record: GameRecord) {
        let stats = &mut self.stats;
        stats.games_played += 1;

        if record.result.counts_as_win() {
            stats.wins += 1;
            stats.current_streak += 1;
            stats.best_streak = stats.best_streak.max(stats.current_streak);
        } else {
            stats.losses += 1;
            stats.current_streak = 0;
        }

        stats.best_win = stats.best_win.max(record.profit);
        stats.total_winnings += record.profit;

        if record.profit > 0 {
            self.leaderboard.push(LeaderboardEntry {
                timestamp: record.timestamp,
                profit: record.profit,
                bet: record.bet,
                multiplier: round_to(record.profit as f64 / record.bet as f64, 2),
            });
            // Stable sort: equal profits keep the earlier entry first
            self.leaderboard.sort_by(|a, b| b.profit.cmp(&a.profit));
            self.leaderboard.truncate(LEADERBOARD_CAP);
        }

        self.history.insert(0, record);
        self.history.truncate(HISTORY_CAP);
    }

    /// Enforce the history and leaderboard caps on a loaded snapshot.
    pub fn normalize(&mut self) {
        self.history.truncate(HISTORY_CAP);
        self.leaderboard.sort_by(|a, b| b.profit.cmp(&a.profit));
        self.leaderboard.truncate(LEADERBOARD_CAP);
    }
}
