//! Simulation report generation.

use serde::Serialize;

use super::config::SimConfig;
use crate::core::{calculate_multiplier, potential_win, RoundConfig};

/// Results of one simulated bankroll.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub rounds_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub cash_outs: u32,
    pub total_wagered: u64,
    pub total_returned: u64,
    pub final_credits: u64,
    pub went_broke: bool,
    pub best_streak: u32,
    pub power_ups_used: u32,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub difficulty: String,
    pub bet: u64,
    pub target_diamonds: u32,

    // Totals across all runs
    pub total_rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub cash_outs: u64,
    pub total_wagered: u64,
    pub total_returned: u64,

    // Derived
    pub return_to_player: f64,
    pub expected_rtp: f64,
    pub bust_rate: f64,
    pub avg_final_credits: f64,
    pub avg_rounds_per_run: f64,
    pub best_streak: u32,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, config: &SimConfig) -> Self {
        let num_runs = runs.len() as u32;
        let divisor = num_runs.max(1) as f64;

        let total_rounds = runs.iter().map(|r| r.rounds_played as u64).sum();
        let wins = runs.iter().map(|r| r.wins as u64).sum();
        let losses = runs.iter().map(|r| r.losses as u64).sum();
        let cash_outs = runs.iter().map(|r| r.cash_outs as u64).sum();
        let total_wagered: u64 = runs.iter().map(|r| r.total_wagered).sum();
        let total_returned: u64 = runs.iter().map(|r| r.total_returned).sum();

        let return_to_player = if total_wagered > 0 {
            total_returned as f64 / total_wagered as f64
        } else {
            0.0
        };
        let bust_rate = runs.iter().filter(|r| r.went_broke).count() as f64 / divisor;
        let avg_final_credits =
            runs.iter().map(|r| r.final_credits as f64).sum::<f64>() / divisor;
        let avg_rounds_per_run = total_rounds as f64 / divisor;
        let best_streak = runs.iter().map(|r| r.best_streak).max().unwrap_or(0);

        let round_config = RoundConfig::from_difficulty(config.difficulty, config.bet);
        let expected_rtp = expected_return(
            round_config.total_cells() as u32,
            round_config.bomb_count,
            config.target_diamonds,
            config.bet,
        );

        Self {
            num_runs,
            difficulty: config.difficulty.name().to_string(),
            bet: config.bet,
            target_diamonds: config.target_diamonds,
            total_rounds,
            wins,
            losses,
            cash_outs,
            total_wagered,
            total_returned,
            return_to_player,
            expected_rtp,
            bust_rate,
            avg_final_credits,
            avg_rounds_per_run,
            best_streak,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                 DIAMOND HUNT SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {}  Difficulty: {}  Bet: {}  Target: {} diamond(s)\n\n",
            self.num_runs, self.difficulty, self.bet, self.target_diamonds
        ));

        report.push_str("── ROUNDS ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Total Rounds:      {}\n", self.total_rounds));
        report.push_str(&format!(
            "  Wins:              {} ({:.1}%)\n",
            self.wins,
            self.share(self.wins)
        ));
        report.push_str(&format!(
            "  Cash-outs:         {} ({:.1}%)\n",
            self.cash_outs,
            self.share(self.cash_outs)
        ));
        report.push_str(&format!(
            "  Losses:            {} ({:.1}%)\n",
            self.losses,
            self.share(self.losses)
        ));
        report.push_str(&format!(
            "  Avg Rounds/Run:    {:.1}\n",
            self.avg_rounds_per_run
        ));
        report.push_str(&format!("  Best Streak:       {}\n\n", self.best_streak));

        report.push_str("── MONEY ────────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Total Wagered:     {}\n", self.total_wagered));
        report.push_str(&format!("  Total Returned:    {}\n", self.total_returned));
        report.push_str(&format!(
            "  Return to Player:  {:.2}%\n",
            self.return_to_player * 100.0
        ));
        report.push_str(&format!(
            "  Expected RTP:      {:.2}%\n",
            self.expected_rtp * 100.0
        ));
        report.push_str(&format!(
            "  Avg Final Credits: {:.0}\n",
            self.avg_final_credits
        ));
        report.push_str(&format!(
            "  Bust Rate:         {:.1}%\n\n",
            self.bust_rate * 100.0
        ));

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let rating = if self.return_to_player > 1.05 {
            "PLAYER EDGE - Strategy beats the house"
        } else if self.return_to_player >= 0.95 {
            "FAIR - Close to break-even"
        } else {
            "HOUSE EDGE - Strategy loses over time"
        };
        report.push_str(&format!("  Rating: {}\n", rating));

        if self.total_rounds > 0 && (self.return_to_player - self.expected_rtp).abs() > 0.1 {
            report.push_str("  ⚠️  Observed RTP far from expected - too few rounds?\n");
        }
        if self.bust_rate > 0.5 {
            report.push_str("  ⚠️  Most bankrolls went broke\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    fn share(&self, count: u64) -> f64 {
        if self.total_rounds == 0 {
            0.0
        } else {
            count as f64 / self.total_rounds as f64 * 100.0
        }
    }
}

/// Expected return per credit wagered when opening `target` random cells and
/// then cashing out.
///
/// The chance of surviving k picks without a bomb is the product of
/// (safe - i) / (total - i) for i in 0..k. The payout uses the same floor
/// rounding as a real round.
pub fn expected_return(total_cells: u32, bomb_count: u32, target: u32, bet: u64) -> f64 {
    if bet == 0 || bomb_count >= total_cells {
        return 0.0;
    }
    let safe_cells = total_cells - bomb_count;
    let picks = target.max(1).min(safe_cells);

    let survival: f64 = (0..picks)
        .map(|i| (safe_cells - i) as f64 / (total_cells - i) as f64)
        .product();
    let multiplier = calculate_multiplier(total_cells, bomb_count);
    let payout = potential_win(bet, multiplier, picks);

    survival * payout as f64 / bet as f64
}
