//! Simulation runner driving real `GameSession`s.
//!
//! Each run gets a fresh ledger in memory and its own seeded RNG. Statistics
//! are read back from round settlements.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::core::RoundConfig;
use crate::gateway::{MemoryStore, NullPresenter};
use crate::ledger::RoundResult;
use crate::power_ups::PowerUpKind;
use crate::session::GameSession;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let run_stats = simulate_single_run(config, &mut rng);

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Rounds {}, W/L/C {}/{}/{}, Final credits {}{}",
                run_idx + 1,
                config.num_runs,
                run_stats.rounds_played,
                run_stats.wins,
                run_stats.losses,
                run_stats.cash_outs,
                run_stats.final_credits,
                if run_stats.went_broke { " (broke)" } else { "" }
            );
        }
        all_runs.push(run_stats);
    }

    let report = SimReport::from_runs(all_runs, config);
    info!(
        "Simulation finished: {} rounds, RTP {:.2}%",
        report.total_rounds,
        report.return_to_player * 100.0
    );
    report
}

/// Play one bankroll until it has played `rounds_per_run` rounds or is broke.
///
/// Strategy: open cells in random order until `target_diamonds` diamonds are
/// found, then cash out.
pub fn simulate_single_run<R: Rng>(config: &SimConfig, rng: &mut R) -> RunStats {
    let session_rng = ChaCha8Rng::seed_from_u64(rng.gen());
    let mut session = GameSession::new(MemoryStore::new(), NullPresenter, session_rng);
    let target = config.target_diamonds.max(1);
    let mut stats = RunStats::default();

    for _ in 0..config.rounds_per_run {
        let bet = config.bet.min(session.credits());
        if bet == 0 {
            break;
        }

        let round_config = RoundConfig::from_difficulty(config.difficulty, bet);
        if let Err(e) = session.start_round(round_config) {
            debug!("Simulated round refused: {}", e);
            break;
        }
        stats.rounds_played += 1;
        stats.total_wagered += bet;

        if config.use_power_ups {
            for kind in [PowerUpKind::DoubleMultiplier, PowerUpKind::SafeReveal] {
                if session.ledger().power_ups.count(kind) > 0 {
                    stats.power_ups_used += session.use_power_up(kind).is_ok() as u32;
                }
            }
        }

        let mut order: Vec<usize> = (0..round_config.total_cells()).collect();
        order.shuffle(rng);
        for index in order {
            let found = session.round().map_or(0, |round| round.revealed_diamonds);
            if !session.is_round_active() || found >= target {
                break;
            }
            // Cells opened by Safe Reveal come back as Ignored
            session.reveal_cell(index).ok();
        }
        if session.is_round_active() {
            session.cash_out().ok();
        }

        if let Some(settlement) = session.round().and_then(|round| round.settlement) {
            stats.total_returned += settlement.payout;
            match settlement.result {
                RoundResult::Win => stats.wins += 1,
                RoundResult::Loss => stats.losses += 1,
                RoundResult::CashOut => stats.cash_outs += 1,
            }
        }
    }

    stats.final_credits = session.credits();
    stats.went_broke = stats.final_credits == 0;
    stats.best_streak = session.ledger().stats.best_streak;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Difficulty, STARTING_CREDITS};

    fn small_config() -> SimConfig {
        SimConfig {
            num_runs: 20,
            rounds_per_run: 30,
            seed: Some(7),
            verbosity: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_simulation_is_reproducible() {
        let a = run_simulation(&small_config());
        let b = run_simulation(&small_config());
        assert_eq!(a.total_rounds, b.total_rounds);
        assert_eq!(a.total_returned, b.total_returned);
        assert_eq!(a.cash_outs, b.cash_outs);
    }

    #[test]
    fn test_every_round_is_settled() {
        let report = run_simulation(&small_config());
        assert_eq!(report.num_runs, 20);
        assert_eq!(
            report.total_rounds,
            report.wins + report.losses + report.cash_outs
        );
        assert!(report.total_rounds > 0);
    }

    #[test]
    fn test_single_run_credit_accounting() {
        let config = small_config();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let stats = simulate_single_run(&config, &mut rng);

        let expected = STARTING_CREDITS as i64 - stats.total_wagered as i64
            + stats.total_returned as i64;
        assert_eq!(stats.final_credits as i64, expected);
    }

    #[test]
    fn test_full_clear_never_cashes_out() {
        let config = SimConfig {
            num_runs: 10,
            rounds_per_run: 10,
            seed: Some(3),
            verbosity: 0,
            ..SimConfig::full_clear(Difficulty::Easy)
        };
        let report = run_simulation(&config);
        assert_eq!(report.cash_outs, 0);
        assert_eq!(report.total_rounds, report.wins + report.losses);
    }

    #[test]
    fn test_power_ups_get_spent() {
        let config = SimConfig {
            use_power_ups: true,
            ..small_config()
        };
        let report = run_simulation(&config);
        assert!(report.run_stats.iter().all(|run| run.power_ups_used >= 2));
    }
}
