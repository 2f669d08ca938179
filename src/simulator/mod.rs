//! Payout balance simulator for Monte Carlo analysis.
//!
//! Plays thousands of rounds with a fixed strategy to measure:
//! - Return to player for each difficulty and cash-out target
//! - How often a bankroll goes broke
//! - Win/loss/cash-out mix
//!
//! Every round is played through `GameSession`, so results match real play.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{expected_return, RunStats, SimReport};
pub use runner::run_simulation;
