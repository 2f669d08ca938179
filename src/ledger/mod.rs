//! Player ledger: credits, statistics, history and leaderboard across rounds.
//!
//! The whole ledger is the persisted snapshot.

mod logic;
pub mod types;

pub use types::*;
