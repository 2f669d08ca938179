//! Game rules: constants, payout math and round configuration.

pub mod config;
pub mod constants;
pub mod payout;

pub use config::*;
pub use constants::*;
pub use payout::*;
