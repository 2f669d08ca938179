//! Round state machine: bet placement, reveals, cash-out and settlement.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
