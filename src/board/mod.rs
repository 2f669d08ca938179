//! Hidden bomb/diamond layout for a round.
//!
//! The grid is generated once per round and never changes afterwards.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
