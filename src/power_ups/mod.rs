//! Consumable power-ups: inventory tracking and in-round effects.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
