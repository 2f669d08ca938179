//! Diamond Hunt - a minesweeper-style wagering game engine
//!
//! Bet credits, open cells on a hidden grid of diamonds and bombs, and cash
//! out before hitting a bomb. This library holds the game rules, the player
//! ledger and the gateways used to persist and present them.

pub mod board;
pub mod core;
pub mod errors;
pub mod gateway;
pub mod ledger;
pub mod power_ups;
pub mod round;
pub mod save_manager;
pub mod session;
pub mod simulator;

pub use crate::core::{Difficulty, GridSize, RoundConfig};
pub use errors::GameError;
pub use gateway::{
    EventLog, GameEvent, MemoryStore, NullPresenter, PersistenceGateway, PresentationGateway,
    Severity,
};
pub use ledger::PlayerLedger;
pub use session::GameSession;
