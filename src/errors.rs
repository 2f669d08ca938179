//! Errors raised when the session rejects a player action.
//!
//! Every variant is recoverable: the request is refused and state is left as it was.

use crate::power_ups::PowerUpKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid bet of {bet}: must be between 1 and {credits} credits")]
    InvalidBet { bet: u64, credits: u64 },

    #[error("Number of bombs must be between {min} and {max} (got {requested})")]
    InvalidBombCount { requested: u32, min: u32, max: u32 },

    #[error("No active round")]
    NoActiveRound,

    #[error("A round is already in progress")]
    RoundInProgress,

    #[error("Reveal at least one diamond before cashing out")]
    NothingToCashOut,

    #[error("No {0} power-ups left")]
    PowerUpUnavailable(PowerUpKind),

    #[error("{0} is already active")]
    PowerUpAlreadyActive(PowerUpKind),

    #[error("Cell {index} is outside the {total_cells}-cell grid")]
    CellOutOfRange { index: usize, total_cells: usize },

    #[error("Unsupported grid size: {0} cells (expected 16, 25 or 36)")]
    UnsupportedGridSize(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::InvalidBet {
            bet: 50,
            credits: 30,
        };
        assert_eq!(
            err.to_string(),
            "Invalid bet of 50: must be between 1 and 30 credits"
        );
        assert_eq!(
            GameError::PowerUpUnavailable(PowerUpKind::Scanner).to_string(),
            "No Scanner power-ups left"
        );
    }
}
