//! Power-up activation and effects.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{PowerUpEffect, PowerUpInventory, PowerUpKind};
use crate::board::adjacent_bomb_count;
use crate::core::BONUS_POWER_UP_CHANCE;
use crate::errors::GameError;
use crate::round::logic::open_cell;
use crate::round::RoundState;

/// Roll the round-start bonus: 10% chance of one random power-up.
pub fn roll_bonus_power_up<R: Rng>(rng: &mut R) -> Option<PowerUpKind> {
    if rng.gen_bool(BONUS_POWER_UP_CHANCE) {
        PowerUpKind::ALL.choose(rng).copied()
    } else {
        None
    }
}

/// Use one power-up from the inventory on the active round.
///
/// A round holds one active power-up at a time: arming the scanner or
/// doubling replaces whatever was active, and Safe Reveal clears the slot once
/// its diamond is open. Nothing is consumed when the request is rejected.
pub fn activate_power_up<R: Rng>(
    round: &mut RoundState,
    inventory: &mut PowerUpInventory,
    kind: PowerUpKind,
    rng: &mut R,
) -> Result<PowerUpEffect, GameError> {
    if !round.is_active() {
        return Err(GameError::NoActiveRound);
    }
    if inventory.count(kind) == 0 {
        return Err(GameError::PowerUpUnavailable(kind));
    }

    if round.active_power_up == Some(kind) {
        return Err(GameError::PowerUpAlreadyActive(kind));
    }

    match kind {
        PowerUpKind::Scanner => {
            inventory.consume(kind);
            round.active_power_up = Some(kind);
            Ok(PowerUpEffect::ScannerArmed)
        }
        PowerUpKind::DoubleMultiplier => {
            inventory.consume(kind);
            round.active_power_up = Some(kind);
            Ok(PowerUpEffect::MultiplierDoubled {
                potential_win: round.potential_win(),
            })
        }
        PowerUpKind::SafeReveal => match round.hidden_diamonds().choose(rng).copied() {
            Some(index) => {
                inventory.consume(kind);
                round.active_power_up = None;
                Ok(PowerUpEffect::SafeRevealed(open_cell(round, index)))
            }
            None => Ok(PowerUpEffect::NothingToReveal),
        },
    }
}

/// Resolve an armed scanner on `index`: count bombs around it and free the slot.
pub fn scan_cell(round: &mut RoundState, index: usize) -> u32 {
    round.active_power_up = None;
    adjacent_bomb_count(&round.grid, index)
}
