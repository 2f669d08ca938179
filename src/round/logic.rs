//! Round transitions: start, reveal, cash-out and settlement.
//!
//! These functions only touch the `RoundState`. Crediting the ledger and
//! notifying the player is the session's job.

use rand::Rng;
use uuid::Builder;

use super::{RevealOutcome, RoundPhase, RoundSettlement, RoundState};
use crate::board::{generate_grid, GridCell};
use crate::core::RoundConfig;
use crate::errors::GameError;
use crate::ledger::RoundResult;
use crate::power_ups::scan_cell;

/// Generate a fresh grid and open a round for an already validated config.
///
/// The round id is drawn from `rng` too, so a seeded generator replays the same rounds.
pub fn start_round<R: Rng>(config: RoundConfig, rng: &mut R) -> RoundState {
    let grid = generate_grid(config.grid_size, config.bomb_count, rng);
    let id = Builder::from_random_bytes(rng.gen()).into_uuid();
    RoundState::new(id, config, grid)
}

/// Handle a click on a cell.
///
/// - Inactive round or already open cell: ignored, whatever the index.
/// - Index outside the grid on an active round: `CellOutOfRange`.
/// - Armed scanner: the cell is scanned, not opened.
/// - Bomb: the round is lost.
/// - Diamond: progress grows; the last diamond wins the round.
pub fn reveal_cell(round: &mut RoundState, index: usize) -> Result<RevealOutcome, GameError> {
    if !round.is_active() {
        return Ok(RevealOutcome::Ignored);
    }
    check_index(round, index)?;
    if round.is_revealed(index) {
        return Ok(RevealOutcome::Ignored);
    }

    if round.scanner_armed() {
        let adjacent_bombs = scan_cell(round, index);
        return Ok(RevealOutcome::Scanned {
            index,
            adjacent_bombs,
        });
    }

    Ok(open_cell(round, index))
}

/// Open a hidden cell, bypassing the scanner. Used by reveals and Safe Reveal.
pub(crate) fn open_cell(round: &mut RoundState, index: usize) -> RevealOutcome {
    round.revealed[index] = true;

    match round.grid.get(index) {
        Some(GridCell::Bomb) => {
            end_round(round, false);
            RevealOutcome::Lost { index }
        }
        _ => {
            round.revealed_diamonds += 1;

            if round.revealed_diamonds >= round.safe_cells() {
                let payout = end_round(round, true).payout;
                RevealOutcome::Won { index, payout }
            } else {
                RevealOutcome::Diamond {
                    index,
                    potential_win: round.potential_win(),
                }
            }
        }
    }
}

/// Bank the current potential win. Requires an active round with at least one diamond.
pub fn cash_out(round: &mut RoundState) -> Result<RoundSettlement, GameError> {
    if !round.is_active() {
        return Err(GameError::NoActiveRound);
    }
    if !round.can_cash_out() {
        return Err(GameError::NothingToCashOut);
    }

    let payout = round.potential_win();
    Ok(settle(round, RoundPhase::CashedOut, RoundResult::CashOut, payout))
}

/// Terminal transition for a win (all diamonds found) or a loss (bomb hit).
pub fn end_round(round: &mut RoundState, won: bool) -> RoundSettlement {
    if won {
        let payout = round.potential_win();
        settle(round, RoundPhase::Won, RoundResult::Win, payout)
    } else {
        settle(round, RoundPhase::Lost, RoundResult::Loss, 0)
    }
}

fn settle(
    round: &mut RoundState,
    phase: RoundPhase,
    result: RoundResult,
    payout: u64,
) -> RoundSettlement {
    let settlement = RoundSettlement {
        result,
        payout,
        profit: payout as i64 - round.config.bet as i64,
    };
    round.phase = phase;
    if round.scanner_armed() {
        round.active_power_up = None;
    }
    round.settlement = Some(settlement);
    settlement
}

fn check_index(round: &RoundState, index: usize) -> Result<(), GameError> {
    if index >= round.total_cells() {
        return Err(GameError::CellOutOfRange {
            index,
            total_cells: round.total_cells(),
        });
    }
    Ok(())
}
