//! The game session: owns the ledger and the current round, and turns player
//! actions into state transitions, events and saves.
//!
//! Every action runs to completion synchronously. When an action changes the
//! ledger, the snapshot is saved before the action returns.

use log::{debug, info, warn};
use rand::Rng;
use uuid::Uuid;

use crate::board::GridCell;
use crate::core::{calculate_multiplier, RoundConfig};
use crate::errors::GameError;
use crate::gateway::{GameEvent, PersistenceGateway, PresentationGateway, Severity};
use crate::ledger::{GameRecord, PlayerLedger, RoundResult};
use crate::power_ups::{activate_power_up, roll_bonus_power_up, PowerUpEffect, PowerUpKind};
use crate::round::{self, RevealOutcome, RoundPhase, RoundSettlement, RoundState};

pub struct GameSession<S, P, R> {
    store: S,
    presenter: P,
    rng: R,
    ledger: PlayerLedger,
    round: Option<RoundState>,
}

impl<S, P, R> GameSession<S, P, R>
where
    S: PersistenceGateway,
    P: PresentationGateway,
    R: Rng,
{
    /// Load the saved ledger (or start fresh) and wait for the first round.
    ///
    /// An unreadable snapshot is reported and replaced by a new ledger.
    pub fn new(mut store: S, mut presenter: P, rng: R) -> Self {
        let ledger = match store.load() {
            Ok(Some(mut ledger)) => {
                ledger.normalize();
                ledger
            }
            Ok(None) => PlayerLedger::default(),
            Err(e) => {
                warn!("Could not load saved progress, starting fresh: {}", e);
                presenter.emit(GameEvent::message(
                    format!("Could not load saved progress: {}", e),
                    Severity::Warning,
                ));
                PlayerLedger::default()
            }
        };

        Self {
            store,
            presenter,
            rng,
            ledger,
            round: None,
        }
    }

    pub fn ledger(&self) -> &PlayerLedger {
        &self.ledger
    }

    pub fn credits(&self) -> u64 {
        self.ledger.credits
    }

    /// The current round, or the last one played until a new one starts.
    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn phase(&self) -> RoundPhase {
        self.round
            .as_ref()
            .map(|round| round.phase)
            .unwrap_or(RoundPhase::Idle)
    }

    pub fn is_round_active(&self) -> bool {
        self.phase() == RoundPhase::Active
    }

    /// Cash-out value of the active round, 0 otherwise.
    pub fn potential_win(&self) -> u64 {
        match &self.round {
            Some(round) if round.is_active() => round.potential_win(),
            _ => 0,
        }
    }

    /// Base multiplier a config would play at.
    pub fn preview_multiplier(config: &RoundConfig) -> f64 {
        calculate_multiplier(config.total_cells() as u32, config.bomb_count)
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Place a bet and deal a new grid.
    pub fn start_round(&mut self, config: RoundConfig) -> Result<Uuid, GameError> {
        if self.is_round_active() {
            return self.reject(GameError::RoundInProgress);
        }
        if let Err(e) = config.validate(self.ledger.credits) {
            return self.reject(e);
        }
        let credits = match self.ledger.debit(config.bet) {
            Ok(credits) => credits,
            Err(e) => return self.reject(e),
        };

        let new_round = round::start_round(config, &mut self.rng);
        let round_id = new_round.id;
        info!(
            "Round {} started: {} cells, {} bombs, bet {}, multiplier {:.1}x",
            round_id,
            config.total_cells(),
            config.bomb_count,
            config.bet,
            new_round.base_multiplier
        );

        self.presenter.emit(GameEvent::RoundStarted {
            round_id,
            config,
            multiplier: new_round.base_multiplier,
        });
        self.presenter.emit(GameEvent::CreditsChanged { credits });
        self.presenter.emit(GameEvent::PotentialWinChanged {
            amount: new_round.potential_win(),
        });
        self.round = Some(new_round);

        if let Some(kind) = roll_bonus_power_up(&mut self.rng) {
            let count = self.ledger.power_ups.grant(kind);
            debug!("Bonus power-up granted: {} (now {})", kind, count);
            self.presenter
                .emit(GameEvent::PowerUpInventoryChanged { kind, count });
            self.presenter.emit(GameEvent::message(
                format!("Bonus! Received 1 {} power-up!", kind),
                Severity::Success,
            ));
        }

        self.persist();
        Ok(round_id)
    }

    /// Click on a cell. Clicks outside an active round, or on an open cell,
    /// are ignored.
    pub fn reveal_cell(&mut self, index: usize) -> Result<RevealOutcome, GameError> {
        let Some(current) = self.round.as_mut() else {
            return Ok(RevealOutcome::Ignored);
        };

        let outcome = match round::reveal_cell(current, index) {
            Ok(outcome) => outcome,
            Err(e) => return self.reject(e),
        };
        debug!("Reveal {} -> {:?}", index, outcome);

        self.present_outcome(outcome);
        Ok(outcome)
    }

    /// Bank the potential win and end the round.
    pub fn cash_out(&mut self) -> Result<RoundSettlement, GameError> {
        let Some(current) = self.round.as_mut() else {
            return self.reject(GameError::NoActiveRound);
        };

        match round::cash_out(current) {
            Ok(settlement) => {
                self.finish_round();
                Ok(settlement)
            }
            Err(e) => self.reject(e),
        }
    }

    /// Spend one power-up on the active round.
    pub fn use_power_up(&mut self, kind: PowerUpKind) -> Result<PowerUpEffect, GameError> {
        let Some(current) = self.round.as_mut() else {
            return self.reject(GameError::NoActiveRound);
        };

        let was_doubled = current.multiplier_doubled();
        let effect =
            match activate_power_up(current, &mut self.ledger.power_ups, kind, &mut self.rng) {
                Ok(effect) => effect,
                Err(e) => return self.reject(e),
            };
        debug!("Power-up {} -> {:?}", kind, effect);

        if effect != PowerUpEffect::NothingToReveal {
            self.presenter.emit(GameEvent::PowerUpInventoryChanged {
                kind,
                count: self.ledger.power_ups.count(kind),
            });
        }

        match effect {
            PowerUpEffect::ScannerArmed => {
                self.presenter.emit(GameEvent::message(
                    "Click a cell to scan adjacent cells!",
                    Severity::Info,
                ));
                // The scanner took the 2x slot
                if was_doubled {
                    self.presenter.emit(GameEvent::PotentialWinChanged {
                        amount: self.potential_win(),
                    });
                }
                self.persist();
            }
            PowerUpEffect::MultiplierDoubled { potential_win } => {
                self.presenter.emit(GameEvent::message(
                    "2x Multiplier activated for this game!",
                    Severity::Success,
                ));
                self.presenter
                    .emit(GameEvent::PotentialWinChanged { amount: potential_win });
                self.persist();
            }
            PowerUpEffect::SafeRevealed(outcome) => {
                self.presenter
                    .emit(GameEvent::message("Safe cell revealed!", Severity::Success));
                // A win here saves through finish_round
                if !self.present_outcome(outcome) {
                    self.persist();
                }
            }
            PowerUpEffect::NothingToReveal => {
                self.presenter.emit(GameEvent::message(
                    "No safe cells left to reveal",
                    Severity::Info,
                ));
            }
        }

        Ok(effect)
    }

    /// Wipe all progress back to a new player's ledger.
    pub fn reset_progress(&mut self) -> Result<(), GameError> {
        if self.is_round_active() {
            return self.reject(GameError::RoundInProgress);
        }

        info!("Resetting player progress");
        self.ledger = PlayerLedger::default();
        self.round = None;

        self.presenter.emit(GameEvent::CreditsChanged {
            credits: self.ledger.credits,
        });
        for kind in PowerUpKind::ALL {
            self.presenter.emit(GameEvent::PowerUpInventoryChanged {
                kind,
                count: self.ledger.power_ups.count(kind),
            });
        }
        self.presenter
            .emit(GameEvent::message("Progress reset", Severity::Info));
        self.persist();
        Ok(())
    }

    /// Emit the events for a reveal. Returns true if the round ended (and was saved).
    fn present_outcome(&mut self, outcome: RevealOutcome) -> bool {
        match outcome {
            RevealOutcome::Ignored => false,
            RevealOutcome::Scanned {
                index,
                adjacent_bombs,
            } => {
                self.presenter.emit(GameEvent::ScanCompleted {
                    index,
                    adjacent_bombs,
                });
                let severity = if adjacent_bombs > 0 {
                    Severity::Warning
                } else {
                    Severity::Success
                };
                self.presenter.emit(GameEvent::message(
                    format!("Scanner: {} bomb(s) nearby!", adjacent_bombs),
                    severity,
                ));
                self.persist();
                false
            }
            RevealOutcome::Diamond {
                index,
                potential_win,
            } => {
                self.presenter.emit(GameEvent::CellRevealed {
                    index,
                    outcome: GridCell::Diamond,
                });
                self.presenter.emit(GameEvent::PotentialWinChanged {
                    amount: potential_win,
                });
                false
            }
            RevealOutcome::Won { index, .. } => {
                self.presenter.emit(GameEvent::CellRevealed {
                    index,
                    outcome: GridCell::Diamond,
                });
                self.finish_round();
                true
            }
            RevealOutcome::Lost { index } => {
                self.presenter.emit(GameEvent::CellRevealed {
                    index,
                    outcome: GridCell::Bomb,
                });
                self.finish_round();
                true
            }
        }
    }

    /// Settle a round that just reached a terminal phase: pay out, record,
    /// show the full grid and save.
    fn finish_round(&mut self) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let Some(settlement) = round.settlement else {
            return;
        };
        let config = round.config;

        if settlement.payout > 0 {
            let credits = self.ledger.credit(settlement.payout);
            self.presenter.emit(GameEvent::CreditsChanged { credits });
        }

        self.ledger.record_game(GameRecord {
            round_id: round.id,
            timestamp: chrono::Utc::now().timestamp(),
            bet: config.bet,
            result: settlement.result,
            profit: settlement.profit,
            grid_size: config.total_cells(),
            bomb_count: config.bomb_count,
        });

        for index in round.hidden_indices() {
            if let Some(outcome) = round.grid.get(index) {
                self.presenter
                    .emit(GameEvent::CellRevealed { index, outcome });
            }
        }

        info!(
            "Round {} ended: {} (payout {}, profit {})",
            round.id, settlement.result, settlement.payout, settlement.profit
        );

        self.presenter.emit(GameEvent::RoundEnded {
            result: settlement.result,
            won: settlement.result.counts_as_win(),
            profit: settlement.profit,
        });

        let (text, severity) = match settlement.result {
            RoundResult::Win => (
                format!("YOU WIN! +{} credits", settlement.profit),
                Severity::Success,
            ),
            RoundResult::Loss => (
                format!("GAME OVER! -{} credits", config.bet),
                Severity::Error,
            ),
            RoundResult::CashOut if settlement.profit > 0 => (
                format!("Cashed out! +{} credits", settlement.profit),
                Severity::Success,
            ),
            RoundResult::CashOut => (
                format!("Cashed out for {} credits", settlement.payout),
                Severity::Info,
            ),
        };
        self.presenter.emit(GameEvent::message(text, severity));

        self.persist();
    }

    /// Save the ledger. Failures are reported but never undo the action.
    fn persist(&mut self) -> bool {
        match self.store.save(&self.ledger) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save progress: {}", e);
                self.presenter.emit(GameEvent::message(
                    format!("Failed to save progress: {}", e),
                    Severity::Error,
                ));
                false
            }
        }
    }

    /// Report a refused action to the player and hand the error back.
    fn reject<T>(&mut self, error: GameError) -> Result<T, GameError> {
        debug!("Rejected: {}", error);
        self.presenter
            .emit(GameEvent::message(error.to_string(), Severity::Error));
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Difficulty, GridSize};
    use crate::gateway::{EventLog, MemoryStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type TestSession = GameSession<MemoryStore, EventLog, StdRng>;

    fn session() -> TestSession {
        GameSession::new(MemoryStore::new(), EventLog::new(), StdRng::seed_from_u64(42))
    }

    fn first_cell(session: &TestSession, kind: GridCell) -> usize {
        let round = session.round().unwrap();
        round
            .grid
            .cells()
            .iter()
            .position(|cell| *cell == kind)
            .unwrap()
    }

    #[test]
    fn test_new_session_starts_idle_with_defaults() {
        let session = session();
        assert_eq!(session.phase(), RoundPhase::Idle);
        assert_eq!(session.credits(), 1000);
        assert_eq!(session.potential_win(), 0);
    }

    #[test]
    fn test_start_round_debits_and_saves() {
        let mut session = session();
        session
            .start_round(RoundConfig::from_difficulty(Difficulty::Easy, 100))
            .unwrap();

        assert_eq!(session.phase(), RoundPhase::Active);
        assert_eq!(session.credits(), 900);
        assert_eq!(session.store().saves, 1);
        assert_eq!(session.store().snapshot.as_ref().map(|l| l.credits), Some(900));
    }

    #[test]
    fn test_invalid_bet_leaves_ledger_untouched() {
        let mut store = MemoryStore::with_snapshot(PlayerLedger {
            credits: 30,
            ..Default::default()
        });
        let mut session = GameSession::new(&mut store, EventLog::new(), StdRng::seed_from_u64(1));

        let err = session
            .start_round(RoundConfig::new(GridSize::Four, 2, 50))
            .unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidBet {
                bet: 50,
                credits: 30
            }
        );
        assert_eq!(session.credits(), 30);
        assert_eq!(session.phase(), RoundPhase::Idle);
        assert_eq!(
            session.presenter().messages(),
            vec!["Invalid bet of 50: must be between 1 and 30 credits"]
        );
        drop(session);
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn test_cannot_start_while_active() {
        let mut session = session();
        let config = RoundConfig::from_difficulty(Difficulty::Medium, 10);
        session.start_round(config).unwrap();
        assert_eq!(session.start_round(config), Err(GameError::RoundInProgress));
        assert_eq!(session.credits(), 990);
    }

    #[test]
    fn test_bomb_ends_round_as_loss() {
        let mut session = session();
        session
            .start_round(RoundConfig::from_difficulty(Difficulty::Easy, 100))
            .unwrap();
        let bomb = first_cell(&session, GridCell::Bomb);

        let outcome = session.reveal_cell(bomb).unwrap();
        assert_eq!(outcome, RevealOutcome::Lost { index: bomb });
        assert_eq!(session.phase(), RoundPhase::Lost);
        assert_eq!(session.credits(), 900);

        let stats = &session.ledger().stats;
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.total_winnings, -100);
        assert_eq!(session.ledger().history[0].result, RoundResult::Loss);
        assert_eq!(session.ledger().history[0].profit, -100);

        // Full grid revealed: 1 clicked + 15 remaining cells
        let revealed = session
            .presenter()
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::CellRevealed { .. }))
            .count();
        assert_eq!(revealed, 16);
    }

    #[test]
    fn test_cash_out_pays_potential_win() {
        let mut session = session();
        session
            .start_round(RoundConfig::from_difficulty(Difficulty::Easy, 100))
            .unwrap();
        let diamond = first_cell(&session, GridCell::Diamond);
        session.reveal_cell(diamond).unwrap();
        assert_eq!(session.potential_win(), 204);

        let settlement = session.cash_out().unwrap();
        assert_eq!(settlement.payout, 204);
        assert_eq!(settlement.profit, 104);
        assert_eq!(session.credits(), 1104);
        assert_eq!(session.phase(), RoundPhase::CashedOut);
        assert_eq!(session.ledger().stats.wins, 1);
        assert_eq!(session.ledger().leaderboard[0].multiplier, 1.04);
    }

    #[test]
    fn test_cash_out_without_round() {
        let mut session = session();
        assert_eq!(session.cash_out(), Err(GameError::NoActiveRound));
        assert_eq!(
            session.use_power_up(PowerUpKind::Scanner),
            Err(GameError::NoActiveRound)
        );
    }

    #[test]
    fn test_reveal_when_idle_is_ignored() {
        let mut session = session();
        assert_eq!(session.reveal_cell(0), Ok(RevealOutcome::Ignored));
        assert!(session.presenter().events.is_empty());
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let store = MemoryStore {
            fail_saves: true,
            ..Default::default()
        };
        let mut session = GameSession::new(store, EventLog::new(), StdRng::seed_from_u64(9));
        session
            .start_round(RoundConfig::from_difficulty(Difficulty::Easy, 10))
            .unwrap();

        assert!(session.is_round_active());
        assert_eq!(session.credits(), 990);
        assert!(session
            .presenter()
            .messages()
            .contains(&"Failed to save progress: save disabled"));
    }

    #[test]
    fn test_reset_progress() {
        let mut session = session();
        session
            .start_round(RoundConfig::from_difficulty(Difficulty::Easy, 500))
            .unwrap();
        assert_eq!(session.reset_progress(), Err(GameError::RoundInProgress));

        let bomb = first_cell(&session, GridCell::Bomb);
        session.reveal_cell(bomb).unwrap();
        session.reset_progress().unwrap();

        assert_eq!(session.ledger(), &PlayerLedger::default());
        assert_eq!(session.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_preview_multiplier() {
        let config = RoundConfig::from_difficulty(Difficulty::Medium, 1);
        assert_eq!(TestSession::preview_multiplier(&config), 6.3);
    }
}
