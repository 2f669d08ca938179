//! Boundaries between the game session and the outside world.
//!
//! The session asks a `PersistenceGateway` to load and save the ledger and
//! tells a `PresentationGateway` what happened. Neither feeds back into game state.

use serde::{Deserialize, Serialize};
use std::io;
use uuid::Uuid;

use crate::board::GridCell;
use crate::core::RoundConfig;
use crate::ledger::{PlayerLedger, RoundResult};
use crate::power_ups::PowerUpKind;

/// Load/save of the ledger snapshot.
pub trait PersistenceGateway {
    /// `Ok(None)` when no snapshot has been saved yet.
    fn load(&mut self) -> io::Result<Option<PlayerLedger>>;
    fn save(&mut self, ledger: &PlayerLedger) -> io::Result<()>;
}

/// Receiver of game events (renderer, sound, logs...).
pub trait PresentationGateway {
    fn emit(&mut self, event: GameEvent);
}

/// How a message should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Everything the session reports to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    RoundStarted {
        round_id: Uuid,
        config: RoundConfig,
        multiplier: f64,
    },
    CellRevealed {
        index: usize,
        outcome: GridCell,
    },
    ScanCompleted {
        index: usize,
        adjacent_bombs: u32,
    },
    PotentialWinChanged {
        amount: u64,
    },
    RoundEnded {
        result: RoundResult,
        won: bool,
        profit: i64,
    },
    Message {
        text: String,
        severity: Severity,
    },
    PowerUpInventoryChanged {
        kind: PowerUpKind,
        count: u32,
    },
    CreditsChanged {
        credits: u64,
    },
}

impl GameEvent {
    pub fn message(text: impl Into<String>, severity: Severity) -> Self {
        Self::Message {
            text: text.into(),
            severity,
        }
    }
}

/// Keeps snapshots in memory. Used by tests and the simulator.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub snapshot: Option<PlayerLedger>,
    pub saves: u32,
    /// When set, every save fails with an I/O error.
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(ledger: PlayerLedger) -> Self {
        Self {
            snapshot: Some(ledger),
            ..Default::default()
        }
    }
}

impl PersistenceGateway for MemoryStore {
    fn load(&mut self) -> io::Result<Option<PlayerLedger>> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, ledger: &PlayerLedger) -> io::Result<()> {
        if self.fail_saves {
            return Err(io::Error::new(io::ErrorKind::Other, "save disabled"));
        }
        self.snapshot = Some(ledger.clone());
        self.saves += 1;
        Ok(())
    }
}

impl<T: PersistenceGateway + ?Sized> PersistenceGateway for &mut T {
    fn load(&mut self) -> io::Result<Option<PlayerLedger>> {
        (**self).load()
    }

    fn save(&mut self, ledger: &PlayerLedger) -> io::Result<()> {
        (**self).save(ledger)
    }
}

/// Records every event in order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of every `Message` event.
    pub fn messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Message { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl PresentationGateway for EventLog {
    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

impl<T: PresentationGateway + ?Sized> PresentationGateway for &mut T {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event)
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl PresentationGateway for NullPresenter {
    fn emit(&mut self, _event: GameEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);

        let mut ledger = PlayerLedger::default();
        ledger.credits = 42;
        store.save(&ledger).unwrap();

        assert_eq!(store.saves, 1);
        assert_eq!(store.load().unwrap().map(|l| l.credits), Some(42));
    }

    #[test]
    fn test_memory_store_can_fail() {
        let mut store = MemoryStore {
            fail_saves: true,
            ..Default::default()
        };
        assert!(store.save(&PlayerLedger::default()).is_err());
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn test_event_log_messages() {
        let mut log = EventLog::new();
        log.emit(GameEvent::CreditsChanged { credits: 5 });
        log.emit(GameEvent::message("hello", Severity::Info));
        assert_eq!(log.events.len(), 2);
        assert_eq!(log.messages(), vec!["hello"]);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_string(&GameEvent::CellRevealed {
            index: 3,
            outcome: GridCell::Bomb,
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"cell_revealed","index":3,"outcome":"bomb"}"#);
    }
}
