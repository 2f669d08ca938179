//! Ledger persistence through the on-disk save file.

use diamond_hunt::board::GridCell;
use diamond_hunt::ledger::{GameRecord, RoundResult};
use diamond_hunt::save_manager::SaveManager;
use diamond_hunt::{
    Difficulty, EventLog, GameSession, PersistenceGateway, PlayerLedger, RoundConfig, Severity,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use uuid::Uuid;

fn temp_save(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("diamond-hunt-it-{}-{}", std::process::id(), name))
        .join("ledger.dat")
}

#[test]
fn test_progress_survives_a_restart() {
    let path = temp_save("restart");
    let store = SaveManager::with_path(&path).unwrap();
    store.delete().unwrap();
    let mut session = GameSession::new(store, EventLog::new(), StdRng::seed_from_u64(5));

    session
        .start_round(RoundConfig::from_difficulty(Difficulty::Easy, 100))
        .unwrap();
    let diamond = session
        .round()
        .unwrap()
        .grid
        .cells()
        .iter()
        .position(|cell| *cell == GridCell::Diamond)
        .unwrap();
    session.reveal_cell(diamond).unwrap();
    session.cash_out().unwrap();
    let credits = session.credits();
    let power_ups = session.ledger().power_ups;
    drop(session);

    let reopened = SaveManager::with_path(&path).unwrap();
    let session = GameSession::new(reopened, EventLog::new(), StdRng::seed_from_u64(6));
    assert_eq!(session.credits(), credits);
    assert_eq!(credits, 1104);
    assert_eq!(session.ledger().power_ups, power_ups);
    assert_eq!(session.ledger().history.len(), 1);
    assert_eq!(session.ledger().history[0].result, RoundResult::CashOut);
    assert_eq!(session.ledger().leaderboard[0].profit, 104);
    assert!(session.presenter().events.is_empty());

    session.store().delete().unwrap();
}

#[test]
fn test_unreadable_save_starts_fresh() {
    let path = temp_save("corrupt");
    let store = SaveManager::with_path(&path).unwrap();
    std::fs::write(&path, b"not a save file").unwrap();

    let session = GameSession::new(store, EventLog::new(), StdRng::seed_from_u64(7));
    assert_eq!(session.ledger(), &PlayerLedger::default());

    let warned = session.presenter().events.iter().any(|event| {
        matches!(
            event,
            diamond_hunt::GameEvent::Message {
                severity: Severity::Warning,
                ..
            }
        )
    });
    assert!(warned);

    session.store().delete().unwrap();
}

#[test]
fn test_oversized_snapshot_is_trimmed_on_load() {
    let path = temp_save("oversized");
    let mut store = SaveManager::with_path(&path).unwrap();

    let mut ledger = PlayerLedger::default();
    for i in 0..15 {
        ledger.history.push(GameRecord {
            round_id: Uuid::new_v4(),
            timestamp: 1_700_000_000 + i,
            bet: 10,
            result: RoundResult::Win,
            profit: i,
            grid_size: 16,
            bomb_count: 2,
        });
    }
    store.save(&ledger).unwrap();

    let session = GameSession::new(store, EventLog::new(), StdRng::seed_from_u64(8));
    assert_eq!(session.ledger().history.len(), 10);
    assert_eq!(session.ledger().history[0].profit, 0);

    session.store().delete().unwrap();
}

#[test]
fn test_profitable_round_updates_best_win_and_leaderboard() {
    let mut ledger = PlayerLedger::default();
    ledger.stats.best_win = 150;

    ledger.record_game(GameRecord {
        round_id: Uuid::new_v4(),
        timestamp: 1_700_000_000,
        bet: 100,
        result: RoundResult::Win,
        profit: 200,
        grid_size: 25,
        bomb_count: 5,
    });

    assert_eq!(ledger.stats.best_win, 200);
    assert_eq!(ledger.leaderboard.len(), 1);
    assert_eq!(ledger.leaderboard[0].multiplier, 2.0);
}
