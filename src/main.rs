//! Diamond Hunt console front end.
//!
//! A line-oriented prompt over `GameSession`: every command is one player
//! action and every game event is printed as it arrives.

use diamond_hunt::board::GridCell;
use diamond_hunt::core::{Difficulty, GridSize, RoundConfig};
use diamond_hunt::power_ups::PowerUpKind;
use diamond_hunt::round::RoundState;
use diamond_hunt::save_manager::SaveManager;
use diamond_hunt::{GameEvent, GameSession, PresentationGateway, Severity};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};

type ConsoleSession = GameSession<SaveManager, ConsolePresenter, StdRng>;

/// Prints events as text, or as one JSON object per line.
struct ConsolePresenter {
    json: bool,
}

impl PresentationGateway for ConsolePresenter {
    fn emit(&mut self, event: GameEvent) {
        if self.json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Could not encode event: {}", e),
            }
            return;
        }

        match event {
            GameEvent::RoundStarted {
                config, multiplier, ..
            } => println!(
                "New round: {} cells, {} bombs, bet {} at {:.1}x",
                config.total_cells(),
                config.bomb_count,
                config.bet,
                multiplier
            ),
            GameEvent::CellRevealed { .. } => {}
            GameEvent::ScanCompleted { index, .. } => println!("Scanned cell {}", index),
            GameEvent::PotentialWinChanged { amount } => println!("Potential win: {}", amount),
            GameEvent::RoundEnded { .. } => {}
            GameEvent::Message { text, severity } => {
                let tag = match severity {
                    Severity::Info => "  ",
                    Severity::Success => "+ ",
                    Severity::Warning => "! ",
                    Severity::Error => "x ",
                };
                println!("{}{}", tag, text);
            }
            GameEvent::PowerUpInventoryChanged { kind, count } => {
                println!("{}: {} left", kind, count)
            }
            GameEvent::CreditsChanged { credits } => println!("Credits: {}", credits),
        }
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Start(RoundConfig),
    Reveal(usize),
    CashOut,
    Use(PowerUpKind),
    Board,
    Stats,
    History,
    Leaderboard,
    Reset,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, rest)) = words.split_first() else {
        return Err("Type 'help' for commands".to_string());
    };

    match (name.to_ascii_lowercase().as_str(), rest) {
        ("start" | "s", [bet]) => Ok(Command::Start(RoundConfig::from_difficulty(
            Difficulty::Medium,
            parse_number(bet)?,
        ))),
        ("start" | "s", [bet, difficulty]) => {
            let difficulty = Difficulty::from_name(difficulty)
                .ok_or_else(|| format!("Unknown difficulty '{}'", difficulty))?;
            Ok(Command::Start(RoundConfig::from_difficulty(
                difficulty,
                parse_number(bet)?,
            )))
        }
        ("start" | "s", [bet, cells, bombs]) => {
            let grid_size =
                GridSize::from_total_cells(parse_number(cells)?).map_err(|e| e.to_string())?;
            Ok(Command::Start(RoundConfig::new(
                grid_size,
                parse_number(bombs)?,
                parse_number(bet)?,
            )))
        }
        ("reveal" | "r", [index]) => Ok(Command::Reveal(parse_number(index)?)),
        ("cashout" | "c", []) => Ok(Command::CashOut),
        ("use" | "u", [kind]) => PowerUpKind::from_name(kind)
            .map(Command::Use)
            .ok_or_else(|| format!("Unknown power-up '{}'", kind)),
        ("board" | "b", []) => Ok(Command::Board),
        ("stats", []) => Ok(Command::Stats),
        ("history", []) => Ok(Command::History),
        ("leaderboard" | "top", []) => Ok(Command::Leaderboard),
        ("reset", []) => Ok(Command::Reset),
        ("help" | "h" | "?", []) => Ok(Command::Help),
        ("quit" | "q" | "exit", []) => Ok(Command::Quit),
        _ => Err(format!("Can't parse '{}'. Type 'help' for commands", line.trim())),
    }
}

fn parse_number<T: std::str::FromStr>(word: &str) -> Result<T, String> {
    word.parse()
        .map_err(|_| format!("'{}' is not a valid number", word))
}

fn print_help() {
    println!("Commands:");
    println!("  start <bet> [easy|medium|hard|extreme]   Start a round");
    println!("  start <bet> <cells> <bombs>              Custom grid (16, 25 or 36 cells)");
    println!("  reveal <cell>                            Open a cell (0-based index)");
    println!("  cashout                                  Bank the potential win");
    println!("  use <scanner|double|safe>                Use a power-up");
    println!("  board                                    Show the grid");
    println!("  stats | history | leaderboard            Show your records");
    println!("  reset                                    Wipe all progress");
    println!("  quit                                     Leave the game");
}

fn render_board(round: &RoundState) -> String {
    let side = round.grid.side();
    let show_all = round.phase.is_terminal();
    let mut out = String::new();

    for row in 0..side {
        for col in 0..side {
            let index = row * side + col;
            let cell = match round.grid.get(index) {
                Some(GridCell::Bomb) if show_all || round.is_revealed(index) => " ** ".to_string(),
                Some(_) if show_all || round.is_revealed(index) => " <> ".to_string(),
                _ => format!("{:>3} ", index),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "Diamonds {}/{}  Multiplier {:.1}x  Potential win {}",
        round.revealed_diamonds,
        round.safe_cells(),
        round.effective_multiplier(),
        round.potential_win()
    ));
    if let Some(kind) = round.active_power_up {
        out.push_str(&format!("  [{} active]", kind));
    }
    out
}

fn print_stats(session: &ConsoleSession) {
    let ledger = session.ledger();
    let stats = &ledger.stats;
    println!("Credits:        {}", ledger.credits);
    println!("Games played:   {}", stats.games_played);
    println!(
        "Wins / Losses:  {} / {} ({:.1}%)",
        stats.wins,
        stats.losses,
        stats.win_rate()
    );
    println!(
        "Streak:         {} (best {})",
        stats.current_streak, stats.best_streak
    );
    println!("Best win:       {}", stats.best_win);
    println!("Total winnings: {}", stats.total_winnings);
    for kind in PowerUpKind::ALL {
        println!("{:<15} {}", format!("{}:", kind), ledger.power_ups.count(kind));
    }
}

fn print_history(session: &ConsoleSession) {
    let history = &session.ledger().history;
    if history.is_empty() {
        println!("No games played yet");
    }
    for record in history {
        println!(
            "{:<8} bet {:>6}  profit {:>+7}  {} cells / {} bombs",
            record.result.to_string(),
            record.bet,
            record.profit,
            record.grid_size,
            record.bomb_count
        );
    }
}

fn print_leaderboard(session: &ConsoleSession) {
    let leaderboard = &session.ledger().leaderboard;
    if leaderboard.is_empty() {
        println!("No winning rounds yet");
    }
    for (rank, entry) in leaderboard.iter().enumerate() {
        let when = chrono::DateTime::from_timestamp(entry.timestamp, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{:>2}. {:>+7} on {:>6} ({:.2}x)  {}",
            rank + 1,
            entry.profit,
            entry.bet,
            entry.multiplier,
            when
        );
    }
}

/// Run one command. Returns false when the player wants to leave.
fn execute(session: &mut ConsoleSession, command: Command) -> bool {
    // Refused actions are already reported through the presenter
    match command {
        Command::Start(config) => {
            session.start_round(config).ok();
        }
        Command::Reveal(index) => {
            session.reveal_cell(index).ok();
        }
        Command::CashOut => {
            session.cash_out().ok();
        }
        Command::Use(kind) => {
            session.use_power_up(kind).ok();
        }
        Command::Board => match session.round() {
            Some(round) => println!("{}", render_board(round)),
            None => println!("No round yet. Start one with 'start <bet>'"),
        },
        Command::Stats => print_stats(session),
        Command::History => print_history(session),
        Command::Leaderboard => print_leaderboard(session),
        Command::Reset => {
            session.reset_progress().ok();
        }
        Command::Help => print_help(),
        Command::Quit => return false,
    }

    if session.round().is_some_and(|round| round.phase.is_terminal()) && !session.presenter().json
    {
        if let Some(round) = session.round() {
            println!("{}", render_board(round));
        }
    }
    true
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let mut save_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--version" | "-v" => {
                println!("diamond-hunt {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("Diamond Hunt - find the diamonds, dodge the bombs\n");
                println!("Usage: diamond-hunt [--save <path>] [--seed <n>] [--json]\n");
                print_help();
                return Ok(());
            }
            "--save" => {
                save_path = args.get(i + 1).cloned();
                i += 1;
            }
            "--seed" => {
                seed = args.get(i + 1).and_then(|s| s.parse().ok());
                i += 1;
            }
            "--json" => json = true,
            other => warn!("Ignoring unknown argument '{}'", other),
        }
        i += 1;
    }

    let store = match save_path {
        Some(path) => SaveManager::with_path(path)?,
        None => SaveManager::new()?,
    };
    info!("Using save file {}", store.save_path().display());

    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = GameSession::new(store, ConsolePresenter { json }, rng);
    println!(
        "Welcome to Diamond Hunt! You have {} credits. Type 'help' for commands.",
        session.credits()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(command) => {
                if !execute(&mut session, command) {
                    break;
                }
            }
            Err(message) => println!("{}", message),
        }
    }

    println!("Goodbye! Final credits: {}", session.credits());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_variants() {
        assert_eq!(
            parse_command("start 50"),
            Ok(Command::Start(RoundConfig::from_difficulty(
                Difficulty::Medium,
                50
            )))
        );
        assert_eq!(
            parse_command("start 10 HARD"),
            Ok(Command::Start(RoundConfig::from_difficulty(Difficulty::Hard, 10)))
        );
        assert_eq!(
            parse_command("s 10 36 9"),
            Ok(Command::Start(RoundConfig::new(GridSize::Six, 9, 10)))
        );
        assert!(parse_command("start 10 49 2").is_err());
        assert!(parse_command("start ten").is_err());
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(parse_command("reveal 7\n"), Ok(Command::Reveal(7)));
        assert_eq!(parse_command("c"), Ok(Command::CashOut));
        assert_eq!(
            parse_command("use double"),
            Ok(Command::Use(PowerUpKind::DoubleMultiplier))
        );
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert!(parse_command("use laser").is_err());
        assert!(parse_command("").is_err());
    }
}
