//! Payout balance simulator CLI.
//!
//! Run Monte Carlo simulations of a fixed cash-out strategy.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                         # 1000 runs, Medium, cash out at 3
//!   cargo run --bin simulate -- -d hard -t 5         # Hard grid, cash out at 5 diamonds
//!   cargo run --bin simulate -- --seed 42            # Reproducible run

use diamond_hunt::core::Difficulty;
use diamond_hunt::simulator::{run_simulation, SimConfig};
use log::error;
use std::env;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              DIAMOND HUNT BALANCE SIMULATOR                   ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Rounds/Run:     {}", config.rounds_per_run);
    println!(
        "  Difficulty:     {} ({} cells, {} bombs)",
        config.difficulty.name(),
        config.difficulty.grid_size().total_cells(),
        config.difficulty.bomb_count()
    );
    println!("  Bet:            {}", config.bet);
    println!("  Cash Out At:    {} diamond(s)", config.target_diamonds);
    println!("  Power-ups:      {}", config.use_power_ups);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);

    if config.verbosity > 0 {
        println!("{}", report.to_text());
    }

    if args.iter().any(|a| a == "--json") {
        let json = report.to_json();
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, json) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                error!("Failed to write JSON report {}: {}", filename, e);
                std::process::exit(1);
            }
        }
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-r" | "--rounds" => {
                if i + 1 < args.len() {
                    config.rounds_per_run = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "-d" | "--difficulty" => {
                if i + 1 < args.len() {
                    config.difficulty =
                        Difficulty::from_name(&args[i + 1]).unwrap_or(Difficulty::Medium);
                    i += 1;
                }
            }
            "-b" | "--bet" => {
                if i + 1 < args.len() {
                    config.bet = args[i + 1].parse().unwrap_or(10);
                    i += 1;
                }
            }
            "-t" | "--target" => {
                if i + 1 < args.len() {
                    config.target_diamonds = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--power-ups" => {
                config.use_power_ups = true;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-q" | "--quiet" => {
                config.verbosity = 0;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                config = SimConfig::quick(config.difficulty);
            }
            "--full" => {
                config = SimConfig::full_clear(config.difficulty);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Diamond Hunt Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>        Number of bankrolls to simulate (default: 1000)");
    println!("    -r, --rounds <R>      Rounds per bankroll (default: 100)");
    println!("    -d, --difficulty <D>  easy, medium, hard or extreme (default: medium)");
    println!("    -b, --bet <B>         Bet per round (default: 10)");
    println!("    -t, --target <T>      Diamonds to find before cashing out (default: 3)");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    --power-ups           Spend 2x Multiplier and Safe Reveal when in stock");
    println!("    -v, --verbose         Print every run");
    println!("    -q, --quiet           Skip the text report");
    println!("    --json                Save JSON report");
    println!("    --quick               Quick test (100 runs of 50 rounds)");
    println!("    --full                Never cash out early");
    println!("    -h, --help            Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                       # Default run");
    println!("    cargo run --bin simulate -- -d easy -t 1       # Easy grid, one diamond");
    println!("    cargo run --bin simulate -- --seed 42          # Reproducible");
    println!("    cargo run --bin simulate -- -d hard --full     # Always play to the end");
}
