//! Simulation configuration.

use crate::core::Difficulty;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of independent bankrolls to simulate
    pub num_runs: u32,

    /// Rounds each bankroll plays (fewer if it goes broke)
    pub rounds_per_run: u32,

    /// Grid and bomb preset for every round
    pub difficulty: Difficulty,

    /// Bet per round (capped at the remaining credits)
    pub bet: u64,

    /// Diamonds to find before cashing out (at least 1)
    pub target_diamonds: u32,

    /// Spend 2x Multiplier and Safe Reveal at the start of each round while stock lasts
    pub use_power_ups: bool,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            rounds_per_run: 100,
            difficulty: Difficulty::Medium,
            bet: 10,
            target_diamonds: 3,
            use_power_ups: false,
            seed: None,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for checking one preset
    pub fn quick(difficulty: Difficulty) -> Self {
        Self {
            num_runs: 100,
            rounds_per_run: 50,
            difficulty,
            ..Default::default()
        }
    }

    /// Play every round to the end (never cash out early)
    pub fn full_clear(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            target_diamonds: difficulty.grid_size().total_cells() as u32,
            ..Default::default()
        }
    }
}
