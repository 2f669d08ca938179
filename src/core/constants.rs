// Ledger defaults
pub const STARTING_CREDITS: u64 = 1000;
pub const STARTING_POWER_UPS: u32 = 1;
pub const HISTORY_CAP: usize = 10;
pub const LEADERBOARD_CAP: usize = 10;

// Round configuration bounds
pub const MIN_BOMBS: u32 = 2;
pub const MAX_BOMB_RATIO: f64 = 0.4;
pub const MIN_BET: u64 = 1;

// Payout formula: round(1/p * BOMB_FACTOR_BASE^(bombs-1), 1) * (1 + diamonds * PROGRESS_STEP)
pub const BOMB_FACTOR_BASE: f64 = 1.5;
pub const PROGRESS_STEP: f64 = 0.2;
pub const DOUBLE_MULTIPLIER_FACTOR: f64 = 2.0;

// Power-ups
pub const BONUS_POWER_UP_CHANCE: f64 = 0.1;

// Save file
pub const SAVE_VERSION_MAGIC: u64 = 0x4449_414D_4F4E_4431; // "DIAMOND1"
pub const SAVE_FILE_NAME: &str = "ledger.dat";
