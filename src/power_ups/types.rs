//! Power-up data structures.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::STARTING_POWER_UPS;
use crate::round::RevealOutcome;

/// The three consumable power-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Arms a scan: the next clicked cell reports its neighbouring bombs instead of opening.
    Scanner,
    /// Doubles the multiplier until another power-up replaces it.
    DoubleMultiplier,
    /// Opens one random hidden diamond.
    SafeReveal,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Scanner,
        PowerUpKind::DoubleMultiplier,
        PowerUpKind::SafeReveal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Scanner => "Scanner",
            Self::DoubleMultiplier => "2x Multiplier",
            Self::SafeReveal => "Safe Reveal",
        }
    }

    /// Parse the short names accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "scanner" | "scan" => Some(Self::Scanner),
            "2x" | "double" | "multiplier" => Some(Self::DoubleMultiplier),
            "safe" | "safe_reveal" | "safezone" => Some(Self::SafeReveal),
            _ => None,
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Count of each power-up the player owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpInventory {
    pub scanner: u32,
    pub double_multiplier: u32,
    pub safe_reveal: u32,
}

impl Default for PowerUpInventory {
    fn default() -> Self {
        Self {
            scanner: STARTING_POWER_UPS,
            double_multiplier: STARTING_POWER_UPS,
            safe_reveal: STARTING_POWER_UPS,
        }
    }
}

impl PowerUpInventory {
    pub fn empty() -> Self {
        Self {
            scanner: 0,
            double_multiplier: 0,
            safe_reveal: 0,
        }
    }

    pub fn count(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Scanner => self.scanner,
            PowerUpKind::DoubleMultiplier => self.double_multiplier,
            PowerUpKind::SafeReveal => self.safe_reveal,
        }
    }

    fn slot_mut(&mut self, kind: PowerUpKind) -> &mut u32 {
        match kind {
            PowerUpKind::Scanner => &mut self.scanner,
            PowerUpKind::DoubleMultiplier => &mut self.double_multiplier,
            PowerUpKind::SafeReveal => &mut self.safe_reveal,
        }
    }

    /// Add one unit. Returns the new count.
    pub fn grant(&mut self, kind: PowerUpKind) -> u32 {
        let slot = self.slot_mut(kind);
        *slot += 1;
        *slot
    }

    /// Remove one unit if any remain. Returns the new count, or `None` if empty.
    pub fn consume(&mut self, kind: PowerUpKind) -> Option<u32> {
        let slot = self.slot_mut(kind);
        if *slot == 0 {
            return None;
        }
        *slot -= 1;
        Some(*slot)
    }
}

/// What an activated power-up did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpEffect {
    /// The next reveal will scan instead.
    ScannerArmed,
    /// The multiplier is now doubled; carries the new potential win.
    MultiplierDoubled { potential_win: u64 },
    /// A diamond was opened on the player's behalf.
    SafeRevealed(RevealOutcome),
    /// No hidden diamond was left; nothing was consumed.
    NothingToReveal,
}
