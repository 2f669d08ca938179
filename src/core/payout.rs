//! Payout math shared by the round engine and the simulator.
//!
//! These pure functions turn bomb density and round progress into credits.

use super::constants::{BOMB_FACTOR_BASE, DOUBLE_MULTIPLIER_FACTOR, PROGRESS_STEP};

/// Calculate the base payout multiplier for a grid.
///
/// # Arguments
/// * `total_cells` - Number of cells in the grid
/// * `bomb_count` - Number of bombs hidden in it (must be below `total_cells`)
///
/// # Returns
/// `1 / P(safe) * 1.5^(bombs - 1)`, rounded to one decimal place
pub fn calculate_multiplier(total_cells: u32, bomb_count: u32) -> f64 {
    debug_assert!(bomb_count >= 1 && bomb_count < total_cells);

    let safe_cells = total_cells - bomb_count;
    let probability = safe_cells as f64 / total_cells as f64;
    let base = 1.0 / probability;
    let bomb_factor = BOMB_FACTOR_BASE.powi(bomb_count as i32 - 1);

    round_to(base * bomb_factor, 1)
}

/// Multiplier after power-up boosts.
pub fn effective_multiplier(base_multiplier: f64, doubled: bool) -> f64 {
    if doubled {
        base_multiplier * DOUBLE_MULTIPLIER_FACTOR
    } else {
        base_multiplier
    }
}

/// Progress bonus for the diamonds found so far (`1 + diamonds * 0.2`).
pub fn progress_multiplier(revealed_diamonds: u32) -> f64 {
    1.0 + revealed_diamonds as f64 * PROGRESS_STEP
}

/// Credits paid out if the round were cashed out now.
///
/// `floor(bet * multiplier * progress)`.
pub fn potential_win(bet: u64, multiplier: f64, revealed_diamonds: u32) -> u64 {
    (bet as f64 * multiplier * progress_multiplier(revealed_diamonds)).floor() as u64
}

/// Round a value to `decimals` decimal places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_easy_grid() {
        // 14/16 safe -> 1.1429 * 1.5 = 1.714
        assert_eq!(calculate_multiplier(16, 2), 1.7);
    }

    #[test]
    fn test_multiplier_medium_grid() {
        // 20/25 safe -> 1.25 * 5.0625 = 6.328
        assert_eq!(calculate_multiplier(25, 5), 6.3);
    }

    #[test]
    fn test_multiplier_single_bomb_has_no_bomb_factor() {
        // 36/35 = 1.028 -> 1.0
        assert_eq!(calculate_multiplier(36, 1), 1.0);
    }

    #[test]
    fn test_multiplier_strictly_increasing_in_bombs() {
        for total in [16u32, 25, 36] {
            let mut previous = 0.0;
            for bombs in 1..total {
                let m = calculate_multiplier(total, bombs);
                assert!(
                    m > previous,
                    "multiplier({}, {}) = {} should exceed {}",
                    total,
                    bombs,
                    m,
                    previous
                );
                previous = m;
            }
        }
    }

    #[test]
    fn test_multiplier_is_deterministic() {
        assert_eq!(calculate_multiplier(36, 8), calculate_multiplier(36, 8));
    }

    #[test]
    fn test_potential_win_with_double_multiplier() {
        let multiplier = effective_multiplier(1.7, true);
        assert_eq!(potential_win(100, multiplier, 3), 544);
    }

    #[test]
    fn test_potential_win_without_progress() {
        assert_eq!(potential_win(100, 1.7, 0), 170);
    }

    #[test]
    fn test_potential_win_floors() {
        // 7 * 1.7 * 1.2 = 14.28
        assert_eq!(potential_win(7, 1.7, 1), 14);
    }

    #[test]
    fn test_progress_multiplier() {
        assert_eq!(progress_multiplier(0), 1.0);
        assert!((progress_multiplier(5) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_to(1.5, 0), 2.0);
    }
}
