//! Hangman rule constants.

use std::time::Duration;

/// Lives a player starts each session with.
pub const INITIAL_LIVES: u8 = 5;

/// Letters the letter picker offers.
pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Pause between a solve and the next target.
pub const DEFAULT_INTERMISSION: Duration = Duration::from_millis(1000);

/// Placeholder rendered for an unrevealed letter.
pub const HIDDEN_GLYPH: char = '_';

/// Number of distinct solves needed to win against a pool of `pool_size`.
///
/// Half the pool, rounded up.
#[must_use]
pub const fn win_threshold(pool_size: usize) -> usize {
    pool_size.div_ceil(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_threshold_rounds_up() {
        assert_eq!(win_threshold(0), 0);
        assert_eq!(win_threshold(1), 1);
        assert_eq!(win_threshold(4), 2);
        assert_eq!(win_threshold(5), 3);
        assert_eq!(win_threshold(16), 8);
    }
}
