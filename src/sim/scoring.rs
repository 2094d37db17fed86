//! Level scoring rules
//!
//! Pure arithmetic only: the win threshold per level, accuracy from shot
//! counts, and the winner condition. The UI layer never computes any of
//! this itself - it consumes `LevelState` snapshots.

use serde::{Deserialize, Serialize};

/// Points awarded per star destroyed
pub const POINTS_PER_STAR: u32 = 10;

/// Minimum accuracy percentage required to win any level
pub const MIN_ACCURACY_PCT: u32 = 60;

/// Score required to clear the given level (1-based).
///
/// Level 1 needs 10 points, and each level after that needs 10 more.
#[inline]
pub fn required_score(level: u32) -> u32 {
    debug_assert!(level >= 1);
    10 + level.saturating_sub(1) * 10
}

/// Accuracy percentage from shot counts, rounded to the nearest integer.
///
/// Zero shots fired counts as 100% - the HUD starts every attempt at
/// perfect accuracy before the first shot.
#[inline]
pub fn compute_accuracy(shots_hit: u32, shots_fired: u32) -> u32 {
    if shots_fired == 0 {
        return 100;
    }
    (100 * shots_hit + shots_fired / 2) / shots_fired
}

/// Winner condition: score AND accuracy must both meet their thresholds.
#[inline]
pub fn is_winner(score: u32, accuracy: u32, level: u32) -> bool {
    score >= required_score(level) && accuracy >= MIN_ACCURACY_PCT
}

/// Shot counters for one level attempt
///
/// Invariant: `shots_hit <= shots_fired`. Reset to zero when an attempt
/// starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotStats {
    pub shots_fired: u32,
    pub shots_hit: u32,
}

impl ShotStats {
    /// Count one fired shot
    pub fn record_fired(&mut self) {
        self.shots_fired += 1;
    }

    /// Count one hit. A hit without a preceding shot is a bug upstream.
    pub fn record_hit(&mut self) {
        debug_assert!(self.shots_hit < self.shots_fired);
        self.shots_hit += 1;
    }

    /// Current accuracy percentage
    pub fn accuracy(&self) -> u32 {
        compute_accuracy(self.shots_hit, self.shots_fired)
    }
}

/// Snapshot of the scoring-relevant state handed to the presentation layer
/// after each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub level: u32,
    pub score: u32,
    pub accuracy: u32,
    pub is_playing: bool,
    pub is_paused: bool,
    pub is_winner: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_required_score_first_levels() {
        assert_eq!(required_score(1), 10);
        assert_eq!(required_score(2), 20);
        assert_eq!(required_score(5), 50);
    }

    #[test]
    fn test_accuracy_zero_shots_is_perfect() {
        assert_eq!(compute_accuracy(0, 0), 100);
    }

    #[test]
    fn test_accuracy_rounds_to_nearest() {
        assert_eq!(compute_accuracy(3, 4), 75);
        assert_eq!(compute_accuracy(1, 3), 33);
        assert_eq!(compute_accuracy(2, 3), 67);
        assert_eq!(compute_accuracy(1, 8), 13);
        assert_eq!(compute_accuracy(5, 5), 100);
        assert_eq!(compute_accuracy(0, 7), 0);
    }

    #[test]
    fn test_winner_thresholds() {
        assert!(is_winner(10, 60, 1));
        assert!(!is_winner(9, 100, 1));
        assert!(!is_winner(10, 59, 1));
        // Level 3 needs 30 points
        assert!(!is_winner(29, 100, 3));
        assert!(is_winner(30, 60, 3));
    }

    #[test]
    fn test_shot_stats_accuracy() {
        let mut stats = ShotStats::default();
        assert_eq!(stats.accuracy(), 100);

        stats.record_fired();
        assert_eq!(stats.accuracy(), 0);

        stats.record_hit();
        assert_eq!(stats.accuracy(), 100);

        stats.record_fired();
        stats.record_fired();
        assert_eq!(stats.accuracy(), 33);
    }

    proptest! {
        #[test]
        fn prop_required_score_increases_by_ten(level in 2u32..10_000) {
            prop_assert_eq!(required_score(level), required_score(level - 1) + 10);
        }

        #[test]
        fn prop_accuracy_in_range(fired in 0u32..100_000, hits in 0u32..100_000) {
            let hits = hits.min(fired);
            let acc = compute_accuracy(hits, fired);
            prop_assert!(acc <= 100);
        }

        #[test]
        fn prop_accuracy_is_pure(fired in 0u32..100_000, hits in 0u32..100_000) {
            let hits = hits.min(fired);
            prop_assert_eq!(
                compute_accuracy(hits, fired),
                compute_accuracy(hits, fired)
            );
        }

        #[test]
        fn prop_winner_is_conjunction(
            score in 0u32..10_000,
            accuracy in 0u32..=100,
            level in 1u32..100,
        ) {
            let expected = score >= required_score(level) && accuracy >= MIN_ACCURACY_PCT;
            prop_assert_eq!(is_winner(score, accuracy, level), expected);
        }
    }
}
