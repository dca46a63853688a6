//! Scoring rules
//!
//! Pure functions mapping a question outcome to a score delta. The running
//! score is kept non-negative by `clamp_score`; the deltas themselves may be
//! negative.

use crate::consts::*;

/// Delta for a correct pick
///
/// Timed questions add a bonus of ten points per second left on the clock.
/// Untimed questions (or an unknown remaining time) earn the flat base.
pub fn on_correct(time_remaining: Option<u32>) -> i64 {
    let bonus = time_remaining
        .map(|secs| (secs as f64 * TIME_BONUS_PER_SECOND).floor() as i64)
        .unwrap_or(0);
    CORRECT_BASE_POINTS + bonus
}

/// Delta for a wrong (retryable) pick
pub fn on_wrong() -> i64 {
    WRONG_PENALTY
}

/// Delta for a question lost to the clock
pub fn on_timeout() -> i64 {
    TIMEOUT_PENALTY
}

/// Apply `delta`, flooring the result at zero
pub fn clamp_score(current: u64, delta: i64) -> u64 {
    (current as i64).saturating_add(delta).max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_correct_untimed() {
        assert_eq!(on_correct(None), 100);
    }

    #[test]
    fn test_correct_with_time_bonus() {
        assert_eq!(on_correct(Some(20)), 300);
        assert_eq!(on_correct(Some(0)), 100);
    }

    #[test]
    fn test_penalties() {
        assert_eq!(on_wrong(), -25);
        assert_eq!(on_timeout(), -50);
    }

    #[test]
    fn test_clamp_floors_at_zero() {
        assert_eq!(clamp_score(10, on_wrong()), 0);
        assert_eq!(clamp_score(30, on_wrong()), 5);
        assert_eq!(clamp_score(0, on_timeout()), 0);
        assert_eq!(clamp_score(40, on_correct(Some(3))), 170);
    }

    proptest! {
        #[test]
        fn prop_penalties_never_go_negative(
            start in 0u64..500,
            wrongs in proptest::collection::vec(any::<bool>(), 0..50),
        ) {
            let mut score = start;
            for is_timeout in wrongs {
                let delta = if is_timeout { on_timeout() } else { on_wrong() };
                let next = clamp_score(score, delta);
                prop_assert!(next <= score);
                score = next;
            }
        }
    }
}
