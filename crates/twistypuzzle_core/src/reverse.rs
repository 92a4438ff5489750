//! Schedule for replaying the history backwards to solve the puzzle.

use std::time::Duration;

/// Returns the notation tokens to undo, in the order they must be undone: the
/// history from newest to oldest, then the scramble from last to first.
pub fn reverse_solve_tokens(history: &[String], scramble: &[String]) -> Vec<String> {
    history.iter().rev().chain(scramble.iter().rev()).cloned().collect()
}

/// Returns the duration of each of `n` moves in a reverse solve.
///
/// Every move takes `per_move` if the total fits in `budget`. Otherwise the
/// budget is shared so that moves near the start and end are slower than moves
/// in the middle, with weight `1 + 3(2x - 1)²` for `x` from 0 to 1.
pub fn reverse_solve_durations(n: usize, per_move: Duration, budget: Duration) -> Vec<Duration> {
    if fits_budget(n, per_move, budget) {
        return vec![per_move; n];
    }
    let weights = (0..n)
        .map(|i| {
            let x = if n > 1 {
                i as f64 / (n - 1) as f64
            } else {
                0.0
            };
            1.0 + 3.0 * (2.0 * x - 1.0).powi(2)
        })
        .collect::<Vec<_>>();
    let total: f64 = weights.iter().sum();
    weights
        .into_iter()
        .map(|w| budget.mul_f64(w / total))
        .collect()
}

/// Returns whether `n` moves of `per_move` each take at most `budget`.
fn fits_budget(n: usize, per_move: Duration, budget: Duration) -> bool {
    u32::try_from(n)
        .ok()
        .and_then(|n| per_move.checked_mul(n))
        .is_some_and(|total| total <= budget)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_reverse_solve_tokens() {
        let history = ["R".to_string(), "U".to_string()];
        let scramble = ["F".to_string(), "D2".to_string()];
        assert_eq!(reverse_solve_tokens(&history, &scramble), ["U", "R", "D2", "F"]);
    }

    #[test]
    fn test_short_reverse_solve_uses_fixed_duration() {
        let d = reverse_solve_durations(10, Duration::from_millis(50), Duration::from_secs(5));
        assert_eq!(d, vec![Duration::from_millis(50); 10]);
    }

    #[test]
    fn test_long_reverse_solve_fits_budget() {
        let budget = Duration::from_secs(5);
        let d = reverse_solve_durations(201, Duration::from_millis(50), budget);
        let total: Duration = d.iter().sum();
        assert!(total.abs_diff(budget) < Duration::from_millis(1));
        // Slow at the ends and fast in the middle.
        assert!(d[0] > d[100] * 3);
        assert_eq!(d[0], d[200]);
    }

    #[test]
    fn test_huge_move_counts_exceed_budget() {
        let per_move = Duration::from_millis(50);
        let budget = Duration::from_secs(5);
        assert!(fits_budget(100, per_move, budget));
        assert!(!fits_budget(101, per_move, budget));
        // These would wrap around or overflow if multiplied directly.
        assert!(!fits_budget(usize::MAX, per_move, budget));
        assert!(!fits_budget(u32::MAX as usize, per_move, budget));
        assert!(!fits_budget(2, Duration::MAX, Duration::MAX));
        assert!(fits_budget(0, Duration::MAX, Duration::ZERO));
    }
}
