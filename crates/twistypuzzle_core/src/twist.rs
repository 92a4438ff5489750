use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use twistymath::Float;

/// Selection of pieces along an axis.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum Slice {
    /// Family-specific scalar: a cut threshold or a layer position.
    Threshold(Float),
    /// Every piece, which reorients the whole puzzle without changing its
    /// state.
    WholePuzzle,
}
impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slice::Threshold(t) => write!(f, "{t}"),
            Slice::WholePuzzle => write!(f, "whole puzzle"),
        }
    }
}

/// Discrete rotation of a slice.
///
/// Positive `turns` rotate counterclockwise around the axis vector.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Move {
    /// Axis index.
    pub axis: usize,
    /// Pieces to rotate.
    pub slice: Slice,
    /// Number of turns, each `2π / cycle_length`.
    pub turns: i32,
}
impl Move {
    /// Returns the same move in the opposite direction.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self {
            turns: -self.turns,
            ..self
        }
    }
}

/// Move request waiting in the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedMove {
    /// Move to perform, possibly still in notation form.
    pub request: MoveRequest,
    /// Length of the animation.
    pub duration: Duration,
    /// Whether to append the move to the history once it completes.
    pub log: bool,
}

/// Move that is known either directly or as a notation token.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveRequest {
    /// Move that is already resolved.
    Move(Move),
    /// Notation token, parsed only when the move starts. Parsing is deferred
    /// because the meaning of a token may depend on earlier moves.
    Notation {
        /// Notation token.
        token: String,
        /// Whether to reverse the direction of the move.
        invert: bool,
    },
}

/// Returns `turns` reduced modulo `cycle_length` into the symmetric range
/// around zero, preferring the positive half turn on even cycles.
///
/// For a cycle length of 4, this maps 3 to -1 and -3 to 1.
pub fn normalize_turns(turns: i32, cycle_length: u32) -> i32 {
    let n = cycle_length.max(1) as i32;
    let m = turns.rem_euclid(n);
    if m > n / 2 { m - n } else { m }
}

/// Returns the angle of a single turn.
pub fn unit_angle(cycle_length: u32) -> Float {
    std::f64::consts::TAU / cycle_length.max(1) as Float
}

/// Returns the number of turns for a released drag.
///
/// The drag snaps back toward zero unless it has gone at least `hysteresis`
/// of a turn past the last whole turn. If `half_turns_only` is set, the result
/// is rounded to an even number instead.
pub fn release_turns(angle: Float, unit: Float, hysteresis: Float, half_turns_only: bool) -> i32 {
    let raw = angle / unit;
    if half_turns_only {
        return ((raw / 2.0).round() * 2.0) as i32;
    }
    if (raw - raw.trunc()).abs() < hysteresis {
        raw.trunc() as i32
    } else {
        raw.round() as i32
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_normalize_turns() {
        assert_eq!(normalize_turns(3, 4), -1);
        assert_eq!(normalize_turns(-3, 4), 1);
        assert_eq!(normalize_turns(-2, 4), 2);
        assert_eq!(normalize_turns(4, 3), 1);
        assert_eq!(normalize_turns(2, 3), -1);
        assert_eq!(normalize_turns(3, 5), -2);
        assert_eq!(normalize_turns(-3, 5), 2);
        assert_eq!(normalize_turns(10, 5), 0);
    }

    #[test]
    fn test_release_turns() {
        let unit = unit_angle(4);
        assert_eq!(release_turns(0.15 * unit, unit, 0.2, false), 0);
        assert_eq!(release_turns(0.6 * unit, unit, 0.2, false), 1);
        assert_eq!(release_turns(1.1 * unit, unit, 0.2, false), 1);
        assert_eq!(release_turns(-1.7 * unit, unit, 0.2, false), -2);
        assert_eq!(release_turns(0.9 * unit, unit, 0.2, true), 0);
        assert_eq!(release_turns(1.2 * unit, unit, 0.2, true), 2);
    }

    proptest! {
        #[test]
        fn proptest_normalized_turns_are_equivalent_and_short(
            turns in -1000..1000_i32,
            cycle_length in 2..=6_u32,
        ) {
            let n = normalize_turns(turns, cycle_length);
            let c = cycle_length as i32;
            prop_assert_eq!((turns - n).rem_euclid(c), 0);
            prop_assert!(2 * n.abs() <= c);
            prop_assert_eq!(normalize_turns(n, cycle_length), n);
        }
    }
}
