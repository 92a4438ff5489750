use std::time::Duration;

use serde::{Deserialize, Serialize};
use twistymath::prelude::*;

use crate::{DragResolution, Pick, ScreenAxis};

/// Tuning for pointer interaction and move animation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InteractionParams {
    /// Distance in pixels along either screen axis before a press becomes a
    /// drag.
    pub drag_threshold: Float,
    /// Radians per pixel of drag.
    pub drag_sensitivity: Float,
    /// Fraction of a turn past the last whole turn needed to advance to the
    /// next one on release.
    pub release_hysteresis: Float,

    /// Milliseconds to animate a queued move.
    pub twist_duration_ms: u64,
    /// Milliseconds to ease a released drag to its final angle.
    pub snap_duration_ms: u64,
    /// Milliseconds to animate each scramble move.
    pub scramble_duration_ms: u64,
    /// Milliseconds to animate each move of a reverse solve.
    pub reverse_duration_ms: u64,
    /// Maximum total milliseconds for a reverse solve before moves are sped
    /// up.
    pub reverse_budget_ms: u64,

    /// How drags on the background rotate the puzzle.
    pub rotation_mode: RotationMode,
}
impl Default for InteractionParams {
    fn default() -> Self {
        Self {
            drag_threshold: 10.0,
            drag_sensitivity: 0.01,
            release_hysteresis: 0.2,

            twist_duration_ms: 140,
            snap_duration_ms: 200,
            scramble_duration_ms: 50,
            reverse_duration_ms: 50,
            reverse_budget_ms: 5000,

            rotation_mode: RotationMode::Locked,
        }
    }
}
impl InteractionParams {
    /// Returns the duration of a queued move.
    pub fn twist_duration(&self) -> Duration {
        Duration::from_millis(self.twist_duration_ms)
    }
    /// Returns the duration of the ease after a drag is released.
    pub fn snap_duration(&self) -> Duration {
        Duration::from_millis(self.snap_duration_ms)
    }
    /// Returns the duration of each scramble move.
    pub fn scramble_duration(&self) -> Duration {
        Duration::from_millis(self.scramble_duration_ms)
    }
    /// Returns the duration of each reverse-solve move.
    pub fn reverse_duration(&self) -> Duration {
        Duration::from_millis(self.reverse_duration_ms)
    }
    /// Returns the maximum total duration of a reverse solve.
    pub fn reverse_budget(&self) -> Duration {
        Duration::from_millis(self.reverse_budget_ms)
    }
}

/// How drags on the background rotate the puzzle.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Rotate the whole puzzle by whole turns around its own axes, if the
    /// puzzle supports it.
    #[default]
    Locked,
    /// Rotate the view freely without changing the puzzle.
    Free,
}

/// Pointer interaction from press to release.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Pointer position at the press, in pixels.
    pub start: Vec2,
    /// Latest pointer position, in pixels.
    pub last: Vec2,
    /// Piece under the pointer at the press.
    pub pick: Option<Pick>,
    /// What the drag is doing.
    pub mode: DragMode,
}
impl DragSession {
    /// Starts a new session at a pointer position.
    pub fn new(start: Vec2, pick: Option<Pick>) -> Self {
        Self {
            start,
            last: start,
            pick,
            mode: DragMode::Pending,
        }
    }

    /// Returns the total pointer movement since the press.
    pub fn delta(&self) -> Vec2 {
        self.last - self.start
    }

    /// Returns whether the pointer has moved far enough to count as a drag.
    pub fn exceeds_threshold(&self, threshold: Float) -> bool {
        let d = self.delta();
        d.x.abs() >= threshold || d.y.abs() >= threshold
    }
}

/// What a drag session is doing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DragMode {
    /// The pointer has not yet moved far enough.
    Pending,
    /// Twisting a slice.
    Twist(DragResolution),
    /// Rotating the whole puzzle around one of its axes.
    Locked {
        /// Screen axis that controls the angle.
        screen_axis: ScreenAxis,
        /// Sign applied to the angle.
        angle_sign: Float,
    },
    /// Rotating the view.
    Free,
    /// The drag was refused.
    Ignored,
}

/// Returns the camera-space direction and angle scale for a locked
/// background drag.
///
/// `axes` are the directions for horizontal drags, vertical drags on the
/// left, and vertical drags on the right.
pub fn locked_rotation_direction(
    axes: [Vec3; 3],
    start: Vec2,
    delta: Vec2,
    viewport_width: Float,
) -> (Vec3, ScreenAxis, Float) {
    let [horizontal, left, right] = axes;
    match ScreenAxis::dominant(delta) {
        ScreenAxis::X => (horizontal, ScreenAxis::X, 1.0),
        ScreenAxis::Y if start.x > viewport_width / 2.0 => (right, ScreenAxis::Y, -1.0),
        ScreenAxis::Y => (left, ScreenAxis::Y, 1.0),
    }
}

/// Returns the rotation for an incremental free drag of `delta` pixels, in
/// camera space.
///
/// The rotation axis is perpendicular to the drag so that the front of the
/// puzzle follows the pointer.
pub fn free_rotation(delta: Vec2, sensitivity: Float) -> Option<(Vec3, Float)> {
    let axis = Vec3::new(delta.y, delta.x, 0.0);
    let len = axis.magnitude();
    (len > EPSILON).then(|| (axis / len, len * sensitivity))
}
