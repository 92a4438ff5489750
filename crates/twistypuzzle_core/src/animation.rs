//! Interpolation of a single animated angle.

use std::f64::consts::PI;
use std::time::Duration;

use twistymath::Float;

/// Function that maps a float from the range 0.0 to 1.0 to another float
/// from 0.0 to 1.0.
pub type InterpolateFn = fn(Float) -> Float;

/// Interpolate using cosine from 0.0 to PI.
pub const COSINE: InterpolateFn = |x| (1.0 - (x * PI).cos()) / 2.0;
/// Decelerate using a cubic curve.
pub const CUBIC_OUT: InterpolateFn = |x| 1.0 - (1.0 - x).powi(3);

/// Angle moving from one value to another over a fixed duration.
#[derive(Debug, Copy, Clone)]
pub struct Tween {
    from: Float,
    to: Float,
    elapsed: Duration,
    duration: Duration,
    interpolate: InterpolateFn,
}

impl Tween {
    /// Constructs a new tween that eases with [`CUBIC_OUT`].
    pub fn new(from: Float, to: Float, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
            interpolate: CUBIC_OUT,
        }
    }

    /// Steps the tween forward. Returns whether it has finished.
    pub fn proceed(&mut self, delta: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(delta).min(self.duration);
        self.is_done()
    }

    /// Returns the progress from 0.0 to 1.0, before interpolation.
    pub fn progress(&self) -> Float {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        }
    }

    /// Returns whether the tween has reached its final value.
    pub fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Returns the current value.
    pub fn value(&self) -> Float {
        let t = (self.interpolate)(self.progress());
        self.from + (self.to - self.from) * t
    }

    /// Returns the final value.
    pub fn target(&self) -> Float {
        self.to
    }
}
