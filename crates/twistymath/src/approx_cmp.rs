//! Approximate comparison functions that automatically use [`EPSILON`].

pub use approx::AbsDiffEq;

use crate::{EPSILON, Float, Vec3};

/// Compares two numbers, but considers them equal if they are separated by less
/// than `EPSILON`.
///
/// Handles infinity specially.
pub fn approx_eq<T: AbsDiffEq<Epsilon = Float>>(a: &T, b: &T) -> bool {
    // use native float equality to handle infinities
    a == b || approx::abs_diff_eq!(a, b, epsilon = EPSILON)
}

/// Returns whether `x` has an absolute value greater than `EPSILON`.
pub fn is_approx_nonzero(x: Float) -> bool {
    !approx_eq(&x, &0.0)
}
/// Returns whether `x` is greater than `EPSILON`.
pub fn is_approx_positive(x: Float) -> bool {
    x > 0.0 && !approx_eq(&x, &0.0)
}

/// Returns whether two points are within `tolerance` of each other.
pub fn points_within(a: Vec3, b: Vec3, tolerance: Float) -> bool {
    cgmath::InnerSpace::magnitude2(a - b) <= tolerance * tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_sign() {
        assert!(approx_eq(&1.0, &(1.0 + EPSILON / 2.0)));
        assert!(approx_eq(&Float::INFINITY, &Float::INFINITY));
        assert!(!is_approx_nonzero(EPSILON / 2.0));
        assert!(is_approx_nonzero(-0.1));
        assert!(is_approx_positive(0.1));
        assert!(!is_approx_positive(EPSILON / 2.0));
        assert!(!is_approx_positive(-0.1));
    }

    #[test]
    fn test_points_within() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert!(points_within(a, a + Vec3::new(0.0, 0.05, 0.0), 0.1));
        assert!(!points_within(a, a + Vec3::new(0.0, 0.2, 0.0), 0.1));
    }
}
