//! Planes in 3D Euclidean space.

use std::fmt;

use cgmath::InnerSpace;

use crate::{Float, Vec3, is_approx_nonzero};

/// Oriented plane in 3D space, which is also used to represent the half-space
/// `normal · x ≤ distance`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    /// Normalized normal vector.
    normal: Vec3,
    /// Distance from the plane to the origin, along the normal vector.
    distance: Float,
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Vec3 { x, y, z } = self.normal;
        write!(f, "{x:.4}x + {y:.4}y + {z:.4}z <= {:.4}", self.distance)
    }
}

impl approx::AbsDiffEq for Plane {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        crate::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.normal.abs_diff_eq(&other.normal, epsilon)
            && (self.distance - other.distance).abs() <= epsilon
    }
}

impl Plane {
    /// Constructs a new plane from a normal vector and a distance along the
    /// normalized normal. Returns `None` if `normal` is approximately zero.
    pub fn new(normal: Vec3, distance: Float) -> Option<Self> {
        let mag = normal.magnitude();
        is_approx_nonzero(mag).then(|| Self {
            normal: normal / mag,
            distance,
        })
    }
    /// Constructs a new plane from a normal vector that is already normalized.
    pub fn from_unit_normal(normal: Vec3, distance: Float) -> Self {
        Self { normal, distance }
    }
    /// Constructs the half-space `normal · x ≤ bound`, where `normal` need not
    /// be normalized. Returns `None` if `normal` is approximately zero.
    pub fn from_inequality(normal: Vec3, bound: Float) -> Option<Self> {
        let mag = normal.magnitude();
        is_approx_nonzero(mag).then(|| Self {
            normal: normal / mag,
            distance: bound / mag,
        })
    }
    /// Returns the (normalized) normal vector of the plane.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }
    /// Returns the distance from the plane to the origin, along the normal
    /// vector.
    pub fn distance(&self) -> Float {
        self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_plane_from_inequality() {
        let p = Plane::from_inequality(Vec3::new(0.0, 2.0, 0.0), 3.0).expect("nonzero normal");
        assert_approx_eq!(p.normal(), Vec3::unit_y());
        assert_approx_eq!(p.distance(), 1.5);
        assert!(Plane::from_inequality(Vec3::new(0.0, 0.0, 0.0), 1.0).is_none());
    }
}
