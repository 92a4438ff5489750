//! Centroid and volume.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use cgmath::Zero;

use crate::{Float, Vec3, is_approx_positive};

/// Centroid and volume of a polyhedron or part of one. In simpler terms: the
/// "center of mass" and "mass".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    /// Center of mass, scaled by `weight`.
    weighted_center: Vec3,
    /// Volume.
    weight: Float,
}

impl Default for Centroid {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Add for Centroid {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for Centroid {
    fn add_assign(&mut self, rhs: Centroid) {
        self.weighted_center += rhs.weighted_center;
        self.weight += rhs.weight;
    }
}

impl Sum<Centroid> for Centroid {
    fn sum<I: Iterator<Item = Centroid>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + b)
    }
}

impl Centroid {
    /// Zero centroid.
    pub const ZERO: Self = Centroid {
        weighted_center: Vec3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
        weight: 0.0,
    };

    /// Constructs a new weighted centroid.
    pub fn new(center: Vec3, weight: Float) -> Self {
        Centroid {
            weighted_center: center * weight,
            weight,
        }
    }
    /// Constructs the centroid of a tetrahedron, weighted by its unsigned
    /// volume.
    pub fn tetrahedron([a, b, c, d]: [Vec3; 4]) -> Self {
        use cgmath::InnerSpace;

        let volume = (b - a).dot((c - a).cross(d - a)).abs() / 6.0;
        Self::new((a + b + c + d) / 4.0, volume)
    }

    /// Returns the centroid point, or the origin if the weight is zero.
    pub fn center(&self) -> Vec3 {
        if is_approx_positive(self.weight) {
            self.weighted_center / self.weight
        } else {
            Vec3::zero()
        }
    }
    /// Returns the weight.
    pub fn weight(&self) -> Float {
        self.weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_tetrahedron_centroid() {
        let c = Centroid::tetrahedron([
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
        ]);
        assert_approx_eq!(c.weight(), 64.0 / 6.0);
        assert_approx_eq!(c.center(), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_sum_of_halves() {
        let a = Centroid::new(Vec3::new(-1.0, 0.0, 0.0), 1.0);
        let b = Centroid::new(Vec3::new(3.0, 0.0, 0.0), 3.0);
        let total: Centroid = [a, b].into_iter().sum();
        assert_approx_eq!(total.center(), Vec3::new(2.0, 0.0, 0.0));
        assert_approx_eq!(Centroid::ZERO.center(), Vec3::zero());
    }
}
