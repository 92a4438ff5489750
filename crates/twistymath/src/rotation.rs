//! Rotation and basis helpers built on [`cgmath`] quaternions.

use cgmath::{InnerSpace, One, Rad, Rotation3};
use float_ord::FloatOrd;

use crate::{Float, Quat, Vec2, Vec3};

/// Returns a rotation by `angle` radians counterclockwise around `axis`, which
/// need not be normalized. Returns the identity if `axis` is zero.
pub fn axis_angle(axis: Vec3, angle: Float) -> Quat {
    if axis.magnitude2() < crate::EPSILON {
        return Quat::one();
    }
    Quat::from_axis_angle(axis.normalize(), Rad(angle))
}

/// Returns the shortest rotation taking `from` to `to`. Neither vector needs
/// to be normalized.
pub fn rotation_between(from: Vec3, to: Vec3) -> Quat {
    Quat::from_arc(from.normalize(), to.normalize(), None)
}

/// Returns the angle in radians of the rotation taking `a` to `b`. This does
/// not depend on the sign of either quaternion.
pub fn quat_angle_between(a: Quat, b: Quat) -> Float {
    let d = a.normalize().dot(b.normalize()).abs().min(1.0);
    2.0 * d.acos()
}

/// Returns the element of `candidates` nearest to `q` by quaternion dot product
/// magnitude, along with its index.
pub fn nearest_rotation<'a>(
    q: Quat,
    candidates: impl IntoIterator<Item = &'a Quat>,
) -> Option<(usize, &'a Quat)> {
    candidates
        .into_iter()
        .enumerate()
        .max_by_key(|(_, c)| FloatOrd(q.dot(**c).abs()))
}

/// Returns whether two quaternions represent the same rotation.
pub fn same_rotation(a: Quat, b: Quat) -> bool {
    quat_angle_between(a, b) < 1e-4
}

/// Returns a pair of orthonormal vectors `(u, v)` spanning the plane
/// perpendicular to `normal`, such that `u × v` points along `normal`.
pub fn tangent_basis(normal: Vec3) -> (Vec3, Vec3) {
    let n = normal.normalize();
    let helper = if n.x.abs() < 0.9 {
        Vec3::unit_x()
    } else {
        Vec3::unit_y()
    };
    let u = helper.cross(n).normalize();
    let v = n.cross(u);
    (u, v)
}

/// Projects a point onto a 2D basis.
pub fn project_2d(p: Vec3, (u, v): (Vec3, Vec3)) -> Vec2 {
    Vec2::new(p.dot(u), p.dot(v))
}

/// Returns the index of the coordinate with the largest magnitude.
pub fn dominant_axis(v: Vec3) -> usize {
    let [x, y, z] = [v.x.abs(), v.y.abs(), v.z.abs()];
    if x >= y && x >= z {
        0
    } else if y >= z {
        1
    } else {
        2
    }
}

/// Returns the sign of `x` as `1.0` or `-1.0`, treating zero as positive.
pub fn sign_of(x: Float) -> Float {
    if x < 0.0 { -1.0 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use cgmath::{Rotation, Zero};
    use proptest::prelude::*;

    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_axis_angle_direction() {
        // Counterclockwise around +Z takes +X to +Y.
        let q = axis_angle(Vec3::unit_z() * 3.0, PI / 2.0);
        assert_approx_eq!(q.rotate_vector(Vec3::unit_x()), Vec3::unit_y());
        let identity = axis_angle(Vec3::zero(), 1.0);
        assert_approx_eq!(identity.rotate_vector(Vec3::unit_x()), Vec3::unit_x());
    }

    #[test]
    fn test_rotation_between() {
        let from = Vec3::new(1.0, 1.0, 0.0);
        let to = Vec3::new(0.0, 0.0, -2.0);
        let q = rotation_between(from, to);
        assert_approx_eq!(q.rotate_vector(from.normalize()), to.normalize());
    }

    #[test]
    fn test_dominant_axis() {
        assert_eq!(dominant_axis(Vec3::new(0.1, -0.9, 0.3)), 1);
        assert_eq!(dominant_axis(Vec3::new(0.5, 0.5, -0.7)), 2);
        assert_eq!(dominant_axis(Vec3::zero()), 0);
        assert_eq!(sign_of(0.0), 1.0);
        assert_eq!(sign_of(-2.0), -1.0);
    }

    proptest! {
        #[test]
        fn proptest_tangent_basis_is_orthonormal(
            x in -1.0..1.0_f64,
            y in -1.0..1.0_f64,
            z in -1.0..1.0_f64,
        ) {
            let n = Vec3::new(x, y, z);
            prop_assume!(n.magnitude() > 0.01);
            let (u, v) = tangent_basis(n);
            assert_approx_eq!(u.magnitude(), 1.0, 1e-9);
            assert_approx_eq!(v.magnitude(), 1.0, 1e-9);
            assert_approx_eq!(u.dot(v), 0.0, 1e-9);
            assert_approx_eq!(u.cross(v), n.normalize(), 1e-9);
        }

        #[test]
        fn proptest_quat_angle_is_sign_invariant(angle in -3.0..3.0_f64) {
            let q = axis_angle(Vec3::new(1.0, 2.0, 3.0), angle);
            assert_approx_eq!(quat_angle_between(q, -q), 0.0, 1e-6);
            assert_approx_eq!(quat_angle_between(Quat::one(), q), angle.abs(), 1e-6);
        }
    }
}
