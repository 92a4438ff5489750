//! Face normals, rotation order, and the finite rotation group of a puzzle.

use twistymath::prelude::*;

/// Largest rotation group of a polyhedron in 3D (the icosahedral group has
/// order 60; leave headroom for mistakes to show up as errors).
const MAX_GROUP_ORDER: usize = 120;

/// Symmetry data shared by every piece of a puzzle.
#[derive(Debug, Clone)]
pub struct SymmetryRegistry {
    face_normals: Vec<Vec3>,
    cycle_length: u32,
    valid_orientations: Vec<Quat>,
}

impl SymmetryRegistry {
    /// Constructs a registry, generating the full rotation group from
    /// `generators`.
    pub fn new(face_normals: Vec<Vec3>, cycle_length: u32, generators: &[Quat]) -> Self {
        Self {
            face_normals,
            cycle_length,
            valid_orientations: generate_group(generators),
        }
    }

    /// Returns the unit normals of the puzzle's faces.
    pub fn face_normals(&self) -> &[Vec3] {
        &self.face_normals
    }
    /// Returns the number of turns in a full rotation of a face.
    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }
    /// Returns every orientation that a piece may have at rest. The first
    /// element is always the identity.
    pub fn valid_orientations(&self) -> &[Quat] {
        &self.valid_orientations
    }

    /// Returns the member of the rotation group nearest to `orientation`.
    ///
    /// The comparison uses the magnitude of the quaternion dot product, so `q`
    /// and `-q` snap to the same rotation.
    pub fn snap(&self, orientation: Quat) -> Quat {
        match nearest_rotation(orientation, &self.valid_orientations) {
            Some((_, &q)) => q,
            None => orientation,
        }
    }

    /// Returns the angle in radians between `orientation` and the nearest
    /// member of the rotation group.
    pub fn angular_error(&self, orientation: Quat) -> Float {
        quat_angle_between(orientation, self.snap(orientation))
    }
}

/// Returns every rotation generated by composing `generators`, starting with
/// the identity.
pub fn generate_group(generators: &[Quat]) -> Vec<Quat> {
    let mut ret = vec![Quat::one()];
    let mut next_unprocessed_index = 0;
    while next_unprocessed_index < ret.len() {
        let unprocessed = ret[next_unprocessed_index];
        for &generator in generators {
            let new = (generator * unprocessed).normalize();
            if !ret.iter().any(|&q| same_rotation(q, new)) {
                ret.push(new);
            }
        }
        if ret.len() > MAX_GROUP_ORDER {
            twistymath::debug_panic!("rotation group is infinite or too large");
            break;
        }
        next_unprocessed_index += 1;
    }
    ret
}

/// Returns generators for the rotation group of a cube or octahedron.
pub fn octahedral_generators() -> Vec<Quat> {
    use std::f64::consts::FRAC_PI_2;
    vec![
        axis_angle(Vec3::unit_x(), FRAC_PI_2),
        axis_angle(Vec3::unit_y(), FRAC_PI_2),
    ]
}

/// Returns generators of the rotation group whose rotations by `2π/order`
/// around each of `axes` are symmetries.
pub fn face_rotation_generators(axes: &[Vec3], order: u32) -> Vec<Quat> {
    let angle = std::f64::consts::TAU / order as Float;
    axes.iter().map(|&a| axis_angle(a, angle)).collect()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use proptest::prelude::*;
    use twistymath::assert_approx_eq;

    use super::*;

    fn tetrahedral() -> Vec<Quat> {
        let c = 1.0 / 3.0_f64.sqrt();
        face_rotation_generators(&[Vec3::new(c, c, c), Vec3::new(c, -c, -c)], 3)
    }

    #[test]
    fn test_group_orders() {
        assert_eq!(generate_group(&[]).len(), 1);
        assert_eq!(generate_group(&tetrahedral()).len(), 12);
        assert_eq!(generate_group(&octahedral_generators()).len(), 24);
    }

    #[test]
    fn test_identity_first() {
        let group = generate_group(&octahedral_generators());
        assert!(same_rotation(group[0], Quat::one()));
    }

    #[test]
    fn test_snap_is_sign_invariant() {
        let registry = SymmetryRegistry::new(vec![], 4, &octahedral_generators());
        let q = axis_angle(Vec3::unit_z(), PI / 2.0 + 0.01);
        let snapped = registry.snap(q);
        let negated = registry.snap(-q);
        assert!(same_rotation(snapped, negated));
        assert!(same_rotation(snapped, axis_angle(Vec3::unit_z(), PI / 2.0)));
    }

    proptest! {
        #[test]
        fn proptest_snap_is_idempotent_and_exact(
            x in -1.0..1.0_f64,
            y in -1.0..1.0_f64,
            z in -1.0..1.0_f64,
            angle in -PI..PI,
        ) {
            let registry = SymmetryRegistry::new(vec![], 3, &tetrahedral());
            let q = axis_angle(Vec3::new(x, y, z), angle);
            let once = registry.snap(q);
            let twice = registry.snap(once);
            prop_assert_eq!(once, twice);
            assert_approx_eq!(registry.angular_error(once), 0.0, 1e-3);
        }
    }
}
