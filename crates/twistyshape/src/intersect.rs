use itertools::Itertools;
use twistymath::prelude::*;

use crate::{
    CONTAINMENT_TOLERANCE, Constraint, DETERMINANT_EPSILON, MERGE_DISTANCE, ShapeError,
};

/// Returns the vertices of the convex region satisfying every constraint.
///
/// Every unordered triple of constraint planes is solved for its common
/// point. Points outside any constraint are discarded, and points closer than
/// [`MERGE_DISTANCE`] are merged. Returns an error if fewer than 4 distinct
/// points remain, since such a region has no volume.
pub fn intersect(constraints: &[Constraint]) -> Result<Vec<Vec3>, ShapeError> {
    let mut points: Vec<Vec3> = vec![];
    for (a, b, c) in constraints.iter().tuple_combinations() {
        let Some(p) = three_plane_point(a, b, c) else {
            continue;
        };
        if !constraints
            .iter()
            .all(|constraint| constraint.contains(p, CONTAINMENT_TOLERANCE))
        {
            continue;
        }
        if !points.iter().any(|&q| points_within(p, q, MERGE_DISTANCE)) {
            points.push(p);
        }
    }

    if points.len() < 4 {
        log::trace!(
            "{} constraints meet in only {} points",
            constraints.len(),
            points.len(),
        );
        return Err(ShapeError::TooFewVertices(points.len()));
    }
    Ok(points)
}

/// Returns the common point of three constraint planes, or `None` if their
/// normals are linearly dependent.
fn three_plane_point(a: &Constraint, b: &Constraint, c: &Constraint) -> Option<Vec3> {
    let bc = b.normal.cross(c.normal);
    let det = a.normal.dot(bc);
    if det.abs() < DETERMINANT_EPSILON {
        return None;
    }
    let ca = c.normal.cross(a.normal);
    let ab = a.normal.cross(b.normal);
    Some((bc * a.bound + ca * b.bound + ab * c.bound) / det)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use twistymath::assert_approx_eq;

    use super::*;
    use crate::ConstraintKind;

    fn cube(half: Float, center: Vec3) -> Vec<Constraint> {
        [Vec3::unit_x(), Vec3::unit_y(), Vec3::unit_z()]
            .into_iter()
            .flat_map(|axis| [axis, -axis])
            .filter_map(|n| Constraint::new(n, n.dot(center) + half, ConstraintKind::Surface))
            .collect()
    }

    #[test]
    fn test_three_plane_point() {
        let cs = cube(1.0, Vec3::zero());
        let p = three_plane_point(&cs[0], &cs[2], &cs[4]).expect("independent planes");
        assert_approx_eq!(p, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(three_plane_point(&cs[0], &cs[1], &cs[2]), None);
    }

    #[test]
    fn test_open_region_is_degenerate() {
        let cs = cube(1.0, Vec3::zero());
        assert_eq!(intersect(&cs[..3]), Err(ShapeError::TooFewVertices(0)));
        assert_eq!(intersect(&[]), Err(ShapeError::TooFewVertices(0)));
    }

    #[test]
    fn test_tetrahedron() {
        let c = 1.0 / 3.0_f64.sqrt();
        let normals = [
            Vec3::new(c, c, c),
            Vec3::new(c, -c, -c),
            Vec3::new(-c, c, -c),
            Vec3::new(-c, -c, c),
        ];
        let cs = normals
            .iter()
            .filter_map(|&n| Constraint::new(n, 1.0, ConstraintKind::Surface))
            .collect_vec();
        let points = intersect(&cs).expect("tetrahedron");
        assert_eq!(points.len(), 4);
        for p in points {
            // Vertices of a regular tetrahedron are 3 times as far from the
            // center as its faces.
            assert_approx_eq!(p.magnitude(), 3.0, 1e-9);
        }
    }

    proptest! {
        #[test]
        fn proptest_axis_aligned_box_has_8_vertices(
            half in 0.05..3.0_f64,
            x in -2.0..2.0_f64,
            y in -2.0..2.0_f64,
            z in -2.0..2.0_f64,
        ) {
            let center = Vec3::new(x, y, z);
            let points = intersect(&cube(half, center)).expect("box");
            prop_assert_eq!(points.len(), 8);
            for p in points {
                let d = p - center;
                assert_approx_eq!(d.x.abs(), half, 1e-9);
                assert_approx_eq!(d.y.abs(), half, 1e-9);
                assert_approx_eq!(d.z.abs(), half, 1e-9);
            }
        }
    }
}
