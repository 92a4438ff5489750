//! Sticker outlines derived from the flat faces of a piece.
//!
//! A sticker starts as the polygon where a piece touches one of the puzzle's
//! surface planes. It is shrunk and its corners are rounded so that it sits
//! visibly inside the piece's face.

use float_ord::FloatOrd;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use twistymath::prelude::*;

/// Points closer than this are merged when cleaning up an outline.
const MERGE_DISTANCE: Float = 0.01;
/// Edges shorter than this are removed when simplifying an outline.
const MIN_SEGMENT_LENGTH: Float = 0.02;
/// Adjacent edges whose directions have a dot product above this are
/// considered collinear when simplifying an outline.
const COLLINEAR_DOT: Float = 0.9;

/// Parameters for shrinking and rounding a sticker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StickerStyle {
    /// Uniform scale about the outline's center.
    pub scale: Float,
    /// Distance to move each edge inward.
    pub inset: Float,
    /// Radius of the rounded corners.
    pub radius: Float,
    /// Number of intermediate points in each rounded corner.
    pub corner_segments: usize,
    /// Distance to lift the sticker off the face, along its normal.
    pub offset: Float,
    /// Whether to remove nearly collinear points and tiny edges, which appear
    /// where fillets clip the corners of a face.
    pub simplify: bool,
}

impl Default for StickerStyle {
    fn default() -> Self {
        Self {
            scale: 1.0,
            inset: 0.0,
            radius: 0.0,
            corner_segments: 4,
            offset: 0.001,
            simplify: false,
        }
    }
}

/// Builds a sticker outline from points lying on a plane with the given
/// normal. Returns `None` if the points do not span a polygon.
///
/// The result is a closed loop of 3D points, counterclockwise around
/// `normal`, lifted off the plane by [`StickerStyle::offset`].
pub fn sticker_outline(points: &[Vec3], normal: Vec3, style: &StickerStyle) -> Option<Vec<Vec3>> {
    if points.len() < 3 {
        return None;
    }
    let normal = normal.normalize();
    let basis = tangent_basis(normal);
    let height = points.iter().map(|p| p.dot(normal)).sum::<Float>() / points.len() as Float;

    let flat = points.iter().map(|&p| project_2d(p, basis)).collect_vec();
    let mut polygon = merge_close_points(convex_hull_2d(&flat), MERGE_DISTANCE);
    if style.simplify {
        polygon = simplify(polygon);
    }
    if polygon.len() < 3 {
        return None;
    }
    if signed_area(&polygon) < 0.0 {
        polygon.reverse();
    }

    let polygon = scale_about_center(&polygon, style.scale);
    let polygon = inset(&polygon, style.inset)?;
    let polygon = round_corners(&polygon, style.radius, style.corner_segments);

    let (u, v) = basis;
    let lift = normal * (height + style.offset);
    Some(polygon.into_iter().map(|p| u * p.x + v * p.y + lift).collect())
}

/// Returns the convex hull of a set of 2D points, counterclockwise, using the
/// monotone chain algorithm.
pub fn convex_hull_2d(points: &[Vec2]) -> Vec<Vec2> {
    let sorted = points
        .iter()
        .copied()
        .sorted_by_key(|p| (FloatOrd(p.x), FloatOrd(p.y)))
        .collect_vec();
    if sorted.len() < 3 {
        return sorted;
    }

    let cross = |o: Vec2, a: Vec2, b: Vec2| (a - o).perp_dot(b - o);
    let mut lower: Vec<Vec2> = vec![];
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= EPSILON
        {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Vec2> = vec![];
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= EPSILON
        {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Returns twice the signed area of a polygon, positive if counterclockwise.
pub fn signed_area(polygon: &[Vec2]) -> Float {
    polygon
        .iter()
        .circular_tuple_windows()
        .map(|(a, b)| a.perp_dot(*b))
        .sum()
}

fn merge_close_points(polygon: Vec<Vec2>, distance: Float) -> Vec<Vec2> {
    let mut ret: Vec<Vec2> = Vec::with_capacity(polygon.len());
    for p in polygon {
        if ret.last().is_none_or(|&q| (p - q).magnitude() >= distance) {
            ret.push(p);
        }
    }
    while ret.len() > 1
        && let (Some(&first), Some(&last)) = (ret.first(), ret.last())
        && (first - last).magnitude() < distance
    {
        ret.pop();
    }
    ret
}

/// Removes points between nearly collinear edges and points at the ends of
/// tiny edges, until no more can be removed.
fn simplify(mut polygon: Vec<Vec2>) -> Vec<Vec2> {
    loop {
        let n = polygon.len();
        if n <= 3 {
            return polygon;
        }
        let removable = (0..n).find(|&i| {
            let prev = polygon[(i + n - 1) % n];
            let here = polygon[i];
            let next = polygon[(i + 1) % n];
            let (a, b) = (here - prev, next - here);
            if a.magnitude() < MIN_SEGMENT_LENGTH || b.magnitude() < MIN_SEGMENT_LENGTH {
                return true;
            }
            a.normalize().dot(b.normalize()) > COLLINEAR_DOT
        });
        match removable {
            Some(i) => {
                polygon.remove(i);
            }
            None => return polygon,
        }
    }
}

fn center_of(polygon: &[Vec2]) -> Vec2 {
    polygon.iter().fold(Vec2::zero(), |a, &b| a + b) / polygon.len().max(1) as Float
}

fn scale_about_center(polygon: &[Vec2], scale: Float) -> Vec<Vec2> {
    let c = center_of(polygon);
    polygon.iter().map(|&p| c + (p - c) * scale).collect()
}

/// Moves every edge of a counterclockwise convex polygon inward by `amount`,
/// clamped so that the polygon never inverts.
fn inset(polygon: &[Vec2], amount: Float) -> Option<Vec<Vec2>> {
    if amount <= 0.0 {
        return Some(polygon.to_vec());
    }
    let c = center_of(polygon);
    let n = polygon.len();

    // Inward normals and offsets of each edge line.
    let edges = (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            let dir = (b - a).normalize();
            let inward = Vec2::new(-dir.y, dir.x);
            (a, dir, inward)
        })
        .collect_vec();

    let max_inset = edges
        .iter()
        .map(|&(a, _, inward)| (c - a).dot(inward))
        .min_by_key(|&d| FloatOrd(d))?;
    let amount = amount.min(max_inset - 0.01).max(0.0);

    let ret = (0..n)
        .map(|i| {
            let (a0, d0, in0) = edges[(i + n - 1) % n];
            let (a1, d1, in1) = edges[i];
            let p0 = a0 + in0 * amount;
            let p1 = a1 + in1 * amount;
            line_intersection(p0, d0, p1, d1).unwrap_or(p1)
        })
        .collect_vec();
    Some(ret)
}

/// Returns the intersection of the lines `p0 + t·d0` and `p1 + s·d1`.
fn line_intersection(p0: Vec2, d0: Vec2, p1: Vec2, d1: Vec2) -> Option<Vec2> {
    let denom = d0.perp_dot(d1);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = (p1 - p0).perp_dot(d1) / denom;
    Some(p0 + d0 * t)
}

/// Replaces every corner with a quadratic curve. The curve starts and ends at
/// distance `min(radius, 0.45 × shortest edge)` from the corner.
fn round_corners(polygon: &[Vec2], radius: Float, segments: usize) -> Vec<Vec2> {
    let n = polygon.len();
    let shortest = polygon
        .iter()
        .circular_tuple_windows()
        .map(|(a, b)| (b - a).magnitude())
        .min_by_key(|&d| FloatOrd(d))
        .unwrap_or(0.0);
    let d = radius.min(0.45 * shortest);
    if d <= 0.0 || segments == 0 {
        return polygon.to_vec();
    }

    let mut ret = Vec::with_capacity(n * (segments + 2));
    for i in 0..n {
        let prev = polygon[(i + n - 1) % n];
        let corner = polygon[i];
        let next = polygon[(i + 1) % n];
        let start = corner + (prev - corner).normalize() * d;
        let end = corner + (next - corner).normalize() * d;
        for j in 0..=segments + 1 {
            let t = j as Float / (segments + 1) as Float;
            let s = 1.0 - t;
            ret.push(start * (s * s) + corner * (2.0 * s * t) + end * (t * t));
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use twistymath::assert_approx_eq;

    use super::*;

    fn square(half: Float) -> Vec<Vec2> {
        vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]
    }

    #[test]
    fn test_convex_hull_2d_drops_interior_and_collinear_points() {
        let mut points = square(1.0);
        points.push(Vec2::new(0.0, 0.0));
        points.push(Vec2::new(0.0, -1.0));
        let hull = convex_hull_2d(&points);
        assert_eq!(hull.len(), 4);
        assert!(signed_area(&hull) > 0.0);
        assert_approx_eq!(signed_area(&hull), 8.0);
    }

    #[test]
    fn test_simplify_removes_chamfer() {
        // A square with one corner clipped by a tiny chamfer.
        let polygon = vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 0.99),
            Vec2::new(0.99, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        assert_eq!(simplify(polygon).len(), 4);
    }

    #[test]
    fn test_inset_square() {
        let inset_square = inset(&square(1.0), 0.25).expect("nonempty");
        for (got, want) in inset_square.iter().zip(square(0.75)) {
            assert_approx_eq!(*got, want);
        }
        // Clamped so that the polygon stays valid.
        let clamped = inset(&square(1.0), 5.0).expect("nonempty");
        assert!(signed_area(&clamped) > 0.0);
    }

    #[test]
    fn test_sticker_outline_on_face() {
        let points = [
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ];
        let style = StickerStyle {
            scale: 0.9,
            radius: 0.1,
            corner_segments: 3,
            offset: 0.01,
            ..Default::default()
        };
        let outline = sticker_outline(&points, Vec3::unit_z(), &style).expect("square sticker");
        assert_eq!(outline.len(), 4 * 5);
        for p in &outline {
            assert_approx_eq!(p.z, 0.51);
            assert!(p.x.abs() <= 0.45 + 1e-9 && p.y.abs() <= 0.45 + 1e-9);
        }
        assert!(sticker_outline(&points[..2], Vec3::unit_z(), &style).is_none());
    }
}
