//! Resolving a screen-space drag on a piece into a rotation.

use float_ord::FloatOrd;
use serde::Serialize;
use twistymath::prelude::*;

use crate::{PieceId, Slice, View};

/// Distance along a candidate tangent used to measure its direction on screen.
const TANGENT_STEP: Float = 0.1;

/// Result of a pick query against the rendered puzzle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pick {
    /// Piece under the pointer.
    pub piece: PieceId,
    /// Outward normal of the clicked face, in world space.
    pub face_normal: Vec3,
    /// Point under the pointer, in world space, if known.
    pub point: Option<Vec3>,
}

/// Screen coordinate that controls the angle of a drag.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScreenAxis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}
impl ScreenAxis {
    /// Returns the component of `v` along this axis.
    pub fn component(self, v: Vec2) -> Float {
        match self {
            ScreenAxis::X => v.x,
            ScreenAxis::Y => v.y,
        }
    }
    /// Returns the axis along which `v` is longest.
    pub fn dominant(v: Vec2) -> Self {
        if v.x.abs() >= v.y.abs() {
            ScreenAxis::X
        } else {
            ScreenAxis::Y
        }
    }
}

/// Possible rotation for a drag, before scoring.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragCandidate {
    /// Axis index.
    pub axis: usize,
    /// Axis vector in puzzle space.
    pub rotation_axis: Vec3,
    /// Direction that the clicked point would move under a small positive
    /// rotation, in puzzle space.
    pub tangent: Vec3,
    /// Slice that would rotate.
    pub slice: Slice,
}

/// Rotation selected for a drag.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragResolution {
    /// Axis index.
    pub axis: usize,
    /// Axis vector in puzzle space.
    pub rotation_axis: Vec3,
    /// Slice to rotate.
    pub slice: Slice,
    /// Screen coordinate that controls the angle.
    pub screen_axis: ScreenAxis,
    /// Sign to multiply the screen delta by, so that positive angles follow
    /// the pointer.
    pub angle_sign: Float,
    /// How well the drag matched this rotation, from 0 to 1.
    pub score: Float,
}

/// Candidate with its alignment to the drag.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// Candidate rotation.
    pub candidate: DragCandidate,
    /// Normalized direction of the candidate's tangent on screen.
    pub screen_tangent: Vec2,
    /// Absolute dot product of `screen_tangent` with the drag direction.
    pub score: Float,
}
impl ScoredCandidate {
    /// Returns the drag resolution for this candidate.
    pub fn resolve(&self) -> DragResolution {
        let screen_axis = ScreenAxis::dominant(self.screen_tangent);
        DragResolution {
            axis: self.candidate.axis,
            rotation_axis: self.candidate.rotation_axis,
            slice: self.candidate.slice,
            screen_axis,
            angle_sign: sign_of(screen_axis.component(self.screen_tangent)),
            score: self.score,
        }
    }
}

/// Scores every candidate against a drag. `anchor` is the puzzle-space point
/// where the tangents start. Candidates whose tangent vanishes on screen are
/// dropped.
pub fn score_candidates(
    view: &View,
    anchor: Vec3,
    candidates: impl IntoIterator<Item = DragCandidate>,
    drag: Vec2,
) -> Vec<ScoredCandidate> {
    if drag.magnitude2() < EPSILON {
        return vec![];
    }
    let drag_dir = drag.normalize();
    let Some(start) = view.project(anchor) else {
        return vec![];
    };
    candidates
        .into_iter()
        .filter_map(|candidate| {
            if candidate.tangent.magnitude2() < EPSILON {
                return None;
            }
            let end = view.project(anchor + candidate.tangent.normalize() * TANGENT_STEP)?;
            let screen = end - start;
            if screen.magnitude2() < EPSILON {
                return None;
            }
            let screen_tangent = screen.normalize();
            Some(ScoredCandidate {
                candidate,
                screen_tangent,
                score: screen_tangent.dot(drag_dir).abs(),
            })
        })
        .collect()
}

/// Returns the best-scoring candidate if its score exceeds `min_score`.
pub fn best_candidate(scored: &[ScoredCandidate], min_score: Float) -> Option<DragResolution> {
    scored
        .iter()
        .max_by_key(|s| FloatOrd(s.score))
        .filter(|s| s.score > min_score)
        .map(ScoredCandidate::resolve)
}

/// Returns the index and similarity of the face normal best matching
/// `normal`.
pub fn best_matching_face(face_normals: &[Vec3], normal: Vec3) -> Option<(usize, Float)> {
    let normal = normal.normalize();
    face_normals
        .iter()
        .map(|n| n.dot(normal))
        .enumerate()
        .max_by_key(|&(_, d)| FloatOrd(d))
}

#[cfg(test)]
mod tests {
    use twistymath::assert_approx_eq;

    use super::*;

    fn candidates(anchor: Vec3) -> Vec<DragCandidate> {
        [Vec3::unit_x(), Vec3::unit_y()]
            .into_iter()
            .enumerate()
            .map(|(axis, a)| DragCandidate {
                axis,
                rotation_axis: a,
                tangent: a.cross(anchor),
                slice: Slice::Threshold(0.0),
            })
            .collect()
    }

    #[test]
    fn test_aligned_drag_selects_candidate() {
        let view = View::default();
        // Front face of a cube, facing the camera.
        let anchor = Vec3::new(0.0, 0.0, 1.5);

        // Rotating around +Y moves the front point toward +X, which is right
        // on screen.
        let scored = score_candidates(&view, anchor, candidates(anchor), Vec2::new(30.0, 0.0));
        let res = best_candidate(&scored, 0.4).expect("resolved");
        assert_eq!(res.axis, 1);
        assert_eq!(res.screen_axis, ScreenAxis::X);
        assert_approx_eq!(res.angle_sign, 1.0);
        assert_approx_eq!(res.score, 1.0, 1e-9);

        // Dragging left selects the same rotation; the angle becomes negative
        // through the screen delta, not through the sign.
        let scored = score_candidates(&view, anchor, candidates(anchor), Vec2::new(-30.0, 0.0));
        assert_eq!(best_candidate(&scored, 0.4).map(|r| r.axis), Some(1));

        // Rotating around +X moves the front point toward -Y, which is down on
        // screen, where pixel coordinates increase.
        let scored = score_candidates(&view, anchor, candidates(anchor), Vec2::new(0.0, -25.0));
        let res = best_candidate(&scored, 0.4).expect("resolved");
        assert_eq!(res.axis, 0);
        assert_eq!(res.screen_axis, ScreenAxis::Y);
        assert_approx_eq!(res.angle_sign, 1.0);
    }

    #[test]
    fn test_diagonal_drag_is_ambiguous() {
        let view = View::default();
        let anchor = Vec3::new(0.0, 0.0, 1.5);
        let scored = score_candidates(&view, anchor, candidates(anchor), Vec2::new(1.0, 1.0));
        assert!(best_candidate(&scored, 0.75).is_none());
        assert!(score_candidates(&view, anchor, candidates(anchor), Vec2::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_best_matching_face() {
        let normals = [Vec3::unit_x(), Vec3::unit_y(), Vec3::unit_z()];
        let (i, d) = best_matching_face(&normals, Vec3::new(0.1, 2.0, 0.0)).expect("nonempty");
        assert_eq!(i, 1);
        assert!(d > 0.99);
    }
}
