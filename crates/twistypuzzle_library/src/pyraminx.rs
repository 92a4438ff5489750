//! Pyraminx: a tetrahedron whose vertices turn in two depths.

use itertools::Itertools;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use twistymath::prelude::*;
use twistypuzzle_core::{
    DragCandidate, DragResolution, Logger, Move, NotationError, Pick, Piece, PieceKind,
    PuzzleFamily, Slice, StickerFace, View, best_candidate, best_matching_face,
    face_rotation_generators, push_piece, score_candidates, split_suffix, synthesize_piece,
};
use twistyshape::{ConstraintKind, ConstraintSet, StickerStyle};

/// Tolerance when comparing a piece's depth to a slice threshold.
const SLICE_TOLERANCE: Float = 0.01;

/// Minimum alignment between a drag and a turn's screen direction.
const MIN_DRAG_SCORE: Float = 0.4;

const AXIS_NAMES: [char; 4] = ['U', 'R', 'L', 'B'];

/// Geometry parameters for a Pyraminx.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PyraminxParams {
    /// Distance from the center to each face.
    pub surface_distance: Float,
    /// Depth of the cut that separates a tip.
    pub tip_cut: Float,
    /// Depth of the cut that separates a vertex layer from the rest.
    pub middle_cut: Float,
    /// Radius of rounded edges.
    pub fillet_radius: Float,
    /// Number of planes in each rounded edge.
    pub fillet_steps: usize,
    /// Visual gap between pieces.
    pub gap: Float,
    /// Tolerance for finding sticker polygons on a face.
    pub face_tolerance: Float,
    /// Sticker shape.
    pub sticker: StickerStyle,
    /// Number of moves in a scramble.
    pub scramble_length: usize,
}
impl Default for PyraminxParams {
    fn default() -> Self {
        Self {
            surface_distance: 1.2,
            tip_cut: 2.0,
            middle_cut: 0.4,
            fillet_radius: 0.055,
            fillet_steps: 10,
            gap: 0.003,
            face_tolerance: 0.002,
            sticker: StickerStyle {
                scale: 0.81,
                radius: 0.05,
                offset: 0.001,
                ..Default::default()
            },
            scramble_length: 20,
        }
    }
}

/// Pyraminx puzzle family.
///
/// Axis `i` is the normal of face `i`. Its slices are the tip and the
/// vertex layer on the far side of the puzzle from that face.
#[derive(Debug, Clone)]
pub struct Pyraminx {
    params: PyraminxParams,
    normals: [Vec3; 4],
}

impl Default for Pyraminx {
    fn default() -> Self {
        Self::new(PyraminxParams::default())
    }
}

impl Pyraminx {
    /// Constructs a Pyraminx.
    pub fn new(params: PyraminxParams) -> Self {
        let c = 1.0 / 3.0_f64.sqrt();
        Self {
            params,
            normals: [
                Vec3::new(c, c, c),
                Vec3::new(c, -c, -c),
                Vec3::new(-c, c, -c),
                Vec3::new(-c, -c, c),
            ],
        }
    }

    /// Returns the parameters.
    pub fn params(&self) -> &PyraminxParams {
        &self.params
    }

    fn tip_slice(&self) -> Slice {
        Slice::Threshold(-self.params.tip_cut)
    }
    fn deep_slice(&self) -> Slice {
        Slice::Threshold(-self.params.middle_cut)
    }
    fn is_tip_threshold(&self, threshold: Float) -> bool {
        (threshold + self.params.tip_cut).abs() < 0.1
    }

    fn sticker_faces(&self, faces: &[usize]) -> Vec<StickerFace> {
        faces
            .iter()
            .map(|&face| StickerFace {
                face,
                normal: self.normals[face],
                distance: self.params.surface_distance,
                tolerance: self.params.face_tolerance,
            })
            .collect()
    }

    /// Returns the visual offset of a piece, pushing it away from the center
    /// and away from the cut on axis `cut_axis`.
    fn gap_offset(
        &self,
        kind: PieceKind,
        faces: &[usize],
        cut_axis: Option<usize>,
        center: Vec3,
    ) -> Vec3 {
        let gap = self.params.gap;
        let mut offset = Vec3::zero();
        if let Some(&first) = faces.first() {
            let h = center.dot(self.normals[first]);
            if h.abs() > 0.01 {
                offset += center * (gap / h);
            }
        }
        if let Some(i) = cut_axis {
            match kind {
                PieceKind::Tip => offset -= self.normals[i] * gap,
                PieceKind::Center => offset += self.normals[i] * gap,
                _ => (),
            }
        }
        offset
    }

    fn build_piece(
        &self,
        kind: PieceKind,
        set: &ConstraintSet,
        faces: &[usize],
        cut_axis: Option<usize>,
    ) -> Result<Piece, twistyshape::ShapeError> {
        synthesize_piece(kind, set, &self.sticker_faces(faces), &self.params.sticker, |c| {
            self.gap_offset(kind, faces, cut_axis, c)
        })
    }

    fn tip(&self, i: usize) -> ConstraintSet {
        let p = &self.params;
        let n = &self.normals;
        let mut set = ConstraintSet::new();
        let surfaces = (0..4)
            .filter(|&j| j != i)
            .filter_map(|j| set.add(n[j], p.surface_distance, ConstraintKind::Surface))
            .collect_vec();
        let cut = set.add(n[i], -p.tip_cut, ConstraintKind::Cut);

        let (r, steps) = (p.fillet_radius, p.fillet_steps);
        set.add_fillets(surfaces.iter().copied().tuple_combinations(), r, steps);
        set.add_fillets(surfaces.iter().copied().cartesian_product(cut), r, steps);
        set
    }

    fn center(&self, i: usize) -> ConstraintSet {
        let p = &self.params;
        let n = &self.normals;
        let mut set = ConstraintSet::new();
        let cut_inner = set.add(-n[i], p.tip_cut, ConstraintKind::CutInner);
        let cut_outer = set.add(n[i], -p.middle_cut, ConstraintKind::Cut);
        let others = (0..4).filter(|&j| j != i).collect_vec();
        let surfaces = others
            .iter()
            .filter_map(|&j| {
                let c = set.add(n[j], p.surface_distance, ConstraintKind::Surface)?;
                Some((j, c))
            })
            .collect_vec();
        let bounds = others
            .iter()
            .filter_map(|&j| Some((j, set.add(-n[j], p.middle_cut, ConstraintKind::CutBound)?)))
            .collect_vec();
        let surface_ids = surfaces.iter().map(|&(_, c)| c).collect_vec();
        let bound_ids = bounds.iter().map(|&(_, c)| c).collect_vec();

        let (r, steps) = (p.fillet_radius, p.fillet_steps);
        set.add_fillets(surface_ids.iter().copied().tuple_combinations(), r, steps);
        // A surface never meets the bound of its own face.
        let surface_bound_pairs = surfaces
            .iter()
            .cartesian_product(&bounds)
            .filter(|((a, _), (b, _))| a != b)
            .map(|((_, s), (_, b))| (*s, *b))
            .collect_vec();
        set.add_fillets(surface_bound_pairs, r, steps);
        set.add_fillets(surface_ids.iter().copied().cartesian_product(cut_outer), r, steps);
        set.add_fillets(cut_inner.into_iter().cartesian_product(bound_ids.iter().copied()), r, steps);
        set.add_fillets(cut_outer.into_iter().cartesian_product(bound_ids.iter().copied()), r, steps);
        set.add_fillets(cut_outer.into_iter().cartesian_product(cut_inner), r, steps);
        set
    }

    fn edge(&self, i: usize, j: usize, others: &[usize]) -> ConstraintSet {
        let p = &self.params;
        let n = &self.normals;
        let mut set = ConstraintSet::new();
        let cuts = [i, j]
            .iter()
            .filter_map(|&a| set.add(n[a], -p.middle_cut, ConstraintKind::Cut))
            .collect_vec();
        let bounds = others
            .iter()
            .filter_map(|&a| set.add(-n[a], p.middle_cut, ConstraintKind::CutBound))
            .collect_vec();
        let surfaces = others
            .iter()
            .filter_map(|&a| set.add(n[a], p.surface_distance, ConstraintKind::Surface))
            .collect_vec();

        let (r, steps) = (p.fillet_radius, p.fillet_steps);
        set.add_fillets(surfaces.iter().copied().tuple_combinations(), r, steps);
        set.add_fillets(surfaces.iter().copied().cartesian_product(cuts.iter().copied()), r, steps);
        set.add_fillets(cuts.iter().copied().tuple_combinations(), r, steps);
        set.add_fillets(cuts.iter().copied().cartesian_product(bounds.iter().copied()), r, steps);
        set.add_fillets(surfaces.iter().copied().zip(bounds.iter().copied()), r, steps);
        set.add_fillets(bounds.iter().copied().tuple_combinations(), r, steps);
        set
    }
}

impl PuzzleFamily for Pyraminx {
    fn name(&self) -> String {
        "Pyraminx".to_string()
    }

    fn cycle_length(&self) -> u32 {
        3
    }
    fn face_normals(&self) -> Vec<Vec3> {
        self.normals.to_vec()
    }
    fn symmetry_generators(&self) -> Vec<Quat> {
        face_rotation_generators(&self.normals[..2], 3)
    }
    fn axes(&self) -> Vec<Vec3> {
        self.normals.to_vec()
    }

    fn synthesize(&self, logger: &Logger) -> Vec<Piece> {
        let mut pieces = vec![];
        for i in 0..4 {
            let faces = (0..4).filter(|&j| j != i).collect_vec();
            let piece = self.build_piece(PieceKind::Tip, &self.tip(i), &faces, Some(i));
            push_piece(&mut pieces, logger, format_args!("tip {i}"), piece);
        }
        for i in 0..4 {
            let faces = (0..4).filter(|&j| j != i).collect_vec();
            let piece = self.build_piece(PieceKind::Center, &self.center(i), &faces, Some(i));
            push_piece(&mut pieces, logger, format_args!("center {i}"), piece);
        }
        for (i, j) in (0..4).tuple_combinations() {
            let faces = (0..4).filter(|&k| k != i && k != j).collect_vec();
            let set = self.edge(i, j, &faces);
            let piece = self.build_piece(PieceKind::Edge, &set, &faces, None);
            push_piece(&mut pieces, logger, format_args!("edge {i}-{j}"), piece);
        }
        pieces
    }

    fn slice_contains(&self, axis: usize, threshold: Float, position: Vec3) -> bool {
        self.normals
            .get(axis)
            .is_some_and(|n| n.dot(position) <= threshold + SLICE_TOLERANCE)
    }
    fn legal_slices(&self, axis: usize) -> Vec<Slice> {
        if axis < 4 {
            vec![self.tip_slice(), self.deep_slice()]
        } else {
            vec![]
        }
    }

    fn resolve_drag(
        &self,
        pieces: &[Piece],
        pick: &Pick,
        drag: Vec2,
        view: &View,
    ) -> Option<DragResolution> {
        let piece = pieces.get(pick.piece.0)?;
        let clicked = view.world_to_puzzle(pick.face_normal);
        let (face, similarity) = best_matching_face(&self.normals, clicked)?;
        if similarity < 0.7 {
            return None;
        }
        let pos = piece.position();
        // Tips and centers sit on their own axis, so the radius vector has to
        // come from the clicked surface rather than the piece position.
        let anchor = pick
            .point
            .map(|p| view.world_to_puzzle(p))
            .or_else(|| piece.sticker_center(clicked))
            .unwrap_or(pos);
        let slice = match piece.kind {
            PieceKind::Tip => self.tip_slice(),
            _ => self.deep_slice(),
        };
        let candidates = (0..4)
            .filter(|&a| a != face && self.normals[a].dot(pos) <= -0.1)
            .map(|axis| DragCandidate {
                axis,
                rotation_axis: self.normals[axis],
                tangent: self.normals[axis].cross(anchor),
                slice,
            });
        best_candidate(&score_candidates(view, anchor, candidates, drag), MIN_DRAG_SCORE)
    }

    fn notation(&self, mv: Move) -> Option<String> {
        let mut letter = *AXIS_NAMES.get(mv.axis)?;
        if let Slice::Threshold(t) = mv.slice {
            if self.is_tip_threshold(t) {
                letter = letter.to_ascii_lowercase();
            }
        } else {
            return None;
        }
        match mv.turns.rem_euclid(3) {
            1 => Some(letter.to_string()),
            2 => Some(format!("{letter}'")),
            _ => None,
        }
    }

    fn parse_notation(&self, token: &str) -> Result<Move, NotationError> {
        if token.is_empty() {
            return Err(NotationError::Empty);
        }
        let (base, suffix) = split_suffix(token);
        let mut chars = base.chars();
        let (Some(letter), None) = (chars.next(), chars.next()) else {
            return Err(NotationError::UnknownMove(token.to_string()));
        };
        let axis = AXIS_NAMES
            .iter()
            .position(|&c| c == letter.to_ascii_uppercase())
            .ok_or_else(|| NotationError::UnknownMove(token.to_string()))?;
        let slice = match letter.is_ascii_lowercase() {
            true => self.tip_slice(),
            false => self.deep_slice(),
        };
        let turns = match suffix {
            "" => 1,
            "'" => -1,
            "2" => 2,
            "2'" => -2,
            _ => {
                return Err(NotationError::BadSuffix {
                    token: token.to_string(),
                    suffix: suffix.to_string(),
                });
            }
        };
        Ok(Move { axis, slice, turns })
    }

    fn scramble(&self, rng: &mut dyn RngCore) -> Vec<Move> {
        (0..self.params.scramble_length)
            .map(|_| Move {
                axis: rng.random_range(0..4),
                slice: match rng.random_bool(0.5) {
                    true => self.deep_slice(),
                    false => self.tip_slice(),
                },
                turns: if rng.random_bool(0.5) { 1 } else { -1 },
            })
            .collect()
    }
}
