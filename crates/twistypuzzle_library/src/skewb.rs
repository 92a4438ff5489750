//! Skewb: a cube cut through its center by four planes perpendicular to its
//! long diagonals.

use float_ord::FloatOrd;
use itertools::Itertools;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use twistymath::prelude::*;
use twistypuzzle_core::{
    DragCandidate, DragResolution, Logger, Move, NotationError, Pick, Piece, PieceKind,
    PuzzleFamily, Slice, StickerFace, View, octahedral_generators, push_piece, score_candidates,
    split_suffix, synthesize_piece,
};
use twistyshape::{ConstraintKind, ConstraintSet, StickerStyle};

/// Slice value selecting the pieces on the positive side of an axis.
const POSITIVE_SIDE: Float = 0.5;
/// Minimum distance of a piece from a cut plane to count as being on one side.
const SIDE_TOLERANCE: Float = 0.01;
/// Minimum alignment between a drag and a turn's screen direction.
const MIN_DRAG_SCORE: Float = 0.5;

/// Names of the corner on the positive and negative side of each axis.
const AXIS_NAMES: [(&str, &str); 4] = [("R", "uL"), ("L", "uR"), ("U", "D"), ("B", "F")];

/// Geometry parameters for a Skewb.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SkewbParams {
    /// Half the edge length of the cube.
    pub half_size: Float,
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
impl Default for SkewbParams {
    fn default() -> Self {
        Self {
            half_size: 1.5,
            fillet_radius: 0.055,
            fillet_steps: 3,
            gap: 0.01,
            face_tolerance: 0.002,
            sticker: StickerStyle {
                inset: 0.08,
                radius: 0.25,
                ..Default::default()
            },
            scramble_length: 12,
        }
    }
}

/// Skewb puzzle family.
///
/// Each axis points at a corner. A positive slice value selects the half of
/// the puzzle around that corner and a negative one selects the opposite half.
#[derive(Debug, Clone)]
pub struct Skewb {
    params: SkewbParams,
    axes: [Vec3; 4],
    face_normals: [Vec3; 6],
}

impl Default for Skewb {
    fn default() -> Self {
        Self::new(SkewbParams::default())
    }
}

impl Skewb {
    /// Constructs a Skewb.
    pub fn new(params: SkewbParams) -> Self {
        Self {
            params,
            axes: [
                Vec3::new(1.0, -1.0, -1.0).normalize(),
                Vec3::new(-1.0, -1.0, 1.0).normalize(),
                Vec3::new(-1.0, 1.0, -1.0).normalize(),
                Vec3::new(-1.0, -1.0, -1.0).normalize(),
            ],
            face_normals: [
                Vec3::unit_x(),
                -Vec3::unit_x(),
                Vec3::unit_y(),
                -Vec3::unit_y(),
                Vec3::unit_z(),
                -Vec3::unit_z(),
            ],
        }
    }

    /// Returns the parameters.
    pub fn params(&self) -> &SkewbParams {
        &self.params
    }

    /// Returns the slice for the side of `axis` that `p` is on.
    fn side_slice(&self, axis: usize, p: Vec3) -> Slice {
        Slice::Threshold(POSITIVE_SIDE * sign_of(self.axes[axis].dot(p)))
    }

    fn build_piece(&self, kind: PieceKind, p: Vec3) -> Result<Piece, twistyshape::ShapeError> {
        let r = self.params.half_size;
        let mut set = ConstraintSet::new();
        let mut base = self
            .face_normals
            .iter()
            .filter_map(|&n| set.add(n, r, ConstraintKind::Surface))
            .collect_vec();
        base.extend(self.axes.iter().filter_map(|&a| {
            set.add(-a * sign_of(p.dot(a)), 0.0, ConstraintKind::Cut)
        }));
        set.add_fillets(
            base.iter().copied().tuple_combinations(),
            self.params.fillet_radius,
            self.params.fillet_steps,
        );

        let sticker_faces = self
            .face_normals
            .iter()
            .enumerate()
            .filter(|(_, n)| (p.dot(**n) - r).abs() < 0.8)
            .map(|(face, &normal)| StickerFace {
                face,
                normal,
                distance: r,
                tolerance: self.params.face_tolerance,
            })
            .collect_vec();

        let gap = self.params.gap;
        synthesize_piece(kind, &set, &sticker_faces, &self.params.sticker, |c| {
            if c.magnitude2() > EPSILON {
                c.normalize() * gap
            } else {
                Vec3::zero()
            }
        })
    }
}

impl PuzzleFamily for Skewb {
    fn name(&self) -> String {
        "Skewb".to_string()
    }

    fn cycle_length(&self) -> u32 {
        3
    }
    fn face_normals(&self) -> Vec<Vec3> {
        self.face_normals.to_vec()
    }
    fn symmetry_generators(&self) -> Vec<Quat> {
        octahedral_generators()
    }
    fn axes(&self) -> Vec<Vec3> {
        self.axes.to_vec()
    }

    fn synthesize(&self, logger: &Logger) -> Vec<Piece> {
        let mut pieces = vec![];
        for (x, y, z) in itertools::iproduct!([1.0, -1.0], [1.0, -1.0], [1.0, -1.0]) {
            let p = Vec3::new(x, y, z);
            let piece = self.build_piece(PieceKind::Corner, p);
            push_piece(&mut pieces, logger, format_args!("corner {p:?}"), piece);
        }
        for (face, &n) in self.face_normals.iter().enumerate() {
            let piece = self.build_piece(PieceKind::Center, n * self.params.half_size);
            push_piece(&mut pieces, logger, format_args!("center {face}"), piece);
        }
        pieces
    }

    fn slice_contains(&self, axis: usize, threshold: Float, position: Vec3) -> bool {
        let Some(a) = self.axes.get(axis) else {
            return false;
        };
        let d = a.dot(position);
        if threshold < 0.0 {
            d < -SIDE_TOLERANCE
        } else {
            d > SIDE_TOLERANCE
        }
    }
    fn legal_slices(&self, axis: usize) -> Vec<Slice> {
        if axis < self.axes.len() {
            vec![
                Slice::Threshold(POSITIVE_SIDE),
                Slice::Threshold(-POSITIVE_SIDE),
            ]
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
        let pos = piece.position();
        let face_normal = view.world_to_puzzle(pick.face_normal).normalize();
        let click = match pick.point {
            Some(p) => view.world_to_puzzle(p),
            None => pos,
        };
        let candidates = (0..self.axes.len()).map(|axis| DragCandidate {
            axis,
            rotation_axis: self.axes[axis],
            tangent: self.axes[axis].cross(face_normal),
            slice: self.side_slice(axis, pos),
        });
        let scored = score_candidates(view, click, candidates, drag)
            .into_iter()
            .filter(|s| s.score > MIN_DRAG_SCORE)
            .collect_vec();
        let best_score = scored.iter().map(|s| FloatOrd(s.score)).max()?.0;

        // Several axes may fit the drag equally well. Prefer the one whose
        // corner is nearest the click.
        let click_dir = click.normalize();
        scored
            .iter()
            .filter(|s| s.score >= best_score * 0.9)
            .max_by_key(|s| FloatOrd(s.candidate.rotation_axis.dot(click_dir).abs()))
            .map(|s| s.resolve())
    }

    fn notation(&self, mv: Move) -> Option<String> {
        let (positive, negative) = AXIS_NAMES.get(mv.axis)?;
        let Slice::Threshold(t) = mv.slice else {
            return None;
        };
        let (name, clockwise) = match t < 0.0 {
            true => (negative, 1),
            false => (positive, -1),
        };
        match mv.turns.rem_euclid(3) {
            0 => None,
            1 if clockwise == 1 => Some(name.to_string()),
            2 if clockwise == -1 => Some(name.to_string()),
            _ => Some(format!("{name}'")),
        }
    }

    fn parse_notation(&self, token: &str) -> Result<Move, NotationError> {
        if token.is_empty() {
            return Err(NotationError::Empty);
        }
        let (base, suffix) = split_suffix(token);
        let (axis, slice, clockwise) = AXIS_NAMES
            .iter()
            .enumerate()
            .find_map(|(axis, &(pos, neg))| {
                if base == pos {
                    Some((axis, POSITIVE_SIDE, -1))
                } else if base == neg {
                    Some((axis, -POSITIVE_SIDE, 1))
                } else {
                    None
                }
            })
            .ok_or_else(|| NotationError::UnknownMove(token.to_string()))?;
        let multiplier = match suffix {
            "" => 1,
            "'" => -1,
            _ => {
                return Err(NotationError::BadSuffix {
                    token: token.to_string(),
                    suffix: suffix.to_string(),
                });
            }
        };
        Ok(Move {
            axis,
            slice: Slice::Threshold(slice),
            turns: clockwise * multiplier,
        })
    }

    fn scramble(&self, rng: &mut dyn RngCore) -> Vec<Move> {
        (0..self.params.scramble_length)
            .map(|_| Move {
                axis: rng.random_range(0..self.axes.len()),
                slice: Slice::Threshold(POSITIVE_SIDE),
                turns: if rng.random_bool(0.5) { 1 } else { -1 },
            })
            .collect()
    }
}
