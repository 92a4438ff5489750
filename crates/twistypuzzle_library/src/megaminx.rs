//! Megaminx: a dodecahedron with a shallow cut parallel to each face.

use float_ord::FloatOrd;
use itertools::Itertools;
use lazy_static::lazy_static;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use twistymath::prelude::*;
use twistypuzzle_core::{
    DragCandidate, DragResolution, Logger, Move, NotationError, Pick, Piece, PieceKind,
    PuzzleFamily, Slice, StickerFace, View, best_candidate, best_matching_face,
    face_rotation_generators, normalize_turns, push_piece, score_candidates, split_suffix,
    synthesize_piece,
};
use twistyshape::{ConstraintKind, ConstraintSet, StickerStyle};

/// Golden ratio.
const PHI: Float = 1.618_033_988_749_895;

lazy_static! {
    /// Threshold on `normalize(pos)·axis` that separates a face layer from
    /// the rest of the puzzle.
    ///
    /// This is the midpoint between the cosine from a face to its own
    /// vertices (`φ²/√(3(1+φ²))`, the lowest value inside the layer) and the
    /// cosine from a face to the far end of a neighboring edge (`1/√(1+φ²)`,
    /// the highest value outside it).
    pub static ref FACE_SLICE: Float = {
        let phi2 = PHI * PHI;
        let vertex_cos = phi2 / (3.0 * (1.0 + phi2)).sqrt();
        let edge_cos = 1.0 / (1.0 + phi2).sqrt();
        (vertex_cos + edge_cos) / 2.0
    };
    /// Threshold selecting everything except the layer opposite the axis.
    pub static ref WIDE_SLICE: Float = -*FACE_SLICE;
}

/// Minimum alignment between a drag and a turn's screen direction.
const MIN_DRAG_SCORE: Float = 0.5;
/// Maximum distance between the unit normals of two adjacent faces.
const NEIGHBOR_DISTANCE: Float = 1.3;
/// Vertex pairs closer than this (on the unit sphere) are not edges.
const EDGE_LENGTH_MIN: Float = 0.6;
/// Vertex pairs farther apart than this (on the unit sphere) are not edges.
const EDGE_LENGTH_MAX: Float = 0.8;

/// Face names indexed by axis.
const FACE_NAMES: [&str; 12] = [
    "R", "L", "bR", "bL", "U", "B", "F", "D", "uR", "uL", "dR", "dL",
];
/// Prefix for whole-puzzle rotations.
const ROTATE_PREFIX: &str = "Rotate";
/// Axes with names for wide moves, and the name used for each.
const WIDE_NAMES: [(usize, &str); 2] = [(2, "R"), (7, "D")];
/// Axis of the face turned at the end of each scramble line.
const U_AXIS: usize = 4;

/// Geometry parameters for a Megaminx.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MegaminxParams {
    /// Scale of the core, used to keep pieces off the center.
    pub radius: Float,
    /// Distance from the center to each face.
    pub surface_distance: Float,
    /// Distance from the center to each cut.
    pub cut_distance: Float,
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
    /// Number of lines in a scramble.
    pub scramble_lines: usize,
    /// Number of wide moves in each scramble line.
    pub scramble_line_length: usize,
}
impl Default for MegaminxParams {
    fn default() -> Self {
        Self {
            radius: 1.25,
            surface_distance: 2.0,
            cut_distance: 1.3,
            fillet_radius: 0.015,
            fillet_steps: 3,
            gap: 0.02,
            face_tolerance: 0.002,
            sticker: StickerStyle {
                scale: 0.86,
                radius: 0.08,
                offset: 0.005,
                simplify: true,
                ..Default::default()
            },
            scramble_lines: 7,
            scramble_line_length: 10,
        }
    }
}

/// Megaminx puzzle family.
///
/// Axis `i` is the normal of face `i`. A slice value is a threshold on the
/// cosine between a piece's position and the axis: [`FACE_SLICE`] turns one
/// face and [`WIDE_SLICE`] turns everything except the opposite face.
#[derive(Debug, Clone)]
pub struct Megaminx {
    params: MegaminxParams,
    normals: Vec<Vec3>,
    vertices: Vec<Vec3>,
}

impl Default for Megaminx {
    fn default() -> Self {
        Self::new(MegaminxParams::default())
    }
}

impl Megaminx {
    /// Constructs a Megaminx.
    pub fn new(params: MegaminxParams) -> Self {
        let mut normals = vec![];
        for (a, b) in [(1.0, PHI), (1.0, -PHI), (-1.0, PHI), (-1.0, -PHI)] {
            normals.push(Vec3::new(0.0, a, b));
        }
        for (a, b) in [(1.0, PHI), (1.0, -PHI), (-1.0, PHI), (-1.0, -PHI)] {
            normals.push(Vec3::new(a, b, 0.0));
        }
        for (a, b) in [(PHI, 1.0), (PHI, -1.0), (-PHI, 1.0), (-PHI, -1.0)] {
            normals.push(Vec3::new(a, 0.0, b));
        }

        let mut vertices = itertools::iproduct!([1.0, -1.0], [1.0, -1.0], [1.0, -1.0])
            .map(|(x, y, z)| Vec3::new(x, y, z))
            .collect_vec();
        for (i, j) in itertools::iproduct!([-1.0, 1.0], [-1.0, 1.0]) {
            vertices.push(Vec3::new(0.0, i * PHI, j / PHI));
            vertices.push(Vec3::new(i / PHI, 0.0, j * PHI));
            vertices.push(Vec3::new(i * PHI, j / PHI, 0.0));
        }

        let align = alignment(normals[4].normalize(), normals[8].normalize());
        let orient = |v: Vec3| align.rotate_vector(v.normalize());
        Self {
            params,
            normals: normals.into_iter().map(orient).collect(),
            vertices: vertices.into_iter().map(orient).collect(),
        }
    }

    /// Returns the parameters.
    pub fn params(&self) -> &MegaminxParams {
        &self.params
    }

    /// Returns the faces adjacent to face `i`.
    fn neighbors(&self, i: usize) -> impl '_ + Iterator<Item = usize> {
        let n = self.normals[i];
        (0..self.normals.len())
            .filter(move |&j| j != i && (self.normals[j] - n).magnitude() < NEIGHBOR_DISTANCE)
    }

    /// Returns the `count` faces whose normals are nearest to `dir`.
    fn closest_faces(&self, dir: Vec3, count: usize) -> Vec<usize> {
        (0..self.normals.len())
            .sorted_by_key(|&i| FloatOrd((self.normals[i] - dir).magnitude()))
            .take(count)
            .collect()
    }

    /// Returns the endpoints of every edge of the dodecahedron.
    fn edge_directions(&self) -> Vec<(Vec3, Vec3)> {
        self.vertices
            .iter()
            .tuple_combinations()
            .filter(|(a, b)| {
                let d = (**a - **b).magnitude();
                EDGE_LENGTH_MIN < d && d < EDGE_LENGTH_MAX
            })
            .map(|(&a, &b)| (a, b))
            .collect()
    }

    fn build_piece(
        &self,
        kind: PieceKind,
        set: &ConstraintSet,
        faces: &[usize],
    ) -> Result<Piece, twistyshape::ShapeError> {
        let sticker_faces = faces
            .iter()
            .map(|&face| StickerFace {
                face,
                normal: self.normals[face],
                distance: self.params.surface_distance,
                tolerance: self.params.face_tolerance,
            })
            .collect_vec();
        let gap = self.params.gap;
        synthesize_piece(kind, set, &sticker_faces, &self.params.sticker, |c| {
            if c.magnitude2() > EPSILON {
                c.normalize() * gap
            } else {
                Vec3::zero()
            }
        })
    }

    fn center(&self, i: usize) -> ConstraintSet {
        let p = &self.params;
        let n = &self.normals;
        let mut set = ConstraintSet::new();
        let surface = set.add(n[i], p.surface_distance, ConstraintKind::Surface);
        let cuts = self
            .neighbors(i)
            .filter_map(|m| set.add(n[m], p.cut_distance, ConstraintKind::Cut))
            .collect_vec();
        set.add(-n[i], -0.2 * p.radius, ConstraintKind::Core);
        set.add_fillets(
            surface.into_iter().cartesian_product(cuts),
            p.fillet_radius,
            p.fillet_steps,
        );
        set
    }

    fn corner(&self, vertex: Vec3, faces: &[usize]) -> ConstraintSet {
        let p = &self.params;
        let n = &self.normals;
        let mut set = ConstraintSet::new();
        let surfaces = faces
            .iter()
            .filter_map(|&f| Some((f, set.add(n[f], p.surface_distance, ConstraintKind::Surface)?)))
            .collect_vec();
        let inners = faces
            .iter()
            .filter_map(|&f| Some((f, set.add(-n[f], -p.cut_distance, ConstraintKind::CutInner)?)))
            .collect_vec();
        set.add(-vertex, -0.4 * p.radius, ConstraintKind::Core);

        let (r, steps) = (p.fillet_radius, p.fillet_steps);
        set.add_fillets(surfaces.iter().map(|&(_, c)| c).tuple_combinations(), r, steps);
        let cross = surfaces
            .iter()
            .cartesian_product(&inners)
            .filter(|((a, _), (b, _))| a != b)
            .map(|((_, s), (_, c))| (*s, *c))
            .collect_vec();
        set.add_fillets(cross, r, steps);
        set.add_fillets(inners.iter().map(|&(_, c)| c).tuple_combinations(), r, steps);
        set
    }

    fn edge(&self, dir: Vec3, faces: &[usize]) -> ConstraintSet {
        let p = &self.params;
        let n = &self.normals;
        let mut set = ConstraintSet::new();
        let surfaces = faces
            .iter()
            .filter_map(|&f| set.add(n[f], p.surface_distance, ConstraintKind::Surface))
            .collect_vec();
        let inners = faces
            .iter()
            .filter_map(|&f| set.add(-n[f], -p.cut_distance, ConstraintKind::CutInner))
            .collect_vec();
        for m in (0..n.len()).filter(|m| !faces.contains(m)) {
            set.add(n[m], p.cut_distance, ConstraintKind::CutBound);
        }
        set.add(-dir, -0.4 * p.radius, ConstraintKind::Core);

        let (r, steps) = (p.fillet_radius, p.fillet_steps);
        set.add_fillets(surfaces.iter().copied().tuple_combinations(), r, steps);
        // Each surface meets the inner cut of the other face.
        set.add_fillets(
            surfaces.iter().copied().zip(inners.iter().copied().rev()),
            r,
            steps,
        );
        set.add_fillets(inners.iter().copied().tuple_combinations(), r, steps);
        set
    }

    fn face_name(axis: usize) -> String {
        match FACE_NAMES.get(axis) {
            Some(name) => name.to_string(),
            None => format!("F{axis}"),
        }
    }

    fn parse_face(name: &str) -> Option<usize> {
        if let Some(axis) = FACE_NAMES.iter().position(|&n| n == name) {
            return Some(axis);
        }
        name.strip_prefix('F')?.parse().ok()
    }
}

/// Returns the rotation that puts face `up` on top and turns face `front`
/// toward the viewer, then spins the result to a pleasant starting angle.
fn alignment(up: Vec3, front: Vec3) -> Quat {
    let q1 = rotation_between(up, Vec3::unit_y());
    let f = q1.rotate_vector(front);
    let q2 = rotation_between(Vec3::new(f.x, 0.0, f.z), Vec3::unit_z());
    let spin = axis_angle(Vec3::unit_y(), 165.0_f64.to_radians());
    (spin * q2 * q1).normalize()
}

impl PuzzleFamily for Megaminx {
    fn name(&self) -> String {
        "Megaminx".to_string()
    }

    fn cycle_length(&self) -> u32 {
        5
    }
    fn face_normals(&self) -> Vec<Vec3> {
        self.normals.clone()
    }
    fn symmetry_generators(&self) -> Vec<Quat> {
        face_rotation_generators(&[self.normals[0], self.normals[4]], 5)
    }
    fn axes(&self) -> Vec<Vec3> {
        self.normals.clone()
    }

    fn synthesize(&self, logger: &Logger) -> Vec<Piece> {
        let mut pieces = vec![];
        for i in 0..self.normals.len() {
            let piece = self.build_piece(PieceKind::Center, &self.center(i), &[i]);
            push_piece(&mut pieces, logger, format_args!("center {i}"), piece);
        }
        for (i, &v) in self.vertices.iter().enumerate() {
            let faces = self.closest_faces(v, 3);
            let piece = self.build_piece(PieceKind::Corner, &self.corner(v, &faces), &faces);
            push_piece(&mut pieces, logger, format_args!("corner {i}"), piece);
        }
        for (a, b) in self.edge_directions() {
            let dir = (a + b).normalize();
            let faces = self.closest_faces(dir, 2);
            let piece = self.build_piece(PieceKind::Edge, &self.edge(dir, &faces), &faces);
            push_piece(&mut pieces, logger, format_args!("edge {faces:?}"), piece);
        }
        pieces
    }

    fn slice_contains(&self, axis: usize, threshold: Float, position: Vec3) -> bool {
        let Some(a) = self.normals.get(axis) else {
            return false;
        };
        position.magnitude2() > EPSILON && position.normalize().dot(*a) > threshold
    }
    fn legal_slices(&self, axis: usize) -> Vec<Slice> {
        if axis < self.normals.len() {
            vec![Slice::Threshold(*FACE_SLICE), Slice::Threshold(*WIDE_SLICE)]
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
        if similarity <= 0.8 {
            return None;
        }
        let pos = piece.position();
        let anchor = pick
            .point
            .map(|p| view.world_to_puzzle(p))
            .or_else(|| piece.sticker_center(clicked))
            .unwrap_or(pos);
        let candidates = self
            .neighbors(face)
            .filter(|&m| self.slice_contains(m, *FACE_SLICE, pos))
            .map(|axis| DragCandidate {
                axis,
                rotation_axis: self.normals[axis],
                tangent: self.normals[axis].cross(anchor),
                slice: Slice::Threshold(*FACE_SLICE),
            })
            .collect_vec();
        best_candidate(&score_candidates(view, anchor, candidates, drag), MIN_DRAG_SCORE)
    }

    fn notation(&self, mv: Move) -> Option<String> {
        if mv.axis >= self.normals.len() {
            return None;
        }
        let turns = normalize_turns(mv.turns, 5);
        let suffix = match turns {
            -1 => "",
            1 => "'",
            -2 => "2",
            2 => "2'",
            _ => return None,
        };
        let name = Self::face_name(mv.axis);
        match mv.slice {
            Slice::WholePuzzle => Some(format!("{ROTATE_PREFIX}{name}{suffix}")),
            Slice::Threshold(t) if (t - *FACE_SLICE).abs() < 0.1 => Some(format!("{name}{suffix}")),
            Slice::Threshold(t) if (t - *WIDE_SLICE).abs() < 0.1 => {
                let (_, wide) = WIDE_NAMES.iter().find(|&&(axis, _)| axis == mv.axis)?;
                match turns {
                    -2 => Some(format!("{wide}++")),
                    2 => Some(format!("{wide}--")),
                    _ => None,
                }
            }
            Slice::Threshold(_) => None,
        }
    }

    fn parse_notation(&self, token: &str) -> Result<Move, NotationError> {
        if token.is_empty() {
            return Err(NotationError::Empty);
        }
        let unknown = || NotationError::UnknownMove(token.to_string());
        let bad_suffix = |suffix: &str| NotationError::BadSuffix {
            token: token.to_string(),
            suffix: suffix.to_string(),
        };
        let (base, suffix) = split_suffix(token);

        if matches!(suffix, "++" | "--") {
            let &(axis, _) = WIDE_NAMES
                .iter()
                .find(|&&(_, name)| name == base)
                .ok_or_else(unknown)?;
            return Ok(Move {
                axis,
                slice: Slice::Threshold(*WIDE_SLICE),
                turns: if suffix == "++" { -2 } else { 2 },
            });
        }

        let turns = match suffix {
            "" => -1,
            "'" => 1,
            "2" => -2,
            "2'" => 2,
            _ => return Err(bad_suffix(suffix)),
        };
        let (name, slice) = match base.strip_prefix(ROTATE_PREFIX) {
            Some(rest) => (rest, Slice::WholePuzzle),
            None => (base, Slice::Threshold(*FACE_SLICE)),
        };
        let axis = Self::parse_face(name)
            .filter(|&axis| axis < self.normals.len())
            .ok_or_else(unknown)?;
        Ok(Move { axis, slice, turns })
    }

    fn scramble(&self, rng: &mut dyn RngCore) -> Vec<Move> {
        let mut moves = vec![];
        for _ in 0..self.params.scramble_lines {
            for j in 0..self.params.scramble_line_length {
                let (axis, _) = WIDE_NAMES[j % 2];
                moves.push(Move {
                    axis,
                    slice: Slice::Threshold(*WIDE_SLICE),
                    turns: if rng.random_bool(0.5) { -2 } else { 2 },
                });
            }
            moves.push(Move {
                axis: U_AXIS,
                slice: Slice::Threshold(*FACE_SLICE),
                turns: if rng.random_bool(0.5) { -1 } else { 1 },
            });
        }
        moves
    }

    fn locked_rotation_axes(&self) -> Option<[Vec3; 3]> {
        Some([
            Vec3::unit_y(),
            Vec3::new(-1.0, 0.6, 0.5).normalize(),
            Vec3::new(1.0, 0.6, 0.5).normalize(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use twistymath::assert_approx_eq;

    use super::*;

    #[test]
    fn test_face_slice_threshold_is_between_layers() {
        let phi2 = PHI * PHI;
        let vertex_cos = phi2 / (3.0 * (1.0 + phi2)).sqrt();
        let edge_cos = 1.0 / (1.0 + phi2).sqrt();
        assert!(edge_cos < *FACE_SLICE && *FACE_SLICE < vertex_cos);
        assert_approx_eq!((vertex_cos + edge_cos) / 2.0, *FACE_SLICE);
        assert_approx_eq!(*FACE_SLICE, 0.660, 1e-3);
        assert_approx_eq!(*WIDE_SLICE, -*FACE_SLICE);
    }

    #[test]
    fn test_dodecahedron() {
        let m = Megaminx::default();
        assert_eq!(m.vertices.len(), 20);
        assert_eq!(m.edge_directions().len(), 30);
        for i in 0..12 {
            assert_eq!(m.neighbors(i).count(), 5);
        }
        // Face 4 is on top after alignment.
        assert_approx_eq!(m.normals[4].y, 1.0, 1e-9);
    }

    #[test]
    fn test_wide_notation() {
        let m = Megaminx::default();
        let mv = m.parse_notation("R++").expect("valid");
        assert_eq!(mv.axis, 2);
        assert_eq!(mv.turns, -2);
        assert_eq!(m.notation(mv).as_deref(), Some("R++"));
        assert_eq!(m.notation(mv.inverse()).as_deref(), Some("R--"));
        // Single wide turns have no name.
        assert_eq!(m.notation(Move { turns: 1, ..mv }), None);
        assert_eq!(m.parse_notation("D--").map(|mv| mv.axis), Ok(7));
        assert!(m.parse_notation("U++").is_err());
    }

    #[test]
    fn test_scramble_shape() {
        let m = Megaminx::default();
        let mut rng = rand::rng();
        let moves = m.scramble(&mut rng);
        assert_eq!(moves.len(), 77);
        let tokens = moves.iter().filter_map(|&mv| m.notation(mv)).collect_vec();
        assert_eq!(tokens.len(), 77);
        for line in tokens.chunks(11) {
            assert!(line[10] == "U" || line[10] == "U'");
            assert!(line[0].starts_with('R') && line[1].starts_with('D'));
        }
    }
}
