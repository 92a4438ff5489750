//! N×M×K cuboids, including the ordinary N×N×N cubes.

use lazy_static::lazy_static;
use rand::{Rng, RngCore};
use regex::Regex;
use serde::{Deserialize, Serialize};
use twistymath::prelude::*;
use twistypuzzle_core::{
    DragCandidate, DragResolution, Logger, Move, NotationError, Pick, Piece, PieceKind,
    PuzzleFamily, Slice, StickerFace, View, best_candidate, normalize_turns, octahedral_generators,
    push_piece, score_candidates, stickers_uniform, synthesize_piece,
};
use twistyshape::{ConstraintKind, ConstraintSet, StickerStyle};

/// Tolerance when comparing a piece's coordinate to a layer position.
const LAYER_TOLERANCE: Float = 0.01;

/// Names of the positive outer layer, negative outer layer, middle layer,
/// and whole-puzzle rotation on each axis.
const AXIS_NAMES: [[char; 4]; 3] = [['R', 'L', 'M', 'x'], ['U', 'D', 'E', 'y'], ['F', 'B', 'S', 'z']];
/// Clockwise turn direction of each middle layer. `M` and `E` follow the
/// negative face; `S` follows the positive face.
const MIDDLE_CLOCKWISE: [i32; 3] = [1, 1, -1];

/// How far the outer boundaries of a mirror cube move along each axis, in
/// units of the cubie spacing. Both boundaries move the same way, so every
/// layer along an axis has a different thickness.
const MIRROR_SHIFT: [Float; 3] = [0.1, -0.7, 0.4];
/// Color of every sticker on a mirror cube.
const MIRROR_COLOR: usize = 0;
/// Tolerance when comparing the positions and extents of mirror cubies.
const SHAPE_TOLERANCE: Float = 0.05;

/// Minimum alignment between a drag and a turn's screen direction.
///
/// Zero accepts every drag that moves at all. The two turns available from a
/// face have perpendicular tangents, so the better of them is always picked,
/// even for a diagonal drag.
const MIN_DRAG_SCORE: Float = 0.0;

lazy_static! {
    static ref TOKEN_REGEX: Regex =
        Regex::new(r"^(\d*)([RLUDFBMESxyz])(2'|2|'|)$").expect("bad regex");
}

/// Geometry parameters for a cuboid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CubeParams {
    /// Edge length of each cubie.
    pub cubie_size: Float,
    /// Distance between the centers of adjacent cubies.
    pub spacing: Float,
    /// Radius of rounded edges.
    pub fillet_radius: Float,
    /// Number of planes in each rounded edge.
    pub fillet_steps: usize,
    /// Tolerance for finding sticker polygons on a face.
    pub face_tolerance: Float,
    /// Sticker shape.
    pub sticker: StickerStyle,
}
impl Default for CubeParams {
    fn default() -> Self {
        Self {
            cubie_size: 1.0,
            spacing: 1.02,
            fillet_radius: 0.04,
            fillet_steps: 2,
            face_tolerance: 0.002,
            sticker: StickerStyle {
                scale: 0.88,
                radius: 0.15,
                offset: 0.001,
                ..Default::default()
            },
        }
    }
}

/// Variation on an ordinary cuboid.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum CubeVariant {
    /// One color per face.
    #[default]
    #[strum(serialize = "cube")]
    Standard,
    /// Layers of different thickness with every sticker the same color. It is
    /// solved when its original shape is restored.
    Mirror,
    /// 3×3×3 with no face centers and no core.
    Void,
}

/// Cuboid puzzle family.
///
/// Axes are `x`, `y`, and `z`. A slice value is the coordinate of a layer
/// along its axis. Whole-puzzle rotations change which dimension lies along
/// each axis, so the family tracks its current dimensions.
#[derive(Debug, Clone)]
pub struct Cube {
    params: CubeParams,
    variant: CubeVariant,
    size: [u32; 3],
    dims: [u32; 3],
}

impl Cube {
    /// Constructs an N×N×N cube.
    pub fn new(n: u32, params: CubeParams) -> Self {
        Self::cuboid([n, n, n], params)
    }
    /// Constructs a cuboid with `size[0]` layers along X, `size[1]` along Y,
    /// and `size[2]` along Z.
    pub fn cuboid(size: [u32; 3], params: CubeParams) -> Self {
        let size = size.map(|d| d.max(1));
        Self {
            params,
            variant: CubeVariant::Standard,
            size,
            dims: size,
        }
    }
    /// Constructs a mirror cuboid. See [`CubeVariant::Mirror`].
    pub fn mirror(size: [u32; 3], params: CubeParams) -> Self {
        Self {
            variant: CubeVariant::Mirror,
            ..Self::cuboid(size, params)
        }
    }
    /// Constructs a void cube. See [`CubeVariant::Void`].
    pub fn void(params: CubeParams) -> Self {
        Self {
            variant: CubeVariant::Void,
            ..Self::cuboid([3; 3], params)
        }
    }

    /// Returns the parameters.
    pub fn params(&self) -> &CubeParams {
        &self.params
    }
    /// Returns the variant.
    pub fn variant(&self) -> CubeVariant {
        self.variant
    }
    /// Returns the number of layers along each axis in the current
    /// orientation.
    pub fn dims(&self) -> [u32; 3] {
        self.dims
    }

    /// Returns whether the faces perpendicular to `axis` are rectangular.
    pub fn is_face_rectangular(&self, axis: usize) -> bool {
        let [a, b] = perpendicular(axis);
        self.dims[a] != self.dims[b]
    }

    /// Returns the coordinate of layer `index` along `axis`, counting from
    /// the negative side.
    pub fn layer_position(&self, axis: usize, index: u32) -> Float {
        let dim = self.dims[axis] as Float;
        (index as Float - (dim - 1.0) / 2.0) * self.params.spacing
    }

    /// Returns the lower and upper boundary of layer `index` along `axis`,
    /// including the gap between cubies.
    pub fn layer_bounds(&self, axis: usize, index: u32) -> (Float, Float) {
        let s = self.params.spacing;
        let center = self.layer_position(axis, index);
        let (mut lo, mut hi) = (center - s / 2.0, center + s / 2.0);
        let dim = self.dims[axis];
        if self.variant == CubeVariant::Mirror && dim > 1 {
            let shift = MIRROR_SHIFT[axis] * s;
            if index == 0 {
                lo += shift;
            }
            if index == dim - 1 {
                hi += shift;
            }
        }
        (lo, hi)
    }

    /// Returns the layer index at coordinate `value` along `axis`, if there
    /// is one.
    fn layer_index(&self, axis: usize, value: Float) -> Option<u32> {
        let dim = *self.dims.get(axis)?;
        let index = value / self.params.spacing + (dim as Float - 1.0) / 2.0;
        let rounded = index.round();
        ((index - rounded).abs() < 0.1 && rounded >= 0.0 && rounded < dim as Float)
            .then_some(rounded as u32)
    }

    /// Rounds a coordinate to the half-spacing grid that layer positions lie
    /// on.
    fn snap_to_grid(&self, value: Float) -> Float {
        let s = self.params.spacing;
        (value / s * 2.0).round() / 2.0 * s
    }

    fn cubie(&self, index: [u32; 3]) -> Result<Piece, twistyshape::ShapeError> {
        let p = &self.params;
        let center = Vec3::new(
            self.layer_position(0, index[0]),
            self.layer_position(1, index[1]),
            self.layer_position(2, index[2]),
        );
        let inset = (p.spacing - p.cubie_size) / 2.0;

        let mut set = ConstraintSet::new();
        let mut sticker_faces = vec![];
        let mut surfaces = vec![];
        for axis in 0..3 {
            let (lo, hi) = self.layer_bounds(axis, index[axis]);
            for (side, sign) in [(0, 1.0), (1, -1.0)] {
                let mut normal = Vec3::zero();
                normal[axis] = sign;
                let distance = match side {
                    0 => hi - inset,
                    _ => -(lo + inset),
                };
                surfaces.extend(set.add(normal, distance, ConstraintKind::Surface));

                let extreme = match side {
                    0 => self.dims[axis] - 1,
                    _ => 0,
                };
                if index[axis] == extreme {
                    sticker_faces.push(StickerFace {
                        face: axis * 2 + side,
                        normal,
                        distance,
                        tolerance: p.face_tolerance,
                    });
                }
            }
        }
        let pairs = surfaces
            .iter()
            .enumerate()
            .flat_map(|(i, &a)| surfaces[i + 1..].iter().map(move |&b| (a, b)))
            .collect::<Vec<_>>();
        set.add_fillets(pairs, p.fillet_radius, p.fillet_steps);

        let kind = match sticker_faces.len() {
            0 => PieceKind::Generic,
            1 => PieceKind::Center,
            2 => PieceKind::Edge,
            _ => PieceKind::Corner,
        };
        let gap = |_: Vec3| Vec3::zero();
        let mut piece = synthesize_piece(kind, &set, &sticker_faces, &p.sticker, gap)?;
        // Layers turn around the grid, even where a mirror cubie's bulk is
        // off center.
        piece.initial_centroid = center;
        if self.variant == CubeVariant::Mirror {
            for sticker in &mut piece.stickers {
                sticker.color = MIRROR_COLOR;
            }
        }
        Ok(piece)
    }

    fn scramble_length(&self) -> usize {
        match self.dims.iter().max().copied().unwrap_or(1) {
            0..=2 => 15,
            3 => 25,
            4 => 40,
            _ => 60,
        }
    }
}

/// Returns the size of the piece's bounding box in its rest frame.
fn rest_extent(piece: &Piece) -> Vec3 {
    let vertices = piece.mesh.vertices();
    let mut extent = Vec3::zero();
    for axis in 0..3 {
        let coords = vertices.iter().map(|v| v[axis]);
        let (lo, hi) = coords.fold((Float::INFINITY, Float::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        if lo <= hi {
            extent[axis] = hi - lo;
        }
    }
    extent
}

/// Returns whether every piece is back in its home slot and turned so that
/// its bounding box has its original proportions, relative to the first
/// piece. Symmetric pieces may be turned in place and the whole puzzle may
/// have any orientation.
fn shapes_restored(pieces: &[Piece]) -> bool {
    let Some(reference) = pieces.first() else {
        return false;
    };
    let undo = reference.orientation.invert();
    pieces.iter().all(|piece| {
        let home = undo.rotate_vector(piece.position());
        let extent = rest_extent(piece);
        let turned = (undo * piece.orientation).rotate_vector(extent);
        let turned = Vec3::new(turned.x.abs(), turned.y.abs(), turned.z.abs());
        points_within(home, piece.initial_centroid, SHAPE_TOLERANCE)
            && points_within(turned, extent, SHAPE_TOLERANCE)
    })
}

/// Returns the two axes perpendicular to `axis`.
fn perpendicular(axis: usize) -> [usize; 2] {
    [(axis + 1) % 3, (axis + 2) % 3]
}

impl PuzzleFamily for Cube {
    fn name(&self) -> String {
        let [x, y, z] = self.size;
        match self.variant {
            CubeVariant::Standard => format!("{x}x{y}x{z}"),
            CubeVariant::Mirror => format!("{x}x{y}x{z} Mirror"),
            CubeVariant::Void => "Void Cube".to_string(),
        }
    }

    fn cycle_length(&self) -> u32 {
        4
    }
    fn face_normals(&self) -> Vec<Vec3> {
        vec![
            Vec3::unit_x(),
            -Vec3::unit_x(),
            Vec3::unit_y(),
            -Vec3::unit_y(),
            Vec3::unit_z(),
            -Vec3::unit_z(),
        ]
    }
    fn symmetry_generators(&self) -> Vec<Quat> {
        octahedral_generators()
    }
    fn axes(&self) -> Vec<Vec3> {
        vec![Vec3::unit_x(), Vec3::unit_y(), Vec3::unit_z()]
    }

    fn synthesize(&self, logger: &Logger) -> Vec<Piece> {
        let [dx, dy, dz] = self.dims;
        let on_surface = |i: u32, d: u32| usize::from(i == 0 || i == d - 1);
        // Void cubes leave out every piece with fewer than two stickers.
        let min_surfaces = match self.variant {
            CubeVariant::Void => 2,
            _ => 1,
        };
        let mut pieces = vec![];
        for (x, y, z) in itertools::iproduct!(0..dx, 0..dy, 0..dz) {
            if on_surface(x, dx) + on_surface(y, dy) + on_surface(z, dz) >= min_surfaces {
                let piece = self.cubie([x, y, z]);
                push_piece(&mut pieces, logger, format_args!("cubie ({x}, {y}, {z})"), piece);
            }
        }
        pieces
    }

    fn slice_contains(&self, axis: usize, threshold: Float, position: Vec3) -> bool {
        axis < 3 && (position[axis] - threshold).abs() < LAYER_TOLERANCE
    }
    fn legal_slices(&self, axis: usize) -> Vec<Slice> {
        match self.dims.get(axis) {
            Some(&dim) => (0..dim)
                .map(|i| Slice::Threshold(self.layer_position(axis, i)))
                .collect(),
            None => vec![],
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
        let face = dominant_axis(view.world_to_puzzle(pick.face_normal));
        let pos = piece.position();
        let anchor = pick.point.map_or(pos, |p| view.world_to_puzzle(p));
        let candidates = perpendicular(face).map(|axis| {
            let mut rotation_axis = Vec3::zero();
            rotation_axis[axis] = 1.0;
            DragCandidate {
                axis,
                rotation_axis,
                tangent: rotation_axis.cross(anchor),
                slice: Slice::Threshold(self.snap_to_grid(pos[axis])),
            }
        });
        best_candidate(&score_candidates(view, anchor, candidates, drag), MIN_DRAG_SCORE)
    }

    fn notation(&self, mv: Move) -> Option<String> {
        let names = AXIS_NAMES.get(mv.axis)?;
        let (name, clockwise) = match mv.slice {
            Slice::WholePuzzle => (names[3].to_string(), -1),
            Slice::Threshold(value) => {
                let dim = self.dims[mv.axis];
                let index = self.layer_index(mv.axis, value)?;
                if index == dim - 1 {
                    (names[0].to_string(), -1)
                } else if index == 0 {
                    (names[1].to_string(), 1)
                } else if dim % 2 == 1 && index == dim / 2 {
                    (names[2].to_string(), MIDDLE_CLOCKWISE[mv.axis])
                } else if value > 0.0 {
                    (format!("{}{}", dim - index, names[0]), -1)
                } else {
                    (format!("{}{}", index + 1, names[1]), 1)
                }
            }
        };
        let suffix = match normalize_turns(mv.turns * clockwise, 4) {
            0 => return None,
            1 => "",
            -1 => "'",
            _ => "2",
        };
        Some(format!("{name}{suffix}"))
    }

    fn parse_notation(&self, token: &str) -> Result<Move, NotationError> {
        if token.is_empty() {
            return Err(NotationError::Empty);
        }
        let unknown = || NotationError::UnknownMove(token.to_string());
        let caps = TOKEN_REGEX.captures(token).ok_or_else(unknown)?;
        let depth = &caps[1];
        let letter = caps[2].chars().next().ok_or_else(unknown)?;
        let suffix = &caps[3];

        let (axis, role) = AXIS_NAMES
            .iter()
            .enumerate()
            .find_map(|(axis, names)| Some((axis, names.iter().position(|&c| c == letter)?)))
            .ok_or_else(unknown)?;
        if !depth.is_empty() && role >= 2 {
            return Err(unknown());
        }
        let dim = self.dims[axis];
        let depth: u32 = match depth {
            "" => 1,
            d => d.parse().map_err(|_| unknown())?,
        };
        if depth == 0 || depth > dim {
            return Err(NotationError::NoSuchLayer {
                token: token.to_string(),
                layer: depth as usize,
            });
        }

        let (slice, clockwise) = match role {
            0 => (Slice::Threshold(self.layer_position(axis, dim - depth)), -1),
            1 => (Slice::Threshold(self.layer_position(axis, depth - 1)), 1),
            2 if dim % 2 == 1 => (
                Slice::Threshold(self.layer_position(axis, dim / 2)),
                MIDDLE_CLOCKWISE[axis],
            ),
            2 => return Err(unknown()),
            _ => (Slice::WholePuzzle, -1),
        };
        let turns = match suffix {
            "" => clockwise,
            "'" => -clockwise,
            "2" => 2,
            _ => -2,
        };
        Ok(Move { axis, slice, turns })
    }

    fn scramble(&self, rng: &mut dyn RngCore) -> Vec<Move> {
        let weights = self.dims.map(|d| if d > 1 { d } else { 0 });
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return vec![];
        }

        let mut moves: Vec<Move> = vec![];
        let mut last = None;
        while moves.len() < self.scramble_length() {
            let mut r = rng.random_range(0..total);
            let axis = weights
                .iter()
                .position(|&w| {
                    if r < w {
                        true
                    } else {
                        r -= w;
                        false
                    }
                })
                .unwrap_or(0);
            let layer = rng.random_range(0..self.dims[axis]);
            if last == Some((axis, layer)) {
                continue;
            }
            last = Some((axis, layer));

            let turns = if self.is_face_rectangular(axis) {
                2
            } else {
                [1, -1, 2][rng.random_range(0..3)]
            };
            moves.push(Move {
                axis,
                slice: Slice::Threshold(self.layer_position(axis, layer)),
                turns,
            });
        }
        moves
    }

    fn is_solved(&self, pieces: &[Piece]) -> bool {
        match self.variant {
            CubeVariant::Mirror => shapes_restored(pieces),
            _ => stickers_uniform(pieces, &self.face_normals()),
        }
    }

    fn requires_half_turns(&self, axis: usize) -> bool {
        axis < 3 && self.is_face_rectangular(axis)
    }

    fn locked_rotation_axes(&self) -> Option<[Vec3; 3]> {
        Some([Vec3::unit_y(), Vec3::unit_x(), Vec3::unit_z()])
    }

    fn after_move(&mut self, mv: Move) {
        if mv.slice == Slice::WholePuzzle && mv.turns % 2 != 0 && mv.axis < 3 {
            let [a, b] = perpendicular(mv.axis);
            self.dims.swap(a, b);
        }
    }
}
