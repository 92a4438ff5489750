use std::fmt;

use float_ord::FloatOrd;
use serde::Serialize;
use smallvec::SmallVec;
use twistymath::prelude::*;
use twistyshape::sticker::sticker_outline;
use twistyshape::{ConstraintSet, Polyhedron, ShapeError, StickerStyle};

use crate::Logger;

/// Index of a piece within a puzzle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PieceId(pub usize);
impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece #{}", self.0)
    }
}

/// Structural role of a piece.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PieceKind {
    /// Small piece at a vertex that turns on its own.
    Tip,
    /// Piece at the center of a face or axis.
    Center,
    /// Piece along an edge.
    Edge,
    /// Piece at a corner.
    Corner,
    /// Any other piece.
    Generic,
}

/// Colored facet on the outside of a piece.
#[derive(Debug, Clone, PartialEq)]
pub struct Sticker {
    /// Index of the puzzle face that this sticker sits on.
    pub face: usize,
    /// Color index. Equal to `face` unless every sticker of the puzzle shares
    /// one color.
    pub color: usize,
    /// Outward normal in the piece's rest frame.
    pub normal: Vec3,
    /// Closed outline in the piece's rest frame.
    pub outline: Vec<Vec3>,
}

/// Physical piece of a puzzle.
///
/// Geometry is stored in the rest frame. The current location of any point of
/// the piece is `orientation * p + offset`.
#[derive(Debug, Clone)]
pub struct Piece {
    /// Structural role.
    pub kind: PieceKind,
    /// Puzzle faces that this piece touches.
    pub faces: SmallVec<[usize; 4]>,
    /// Renderable hull, including rounded edges and visual gap.
    pub mesh: Polyhedron,
    /// Stickers.
    pub stickers: Vec<Sticker>,
    /// Point that the piece turns with, in the rest frame. Usually its
    /// centroid. Never changes.
    pub initial_centroid: Vec3,
    /// Current orientation.
    pub orientation: Quat,
    /// Current translation.
    pub offset: Vec3,
}

impl Piece {
    /// Returns the logical position of the piece, which is its
    /// [`Piece::initial_centroid`] transformed by its current orientation and
    /// offset.
    pub fn position(&self) -> Vec3 {
        self.transform_point(self.initial_centroid)
    }
    /// Transforms a point from the rest frame to the current frame.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.orientation.rotate_vector(p) + self.offset
    }
    /// Transforms a direction from the rest frame to the current frame.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.orientation.rotate_vector(v)
    }
    /// Returns the current center of the sticker whose current normal is
    /// closest to `normal`, or `None` if the piece has no stickers.
    ///
    /// Unlike [`Self::position()`], this is never on a turning axis unless the
    /// sticker itself is centered on one.
    pub fn sticker_center(&self, normal: Vec3) -> Option<Vec3> {
        let sticker = self
            .stickers
            .iter()
            .filter(|s| !s.outline.is_empty())
            .max_by_key(|s| FloatOrd(self.transform_vector(s.normal).dot(normal)))?;
        let sum = sticker.outline.iter().fold(Vec3::zero(), |acc, &p| acc + p);
        Some(self.transform_point(sum / sticker.outline.len() as Float))
    }
    /// Rotates the piece around an axis through the origin.
    pub fn rotate_by(&mut self, rotation: Quat) {
        self.orientation = (rotation * self.orientation).normalize();
        self.offset = rotation.rotate_vector(self.offset);
    }
}

/// Surface plane on which a piece may carry a sticker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StickerFace {
    /// Puzzle face index, also used as the default sticker color.
    pub face: usize,
    /// Outward unit normal of the face.
    pub normal: Vec3,
    /// Distance of the face plane from the origin.
    pub distance: Float,
    /// Maximum distance of a hull vertex from the plane.
    pub tolerance: Float,
}

/// Builds a piece from its constraints.
///
/// The centroid and sticker polygons come from the intersection of the base
/// constraints without fillets, so that rounded edges do not shrink the
/// stickers. `gap` receives that centroid and returns the visual offset
/// applied to the mesh and stickers.
pub fn synthesize_piece(
    kind: PieceKind,
    constraints: &ConstraintSet,
    sticker_faces: &[StickerFace],
    style: &StickerStyle,
    gap: impl FnOnce(Vec3) -> Vec3,
) -> Result<Piece, ShapeError> {
    let proxy = Polyhedron::from_constraints(&constraints.base())?;
    let initial_centroid = proxy.centroid().center();
    let gap_offset = gap(initial_centroid);

    let mesh = Polyhedron::from_constraints(constraints.all())?.translated(gap_offset);

    let stickers = sticker_faces
        .iter()
        .filter_map(|sf| {
            let points = proxy.points_on_plane(sf.normal, sf.distance, sf.tolerance);
            match sticker_outline(&points, sf.normal, style) {
                Some(outline) => Some(Sticker {
                    face: sf.face,
                    color: sf.face,
                    normal: sf.normal.normalize(),
                    outline: outline.into_iter().map(|p| p + gap_offset).collect(),
                }),
                None => {
                    log::debug!("skipping sticker on face {} of {kind} piece", sf.face);
                    None
                }
            }
        })
        .collect();

    Ok(Piece {
        kind,
        faces: sticker_faces.iter().map(|sf| sf.face).collect(),
        mesh,
        stickers,
        initial_centroid,
        orientation: Quat::one(),
        offset: Vec3::zero(),
    })
}

/// Adds a piece to `pieces` if it was built successfully. Otherwise logs the
/// failure and leaves the piece out.
pub fn push_piece(
    pieces: &mut Vec<Piece>,
    logger: &Logger,
    label: impl fmt::Display,
    result: Result<Piece, ShapeError>,
) {
    match result {
        Ok(piece) => pieces.push(piece),
        Err(e) => {
            log::warn!("omitting {label}: {e}");
            logger.warn(format!("omitting {label}: {e}"));
        }
    }
}
