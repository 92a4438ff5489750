//! Half-space intersection, fillets, and sticker outlines for the pieces of
//! polyhedral twisty puzzles.
//!
//! Every piece is the intersection of a set of half-spaces `n·x ≤ k`. This
//! crate finds the vertices of that intersection, groups them into faces, and
//! derives rounded sticker outlines from those faces.

mod constraint;
mod error;
mod intersect;
mod polyhedron;
pub mod sticker;

pub use constraint::*;
pub use error::ShapeError;
pub use intersect::*;
pub use polyhedron::*;
pub use sticker::StickerStyle;

use twistymath::Float;

/// Minimum absolute determinant for three planes to be considered independent.
pub const DETERMINANT_EPSILON: Float = 1e-6;
/// Tolerance when testing whether a point satisfies a constraint.
pub const CONTAINMENT_TOLERANCE: Float = 1e-4;
/// Distance below which two intersection points are merged.
pub const MERGE_DISTANCE: Float = 1e-3;
/// Tolerance when testing whether a vertex lies on a face plane.
pub const FACE_TOLERANCE: Float = 5e-4;
