use std::any::Any;
use std::fmt;

use rand::RngCore;
use twistymath::prelude::*;

use crate::{
    DragResolution, Logger, Move, NotationError, Pick, Piece, Slice, View, stickers_uniform,
};

/// Capabilities of a family of puzzles, such as the Pyraminx or N×N×N cubes.
///
/// Axis indices passed to these methods index into [`PuzzleFamily::axes()`].
/// Positive turns rotate counterclockwise around the axis vector.
pub trait PuzzleFamily: Any + fmt::Debug + Send + Sync {
    /// Returns a human-friendly name, such as `3x3x3`.
    fn name(&self) -> String;

    /// Returns the number of turns in a full rotation around any axis.
    fn cycle_length(&self) -> u32;
    /// Returns the unit normals of the faces, indexed by color.
    fn face_normals(&self) -> Vec<Vec3>;
    /// Returns generators for the group of valid piece orientations.
    fn symmetry_generators(&self) -> Vec<Quat>;
    /// Returns the unit vector of each rotation axis.
    fn axes(&self) -> Vec<Vec3>;

    /// Builds every piece of the puzzle in its solved state. Pieces that
    /// cannot be built are reported to `logger` and left out.
    fn synthesize(&self, logger: &Logger) -> Vec<Piece>;

    /// Returns whether a piece at `position` belongs to the slice at
    /// `threshold` on an axis.
    fn slice_contains(&self, axis: usize, threshold: Float, position: Vec3) -> bool;
    /// Returns every slice that may be turned on an axis, excluding the whole
    /// puzzle.
    fn legal_slices(&self, axis: usize) -> Vec<Slice>;

    /// Resolves a drag on a piece into a rotation, or returns `None` if the
    /// drag does not clearly indicate one.
    ///
    /// `drag` is the total pointer movement in pixels since the press.
    fn resolve_drag(
        &self,
        pieces: &[Piece],
        pick: &Pick,
        drag: Vec2,
        view: &View,
    ) -> Option<DragResolution>;

    /// Returns the notation for a move, or `None` if the move has no net
    /// effect or no name.
    fn notation(&self, mv: Move) -> Option<String>;
    /// Parses a notation token. This is the inverse of
    /// [`PuzzleFamily::notation()`].
    fn parse_notation(&self, token: &str) -> Result<Move, NotationError>;

    /// Generates a random scramble.
    fn scramble(&self, rng: &mut dyn RngCore) -> Vec<Move>;

    /// Returns whether the puzzle is solved.
    ///
    /// By default, this checks that the stickers facing each face normal all
    /// have the same color.
    fn is_solved(&self, pieces: &[Piece]) -> bool {
        stickers_uniform(pieces, &self.face_normals())
    }

    /// Returns whether moves on an axis must be half turns.
    fn requires_half_turns(&self, axis: usize) -> bool {
        let _ = axis;
        false
    }

    /// Returns the camera-space directions used for locked whole-puzzle
    /// rotation: horizontal drags, vertical drags on the left, and vertical
    /// drags on the right. Returns `None` if the puzzle only supports free
    /// rotation.
    fn locked_rotation_axes(&self) -> Option<[Vec3; 3]> {
        None
    }

    /// Updates the family's own state after a move completes.
    fn after_move(&mut self, mv: Move) {
        let _ = mv;
    }
}

/// Boxed puzzle family.
pub struct BoxDynPuzzleFamily(Box<dyn PuzzleFamily>);
impl fmt::Debug for BoxDynPuzzleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxDynPuzzleFamily").field(&self.0).finish()
    }
}
impl<T: PuzzleFamily> From<T> for BoxDynPuzzleFamily {
    fn from(value: T) -> Self {
        Self(Box::new(value))
    }
}
impl BoxDynPuzzleFamily {
    /// Constructs a new boxed dynamic value.
    pub fn new<T: PuzzleFamily>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Attempts to downcast a reference to a concrete type.
    pub fn downcast_ref<T: PuzzleFamily>(&self) -> Option<&T> {
        (&*self.0 as &dyn Any).downcast_ref()
    }
}
impl std::ops::Deref for BoxDynPuzzleFamily {
    type Target = dyn PuzzleFamily;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
impl std::ops::DerefMut for BoxDynPuzzleFamily {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.0
    }
}
