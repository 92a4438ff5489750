use itertools::Itertools;
use twistymath::prelude::*;

use crate::{
    BoxDynPuzzleFamily, Logger, Move, NotationError, Piece, PieceId, Slice, SymmetryRegistry,
    unit_angle,
};

/// Minimum dot product between a sticker's normal and a face direction for the
/// sticker to count as facing that direction.
const FACING_DOT: Float = 0.9;

/// Error returned when a move cannot be performed.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MoveError {
    #[error("no axis with index {0}")]
    NoSuchAxis(usize),
    #[error("slice {slice} on axis {axis} contains no pieces")]
    EmptySlice { axis: usize, slice: Slice },
    #[error("faces on axis {0} only accept half turns")]
    HalfTurnsOnly(usize),
    #[error("another move or drag is in progress")]
    Busy,
    #[error(transparent)]
    Notation(#[from] NotationError),
}

/// Puzzle context: the family, its symmetry, and every piece.
#[derive(Debug)]
pub struct Puzzle {
    family: BoxDynPuzzleFamily,
    registry: SymmetryRegistry,
    axes: Vec<Vec3>,
    pieces: Vec<Piece>,
    logger: Logger,
}

impl Puzzle {
    /// Builds a puzzle in its solved state.
    pub fn new(family: impl Into<BoxDynPuzzleFamily>) -> Self {
        let family = family.into();
        let registry = SymmetryRegistry::new(
            family.face_normals(),
            family.cycle_length(),
            &family.symmetry_generators(),
        );
        let axes = family.axes();
        let logger = Logger::new();
        let pieces = family.synthesize(&logger);
        log::debug!(
            "built {} with {} pieces and {} orientations",
            family.name(),
            pieces.len(),
            registry.valid_orientations().len(),
        );
        Self {
            family,
            registry,
            axes,
            pieces,
            logger,
        }
    }

    /// Returns the puzzle family.
    pub fn family(&self) -> &BoxDynPuzzleFamily {
        &self.family
    }
    /// Returns the symmetry registry.
    pub fn registry(&self) -> &SymmetryRegistry {
        &self.registry
    }
    /// Returns every piece.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
    /// Returns a piece.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }
    /// Returns the IDs of every piece.
    pub fn piece_ids(&self) -> impl Iterator<Item = PieceId> + use<> {
        (0..self.pieces.len()).map(PieceId)
    }
    /// Returns the build log, which lists pieces that could not be built.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Returns the number of turns in a full rotation.
    pub fn cycle_length(&self) -> u32 {
        self.registry.cycle_length()
    }
    /// Returns the angle of a single turn.
    pub fn unit_angle(&self) -> Float {
        unit_angle(self.registry.cycle_length())
    }
    /// Returns the unit vector of an axis.
    pub fn axis_vector(&self, axis: usize) -> Option<Vec3> {
        self.axes.get(axis).copied()
    }
    /// Returns the number of axes.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Returns the pieces belonging to a slice, based on their current
    /// positions. Returns an empty list if the axis does not exist.
    pub fn select_slice(&self, axis: usize, slice: Slice) -> Vec<PieceId> {
        if axis >= self.axes.len() {
            return vec![];
        }
        match slice {
            Slice::WholePuzzle => self.piece_ids().collect(),
            Slice::Threshold(threshold) => self
                .piece_ids()
                .filter(|&id| {
                    let pos = self.pieces[id.0].position();
                    self.family.slice_contains(axis, threshold, pos)
                })
                .collect(),
        }
    }

    /// Checks that a move can be performed and returns the pieces it would
    /// rotate.
    pub fn validate(&self, mv: Move) -> Result<Vec<PieceId>, MoveError> {
        if mv.axis >= self.axes.len() {
            return Err(MoveError::NoSuchAxis(mv.axis));
        }
        if mv.slice != Slice::WholePuzzle
            && mv.turns % 2 != 0
            && self.family.requires_half_turns(mv.axis)
        {
            return Err(MoveError::HalfTurnsOnly(mv.axis));
        }
        let pieces = self.select_slice(mv.axis, mv.slice);
        if pieces.is_empty() {
            return Err(MoveError::EmptySlice {
                axis: mv.axis,
                slice: mv.slice,
            });
        }
        Ok(pieces)
    }

    /// Returns the rotation of `angle` radians around an axis.
    pub fn rotation(&self, axis: usize, angle: Float) -> Quat {
        match self.axis_vector(axis) {
            Some(v) => axis_angle(v, angle),
            None => Quat::one(),
        }
    }

    /// Rotates `pieces` by a move and snaps their orientations to the nearest
    /// valid orientation.
    ///
    /// Snapping runs after every move, because the rotation accumulates
    /// floating-point error.
    pub fn commit(&mut self, mv: Move, pieces: &[PieceId]) {
        let rotation = self.rotation(mv.axis, mv.turns as Float * self.unit_angle());
        for &id in pieces {
            let Some(piece) = self.pieces.get_mut(id.0) else {
                twistymath::debug_panic!("{id} does not exist");
                continue;
            };
            piece.rotate_by(rotation);
            piece.orientation = self.registry.snap(piece.orientation);
        }
        self.family.after_move(mv);
    }

    /// Performs a move immediately, without animation.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), MoveError> {
        let pieces = self.validate(mv)?;
        self.commit(mv, &pieces);
        Ok(())
    }

    /// Parses and performs a move immediately.
    pub fn apply_notation(&mut self, token: &str) -> Result<Move, MoveError> {
        let mv = self.family.parse_notation(token)?;
        self.apply_move(mv)?;
        Ok(mv)
    }

    /// Returns the notation for a move, after normalizing its turns.
    pub fn notation(&self, mv: Move) -> Option<String> {
        self.family.notation(self.normalize(mv))
    }

    /// Returns the move with its turns reduced into the shortest range.
    pub fn normalize(&self, mv: Move) -> Move {
        Move {
            turns: crate::normalize_turns(mv.turns, self.cycle_length()),
            ..mv
        }
    }

    /// Returns whether the puzzle is solved.
    pub fn is_solved(&self) -> bool {
        self.family.is_solved(&self.pieces)
    }

    /// Returns the groups of pieces that always move together on an axis:
    /// pieces belonging to exactly the same legal slices.
    pub fn layer_partition(&self, axis: usize) -> Vec<Vec<PieceId>> {
        let selections = self
            .family
            .legal_slices(axis)
            .into_iter()
            .map(|slice| self.select_slice(axis, slice))
            .collect_vec();
        self.piece_ids()
            .into_group_map_by(|id| selections.iter().map(|s| s.contains(id)).collect_vec())
            .into_values()
            .sorted()
            .collect()
    }
}

/// Returns whether, for every direction, the stickers facing it exist and
/// share a single color.
pub fn stickers_uniform(pieces: &[Piece], directions: &[Vec3]) -> bool {
    directions.iter().all(|&dir| {
        let colors = pieces
            .iter()
            .flat_map(|piece| {
                piece
                    .stickers
                    .iter()
                    .filter(move |s| piece.transform_vector(s.normal).dot(dir) > FACING_DOT)
                    .map(|s| s.color)
            })
            .collect_vec();
        !colors.is_empty() && colors.iter().all_equal()
    })
}
