//! Polyhedral twisty puzzle backend: symmetry, slicing, drag resolution, and
//! the move state machine.
//!
//! Concrete puzzles implement [`PuzzleFamily`]. A [`Puzzle`] holds the pieces
//! of one family and performs moves immediately. A [`PuzzleController`] wraps
//! a puzzle with animation, pointer interaction, scrambling, and history.

#[macro_use]
extern crate strum;

pub mod animation;
mod camera;
mod controller;
mod drag;
mod family;
mod interaction;
mod logging;
mod machine;
mod notation;
mod piece;
mod puzzle;
mod reverse;
mod scramble;
mod symmetry;
mod twist;

/// Re-export of `twistymath`.
pub use twistymath;
/// Re-export of `twistyshape`.
pub use twistyshape;

pub use animation::Tween;
pub use camera::*;
pub use controller::PuzzleController;
pub use drag::*;
pub use family::*;
pub use interaction::*;
pub use logging::*;
pub use machine::*;
pub use notation::*;
pub use piece::*;
pub use puzzle::*;
pub use reverse::*;
pub use scramble::*;
pub use symmetry::*;
pub use twist::*;
