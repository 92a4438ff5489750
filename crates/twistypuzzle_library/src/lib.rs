//! Catalog of built-in puzzles.
//!
//! For convenience, this crate also re-exports all of `twistypuzzle_core`.
//!
//! # Example
//!
//! ```rust
//! let puzzle = twistypuzzle_library::build_puzzle("cube:3").unwrap();
//! assert_eq!("3x3x3", puzzle.family().name());
//! assert_eq!(26, puzzle.pieces().len());
//!
//! let puzzle = twistypuzzle_library::build_puzzle("cube:2x3x4").unwrap();
//! assert_eq!("2x3x4", puzzle.family().name());
//! ```

#[macro_use]
extern crate strum;

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
pub use twistypuzzle_core::*;

mod cube;
mod megaminx;
mod pyraminx;
mod skewb;

pub use cube::{Cube, CubeParams, CubeVariant};
pub use megaminx::{FACE_SLICE, Megaminx, MegaminxParams, WIDE_SLICE};
pub use pyraminx::{Pyraminx, PyraminxParams};
pub use skewb::{Skewb, SkewbParams};

/// Largest number of layers along one axis of a cuboid.
pub const MAX_CUBE_SIZE: u32 = 17;

/// IDs of the puzzles listed by default.
pub const BUILTIN_PUZZLE_IDS: &[&str] = &[
    "pyraminx", "skewb", "megaminx", "cube:2", "cube:3", "cube:4", "cube:5", "mirror:3", "void",
];

lazy_static! {
    static ref CUBOID_ID_REGEX: Regex =
        Regex::new(r"^([a-z]+):(\d+)(?:x(\d+)x(\d+))?$").expect("bad regex");
}

/// Error returned when a puzzle ID is invalid.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no puzzle with ID {0:?}")]
    UnknownPuzzle(String),
    #[error("cuboid size in {0:?} must be between 1 and {MAX_CUBE_SIZE}")]
    BadSize(String),
}

/// Identifier of a built-in puzzle.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum PuzzleId {
    /// Pyraminx.
    Pyraminx,
    /// Skewb.
    Skewb,
    /// Megaminx.
    Megaminx,
    /// Cuboid with the given number of layers along X, Y, and Z.
    Cube([u32; 3]),
    /// Mirror cuboid with the given number of layers along X, Y, and Z.
    Mirror([u32; 3]),
    /// 3×3×3 void cube.
    Void,
}
impl FromStr for PuzzleId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pyraminx" => return Ok(Self::Pyraminx),
            "skewb" => return Ok(Self::Skewb),
            "megaminx" => return Ok(Self::Megaminx),
            "void" => return Ok(Self::Void),
            _ => (),
        }
        let unknown = || CatalogError::UnknownPuzzle(s.to_string());
        let caps = CUBOID_ID_REGEX.captures(s).ok_or_else(unknown)?;
        let variant = CubeVariant::from_str(&caps[1]).map_err(|_| unknown())?;
        let dim = |i: usize| -> Result<Option<u32>, CatalogError> {
            let Some(m) = caps.get(i) else {
                return Ok(None);
            };
            match m.as_str().parse() {
                Ok(n @ 1..=MAX_CUBE_SIZE) => Ok(Some(n)),
                _ => Err(CatalogError::BadSize(s.to_string())),
            }
        };
        let x = dim(2)?.ok_or_else(unknown)?;
        let size = match (dim(3)?, dim(4)?) {
            (Some(y), Some(z)) => [x, y, z],
            _ => [x, x, x],
        };
        match variant {
            CubeVariant::Standard => Ok(Self::Cube(size)),
            CubeVariant::Mirror => Ok(Self::Mirror(size)),
            // Void cubes only come in one size.
            CubeVariant::Void => Err(unknown()),
        }
    }
}
impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pyraminx => write!(f, "pyraminx"),
            Self::Skewb => write!(f, "skewb"),
            Self::Megaminx => write!(f, "megaminx"),
            Self::Cube(size) => fmt_cuboid(f, CubeVariant::Standard, *size),
            Self::Mirror(size) => fmt_cuboid(f, CubeVariant::Mirror, *size),
            Self::Void => write!(f, "{}", CubeVariant::Void),
        }
    }
}
fn fmt_cuboid(
    f: &mut fmt::Formatter<'_>,
    variant: CubeVariant,
    [x, y, z]: [u32; 3],
) -> fmt::Result {
    let prefix: &'static str = variant.into();
    if x == y && y == z {
        write!(f, "{prefix}:{x}")
    } else {
        write!(f, "{prefix}:{x}x{y}x{z}")
    }
}
impl TryFrom<String> for PuzzleId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
impl From<PuzzleId> for String {
    fn from(value: PuzzleId) -> Self {
        value.to_string()
    }
}

/// Geometry parameters for every puzzle family.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct LibraryParams {
    /// Pyraminx parameters.
    pub pyraminx: PyraminxParams,
    /// Skewb parameters.
    pub skewb: SkewbParams,
    /// Megaminx parameters.
    pub megaminx: MegaminxParams,
    /// Cuboid parameters.
    pub cube: CubeParams,
}

impl LibraryParams {
    /// Constructs the family for a puzzle.
    pub fn build_family(&self, id: PuzzleId) -> BoxDynPuzzleFamily {
        match id {
            PuzzleId::Pyraminx => Pyraminx::new(self.pyraminx.clone()).into(),
            PuzzleId::Skewb => Skewb::new(self.skewb.clone()).into(),
            PuzzleId::Megaminx => Megaminx::new(self.megaminx.clone()).into(),
            PuzzleId::Cube(size) => Cube::cuboid(size, self.cube.clone()).into(),
            PuzzleId::Mirror(size) => Cube::mirror(size, self.cube.clone()).into(),
            PuzzleId::Void => Cube::void(self.cube.clone()).into(),
        }
    }

    /// Builds a puzzle in its solved state.
    pub fn build_puzzle(&self, id: PuzzleId) -> Puzzle {
        let puzzle = Puzzle::new(self.build_family(id));
        log::debug!("built {id} with {} pieces", puzzle.pieces().len());
        puzzle
    }
}

/// Builds a puzzle from its ID using default parameters.
pub fn build_puzzle(id: &str) -> Result<Puzzle, CatalogError> {
    Ok(LibraryParams::default().build_puzzle(id.parse()?))
}

#[cfg(test)]
mod tests;
