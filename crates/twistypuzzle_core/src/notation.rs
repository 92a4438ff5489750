//! Errors and helpers shared by every family's move notation.

use itertools::Itertools;

use crate::{Move, PuzzleFamily};

/// Error encountered while parsing a move token.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty move token")]
    Empty,
    #[error("unknown move {0:?}")]
    UnknownMove(String),
    #[error("bad suffix {suffix:?} in move {token:?}")]
    BadSuffix { token: String, suffix: String },
    #[error("no layer {layer} in move {token:?}")]
    NoSuchLayer { token: String, layer: usize },
}

/// Parses a whitespace-separated sequence of moves.
pub fn parse_moves<'a>(
    family: &'a (impl PuzzleFamily + ?Sized),
    s: &'a str,
) -> impl 'a + Iterator<Item = Result<Move, NotationError>> {
    s.split_whitespace().map(|token| family.parse_notation(token))
}

/// Formats a sequence of moves, skipping moves that have no notation.
pub fn format_moves(
    family: &(impl PuzzleFamily + ?Sized),
    moves: impl IntoIterator<Item = Move>,
) -> String {
    moves
        .into_iter()
        .filter_map(|mv| family.notation(mv))
        .join(" ")
}

/// Splits a token into a base and a suffix made of the characters `2`, `'`,
/// `+`, and `-` at its end.
pub fn split_suffix(token: &str) -> (&str, &str) {
    let base_len = token.trim_end_matches(['2', '\'', '+', '-']).len();
    token.split_at(base_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_suffix() {
        assert_eq!(split_suffix("R2'"), ("R", "2'"));
        assert_eq!(split_suffix("uL'"), ("uL", "'"));
        assert_eq!(split_suffix("D--"), ("D", "--"));
        assert_eq!(split_suffix("RotateU"), ("RotateU", ""));
        // Leading digits are a layer prefix, not a suffix.
        assert_eq!(split_suffix("3R2"), ("3R", "2"));
    }
}
