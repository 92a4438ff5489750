/// Error produced when a set of constraints cannot form a piece.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The constraints bound a region with too few distinct vertices.
    #[error("constraint set is degenerate: found {0} distinct vertices, need at least 4")]
    TooFewVertices(usize),
}
