use thiserror::Error;

/// Top-level error type for skeleton construction and extraction.
#[derive(Debug, Error)]
pub enum SkeletonError {
    #[error(transparent)]
    Contour(#[from] ContourError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Offset(#[from] OffsetError),
}

/// Errors raised while normalizing input contours.
#[derive(Debug, Error)]
pub enum ContourError {
    #[error("no contours given")]
    Empty,

    #[error("degenerate contour {index}: {reason}")]
    Degenerate { index: usize, reason: String },
}

/// Errors raised by the event engine.
///
/// These signal an internal invariant violation; they should not occur on
/// simple polygons.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("unresolved event: {0}")]
    Unresolved(String),
}

/// Errors related to the winged skeleton graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("graph integrity violated: {0}")]
    Integrity(String),

    #[error("malformed skeleton dump at line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Errors raised while deriving offset paths.
#[derive(Debug, Error)]
pub enum OffsetError {
    #[error("offset distance must be positive and finite, got {0}")]
    InvalidDistance(f64),
}

/// Convenience type alias for results using [`SkeletonError`].
pub type Result<T> = std::result::Result<T, SkeletonError>;
