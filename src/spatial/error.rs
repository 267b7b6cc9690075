//! Error types for spatial operations.

/// Result type for spatial operations.
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Errors raised by the triangulation capability.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SpatialError {
    /// The point set cannot be triangulated (too few distinct points, or collinear).
    #[error("Degenerate geometry in {context}: {reason}")]
    Degenerate {
        context: &'static str,
        reason: String,
    },

    /// Point tensor has the wrong rank or dtype.
    #[error("Invalid points for {op}: {reason}")]
    InvalidPoints { op: &'static str, reason: String },

    /// Error from underlying numr operation.
    #[error("numr error: {0}")]
    NumrError(String),
}

impl From<numr::error::Error> for SpatialError {
    fn from(err: numr::error::Error) -> Self {
        Self::NumrError(err.to_string())
    }
}
