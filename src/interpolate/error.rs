//! Error types for interpolation operations.

use crate::spatial::SpatialError;

/// Result type for interpolation operations.
pub type InterpolateResult<T> = Result<T, InterpolateError>;

/// Errors that can occur during interpolation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InterpolateError {
    /// A requested coordinate or value column is absent from the input table.
    #[error("Missing column '{column}' in input table")]
    MissingColumn { column: String },

    /// Fewer points than the strategy requires.
    #[error("Insufficient data for {context}: need at least {required}, got {actual}")]
    InsufficientData {
        required: usize,
        actual: usize,
        context: String,
    },

    /// Triangulation impossible (collinear or too few distinct points).
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// RBF coefficient matrix singular or unsolvable within tolerance.
    #[error("Linear system error: {message}")]
    LinearSystem { message: String },

    /// Unrecognized method or kernel name.
    #[error("Invalid {kind} '{name}': expected one of {expected}")]
    InvalidMethod {
        kind: &'static str,
        name: String,
        expected: &'static str,
    },

    /// Input arrays have mismatched lengths.
    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        expected: usize,
        actual: usize,
        context: String,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Error from underlying numr operation.
    #[error("numr error: {0}")]
    NumrError(String),
}

impl From<numr::error::Error> for InterpolateError {
    fn from(err: numr::error::Error) -> Self {
        Self::NumrError(err.to_string())
    }
}

impl From<SpatialError> for InterpolateError {
    fn from(err: SpatialError) -> Self {
        match err {
            SpatialError::Degenerate { .. } => Self::DegenerateGeometry {
                message: err.to_string(),
            },
            SpatialError::InvalidPoints { op, reason } => Self::InvalidParameter {
                parameter: "points".to_string(),
                message: format!("{op}: {reason}"),
            },
            SpatialError::NumrError(msg) => Self::NumrError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_spatial_error_maps_to_geometry() {
        let err: InterpolateError = SpatialError::Degenerate {
            context: "delaunay",
            reason: "all points are collinear".to_string(),
        }
        .into();
        assert!(matches!(err, InterpolateError::DegenerateGeometry { .. }));
        assert!(err.to_string().contains("collinear"));
    }

    #[test]
    fn test_invalid_method_display() {
        let err = InterpolateError::InvalidMethod {
            kind: "method",
            name: "bicubic".to_string(),
            expected: "nearest, linear, cubic, rbf",
        };
        assert_eq!(
            err.to_string(),
            "Invalid method 'bicubic': expected one of nearest, linear, cubic, rbf"
        );
    }
}
