//! Validation helpers for spatial algorithms.

use crate::spatial::error::{SpatialError, SpatialResult};
use numr::dtype::DType;

/// Validate point set dtype (host-side geometry reads F64 only).
pub fn validate_points_dtype(dtype: DType, op: &'static str) -> SpatialResult<()> {
    match dtype {
        DType::F64 => Ok(()),
        _ => Err(SpatialError::InvalidPoints {
            op,
            reason: format!("unsupported dtype {dtype:?}"),
        }),
    }
}

/// Validate that points form a planar set `[n, 2]`.
pub fn validate_points_planar(shape: &[usize], op: &'static str) -> SpatialResult<()> {
    if shape.len() != 2 {
        return Err(SpatialError::InvalidPoints {
            op,
            reason: format!("requires a 2D point tensor [n, 2], got {}-D", shape.len()),
        });
    }
    if shape[1] != 2 {
        return Err(SpatialError::InvalidPoints {
            op,
            reason: format!("only planar points are supported, got {} columns", shape[1]),
        });
    }
    Ok(())
}
