//! Scattered point sets.

use crate::interpolate::error::{InterpolateError, InterpolateResult};
use crate::table::DataTable;
use numr::dtype::DType;
use numr::runtime::Runtime;
use numr::tensor::Tensor;

/// Validated scattered samples in insertion order.
///
/// All coordinates and values are finite and there is at least one point.
#[derive(Debug, Clone)]
pub struct PointSet<R: Runtime> {
    /// Coordinates, shape `[n, 2]`.
    pub points: Tensor<R>,
    /// Sample values, shape `[n]`.
    pub values: Tensor<R>,
}

impl<R: Runtime<DType = DType>> PointSet<R> {
    /// Read the named coordinate and value columns from `table`.
    ///
    /// # Errors
    /// - `MissingColumn` if any column is absent
    /// - `ShapeMismatch` if the columns differ in length
    /// - `InvalidParameter` on NaN or infinite entries
    /// - `InsufficientData` if the columns are empty
    pub fn extract(
        table: &DataTable,
        x_field: &str,
        y_field: &str,
        value_field: &str,
        device: &R::Device,
    ) -> InterpolateResult<Self> {
        let column = |name: &str| {
            table
                .column(name)
                .ok_or_else(|| InterpolateError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let xs = column(x_field)?;
        let ys = column(y_field)?;
        let vs = column(value_field)?;

        for (name, col) in [(y_field, ys), (value_field, vs)] {
            if col.len() != xs.len() {
                return Err(InterpolateError::ShapeMismatch {
                    expected: xs.len(),
                    actual: col.len(),
                    context: format!("column '{name}' vs column '{x_field}'"),
                });
            }
        }

        let triples: Vec<(f64, f64, f64)> = xs
            .iter()
            .zip(ys)
            .zip(vs)
            .map(|((&x, &y), &v)| (x, y, v))
            .collect();
        Self::from_triples(&triples, device)
    }

    /// Build a point set from `(x, y, value)` triples.
    pub fn from_triples(triples: &[(f64, f64, f64)], device: &R::Device) -> InterpolateResult<Self> {
        if triples.is_empty() {
            return Err(InterpolateError::InsufficientData {
                required: 1,
                actual: 0,
                context: "point set".to_string(),
            });
        }
        if let Some(i) = triples
            .iter()
            .position(|&(x, y, v)| !(x.is_finite() && y.is_finite() && v.is_finite()))
        {
            return Err(InterpolateError::InvalidParameter {
                parameter: "points".to_string(),
                message: format!("row {i} has a non-finite coordinate or value"),
            });
        }

        let n = triples.len();
        let coords: Vec<f64> = triples.iter().flat_map(|&(x, y, _)| [x, y]).collect();
        let values: Vec<f64> = triples.iter().map(|&(_, _, v)| v).collect();
        Ok(Self {
            points: Tensor::<R>::from_slice(&coords, &[n, 2], device),
            values: Tensor::<R>::from_slice(&values, &[n], device),
        })
    }

    pub fn len(&self) -> usize {
        self.points.shape()[0]
    }

    /// Always false for a validated set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
