//! Interpolated grid fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Row-major 2D field aligned with a query mesh.
///
/// Cell `(row, col)` holds the value at `(x[col], y[row])`. Cells the method
/// could not cover hold the fill value, NaN unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpolatedField {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
    fill_value: f64,
}

impl InterpolatedField {
    /// Wrap row-major `data`; `None` if the length does not match `rows * cols`.
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize, fill_value: f64) -> Option<Self> {
        (data.len() == rows * cols).then_some(Self {
            data,
            rows,
            cols,
            fill_value,
        })
    }

    /// `(rows, cols)`, i.e. `(|grid_y|, |grid_x|)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// One row of the field.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols.max(1))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn fill_value(&self) -> f64 {
        self.fill_value
    }

    /// Whether `v` is the missing-value marker of this field.
    pub fn is_missing_value(&self, v: f64) -> bool {
        if self.fill_value.is_nan() {
            v.is_nan()
        } else {
            v == self.fill_value
        }
    }

    /// Whether cell `(row, col)` carries the missing-value marker.
    pub fn is_missing(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(|v| self.is_missing_value(v))
    }

    /// Count and range statistics over the covered cells.
    pub fn summary(&self) -> FieldSummary {
        let mut summary = FieldSummary {
            rows: self.rows,
            cols: self.cols,
            count: 0,
            missing: 0,
            min: None,
            max: None,
            mean: None,
        };
        let mut sum = 0.0;
        for &v in &self.data {
            if self.is_missing_value(v) {
                summary.missing += 1;
                continue;
            }
            summary.count += 1;
            sum += v;
            summary.min = Some(summary.min.map_or(v, |m: f64| m.min(v)));
            summary.max = Some(summary.max.map_or(v, |m: f64| m.max(v)));
        }
        if summary.count > 0 {
            summary.mean = Some(sum / summary.count as f64);
        }
        summary
    }
}

/// Statistics of an interpolated field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub rows: usize,
    pub cols: usize,
    /// Cells holding a value.
    pub count: usize,
    /// Cells holding the missing-value marker.
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl fmt::Display for FieldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} grid, {} values, {} missing",
            self.rows, self.cols, self.count, self.missing
        )?;
        if let (Some(min), Some(max), Some(mean)) = (self.min, self.max, self.mean) {
            write!(f, ", min {min:.6}, max {max:.6}, mean {mean:.6}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing() {
        let field = InterpolatedField::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3, f64::NAN)
            .unwrap();
        assert_eq!(field.shape(), (2, 3));
        assert_eq!(field.get(1, 0), Some(4.0));
        assert_eq!(field.get(2, 0), None);
        assert_eq!(field.row(0), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(field.rows().count(), 2);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(InterpolatedField::from_vec(vec![1.0], 2, 2, f64::NAN).is_none());
    }

    #[test]
    fn test_summary_skips_missing() {
        let field =
            InterpolatedField::from_vec(vec![1.0, f64::NAN, 3.0, f64::NAN], 2, 2, f64::NAN).unwrap();
        assert!(field.is_missing(0, 1));
        assert!(!field.is_missing(0, 0));

        let s = field.summary();
        assert_eq!((s.count, s.missing), (2, 2));
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.max, Some(3.0));
        assert_eq!(s.mean, Some(2.0));
        assert_eq!(
            s.to_string(),
            "2x2 grid, 2 values, 2 missing, min 1.000000, max 3.000000, mean 2.000000"
        );
    }

    #[test]
    fn test_custom_fill_value() {
        let field = InterpolatedField::from_vec(vec![-1.0, 5.0], 1, 2, -1.0).unwrap();
        assert!(field.is_missing(0, 0));
        let s = field.summary();
        assert_eq!((s.count, s.missing), (1, 1));
        assert_eq!(field.summary().mean, Some(5.0));
    }

    #[test]
    fn test_all_missing_summary() {
        let field = InterpolatedField::from_vec(vec![f64::NAN], 1, 1, f64::NAN).unwrap();
        let s = field.summary();
        assert_eq!(s.mean, None);
        assert_eq!(s.to_string(), "1x1 grid, 0 values, 1 missing");
    }
}
