//! Regular query grids.
//!
//! A [`GridSpec`] holds the x and y sample positions; a [`QueryMesh`] is the
//! Cartesian product laid out row-major with y as the outer (row) axis, so
//! node `(row, col)` sits at `(x[col], y[row])`.

use crate::interpolate::error::{InterpolateError, InterpolateResult};
use numr::dtype::DType;
use numr::runtime::Runtime;
use numr::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Samples per axis when an axis is not given.
pub const DEFAULT_SAMPLES: usize = 100;

/// `num` evenly spaced samples over `[start, stop]`, both ends included.
///
/// A single sample sits at `start`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut out: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            // Pin the endpoint against accumulated rounding.
            out[num - 1] = stop;
            out
        }
    }
}

/// Sample positions along both grid axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Column positions.
    pub x: Vec<f64>,
    /// Row positions.
    pub y: Vec<f64>,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            x: linspace(0.0, 1.0, DEFAULT_SAMPLES),
            y: linspace(0.0, 1.0, DEFAULT_SAMPLES),
        }
    }
}

impl GridSpec {
    /// Build a spec from explicit axes.
    ///
    /// Each axis needs at least one sample. Ordering is not checked.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> InterpolateResult<Self> {
        check_axis("grid_x", &x)?;
        check_axis("grid_y", &y)?;
        Ok(Self { x, y })
    }

    /// Expand the spec into the full set of query nodes.
    pub fn mesh(&self) -> QueryMesh {
        QueryMesh {
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }
}

fn check_axis(name: &str, axis: &[f64]) -> InterpolateResult<()> {
    if axis.is_empty() {
        return Err(InterpolateError::InvalidParameter {
            parameter: name.to_string(),
            message: "axis must contain at least one sample".to_string(),
        });
    }
    Ok(())
}

/// The nodes of a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMesh {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl QueryMesh {
    /// `(rows, cols)`, i.e. `(|y|, |x|)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.y.len(), self.x.len())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.x.len() * self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column sample positions.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Row sample positions.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Coordinates of node `(row, col)`, or `None` when out of range.
    pub fn node(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        Some((*self.x.get(col)?, *self.y.get(row)?))
    }

    /// Query coordinates as a `[rows * cols, 2]` tensor, y outer.
    pub fn to_tensor<R: Runtime<DType = DType>>(&self, device: &R::Device) -> Tensor<R> {
        let mut coords = Vec::with_capacity(self.len() * 2);
        for &y in &self.y {
            for &x in &self.x {
                coords.push(x);
                coords.push(y);
            }
        }
        Tensor::<R>::from_slice(&coords, &[self.len(), 2], device)
    }
}

/// Build the query mesh, defaulting each missing axis to
/// [`DEFAULT_SAMPLES`] samples over `[0, 1]`.
pub fn build_mesh(grid_x: Option<&[f64]>, grid_y: Option<&[f64]>) -> InterpolateResult<QueryMesh> {
    let default_axis = || linspace(0.0, 1.0, DEFAULT_SAMPLES);
    let x = grid_x.map_or_else(default_axis, <[f64]>::to_vec);
    let y = grid_y.map_or_else(default_axis, <[f64]>::to_vec);
    Ok(GridSpec::new(x, y)?.mesh())
}

#[cfg(test)]
mod tests {
    use super::*;
    use numr::runtime::cpu::{CpuDevice, CpuRuntime};

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(0.0, 3.0, 10);
        assert_eq!(v.len(), 10);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[9], 3.0);
        assert!((v[1] - 1.0 / 3.0).abs() < 1e-15);

        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_default_mesh_is_100_by_100() {
        let mesh = build_mesh(None, None).unwrap();
        assert_eq!(mesh.shape(), (100, 100));
        assert_eq!(mesh.node(99, 99), Some((1.0, 1.0)));
    }

    #[test]
    fn test_mesh_rows_follow_y() {
        let mesh = build_mesh(Some(&[0.0, 0.5, 1.0]), Some(&[10.0, 20.0])).unwrap();
        assert_eq!(mesh.shape(), (2, 3));
        assert_eq!(mesh.node(1, 0), Some((0.0, 20.0)));
        assert_eq!(mesh.node(0, 2), Some((1.0, 10.0)));
        assert_eq!(mesh.node(2, 0), None);
    }

    #[test]
    fn test_one_axis_defaults() {
        let mesh = build_mesh(Some(&[0.0, 1.0]), None).unwrap();
        assert_eq!(mesh.shape(), (100, 2));
    }

    #[test]
    fn test_empty_axis_rejected() {
        let err = build_mesh(Some(&[]), None).unwrap_err();
        assert!(matches!(err, InterpolateError::InvalidParameter { .. }));
    }

    #[test]
    fn test_to_tensor_layout() {
        let device = CpuDevice::new();
        let mesh = build_mesh(Some(&[0.0, 1.0]), Some(&[5.0, 6.0])).unwrap();
        let t = mesh.to_tensor::<CpuRuntime>(&device);
        assert_eq!(t.shape(), &[4, 2]);
        let data: Vec<f64> = t.to_vec();
        assert_eq!(data, vec![0.0, 5.0, 1.0, 5.0, 0.0, 6.0, 1.0, 6.0]);
    }
}
