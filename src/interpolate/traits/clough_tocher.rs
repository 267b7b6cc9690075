//! Piecewise cubic interpolation over a Delaunay mesh.
//!
//! Each triangle is split at its centroid into three cubic Bezier patches
//! that agree in value and slope across every shared edge. Cells outside the
//! mesh receive the model's fill value.
use crate::DType;

use crate::interpolate::error::InterpolateResult;
use crate::spatial::traits::delaunay::Delaunay;
use numr::runtime::Runtime;
use numr::tensor::Tensor;

/// Mesh, sample values and vertex slopes ready for evaluation.
#[derive(Debug, Clone)]
pub struct CloughTocher2D<R: Runtime<DType = DType>> {
    pub triangulation: Delaunay<R>,
    /// Sample value per input point, `[n]`. Folded duplicates keep the last one.
    pub values: Tensor<R>,
    /// Least-squares slope `(d/dx, d/dy)` per input point, `[n, 2]`.
    pub gradients: Tensor<R>,
    /// Written for query points that fall in no triangle.
    pub fill_value: f64,
}

/// Fit and evaluate the cubic method.
///
/// `fill_value` is chosen at fit time and travels with the model, so a model
/// fitted once can be evaluated on any number of query sets.
pub trait CloughTocher2DAlgorithms<R: Runtime<DType = DType>> {
    /// Triangulate `points` (`[n, 2]`) and estimate a slope at every vertex.
    ///
    /// Fewer than three points is `InsufficientData`; a collinear set is
    /// `DegenerateGeometry`.
    fn clough_tocher_fit(
        &self,
        points: &Tensor<R>,
        values: &Tensor<R>,
        fill_value: f64,
    ) -> InterpolateResult<CloughTocher2D<R>>;

    /// Values at `xi` (`[m, 2]`), shape `[m]`.
    fn clough_tocher_evaluate(
        &self,
        ct: &CloughTocher2D<R>,
        xi: &Tensor<R>,
    ) -> InterpolateResult<Tensor<R>>;
}
