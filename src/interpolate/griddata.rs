//! Scattered points to regular grid.
//!
//! The entry points here tie the pieces together: build the query mesh,
//! validate the point set, run the selected method on every node and reshape
//! the result into an [`InterpolatedField`].

use crate::grid::{QueryMesh, build_mesh};
use crate::interpolate::error::{InterpolateError, InterpolateResult};
use crate::interpolate::field::InterpolatedField;
use crate::interpolate::points::PointSet;
use crate::interpolate::traits::rbf::RbfOptions;
use crate::interpolate::traits::scattered::{
    MISSING_VALUE, ScatteredInterpAlgorithms, ScatteredMethod,
};
use crate::table::DataTable;
use crate::DType;
use log::debug;
use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
use numr::runtime::{Runtime, RuntimeClient};

/// Column names read by [`interpolation`].
pub const X_COLUMN: &str = "x";
pub const Y_COLUMN: &str = "y";
pub const VALUE_COLUMN: &str = "value";

/// Evaluate `method` on every node of `mesh`.
///
/// Nodes outside the convex hull get `fill_value` under `Linear` and `Cubic`.
pub fn interpolate_with<R, C>(
    client: &C,
    set: &PointSet<R>,
    mesh: &QueryMesh,
    method: &ScatteredMethod,
    fill_value: f64,
) -> InterpolateResult<InterpolatedField>
where
    R: Runtime<DType = DType>,
    C: ScatteredInterpAlgorithms<R> + RuntimeClient<R>,
{
    let (rows, cols) = mesh.shape();
    let xi = mesh.to_tensor::<R>(client.device());

    debug!(
        "interpolate: method={method}, {} points onto {rows}x{cols} grid",
        set.len()
    );
    let values: Vec<f64> = client
        .griddata(&set.points, &set.values, &xi, method, fill_value)?
        .to_vec::<f64>();

    let actual = values.len();
    InterpolatedField::from_vec(values, rows, cols, fill_value).ok_or_else(|| {
        InterpolateError::ShapeMismatch {
            expected: rows * cols,
            actual,
            context: "interpolate: result vs grid".to_string(),
        }
    })
}

/// Interpolate `(x, y, value)` triples onto a regular grid on the CPU.
///
/// Missing axes default to 100 samples over `[0, 1]`. `method` is one of
/// `nearest`, `linear`, `cubic` or `rbf` in any case; `rbf` options are only
/// used with `rbf`. Cells outside the convex hull are NaN for `linear` and
/// `cubic`.
///
/// RBF solves a dense N×N system, so it becomes expensive for large point sets.
/// `linear` and `cubic` build a Bowyer-Watson triangulation that rescans every
/// triangle on each insertion, which is O(N²) in the number of points. Grid
/// nodes outside the hull are each confirmed by a scan over all triangles.
///
/// # Errors
/// - `InvalidMethod` for an unknown method name
/// - `InsufficientData` for an empty set, or fewer than 3 points under `cubic`
/// - `DegenerateGeometry` when `linear`/`cubic` cannot triangulate the points
/// - `LinearSystem` when the RBF system is singular
pub fn interpolate(
    points: &[(f64, f64, f64)],
    grid_x: Option<&[f64]>,
    grid_y: Option<&[f64]>,
    method: &str,
    rbf: Option<RbfOptions>,
) -> InterpolateResult<InterpolatedField> {
    let method = ScatteredMethod::parse(method, rbf)?;
    let mesh = build_mesh(grid_x, grid_y)?;

    let device = CpuDevice::new();
    let client = CpuClient::new(device.clone());
    let set = PointSet::<CpuRuntime>::from_triples(points, &device)?;
    interpolate_with(&client, &set, &mesh, &method, MISSING_VALUE)
}

/// Interpolate the `x`, `y` and `value` columns of `table` onto a grid.
///
/// `method` defaults to `linear`.
pub fn interpolation(
    table: &DataTable,
    grid_x: Option<&[f64]>,
    grid_y: Option<&[f64]>,
    method: Option<&str>,
) -> InterpolateResult<InterpolatedField> {
    let method = match method {
        Some(name) => name.parse()?,
        None => ScatteredMethod::default(),
    };
    let mesh = build_mesh(grid_x, grid_y)?;

    let device = CpuDevice::new();
    let client = CpuClient::new(device.clone());
    let set = PointSet::<CpuRuntime>::extract(table, X_COLUMN, Y_COLUMN, VALUE_COLUMN, &device)?;
    interpolate_with(&client, &set, &mesh, &method, MISSING_VALUE)
}
