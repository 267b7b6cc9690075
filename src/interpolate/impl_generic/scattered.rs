//! Scattered data interpolation generic implementation.
//!
//! Dispatches to nearest-neighbor, piecewise-linear, Clough-Tocher or RBF
//! interpolation. Nearest and linear are implemented here; the other two live
//! in their own modules.

use crate::interpolate::error::{InterpolateError, InterpolateResult};
use crate::interpolate::impl_generic::rbf::{rbf_evaluate_impl, rbf_fit_impl};
use crate::interpolate::traits::clough_tocher::CloughTocher2DAlgorithms;
use crate::interpolate::traits::scattered::ScatteredMethod;
use crate::spatial::traits::delaunay::DelaunayAlgorithms;
use log::debug;
use numr::algorithm::linalg::LinearAlgebraAlgorithms;
use numr::dtype::DType;
use numr::ops::{CompareOps, MatmulOps, ScalarOps, ShapeOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

/// Interpolate scattered data at query points.
pub fn griddata_impl<R, C>(
    client: &C,
    points: &Tensor<R>,
    values: &Tensor<R>,
    xi: &Tensor<R>,
    method: &ScatteredMethod,
    fill_value: f64,
) -> InterpolateResult<Tensor<R>>
where
    R: Runtime<DType = DType>,
    C: TensorOps<R>
        + ScalarOps<R>
        + CompareOps<R>
        + MatmulOps<R>
        + ShapeOps<R>
        + LinearAlgebraAlgorithms<R>
        + DelaunayAlgorithms<R>
        + CloughTocher2DAlgorithms<R>
        + RuntimeClient<R>,
{
    let p_shape = points.shape().to_vec();
    if p_shape.len() != 2 || p_shape[1] != 2 {
        return Err(InterpolateError::InvalidParameter {
            parameter: "points".to_string(),
            message: "points must be 2D [n, 2]".to_string(),
        });
    }
    let n = p_shape[0];

    let v_shape = values.shape().to_vec();
    if v_shape.len() != 1 || v_shape[0] != n {
        return Err(InterpolateError::ShapeMismatch {
            expected: n,
            actual: v_shape.first().copied().unwrap_or(0),
            context: "griddata: points vs values".to_string(),
        });
    }

    let xi_shape = xi.shape().to_vec();
    if xi_shape.len() != 2 || xi_shape[1] != 2 {
        return Err(InterpolateError::InvalidParameter {
            parameter: "xi".to_string(),
            message: "xi must be 2D [m, 2]".to_string(),
        });
    }

    debug!(
        "griddata: method={method}, {n} points, {} queries",
        xi_shape[0]
    );

    match method {
        ScatteredMethod::Nearest => nearest_interp(points, values, xi, n),
        ScatteredMethod::Linear => linear_interp(client, points, values, xi, n, fill_value),
        ScatteredMethod::Cubic => {
            let ct = client.clough_tocher_fit(points, values, fill_value)?;
            client.clough_tocher_evaluate(&ct, xi)
        }
        ScatteredMethod::Rbf(options) => {
            let model = rbf_fit_impl(client, points, values, options)?;
            rbf_evaluate_impl(client, &model, xi)
        }
    }
}

/// Nearest neighbor interpolation by exhaustive scan.
///
/// Distances are compared exactly so that equidistant points resolve to the
/// earliest one in insertion order. `hypot` keeps them finite for coordinates
/// whose squares would overflow.
fn nearest_interp<R>(
    points: &Tensor<R>,
    values: &Tensor<R>,
    xi: &Tensor<R>,
    n: usize,
) -> InterpolateResult<Tensor<R>>
where
    R: Runtime<DType = DType>,
{
    if n == 0 {
        return Err(InterpolateError::InsufficientData {
            required: 1,
            actual: 0,
            context: "nearest interpolation".to_string(),
        });
    }

    let p: Vec<f64> = points.to_vec::<f64>();
    let v: Vec<f64> = values.to_vec::<f64>();
    let q: Vec<f64> = xi.to_vec::<f64>();
    let m = xi.shape()[0];

    let mut result = Vec::with_capacity(m);
    for i in 0..m {
        let (qx, qy) = (q[i * 2], q[i * 2 + 1]);
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for j in 0..n {
            let dx = p[j * 2] - qx;
            let dy = p[j * 2 + 1] - qy;
            let d = dx.hypot(dy);
            if d < best_d {
                best_d = d;
                best = j;
            }
        }
        result.push(v[best]);
    }

    Ok(Tensor::<R>::from_slice(&result, &[m], xi.device()))
}

/// Piecewise-linear interpolation on the Delaunay triangulation.
fn linear_interp<R, C>(
    client: &C,
    points: &Tensor<R>,
    values: &Tensor<R>,
    xi: &Tensor<R>,
    n: usize,
    fill_value: f64,
) -> InterpolateResult<Tensor<R>>
where
    R: Runtime<DType = DType>,
    C: DelaunayAlgorithms<R> + RuntimeClient<R>,
{
    if n < 3 {
        return Err(InterpolateError::DegenerateGeometry {
            message: format!("linear interpolation needs at least 3 points, got {n}"),
        });
    }

    let tri = client.delaunay(points)?;
    let location = client.delaunay_locate(&tri, xi)?;

    let simplices: Vec<i64> = tri.simplices.to_vec::<i64>();
    let v: Vec<f64> = values.to_vec::<f64>();
    let ids: Vec<i64> = location.simplices.to_vec::<i64>();
    let bary: Vec<f64> = location.barycentric.to_vec::<f64>();

    let result: Vec<f64> = ids
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            if t < 0 {
                return fill_value;
            }
            let t = t as usize;
            (0..3)
                .map(|k| bary[i * 3 + k] * v[simplices[t * 3 + k] as usize])
                .sum()
        })
        .collect();

    let outside = ids.iter().filter(|&&t| t < 0).count();
    if outside > 0 {
        debug!("linear: {outside} queries outside the convex hull");
    }

    Ok(Tensor::<R>::from_slice(&result, &[result.len()], xi.device()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::traits::rbf::{RbfKernel, RbfOptions};
    use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};

    fn setup() -> (CpuDevice, CpuClient) {
        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());
        (device, client)
    }

    fn unit_square(device: &CpuDevice) -> (Tensor<CpuRuntime>, Tensor<CpuRuntime>) {
        let points = Tensor::<CpuRuntime>::from_slice(
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            &[4, 2],
            device,
        );
        let values = Tensor::<CpuRuntime>::from_slice(&[1.0, 2.0, 3.0, 4.0], &[4], device);
        (points, values)
    }

    #[test]
    fn test_nearest_2d() {
        let (device, client) = setup();
        let (points, values) = unit_square(&device);

        // Query points close to known points
        let xi = Tensor::<CpuRuntime>::from_slice(
            &[0.1, 0.1, 0.9, 0.1, 0.1, 0.9, 0.9, 0.9],
            &[4, 2],
            &device,
        );

        let result = griddata_impl(
            &client,
            &points,
            &values,
            &xi,
            &ScatteredMethod::Nearest,
            f64::NAN,
        )
        .unwrap();
        let vals: Vec<f64> = result.to_vec::<f64>();

        assert_eq!(vals, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_nearest_tie_takes_earliest_point() {
        let (device, client) = setup();
        let (points, values) = unit_square(&device);

        // The center is equidistant from all four corners.
        let xi = Tensor::<CpuRuntime>::from_slice(&[0.5, 0.5, 0.5, 2.0], &[2, 2], &device);
        let result = griddata_impl(
            &client,
            &points,
            &values,
            &xi,
            &ScatteredMethod::Nearest,
            f64::NAN,
        )
        .unwrap();
        let vals: Vec<f64> = result.to_vec::<f64>();

        assert_eq!(vals[0], 1.0);
        // Far outside the hull nearest is still defined.
        assert_eq!(vals[1], 3.0);
    }

    #[test]
    fn test_nearest_with_huge_coordinates() {
        let (device, client) = setup();
        let points = Tensor::<CpuRuntime>::from_slice(&[1e200, 0.0, -1e200, 0.0], &[2, 2], &device);
        let values = Tensor::<CpuRuntime>::from_slice(&[1.0, 2.0], &[2], &device);
        let xi = Tensor::<CpuRuntime>::from_slice(&[-0.9e200, 0.0, 0.8e200, 0.0], &[2, 2], &device);

        let out = griddata_impl(&client, &points, &values, &xi, &ScatteredMethod::Nearest, f64::NAN)
            .unwrap()
            .to_vec::<f64>();
        assert_eq!(out, vec![2.0, 1.0]);
    }

    #[test]
    fn test_linear_reproduces_plane() {
        let (device, client) = setup();
        let coords = [0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 2.0, 2.0, 1.0, 0.7];
        let points = Tensor::<CpuRuntime>::from_slice(&coords, &[5, 2], &device);
        let plane = |x: f64, y: f64| 3.0 * x - 2.0 * y + 0.5;
        let vals: Vec<f64> = coords.chunks(2).map(|c| plane(c[0], c[1])).collect();
        let values = Tensor::<CpuRuntime>::from_slice(&vals, &[5], &device);

        let q = [0.3, 0.4, 1.5, 1.9, 1.0, 1.0, 2.0, 1.0];
        let xi = Tensor::<CpuRuntime>::from_slice(&q, &[4, 2], &device);
        let result = griddata_impl(&client, &points, &values, &xi, &ScatteredMethod::Linear, f64::NAN)
            .unwrap();
        let out: Vec<f64> = result.to_vec::<f64>();

        for (i, c) in q.chunks(2).enumerate() {
            assert!(
                (out[i] - plane(c[0], c[1])).abs() < 1e-10,
                "query {i}: {} vs {}",
                out[i],
                plane(c[0], c[1])
            );
        }
    }

    #[test]
    fn test_linear_outside_hull_gets_fill() {
        let (device, client) = setup();
        let (points, values) = unit_square(&device);
        let xi = Tensor::<CpuRuntime>::from_slice(&[1.5, 0.5, -0.1, 0.0], &[2, 2], &device);

        let nan = griddata_impl(&client, &points, &values, &xi, &ScatteredMethod::Linear, f64::NAN)
            .unwrap()
            .to_vec::<f64>();
        assert!(nan.iter().all(|v| v.is_nan()));

        let filled = griddata_impl(&client, &points, &values, &xi, &ScatteredMethod::Linear, -1.0)
            .unwrap()
            .to_vec::<f64>();
        assert_eq!(filled, vec![-1.0, -1.0]);
    }

    #[test]
    fn test_linear_too_few_points() {
        let (device, client) = setup();
        let points = Tensor::<CpuRuntime>::from_slice(&[0.0, 0.0, 1.0, 1.0], &[2, 2], &device);
        let values = Tensor::<CpuRuntime>::from_slice(&[0.0, 1.0], &[2], &device);
        let xi = Tensor::<CpuRuntime>::from_slice(&[0.5, 0.5], &[1, 2], &device);

        let err = griddata_impl(&client, &points, &values, &xi, &ScatteredMethod::Linear, f64::NAN)
            .unwrap_err();
        assert!(matches!(err, InterpolateError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_linear_duplicate_points_use_last_value() {
        let (device, client) = setup();
        let points = Tensor::<CpuRuntime>::from_slice(
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            &[4, 2],
            &device,
        );
        let values = Tensor::<CpuRuntime>::from_slice(&[5.0, 1.0, 1.0, 7.0], &[4], &device);
        let xi = Tensor::<CpuRuntime>::from_slice(&[0.0, 0.0], &[1, 2], &device);

        let out = griddata_impl(&client, &points, &values, &xi, &ScatteredMethod::Linear, f64::NAN)
            .unwrap()
            .to_vec::<f64>();
        assert!((out[0] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_dispatch_rbf_recovers_values() {
        let (device, client) = setup();
        let (points, values) = unit_square(&device);
        let method = ScatteredMethod::Rbf(RbfOptions::new(RbfKernel::Linear));

        let out = griddata_impl(&client, &points, &values, &points, &method, f64::NAN)
            .unwrap()
            .to_vec::<f64>();
        for (got, want) in out.iter().zip([1.0, 2.0, 3.0, 4.0]) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
    }

    #[test]
    fn test_rejects_values_shape_mismatch() {
        let (device, client) = setup();
        let (points, _) = unit_square(&device);
        let values = Tensor::<CpuRuntime>::from_slice(&[1.0, 2.0, 3.0], &[3], &device);

        let err = griddata_impl(
            &client,
            &points,
            &values,
            &points,
            &ScatteredMethod::Nearest,
            f64::NAN,
        )
        .unwrap_err();
        assert!(matches!(err, InterpolateError::ShapeMismatch { .. }));
    }
}
