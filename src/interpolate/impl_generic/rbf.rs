//! Radial Basis Function interpolation generic implementation.
//!
//! Builds the kernel matrix from pairwise distances, solves `A·w = v` with
//! numr's dense solver, and evaluates `f(q) = Σ w_i φ(‖q − p_i‖)` at query
//! points. No polynomial augmentation is used, so collinear node sets stay
//! solvable for the strictly conditionally definite kernels.

use crate::interpolate::error::{InterpolateError, InterpolateResult};
use crate::interpolate::traits::rbf::{RbfKernel, RbfModel, RbfOptions};
use log::{debug, trace};
use numr::algorithm::linalg::LinearAlgebraAlgorithms;
use numr::dtype::DType;
use numr::ops::{CompareOps, MatmulOps, ScalarOps, ShapeOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;
use std::collections::HashMap;

/// Largest accepted relative residual `max|A·w − v| / max(1, max|v|)`.
const RESIDUAL_TOL: f64 = 1e-6;

/// Fit an RBF interpolant.
pub fn rbf_fit_impl<R, C>(
    client: &C,
    points: &Tensor<R>,
    values: &Tensor<R>,
    options: &RbfOptions,
) -> InterpolateResult<RbfModel<R>>
where
    R: Runtime<DType = DType>,
    C: TensorOps<R>
        + ScalarOps<R>
        + CompareOps<R>
        + MatmulOps<R>
        + ShapeOps<R>
        + LinearAlgebraAlgorithms<R>
        + RuntimeClient<R>,
{
    let device = client.device();
    let shape = points.shape().to_vec();
    if shape.len() != 2 {
        return Err(InterpolateError::InvalidParameter {
            parameter: "points".to_string(),
            message: "points must be 2D [n, d]".to_string(),
        });
    }
    let n = shape[0];
    let d = shape[1];
    if n == 0 {
        return Err(InterpolateError::InsufficientData {
            required: 1,
            actual: 0,
            context: "rbf_fit".to_string(),
        });
    }
    if values.shape() != [n] {
        return Err(InterpolateError::ShapeMismatch {
            expected: n,
            actual: values.shape().first().copied().unwrap_or(0),
            context: "rbf_fit: points vs values".to_string(),
        });
    }
    validate_options(options)?;

    let host_points: Vec<f64> = points.to_vec::<f64>();
    if options.smoothing == 0.0 {
        if let Some((i, j)) = first_coincident_pair(&host_points, n, d) {
            return Err(InterpolateError::LinearSystem {
                message: format!(
                    "points {i} and {j} coincide, kernel matrix is singular \
                     (use smoothing > 0)"
                ),
            });
        }
    }

    let eps = match options.epsilon {
        Some(e) => e,
        None => auto_epsilon(&host_points, n, d),
    };

    // Center coordinates to keep the distance expansion well conditioned.
    let offset = column_means(&host_points, n, d);
    let centered: Vec<f64> = host_points
        .iter()
        .enumerate()
        .map(|(k, &v)| v - offset[k % d])
        .collect();
    let centers = Tensor::<R>::from_slice(&centered, &[n, d], device);

    // Compute pairwise distance matrix [n, n]
    let dist = cdist_euclidean(client, &centers, &centers)?;

    // Apply kernel function
    let mut kernel_mat = apply_kernel(client, &dist, options.kernel, eps)?;

    // Add smoothing to diagonal
    if options.smoothing > 0.0 {
        let smoothing = options.smoothing;
        let eye = Tensor::from_slice(
            &(0..n)
                .flat_map(|i| (0..n).map(move |j| if i == j { smoothing } else { 0.0 }))
                .collect::<Vec<_>>(),
            &[n, n],
            device,
        );
        kernel_mat = client.add(&kernel_mat, &eye)?;
    }

    let vals_col = values.reshape(&[n, 1])?;
    let weights_col = LinearAlgebraAlgorithms::solve(client, &kernel_mat, &vals_col).map_err(|e| {
        InterpolateError::LinearSystem {
            message: format!("RBF solve failed: {}", e),
        }
    })?;

    check_solution(client, &kernel_mat, &weights_col, values)?;

    debug!(
        "rbf_fit: kernel={}, epsilon={eps:.6e}, smoothing={}, {n} centers",
        options.kernel, options.smoothing
    );

    Ok(RbfModel {
        centers,
        weights: weights_col.reshape(&[n])?,
        kernel: options.kernel,
        epsilon: eps,
        offset,
        dim: d,
    })
}

/// Evaluate an RBF model at query points.
pub fn rbf_evaluate_impl<R, C>(
    client: &C,
    model: &RbfModel<R>,
    query: &Tensor<R>,
) -> InterpolateResult<Tensor<R>>
where
    R: Runtime<DType = DType>,
    C: TensorOps<R>
        + ScalarOps<R>
        + CompareOps<R>
        + MatmulOps<R>
        + ShapeOps<R>
        + LinearAlgebraAlgorithms<R>
        + RuntimeClient<R>,
{
    let device = client.device();
    let q_shape = query.shape().to_vec();
    if q_shape.len() != 2 || q_shape[1] != model.dim {
        return Err(InterpolateError::ShapeMismatch {
            expected: model.dim,
            actual: q_shape.get(1).copied().unwrap_or(0),
            context: "rbf_evaluate: query dimension must match centers".to_string(),
        });
    }
    let m = q_shape[0];
    let n = model.centers.shape()[0];

    let shifted: Vec<f64> = query
        .to_vec::<f64>()
        .iter()
        .enumerate()
        .map(|(k, &v)| v - model.offset[k % model.dim])
        .collect();
    let query = Tensor::<R>::from_slice(&shifted, &[m, model.dim], device);

    // Compute distances from query points to centers
    let dist = cdist_euclidean(client, &query, &model.centers)?;

    // Apply kernel
    let kernel_vals = apply_kernel(client, &dist, model.kernel, model.epsilon)?;

    // Weighted sum: [m, n] @ [n, 1]
    let weights = model.weights.reshape(&[n, 1])?;
    let result = client.matmul(&kernel_vals, &weights)?;

    trace!("rbf_evaluate: {m} queries against {n} centers");
    Ok(result.reshape(&[m])?)
}

fn validate_options(options: &RbfOptions) -> InterpolateResult<()> {
    if let Some(eps) = options.epsilon {
        if !(eps.is_finite() && eps > 0.0) {
            return Err(InterpolateError::InvalidParameter {
                parameter: "epsilon".to_string(),
                message: format!("shape factor must be positive and finite, got {eps}"),
            });
        }
    }
    if !(options.smoothing.is_finite() && options.smoothing >= 0.0) {
        return Err(InterpolateError::InvalidParameter {
            parameter: "smoothing".to_string(),
            message: format!(
                "smoothing must be non-negative and finite, got {}",
                options.smoothing
            ),
        });
    }
    Ok(())
}

/// Reject solutions that are not finite or do not reproduce the data.
fn check_solution<R, C>(
    client: &C,
    kernel_mat: &Tensor<R>,
    weights_col: &Tensor<R>,
    values: &Tensor<R>,
) -> InterpolateResult<()>
where
    R: Runtime<DType = DType>,
    C: MatmulOps<R> + RuntimeClient<R>,
{
    let weights: Vec<f64> = weights_col.to_vec::<f64>();
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(InterpolateError::LinearSystem {
            message: "kernel matrix is singular (non-finite weights)".to_string(),
        });
    }

    let reproduced: Vec<f64> = client.matmul(kernel_mat, weights_col)?.to_vec::<f64>();
    let target: Vec<f64> = values.to_vec::<f64>();
    let scale = target.iter().fold(1.0f64, |acc, v| acc.max(v.abs()));
    let residual = reproduced
        .iter()
        .zip(&target)
        .fold(0.0f64, |acc, (r, v)| acc.max((r - v).abs()))
        / scale;
    if !(residual <= RESIDUAL_TOL) {
        return Err(InterpolateError::LinearSystem {
            message: format!("kernel matrix is ill-conditioned (relative residual {residual:.3e})"),
        });
    }
    Ok(())
}

fn first_coincident_pair(points: &[f64], n: usize, d: usize) -> Option<(usize, usize)> {
    let mut seen: HashMap<Vec<u64>, usize> = HashMap::with_capacity(n);
    for (i, row) in points.chunks_exact(d).enumerate() {
        // -0.0 and 0.0 are the same location
        let key: Vec<u64> = row
            .iter()
            .map(|&v| if v == 0.0 { 0u64 } else { v.to_bits() })
            .collect();
        if let Some(&j) = seen.get(&key) {
            return Some((j, i));
        }
        seen.insert(key, i);
    }
    None
}

fn column_means(points: &[f64], n: usize, d: usize) -> Vec<f64> {
    let mut means = vec![0.0; d];
    for row in points.chunks_exact(d) {
        for (m, &v) in means.iter_mut().zip(row) {
            *m += v;
        }
    }
    means.iter_mut().for_each(|m| *m /= n as f64);
    means
}

/// Default shape factor: inverse of the average node spacing.
///
/// The spacing is the side of the cube that `n` nodes would each occupy in the
/// bounding box, counting only axes with non-zero extent.
fn auto_epsilon(points: &[f64], n: usize, d: usize) -> f64 {
    let mut volume = 1.0;
    let mut axes = 0;
    for axis in 0..d {
        let (lo, hi) = points
            .iter()
            .skip(axis)
            .step_by(d)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let edge = hi - lo;
        if edge > 0.0 {
            volume *= edge;
            axes += 1;
        }
    }
    if axes == 0 {
        return 1.0;
    }
    let spacing = (volume / n as f64).powf(1.0 / axes as f64);
    1.0 / spacing
}

/// Compute Euclidean distance matrix between two point sets.
/// a: [n, d], b: [m, d] -> result: [n, m]
fn cdist_euclidean<R, C>(client: &C, a: &Tensor<R>, b: &Tensor<R>) -> InterpolateResult<Tensor<R>>
where
    R: Runtime<DType = DType>,
    C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + MatmulOps<R> + RuntimeClient<R>,
{
    let device = client.device();
    let n = a.shape()[0];
    let m = b.shape()[0];
    let d = a.shape()[1];

    // ||a_i - b_j||^2 = ||a_i||^2 + ||b_j||^2 - 2 * a_i . b_j
    let a_sq = sum_sq_rows(client, a, d)?; // [n, 1]
    let b_sq = sum_sq_rows(client, b, d)?.transpose(0, 1)?.contiguous(); // [1, m]

    let b_t = b.transpose(0, 1)?.contiguous();
    let ab = client.matmul(a, &b_t)?; // [n, m]
    let two_ab = client.mul_scalar(&ab, 2.0)?;

    let a_sq_b = a_sq.broadcast_to(&[n, m])?.contiguous();
    let b_sq_b = b_sq.broadcast_to(&[n, m])?.contiguous();
    let sum_sq = client.add(&a_sq_b, &b_sq_b)?;
    let dist_sq = client.sub(&sum_sq, &two_ab)?;

    // Clamp to non-negative before sqrt
    let zero = Tensor::zeros(&[n, m], DType::F64, device);
    let dist_sq_safe = client.maximum(&dist_sq, &zero)?;
    Ok(client.sqrt(&dist_sq_safe)?)
}

/// Compute sum of squared values along rows: [n, d] -> [n, 1].
fn sum_sq_rows<R, C>(client: &C, a: &Tensor<R>, d: usize) -> InterpolateResult<Tensor<R>>
where
    R: Runtime<DType = DType>,
    C: TensorOps<R> + RuntimeClient<R>,
{
    let a2 = client.mul(a, a)?;
    let mut s = a2.narrow(1, 0, 1)?;
    for col in 1..d {
        let c = a2.narrow(1, col, 1)?;
        s = client.add(&s, &c)?;
    }
    Ok(s)
}

/// Apply RBF kernel function element-wise to distance matrix.
fn apply_kernel<R, C>(
    client: &C,
    dist: &Tensor<R>,
    kernel: RbfKernel,
    epsilon: f64,
) -> InterpolateResult<Tensor<R>>
where
    R: Runtime<DType = DType>,
    C: TensorOps<R> + ScalarOps<R> + CompareOps<R> + RuntimeClient<R>,
{
    let device = client.device();
    let shape = dist.shape().to_vec();

    match kernel {
        RbfKernel::Linear => Ok(dist.clone()),
        RbfKernel::Multiquadric => {
            // sqrt(1 + (eps*r)^2)
            let r_eps = client.mul_scalar(dist, epsilon)?;
            let r_eps2 = client.mul(&r_eps, &r_eps)?;
            let one_plus = client.add_scalar(&r_eps2, 1.0)?;
            Ok(client.sqrt(&one_plus)?)
        }
        RbfKernel::InverseMultiquadric => {
            // 1/sqrt(1 + (eps*r)^2)
            let r_eps = client.mul_scalar(dist, epsilon)?;
            let r_eps2 = client.mul(&r_eps, &r_eps)?;
            let one_plus = client.add_scalar(&r_eps2, 1.0)?;
            let sq = client.sqrt(&one_plus)?;
            let one = Tensor::full_scalar(&shape, DType::F64, 1.0, device);
            Ok(client.div(&one, &sq)?)
        }
        RbfKernel::Gaussian => {
            // exp(-(eps*r)^2)
            let r_eps = client.mul_scalar(dist, epsilon)?;
            let r_eps2 = client.mul(&r_eps, &r_eps)?;
            let neg = client.mul_scalar(&r_eps2, -1.0)?;
            Ok(client.exp(&neg)?)
        }
        RbfKernel::ThinPlate => {
            // r^2 * ln(r); r is floored at the smallest normal so r^2 underflows to 0 at r = 0
            let tiny = Tensor::full_scalar(&shape, DType::F64, f64::MIN_POSITIVE, device);
            let r = client.maximum(dist, &tiny)?;
            let r2 = client.mul(&r, &r)?;
            let ln_r = client.log(&r)?;
            Ok(client.mul(&r2, &ln_r)?)
        }
        RbfKernel::Cubic => {
            let r2 = client.mul(dist, dist)?;
            Ok(client.mul(&r2, dist)?)
        }
        RbfKernel::Quintic => {
            let r2 = client.mul(dist, dist)?;
            let r4 = client.mul(&r2, &r2)?;
            Ok(client.mul(&r4, dist)?)
        }
    }
}
