//! Clough-Tocher 2D interpolation generic implementation.
//!
//! C1-continuous piecewise cubic interpolation on Delaunay triangulation.
//! Uses the Clough-Tocher split: each triangle is divided into 3 sub-triangles
//! at the centroid, and cubic Bernstein-Bezier patches are fitted with C1
//! continuity across the split and across shared edges.
//!
//! The gradient estimation uses a least-squares fit over each vertex's
//! Delaunay neighbours.

use crate::interpolate::error::{InterpolateError, InterpolateResult};
use crate::interpolate::traits::clough_tocher::CloughTocher2D;
use crate::spatial::traits::delaunay::{Delaunay, DelaunayAlgorithms};
use log::{debug, trace};
use numr::dtype::DType;
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

/// Normal-equation determinants below this leave the vertex gradient at zero.
const GRADIENT_DET_TOL: f64 = 1e-14;

/// Fit a Clough-Tocher interpolant.
///
/// 1. Compute Delaunay triangulation
/// 2. Estimate gradients at each vertex via least-squares
pub fn clough_tocher_fit_impl<R, C>(
    client: &C,
    points: &Tensor<R>,
    values: &Tensor<R>,
    fill_value: f64,
) -> InterpolateResult<CloughTocher2D<R>>
where
    R: Runtime<DType = DType>,
    C: DelaunayAlgorithms<R> + RuntimeClient<R>,
{
    if points.shape().len() != 2 || points.shape()[1] != 2 {
        return Err(InterpolateError::InvalidParameter {
            parameter: "points".to_string(),
            message: "points must be [n, 2]".to_string(),
        });
    }
    let n = points.shape()[0];
    if values.shape() != [n] {
        return Err(InterpolateError::ShapeMismatch {
            expected: n,
            actual: values.shape().first().copied().unwrap_or(0),
            context: "clough_tocher_fit: points vs values".to_string(),
        });
    }
    if n < 3 {
        return Err(InterpolateError::InsufficientData {
            required: 3,
            actual: n,
            context: "clough_tocher_fit".to_string(),
        });
    }

    let tri = client.delaunay(points)?;
    let gradients = estimate_gradients(client, &tri, values)?;

    debug!(
        "clough_tocher_fit: {n} points, {} triangles",
        tri.simplices.shape()[0]
    );

    Ok(CloughTocher2D {
        triangulation: tri,
        values: values.clone(),
        gradients,
        fill_value,
    })
}

/// Evaluate the Clough-Tocher interpolant at query points.
///
/// Points outside the convex hull receive `ct.fill_value`.
pub fn clough_tocher_evaluate_impl<R, C>(
    client: &C,
    ct: &CloughTocher2D<R>,
    xi: &Tensor<R>,
) -> InterpolateResult<Tensor<R>>
where
    R: Runtime<DType = DType>,
    C: DelaunayAlgorithms<R> + RuntimeClient<R>,
{
    if xi.shape().len() != 2 || xi.shape()[1] != 2 {
        return Err(InterpolateError::InvalidParameter {
            parameter: "xi".to_string(),
            message: "query points must be [m, 2]".to_string(),
        });
    }

    let tri = &ct.triangulation;
    let location = client.delaunay_locate(tri, xi)?;

    let mesh = HostMesh {
        points: tri.points.to_vec::<f64>(),
        simplices: tri.simplices.to_vec::<i64>(),
        neighbors: tri.neighbors.to_vec::<i64>(),
        values: ct.values.to_vec::<f64>(),
        gradients: ct.gradients.to_vec::<f64>(),
    };
    let ids: Vec<i64> = location.simplices.to_vec::<i64>();
    let bary: Vec<f64> = location.barycentric.to_vec::<f64>();

    let result: Vec<f64> = ids
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            if t < 0 {
                ct.fill_value
            } else {
                let b = [bary[i * 3], bary[i * 3 + 1], bary[i * 3 + 2]];
                mesh.patch(t as usize).evaluate(b)
            }
        })
        .collect();

    trace!("clough_tocher_evaluate: {} queries", result.len());
    Ok(Tensor::<R>::from_slice(&result, &[result.len()], xi.device()))
}

/// Estimate vertex gradients by least squares over Delaunay neighbours.
///
/// Minimizes `Σ_j (f_j − f_i − g·(x_j − x_i))²` over the neighbours `j` of
/// each vertex `i`. Vertices not in the triangulation keep a zero gradient.
fn estimate_gradients<R, C>(
    client: &C,
    tri: &Delaunay<R>,
    values: &Tensor<R>,
) -> InterpolateResult<Tensor<R>>
where
    R: Runtime<DType = DType>,
    C: DelaunayAlgorithms<R> + RuntimeClient<R>,
{
    let n = tri.points.shape()[0];
    let pts: Vec<f64> = tri.points.to_vec::<f64>();
    let vals: Vec<f64> = values.to_vec::<f64>();
    let (indices, indptr) = client.delaunay_vertex_neighbors(tri)?;
    let indices: Vec<i64> = indices.to_vec::<i64>();
    let indptr: Vec<i64> = indptr.to_vec::<i64>();

    let mut grads = vec![0.0; n * 2];
    for i in 0..n {
        let (xi, yi, fi) = (pts[i * 2], pts[i * 2 + 1], vals[i]);
        let (mut sxx, mut sxy, mut syy, mut sxf, mut syf) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for &j in &indices[indptr[i] as usize..indptr[i + 1] as usize] {
            let j = j as usize;
            let dx = pts[j * 2] - xi;
            let dy = pts[j * 2 + 1] - yi;
            let df = vals[j] - fi;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
            sxf += dx * df;
            syf += dy * df;
        }
        let det = sxx * syy - sxy * sxy;
        if det.abs() > GRADIENT_DET_TOL {
            grads[i * 2] = (syy * sxf - sxy * syf) / det;
            grads[i * 2 + 1] = (sxx * syf - sxy * sxf) / det;
        }
    }

    Ok(Tensor::<R>::from_slice(&grads, &[n, 2], tri.points.device()))
}

/// Host copy of the fitted data used to build per-triangle patches.
struct HostMesh {
    points: Vec<f64>,
    simplices: Vec<i64>,
    neighbors: Vec<i64>,
    values: Vec<f64>,
    gradients: Vec<f64>,
}

impl HostMesh {
    fn vertex(&self, t: usize, k: usize) -> usize {
        self.simplices[t * 3 + k] as usize
    }

    fn coords(&self, v: usize) -> [f64; 2] {
        [self.points[v * 2], self.points[v * 2 + 1]]
    }

    fn centroid(&self, t: usize) -> [f64; 2] {
        let mut c = [0.0; 2];
        for k in 0..3 {
            let p = self.coords(self.vertex(t, k));
            c[0] += p[0] / 3.0;
            c[1] += p[1] / 3.0;
        }
        c
    }

    /// Barycentric coordinates of `p` with respect to triangle `t`.
    fn barycentric(&self, t: usize, p: [f64; 2]) -> [f64; 3] {
        let a = self.coords(self.vertex(t, 0));
        let b = self.coords(self.vertex(t, 1));
        let c = self.coords(self.vertex(t, 2));
        let det = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
        let l0 = ((b[1] - c[1]) * (p[0] - c[0]) + (c[0] - b[0]) * (p[1] - c[1])) / det;
        let l1 = ((c[1] - a[1]) * (p[0] - c[0]) + (a[0] - c[0]) * (p[1] - c[1])) / det;
        [l0, l1, 1.0 - l0 - l1]
    }

    /// Cross-boundary continuity factors for the three edges of `t`.
    ///
    /// Edge `k` lies opposite vertex `k`. Boundary edges use −1/2, which makes
    /// the normal derivative along the edge linear.
    fn edge_factors(&self, t: usize) -> [f64; 3] {
        let mut g = [-0.5; 3];
        for (k, gk) in g.iter_mut().enumerate() {
            let nb = self.neighbors[t * 3 + k];
            if nb < 0 {
                continue;
            }
            let c = self.barycentric(t, self.centroid(nb as usize));
            *gk = match k {
                0 => (2.0 * c[2] + c[1] - 1.0) / (2.0 - 3.0 * c[2] - 3.0 * c[1]),
                1 => (2.0 * c[0] + c[2] - 1.0) / (2.0 - 3.0 * c[0] - 3.0 * c[2]),
                _ => (2.0 * c[1] + c[0] - 1.0) / (2.0 - 3.0 * c[1] - 3.0 * c[0]),
            };
        }
        g
    }

    /// Bezier control net of the Clough-Tocher patch on triangle `t`.
    fn patch(&self, t: usize) -> Patch {
        let v = [self.vertex(t, 0), self.vertex(t, 1), self.vertex(t, 2)];
        let x = v.map(|vi| self.coords(vi));
        let f = v.map(|vi| self.values[vi]);
        let df = v.map(|vi| [self.gradients[vi * 2], self.gradients[vi * 2 + 1]]);
        let dot = |g: [f64; 2], e: [f64; 2]| g[0] * e[0] + g[1] * e[1];

        let e12 = [x[1][0] - x[0][0], x[1][1] - x[0][1]];
        let e23 = [x[2][0] - x[1][0], x[2][1] - x[1][1]];
        let e31 = [x[0][0] - x[2][0], x[0][1] - x[2][1]];

        // Directional derivatives along each edge, from both ends.
        let df12 = dot(df[0], e12);
        let df21 = -dot(df[1], e12);
        let df23 = dot(df[1], e23);
        let df32 = -dot(df[2], e23);
        let df31 = dot(df[2], e31);
        let df13 = -dot(df[0], e31);

        let c3000 = f[0];
        let c2100 = f[0] + df12 / 3.0;
        let c2010 = f[0] + df13 / 3.0;
        let c0300 = f[1];
        let c1200 = f[1] + df21 / 3.0;
        let c0210 = f[1] + df23 / 3.0;
        let c0030 = f[2];
        let c1020 = f[2] + df31 / 3.0;
        let c0120 = f[2] + df32 / 3.0;

        let c2001 = (c2100 + c2010 + c3000) / 3.0;
        let c0201 = (c1200 + c0300 + c0210) / 3.0;
        let c0021 = (c1020 + c0120 + c0030) / 3.0;

        let g = self.edge_factors(t);
        let c0111 = (g[0] * (-c0300 + 3.0 * c0210 - 3.0 * c0120 + c0030)
            + (-c0300 + 2.0 * c0210 - c0120 + c0021 + c0201))
            / 2.0;
        let c1011 = (g[1] * (-c0030 + 3.0 * c1020 - 3.0 * c2010 + c3000)
            + (-c0030 + 2.0 * c1020 - c2010 + c2001 + c0021))
            / 2.0;
        let c1101 = (g[2] * (-c3000 + 3.0 * c2100 - 3.0 * c1200 + c0300)
            + (-c3000 + 2.0 * c2100 - c1200 + c2001 + c0201))
            / 2.0;

        let c1002 = (c1101 + c1011 + c2001) / 3.0;
        let c0102 = (c1101 + c0111 + c0201) / 3.0;
        let c0012 = (c1011 + c0111 + c0021) / 3.0;
        let c0003 = (c1002 + c0102 + c0012) / 3.0;

        Patch {
            c3000,
            c2100,
            c2010,
            c2001,
            c1200,
            c1101,
            c1020,
            c1011,
            c1002,
            c0300,
            c0210,
            c0201,
            c0120,
            c0111,
            c0102,
            c0030,
            c0021,
            c0012,
            c0003,
        }
    }
}

/// Control points `cIJKL`, where the digits are the exponents of the three
/// vertex coordinates and the centroid coordinate.
struct Patch {
    c3000: f64,
    c2100: f64,
    c2010: f64,
    c2001: f64,
    c1200: f64,
    c1101: f64,
    c1020: f64,
    c1011: f64,
    c1002: f64,
    c0300: f64,
    c0210: f64,
    c0201: f64,
    c0120: f64,
    c0111: f64,
    c0102: f64,
    c0030: f64,
    c0021: f64,
    c0012: f64,
    c0003: f64,
}

impl Patch {
    /// Evaluate at barycentric coordinates `b` of the outer triangle.
    ///
    /// Subtracting the smallest coordinate moves into the sub-triangle that
    /// contains the point, whose fourth coordinate is the centroid weight.
    fn evaluate(&self, b: [f64; 3]) -> f64 {
        let minval = b[0].min(b[1]).min(b[2]);
        let b1 = b[0] - minval;
        let b2 = b[1] - minval;
        let b3 = b[2] - minval;
        let b4 = 3.0 * minval;

        b1 * b1 * b1 * self.c3000
            + 3.0 * b1 * b1 * b2 * self.c2100
            + 3.0 * b1 * b1 * b3 * self.c2010
            + 3.0 * b1 * b1 * b4 * self.c2001
            + 3.0 * b1 * b2 * b2 * self.c1200
            + 6.0 * b1 * b2 * b4 * self.c1101
            + 3.0 * b1 * b3 * b3 * self.c1020
            + 6.0 * b1 * b3 * b4 * self.c1011
            + 3.0 * b1 * b4 * b4 * self.c1002
            + b2 * b2 * b2 * self.c0300
            + 3.0 * b2 * b2 * b3 * self.c0210
            + 3.0 * b2 * b2 * b4 * self.c0201
            + 3.0 * b2 * b3 * b3 * self.c0120
            + 6.0 * b2 * b3 * b4 * self.c0111
            + 3.0 * b2 * b4 * b4 * self.c0102
            + b3 * b3 * b3 * self.c0030
            + 3.0 * b3 * b3 * b4 * self.c0021
            + 3.0 * b3 * b4 * b4 * self.c0012
            + b4 * b4 * b4 * self.c0003
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};

    fn setup() -> (CpuDevice, CpuClient) {
        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());
        (device, client)
    }

    fn grid_points(k: usize, f: impl Fn(f64, f64) -> f64) -> (Vec<f64>, Vec<f64>) {
        let mut pts = Vec::new();
        let mut vals = Vec::new();
        for i in 0..k {
            for j in 0..k {
                let x = j as f64 / (k - 1) as f64;
                let y = i as f64 / (k - 1) as f64;
                pts.extend_from_slice(&[x, y]);
                vals.push(f(x, y));
            }
        }
        (pts, vals)
    }

    #[test]
    fn test_ct_reproduces_linear() {
        let (device, client) = setup();
        let (pts, vals) = grid_points(5, |x, y| 2.0 * x - 3.0 * y + 1.0);
        let n = vals.len();
        let points = Tensor::<CpuRuntime>::from_slice(&pts, &[n, 2], &device);
        let values = Tensor::<CpuRuntime>::from_slice(&vals, &[n], &device);

        let ct = clough_tocher_fit_impl(&client, &points, &values, f64::NAN).unwrap();
        let query = Tensor::<CpuRuntime>::from_slice(
            &[0.13, 0.77, 0.5, 0.5, 0.91, 0.02, 0.0, 1.0],
            &[4, 2],
            &device,
        );
        let result: Vec<f64> = clough_tocher_evaluate_impl(&client, &ct, &query)
            .unwrap()
            .to_vec::<f64>();

        let q = [(0.13, 0.77), (0.5, 0.5), (0.91, 0.02), (0.0, 1.0)];
        for (r, (x, y)) in result.iter().zip(q) {
            let expected = 2.0 * x - 3.0 * y + 1.0;
            assert!((r - expected).abs() < 1e-10, "{r} vs {expected}");
        }
    }

    #[test]
    fn test_ct_passes_through_data() {
        let (device, client) = setup();
        let pts = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.3, 0.6];
        let vals = [1.0, -2.0, 0.5, 4.0, 3.0];
        let points = Tensor::<CpuRuntime>::from_slice(&pts, &[5, 2], &device);
        let values = Tensor::<CpuRuntime>::from_slice(&vals, &[5], &device);

        let ct = clough_tocher_fit_impl(&client, &points, &values, f64::NAN).unwrap();
        let result: Vec<f64> = clough_tocher_evaluate_impl(&client, &ct, &points)
            .unwrap()
            .to_vec::<f64>();
        for (r, v) in result.iter().zip(vals) {
            assert!((r - v).abs() < 1e-10, "{r} vs {v}");
        }
    }

    #[test]
    fn test_ct_approximates_quadratic() {
        let (device, client) = setup();
        let (pts, vals) = grid_points(8, |x, y| x * x + y * y);
        let n = vals.len();
        let points = Tensor::<CpuRuntime>::from_slice(&pts, &[n, 2], &device);
        let values = Tensor::<CpuRuntime>::from_slice(&vals, &[n], &device);

        let ct = clough_tocher_fit_impl(&client, &points, &values, f64::NAN).unwrap();
        let query = Tensor::<CpuRuntime>::from_slice(&[0.4, 0.45, 0.55, 0.6], &[2, 2], &device);
        let result: Vec<f64> = clough_tocher_evaluate_impl(&client, &ct, &query)
            .unwrap()
            .to_vec::<f64>();

        assert!((result[0] - (0.16 + 0.2025)).abs() < 0.02, "got {}", result[0]);
        assert!((result[1] - (0.3025 + 0.36)).abs() < 0.02, "got {}", result[1]);
    }

    #[test]
    fn test_ct_outside_hull_gets_fill() {
        let (device, client) = setup();
        let points = Tensor::<CpuRuntime>::from_slice(
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            &[4, 2],
            &device,
        );
        let values = Tensor::<CpuRuntime>::from_slice(&[0.0, 1.0, 1.0, 2.0], &[4], &device);

        let ct = clough_tocher_fit_impl(&client, &points, &values, -99.0).unwrap();
        let query = Tensor::<CpuRuntime>::from_slice(&[2.0, 2.0, -0.1, 0.5], &[2, 2], &device);
        let result: Vec<f64> = clough_tocher_evaluate_impl(&client, &ct, &query)
            .unwrap()
            .to_vec::<f64>();
        assert_eq!(result, vec![-99.0, -99.0]);
    }

    #[test]
    fn test_ct_three_points_is_planar() {
        let (device, client) = setup();
        let points =
            Tensor::<CpuRuntime>::from_slice(&[0.0, 0.0, 2.0, 0.0, 0.0, 2.0], &[3, 2], &device);
        let values = Tensor::<CpuRuntime>::from_slice(&[1.0, 3.0, 5.0], &[3], &device);

        let ct = clough_tocher_fit_impl(&client, &points, &values, f64::NAN).unwrap();
        let query = Tensor::<CpuRuntime>::from_slice(&[0.5, 0.5, 1.0, 0.2], &[2, 2], &device);
        let result: Vec<f64> = clough_tocher_evaluate_impl(&client, &ct, &query)
            .unwrap()
            .to_vec::<f64>();

        // Plane through the data: f = 1 + x + 2y
        assert!((result[0] - 2.5).abs() < 1e-10);
        assert!((result[1] - 2.4).abs() < 1e-10);
    }

    #[test]
    fn test_ct_square_corners_cover_closed_square() {
        let (device, client) = setup();
        let points = Tensor::<CpuRuntime>::from_slice(
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            &[4, 2],
            &device,
        );
        let values = Tensor::<CpuRuntime>::from_slice(&[0.0, 1.0, 1.0, 2.0], &[4], &device);
        let ct = clough_tocher_fit_impl(&client, &points, &values, f64::NAN).unwrap();

        let mut q = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                q.extend_from_slice(&[j as f64 / 9.0, i as f64 / 9.0]);
            }
        }
        let query = Tensor::<CpuRuntime>::from_slice(&q, &[100, 2], &device);
        let result: Vec<f64> = clough_tocher_evaluate_impl(&client, &ct, &query)
            .unwrap()
            .to_vec::<f64>();
        assert!(result.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_ct_too_few_points() {
        let (device, client) = setup();
        let points = Tensor::<CpuRuntime>::from_slice(&[0.0, 0.0, 1.0, 1.0], &[2, 2], &device);
        let values = Tensor::<CpuRuntime>::from_slice(&[0.0, 1.0], &[2], &device);
        let err = clough_tocher_fit_impl(&client, &points, &values, f64::NAN).unwrap_err();
        assert!(matches!(err, InterpolateError::InsufficientData { .. }));
    }
}
