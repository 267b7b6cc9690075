//! Generic Delaunay triangulation implementation.
//!
//! Bowyer-Watson incremental algorithm. Geometry runs on host copies of the
//! point data; results are returned as tensors on the points' device.
//!
//! Every insertion scans all current triangles, so building the mesh is
//! O(N²) in the number of sites. Locating a query outside the hull ends in a
//! scan over all triangles.

use crate::spatial::error::{SpatialError, SpatialResult};
use crate::spatial::traits::delaunay::{Delaunay, SimplexLocation};
use crate::spatial::{validate_points_dtype, validate_points_planar};
use log::{debug, trace, warn};
use numr::dtype::DType;
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;
use std::collections::{BTreeSet, HashMap};

/// Barycentric slack for counting a point on an edge as inside.
const INSIDE_TOL: f64 = 1e-10;

/// Twice-area threshold (in unit-box coordinates) below which points are collinear.
const COLLINEAR_TOL: f64 = 1e-12;

/// Vertex at infinity closing every hull edge into a ghost triangle.
const GHOST: usize = usize::MAX;

/// Compute Delaunay triangulation using Bowyer-Watson algorithm.
pub fn delaunay_impl<R, C>(_client: &C, points: &Tensor<R>) -> SpatialResult<Delaunay<R>>
where
    R: Runtime<DType = DType>,
    C: RuntimeClient<R>,
{
    validate_points_dtype(points.dtype(), "delaunay")?;
    validate_points_planar(points.shape(), "delaunay")?;

    let n = points.shape()[0];
    if n < 3 {
        return Err(SpatialError::Degenerate {
            context: "delaunay",
            reason: format!("need at least 3 points, got {n}"),
        });
    }

    let device = points.device();
    let points_data: Vec<f64> = points.to_vec::<f64>();

    // Fold coincident points; the last-inserted duplicate represents the site.
    let reps = distinct_sites(&points_data, n);
    if reps.len() < n {
        warn!(
            "delaunay: {} coincident point(s) folded into existing vertices",
            n - reps.len()
        );
    }
    if reps.len() < 3 {
        return Err(SpatialError::Degenerate {
            context: "delaunay",
            reason: format!("need at least 3 distinct points, got {}", reps.len()),
        });
    }

    let unit = normalize_sites(&points_data, &reps);
    if all_collinear(&unit) {
        return Err(SpatialError::Degenerate {
            context: "delaunay",
            reason: "all points are collinear".to_string(),
        });
    }

    let local_triangles = bowyer_watson(&unit);
    if local_triangles.is_empty() {
        return Err(SpatialError::Degenerate {
            context: "delaunay",
            reason: "triangulation produced no triangles".to_string(),
        });
    }

    // Map local site indices back to point indices.
    let final_triangles: Vec<[usize; 3]> = local_triangles
        .iter()
        .map(|t| [reps[t[0]], reps[t[1]], reps[t[2]]])
        .collect();
    let n_triangles = final_triangles.len();
    debug!(
        "delaunay: {} sites, {} triangles",
        reps.len(),
        n_triangles
    );

    let mut simplices_data: Vec<i64> = Vec::with_capacity(n_triangles * 3);
    for tri in &final_triangles {
        simplices_data.extend(tri.iter().map(|&v| v as i64));
    }

    let neighbors_data = triangle_neighbors(&final_triangles);

    let mut vertex_to_simplex: Vec<i64> = vec![-1; n];
    for (ti, tri) in final_triangles.iter().enumerate() {
        for &v in tri {
            if vertex_to_simplex[v] == -1 {
                vertex_to_simplex[v] = ti as i64;
            }
        }
    }

    // Hull vertices are the endpoints of edges without a neighbor.
    let mut hull_vertices: BTreeSet<usize> = BTreeSet::new();
    for (ti, tri) in final_triangles.iter().enumerate() {
        for k in 0..3 {
            if neighbors_data[ti * 3 + k] == -1 {
                hull_vertices.insert(tri[(k + 1) % 3]);
                hull_vertices.insert(tri[(k + 2) % 3]);
            }
        }
    }
    let hull: Vec<i64> = hull_vertices.iter().map(|&v| v as i64).collect();

    Ok(Delaunay {
        points: points.clone(),
        simplices: Tensor::<R>::from_slice(&simplices_data, &[n_triangles, 3], device),
        neighbors: Tensor::<R>::from_slice(&neighbors_data, &[n_triangles, 3], device),
        vertex_to_simplex: Tensor::<R>::from_slice(&vertex_to_simplex, &[n], device),
        convex_hull: Tensor::<R>::from_slice(&hull, &[hull.len()], device),
    })
}

/// Indices of distinct sites in first-seen order, each carrying the last duplicate's index.
fn distinct_sites(points: &[f64], n: usize) -> Vec<usize> {
    let mut slot_of: HashMap<(u64, u64), usize> = HashMap::with_capacity(n);
    let mut reps: Vec<usize> = Vec::with_capacity(n);
    for i in 0..n {
        let key = (
            canonical_bits(points[i * 2]),
            canonical_bits(points[i * 2 + 1]),
        );
        match slot_of.get(&key) {
            Some(&slot) => reps[slot] = i,
            None => {
                slot_of.insert(key, reps.len());
                reps.push(i);
            }
        }
    }
    reps
}

fn canonical_bits(v: f64) -> u64 {
    // -0.0 and 0.0 are the same coordinate
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Site coordinates translated and scaled into the unit box.
fn normalize_sites(points: &[f64], reps: &[usize]) -> Vec<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &i in reps {
        let (x, y) = (points[i * 2], points[i * 2 + 1]);
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    let scale = (max_x - min_x).max(max_y - min_y);
    let scale = if scale > 0.0 { scale } else { 1.0 };
    reps.iter()
        .map(|&i| {
            (
                (points[i * 2] - min_x) / scale,
                (points[i * 2 + 1] - min_y) / scale,
            )
        })
        .collect()
}

fn all_collinear(sites: &[(f64, f64)]) -> bool {
    let a = sites[0];
    // Farthest site from `a` gives the best-conditioned direction.
    let b = sites
        .iter()
        .copied()
        .max_by(|p, q| dist_sq(a, *p).total_cmp(&dist_sq(a, *q)))
        .unwrap_or(a);
    let len = dist_sq(a, b).sqrt();
    if len == 0.0 {
        return true;
    }
    sites
        .iter()
        .all(|&p| (cross(a, b, p) / len).abs() <= COLLINEAR_TOL)
}

fn dist_sq(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0) * (a.0 - b.0) + (a.1 - b.1) * (a.1 - b.1)
}

/// Twice the signed area of (a, b, c); positive when counter-clockwise.
fn cross(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1)
}

/// Triangulate unit-box sites; triangles index into `sites`, counter-clockwise.
///
/// Each hull edge `a -> b` carries a ghost triangle `[a, b, GHOST]` whose
/// "circumcircle" is the open half-plane left of the edge plus the open edge
/// itself, so the solid triangles always cover the convex hull exactly.
fn bowyer_watson(sites: &[(f64, f64)]) -> Vec<[usize; 3]> {
    let Some([a, b, c]) = initial_triangle(sites) else {
        return Vec::new();
    };
    let mut triangles: Vec<[usize; 3]> =
        vec![[a, b, c], [b, a, GHOST], [c, b, GHOST], [a, c, GHOST]];

    for (i, &p) in sites.iter().enumerate() {
        if i == a || i == b || i == c {
            continue;
        }

        let owner: HashMap<(usize, usize), usize> = triangles
            .iter()
            .enumerate()
            .flat_map(|(t, tri)| (0..3).map(move |k| ((tri[k], tri[(k + 1) % 3]), t)))
            .collect();

        let Some(seed) = seed_triangle(sites, &triangles, p) else {
            warn!("bowyer_watson: site {i} could not be placed");
            continue;
        };

        // Cavity: triangles in conflict with `p`, connected to the seed.
        let mut bad = vec![false; triangles.len()];
        bad[seed] = true;
        let mut stack = vec![seed];
        while let Some(t) = stack.pop() {
            let tri = triangles[t];
            for k in 0..3 {
                let (u, v) = (tri[k], tri[(k + 1) % 3]);
                if let Some(&across) = owner.get(&(v, u)) {
                    if !bad[across] && in_conflict(sites, &triangles[across], p) {
                        bad[across] = true;
                        stack.push(across);
                    }
                }
            }
        }

        // Grow the cavity until every solid boundary edge sees `p` on its left.
        loop {
            let mut grown = false;
            for (t, tri) in triangles.iter().enumerate() {
                if !bad[t] {
                    continue;
                }
                for k in 0..3 {
                    let (u, v) = (tri[k], tri[(k + 1) % 3]);
                    if u == GHOST || v == GHOST {
                        continue;
                    }
                    if let Some(&across) = owner.get(&(v, u)) {
                        if !bad[across] && cross(sites[u], sites[v], p) <= 0.0 {
                            bad[across] = true;
                            grown = true;
                        }
                    }
                }
            }
            if !grown {
                break;
            }
        }

        let mut next: Vec<[usize; 3]> = triangles
            .iter()
            .zip(&bad)
            .filter(|(_, is_bad)| !**is_bad)
            .map(|(tri, _)| *tri)
            .collect();
        for (tri, _) in triangles.iter().zip(&bad).filter(|(_, is_bad)| **is_bad) {
            for k in 0..3 {
                let (u, v) = (tri[k], tri[(k + 1) % 3]);
                let on_boundary = !matches!(owner.get(&(v, u)), Some(&across) if bad[across]);
                if on_boundary {
                    next.push(match (u, v) {
                        (GHOST, v) => [v, i, GHOST],
                        (u, GHOST) => [i, u, GHOST],
                        (u, v) => [u, v, i],
                    });
                }
            }
        }
        trace!("bowyer_watson: inserted site {i}, {} triangles", next.len());
        triangles = next;
    }

    triangles
        .into_iter()
        .filter(|tri| tri[2] != GHOST)
        .collect()
}

/// Three well-spread, non-collinear sites in counter-clockwise order.
fn initial_triangle(sites: &[(f64, f64)]) -> Option<[usize; 3]> {
    let a = 0;
    let b = (1..sites.len()).max_by(|&p, &q| {
        dist_sq(sites[a], sites[p]).total_cmp(&dist_sq(sites[a], sites[q]))
    })?;
    let c = (1..sites.len())
        .filter(|&k| k != b)
        .max_by(|&p, &q| {
            let area = |k: usize| cross(sites[a], sites[b], sites[k]).abs();
            area(p).total_cmp(&area(q))
        })?;
    let area = cross(sites[a], sites[b], sites[c]);
    if area == 0.0 {
        return None;
    }
    Some(if area > 0.0 { [a, b, c] } else { [a, c, b] })
}

/// A triangle the new site must replace: one containing it, or a ghost facing it.
fn seed_triangle(sites: &[(f64, f64)], triangles: &[[usize; 3]], p: (f64, f64)) -> Option<usize> {
    let edge_sides = |tri: [usize; 3]| {
        (0..3).map(move |k| cross(sites[tri[k]], sites[tri[(k + 1) % 3]], p))
    };
    triangles
        .iter()
        .position(|tri| tri[2] != GHOST && edge_sides(*tri).all(|side| side >= 0.0))
        .or_else(|| {
            triangles
                .iter()
                .position(|tri| tri[2] == GHOST && in_conflict(sites, tri, p))
        })
        .or_else(|| {
            // Rounding left `p` outside every closed triangle; take the nearest miss.
            (0..triangles.len())
                .filter(|&t| triangles[t][2] != GHOST)
                .max_by(|&s, &t| {
                    let worst = |t: usize| edge_sides(triangles[t]).fold(f64::INFINITY, f64::min);
                    worst(s).total_cmp(&worst(t))
                })
        })
}

fn in_conflict(sites: &[(f64, f64)], tri: &[usize; 3], p: (f64, f64)) -> bool {
    if tri[2] == GHOST {
        let (a, b) = (sites[tri[0]], sites[tri[1]]);
        let side = cross(a, b, p);
        side > 0.0 || (side == 0.0 && strictly_between(a, b, p))
    } else {
        in_circumcircle(sites[tri[0]], sites[tri[1]], sites[tri[2]], p)
    }
}

fn strictly_between(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    let t = (p.0 - a.0) * (b.0 - a.0) + (p.1 - a.1) * (b.1 - a.1);
    t > 0.0 && t < dist_sq(a, b)
}

fn normalize_edge(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Strict in-circle test for a counter-clockwise triangle.
fn in_circumcircle(a: (f64, f64), b: (f64, f64), c: (f64, f64), p: (f64, f64)) -> bool {
    let (adx, ady) = (a.0 - p.0, a.1 - p.1);
    let (bdx, bdy) = (b.0 - p.0, b.1 - p.1);
    let (cdx, cdy) = (c.0 - p.0, c.1 - p.1);
    let det = (adx * adx + ady * ady) * (bdx * cdy - cdx * bdy)
        + (bdx * bdx + bdy * bdy) * (cdx * ady - adx * cdy)
        + (cdx * cdx + cdy * cdy) * (adx * bdy - bdx * ady);
    det > 0.0
}

/// Neighbor across the edge opposite each vertex, flattened [n_triangles * 3].
fn triangle_neighbors(triangles: &[[usize; 3]]) -> Vec<i64> {
    let mut edge_to_triangle: HashMap<(usize, usize), Vec<(usize, usize)>> = HashMap::new();
    for (ti, tri) in triangles.iter().enumerate() {
        for k in 0..3 {
            let e = normalize_edge(tri[(k + 1) % 3], tri[(k + 2) % 3]);
            edge_to_triangle.entry(e).or_default().push((ti, k));
        }
    }

    let mut neighbors: Vec<i64> = vec![-1; triangles.len() * 3];
    for owners in edge_to_triangle.values() {
        if let [(t0, k0), (t1, k1)] = owners.as_slice() {
            neighbors[t0 * 3 + k0] = *t1 as i64;
            neighbors[t1 * 3 + k1] = *t0 as i64;
        }
    }
    neighbors
}

/// Host view of a triangulation used by point location.
struct TriangleMesh {
    coords: Vec<f64>,
    simplices: Vec<usize>,
    neighbors: Vec<i64>,
}

impl TriangleMesh {
    fn from_delaunay<R: Runtime>(tri: &Delaunay<R>) -> Self {
        Self {
            coords: tri.points.to_vec::<f64>(),
            simplices: tri
                .simplices
                .to_vec::<i64>()
                .into_iter()
                .map(|v| v as usize)
                .collect(),
            neighbors: tri.neighbors.to_vec::<i64>(),
        }
    }

    fn len(&self) -> usize {
        self.simplices.len() / 3
    }

    fn vertex(&self, t: usize, k: usize) -> (f64, f64) {
        let v = self.simplices[t * 3 + k];
        (self.coords[v * 2], self.coords[v * 2 + 1])
    }

    fn barycentric(&self, t: usize, q: (f64, f64)) -> [f64; 3] {
        let a = self.vertex(t, 0);
        let b = self.vertex(t, 1);
        let c = self.vertex(t, 2);
        let (v0x, v0y) = (b.0 - a.0, b.1 - a.1);
        let (v1x, v1y) = (c.0 - a.0, c.1 - a.1);
        let (v2x, v2y) = (q.0 - a.0, q.1 - a.1);
        let den = v0x * v1y - v1x * v0y;
        let l1 = (v2x * v1y - v1x * v2y) / den;
        let l2 = (v0x * v2y - v2x * v0y) / den;
        [1.0 - l1 - l2, l1, l2]
    }

    /// Walk toward `q` from `start`, falling back to a full scan.
    fn locate(&self, q: (f64, f64), start: usize) -> Option<(usize, [f64; 3])> {
        if !(q.0.is_finite() && q.1.is_finite()) {
            return None;
        }

        let mut t = start;
        for _ in 0..self.len() {
            let b = self.barycentric(t, q);
            let (k_min, b_min) = b
                .iter()
                .copied()
                .enumerate()
                .min_by(|x, y| x.1.total_cmp(&y.1))
                .unwrap_or((0, 0.0));
            if b_min >= -INSIDE_TOL {
                return Some((t, b));
            }
            let next = self.neighbors[t * 3 + k_min];
            if next < 0 {
                break;
            }
            t = next as usize;
        }

        (0..self.len()).find_map(|t| {
            let b = self.barycentric(t, q);
            b.iter().all(|&l| l >= -INSIDE_TOL).then_some((t, b))
        })
    }
}

/// Locate query points, returning the containing simplex and barycentric
/// coordinates of each, or `None` outside the hull.
fn locate_points<R: Runtime<DType = DType>>(
    tri: &Delaunay<R>,
    query: &Tensor<R>,
) -> SpatialResult<Vec<Option<(usize, [f64; 3])>>> {
    validate_points_dtype(query.dtype(), "delaunay_locate")?;
    validate_points_planar(query.shape(), "delaunay_locate")?;

    let mesh = TriangleMesh::from_delaunay(tri);
    let q: Vec<f64> = query.to_vec::<f64>();
    let m = query.shape()[0];

    let mut hint = 0;
    let mut found = Vec::with_capacity(m);
    for i in 0..m {
        let hit = mesh.locate((q[i * 2], q[i * 2 + 1]), hint);
        if let Some((t, _)) = hit {
            hint = t;
        }
        found.push(hit);
    }
    Ok(found)
}

/// Find the simplex containing each query point.
pub fn delaunay_find_simplex_impl<R, C>(
    _client: &C,
    tri: &Delaunay<R>,
    query: &Tensor<R>,
) -> SpatialResult<Tensor<R>>
where
    R: Runtime<DType = DType>,
    C: RuntimeClient<R>,
{
    let located = locate_points(tri, query)?;
    let ids: Vec<i64> = located
        .iter()
        .map(|hit| hit.map_or(-1, |(t, _)| t as i64))
        .collect();
    Ok(Tensor::<R>::from_slice(&ids, &[ids.len()], query.device()))
}

/// Locate query points and compute barycentric coordinates.
pub fn delaunay_locate_impl<R, C>(
    _client: &C,
    tri: &Delaunay<R>,
    query: &Tensor<R>,
) -> SpatialResult<SimplexLocation<R>>
where
    R: Runtime<DType = DType>,
    C: RuntimeClient<R>,
{
    let located = locate_points(tri, query)?;
    let m = located.len();
    let mut ids: Vec<i64> = Vec::with_capacity(m);
    let mut bary: Vec<f64> = Vec::with_capacity(m * 3);
    for hit in &located {
        match hit {
            Some((t, b)) => {
                ids.push(*t as i64);
                bary.extend_from_slice(b);
            }
            None => {
                ids.push(-1);
                bary.extend_from_slice(&[f64::NAN; 3]);
            }
        }
    }
    let device = query.device();
    Ok(SimplexLocation {
        simplices: Tensor::<R>::from_slice(&ids, &[m], device),
        barycentric: Tensor::<R>::from_slice(&bary, &[m, 3], device),
    })
}

/// Get vertex neighbors.
pub fn delaunay_vertex_neighbors_impl<R, C>(
    _client: &C,
    tri: &Delaunay<R>,
) -> SpatialResult<(Tensor<R>, Tensor<R>)>
where
    R: Runtime<DType = DType>,
    C: RuntimeClient<R>,
{
    let n = tri.points.shape()[0];
    let simplices_data: Vec<i64> = tri.simplices.to_vec::<i64>();
    let device = tri.points.device();

    let mut neighbors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    for s in simplices_data.chunks_exact(3) {
        let (v0, v1, v2) = (s[0] as usize, s[1] as usize, s[2] as usize);
        neighbors[v0].extend([v1, v2]);
        neighbors[v1].extend([v0, v2]);
        neighbors[v2].extend([v0, v1]);
    }

    let mut indices: Vec<i64> = Vec::new();
    let mut indptr: Vec<i64> = vec![0];
    for vertex_neighbors in &neighbors {
        indices.extend(vertex_neighbors.iter().map(|&v| v as i64));
        indptr.push(indices.len() as i64);
    }

    Ok((
        Tensor::<R>::from_slice(&indices, &[indices.len()], device),
        Tensor::<R>::from_slice(&indptr, &[indptr.len()], device),
    ))
}
