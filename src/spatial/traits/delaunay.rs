//! Delaunay triangulation trait.
//!
//! Computes the Delaunay triangulation of a planar point set. The Delaunay
//! triangulation maximizes the minimum angle of all triangles, which makes it
//! the natural neighbourhood structure for piecewise interpolation.

use crate::spatial::error::SpatialResult;
use numr::runtime::Runtime;
use numr::tensor::Tensor;

/// Delaunay triangulation result.
#[derive(Debug, Clone)]
pub struct Delaunay<R: Runtime> {
    /// Original points [n, 2].
    pub points: Tensor<R>,

    /// Triangles as triples of vertex indices into `points` [n_simplices, 3] (I64 dtype).
    /// Vertices are ordered counter-clockwise.
    pub simplices: Tensor<R>,

    /// Neighboring simplex indices [n_simplices, 3] (I64 dtype).
    /// neighbors[i, j] is the simplex sharing the edge opposite vertex j.
    /// -1 indicates no neighbor (boundary).
    pub neighbors: Tensor<R>,

    /// For each point, index of one simplex containing it [n] (I64 dtype).
    /// -1 for coincident duplicates that were folded into another vertex.
    pub vertex_to_simplex: Tensor<R>,

    /// Vertex indices on the convex hull, ascending [n_hull] (I64 dtype).
    pub convex_hull: Tensor<R>,
}

/// Result of locating query points in a triangulation.
#[derive(Debug, Clone)]
pub struct SimplexLocation<R: Runtime> {
    /// Containing simplex per query [m] (I64 dtype), -1 outside the hull.
    pub simplices: Tensor<R>,

    /// Barycentric coordinates per query with respect to the containing
    /// simplex's vertices, in simplex vertex order [m, 3]. NaN rows outside the hull.
    pub barycentric: Tensor<R>,
}

/// Algorithmic contract for Delaunay triangulation operations.
///
/// All backends implementing Delaunay algorithms MUST implement this trait.
pub trait DelaunayAlgorithms<R: Runtime> {
    /// Compute the Delaunay triangulation of a planar point set.
    ///
    /// # Arguments
    ///
    /// * `points` - Point set with shape (n, 2), F64
    ///
    /// # Returns
    ///
    /// Delaunay structure containing simplices and neighbor information.
    ///
    /// # Algorithm
    ///
    /// Bowyer-Watson incremental insertion on coordinates normalized to the
    /// unit box:
    /// 1. Create a super-triangle containing all points
    /// 2. Insert points one by one
    /// 3. For each point, find all triangles whose circumcircle contains it
    /// 4. Remove those triangles and re-triangulate the cavity
    /// 5. Remove triangles connected to the super-triangle
    ///
    /// Coincident points are folded into one vertex carrying the index of the
    /// last-inserted duplicate.
    ///
    /// # Errors
    ///
    /// `SpatialError::Degenerate` when fewer than 3 distinct points remain or
    /// all points are collinear.
    fn delaunay(&self, points: &Tensor<R>) -> SpatialResult<Delaunay<R>>;

    /// Find the simplex containing each query point.
    ///
    /// Points on an edge or vertex count as inside.
    ///
    /// # Returns
    ///
    /// Tensor [m] (I64 dtype) with simplex indices. -1 for points outside the hull.
    fn delaunay_find_simplex(&self, tri: &Delaunay<R>, query: &Tensor<R>)
        -> SpatialResult<Tensor<R>>;

    /// Locate each query point and compute its barycentric coordinates.
    ///
    /// # Arguments
    ///
    /// * `tri` - The Delaunay triangulation
    /// * `query` - Query points with shape (m, 2)
    fn delaunay_locate(
        &self,
        tri: &Delaunay<R>,
        query: &Tensor<R>,
    ) -> SpatialResult<SimplexLocation<R>>;

    /// Get the vertex neighbors of each point.
    ///
    /// # Returns
    ///
    /// Returns (indices, indptr) in CSR-like format:
    /// - indices: concatenated neighbor indices, ascending per vertex
    /// - indptr: start/end positions for each vertex [n+1]
    fn delaunay_vertex_neighbors(&self, tri: &Delaunay<R>) -> SpatialResult<(Tensor<R>, Tensor<R>)>;
}
