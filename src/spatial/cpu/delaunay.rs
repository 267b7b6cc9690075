//! CPU implementation of Delaunay triangulation.

use crate::spatial::error::SpatialResult;
use crate::spatial::impl_generic::{
    delaunay_find_simplex_impl, delaunay_impl, delaunay_locate_impl,
    delaunay_vertex_neighbors_impl,
};
use crate::spatial::traits::delaunay::{Delaunay, DelaunayAlgorithms, SimplexLocation};
use numr::runtime::cpu::{CpuClient, CpuRuntime};
use numr::tensor::Tensor;

impl DelaunayAlgorithms<CpuRuntime> for CpuClient {
    fn delaunay(&self, points: &Tensor<CpuRuntime>) -> SpatialResult<Delaunay<CpuRuntime>> {
        delaunay_impl(self, points)
    }

    fn delaunay_find_simplex(
        &self,
        tri: &Delaunay<CpuRuntime>,
        query: &Tensor<CpuRuntime>,
    ) -> SpatialResult<Tensor<CpuRuntime>> {
        delaunay_find_simplex_impl(self, tri, query)
    }

    fn delaunay_locate(
        &self,
        tri: &Delaunay<CpuRuntime>,
        query: &Tensor<CpuRuntime>,
    ) -> SpatialResult<SimplexLocation<CpuRuntime>> {
        delaunay_locate_impl(self, tri, query)
    }

    fn delaunay_vertex_neighbors(
        &self,
        tri: &Delaunay<CpuRuntime>,
    ) -> SpatialResult<(Tensor<CpuRuntime>, Tensor<CpuRuntime>)> {
        delaunay_vertex_neighbors_impl(self, tri)
    }
}
