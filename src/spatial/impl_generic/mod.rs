//! Generic spatial algorithm implementations.
//!
//! Runtime-generic implementations of spatial algorithms. Triangulation is
//! inherently sequential, so these read point data back to the host, run the
//! geometry there, and return index tensors on the caller's device.

mod delaunay;

// Re-export only what backends need
pub use delaunay::{
    delaunay_find_simplex_impl, delaunay_impl, delaunay_locate_impl,
    delaunay_vertex_neighbors_impl,
};
