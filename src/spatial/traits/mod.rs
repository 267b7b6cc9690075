//! Spatial algorithm traits.
//!
//! This module defines the algorithmic contracts for spatial operations.

pub mod delaunay;

pub use delaunay::{Delaunay, DelaunayAlgorithms, SimplexLocation};
