//! Spatial algorithms and data structures.
//!
//! This module provides the triangulation capability used by the piecewise
//! scattered-data interpolators:
//! - Delaunay triangulation of planar point sets
//! - Point location with barycentric coordinates
//! - Vertex adjacency (CSR)
//!
//! # Runtime-Generic Architecture
//!
//! Operations are implemented generically over numr's `Runtime` trait and
//! exposed through algorithm traits; backends implement the traits by pure
//! delegation.
//!
//! ```text
//! spatial/
//! ├── mod.rs                # Exports only
//! ├── error.rs              # SpatialError
//! ├── validation.rs         # Input validation helpers
//! ├── traits/               # Algorithm trait definitions
//! │   └── delaunay.rs
//! ├── impl_generic/         # Generic implementations (written once)
//! │   └── delaunay.rs
//! └── cpu/                  # CPU trait impl (pure delegation)
//!     └── delaunay.rs
//! ```

mod cpu;
mod error;
pub mod impl_generic;
pub mod traits;
mod validation;

pub use error::{SpatialError, SpatialResult};

// Re-export validation helpers
pub use validation::{validate_points_dtype, validate_points_planar};

// Re-export traits and types
pub use traits::delaunay::{Delaunay, DelaunayAlgorithms, SimplexLocation};
