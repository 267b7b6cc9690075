//! gridr - scattered 2D data onto regular grids
//!
//! gridr resamples irregularly placed `(x, y, value)` measurements onto a
//! rectangular grid with one of four methods: nearest neighbour, piecewise
//! linear on a Delaunay triangulation, Clough-Tocher piecewise cubic, or a
//! radial basis function interpolant. It is built on numr's tensors, ops and
//! dense solver.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      gridr                               │
//! │   (grid, table, config, interpolate, notify)            │
//! │                        │                                 │
//! │                   spatial (Delaunay)                     │
//! └──────────────────────────┬──────────────────────────────┘
//!                            │ uses
//! ┌──────────────────────────▼──────────────────────────────┐
//! │                       numr                               │
//! │        (tensors, matmul, elementwise ops, solve)        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`grid`] - Axis sampling and query meshes
//! - [`table`] - Named numeric columns
//! - [`interpolate`] - Point sets, the four methods, grid-level entry points
//! - [`spatial`] - Delaunay triangulation and point location
//! - [`config`] - JSON request descriptions
//! - [`notify`] - Run reports through a pluggable notifier
//!
//! # Backend Support
//!
//! Algorithms are generic over numr's `Runtime` trait. Only the CPU runtime
//! has trait implementations, and all computation is in F64.
//!
//! # Example
//!
//! ```ignore
//! use gridr::interpolate;
//! use gridr::grid::linspace;
//!
//! let points = [(0.0, 0.0, 0.0), (0.0, 1.0, 1.0), (1.0, 0.0, 1.0), (1.0, 1.0, 0.0)];
//! let axis = linspace(0.0, 1.0, 5);
//!
//! let field = interpolate(&points, Some(&axis), Some(&axis), "linear", None)?;
//! assert_eq!(field.shape(), (5, 5));
//! println!("{}", field.summary());
//! ```

pub mod config;
pub mod grid;
pub mod interpolate;
pub mod notify;
pub mod spatial;
pub mod table;

// Re-export main types for convenience
pub use config::{ConfigError, InterpolationRequest};
pub use grid::{GridSpec, QueryMesh, build_mesh, linspace};
pub use interpolate::{
    FieldSummary, InterpolateError, InterpolateResult, InterpolatedField, MISSING_VALUE, PointSet,
    RbfKernel, RbfOptions, ScatteredInterpAlgorithms, ScatteredMethod, interpolate, interpolation,
};
pub use notify::{LogNotifier, Message, Notifier, NotifierConfig, NotifyError, RecordingNotifier};
pub use spatial::{Delaunay, DelaunayAlgorithms, SpatialError};
pub use table::DataTable;

// Re-export numr types that users will commonly need
pub use numr::dtype::DType;
pub use numr::runtime::{Runtime, RuntimeClient};
pub use numr::tensor::Tensor;
