//! Scattered 2D data to regular grid interpolation.
//!
//! Four methods are available through [`ScatteredMethod`]:
//!
//! - **Nearest**: value of the closest sample, defined everywhere
//! - **Linear**: barycentric blend on the Delaunay triangulation
//! - **Cubic**: Clough-Tocher C1 patches on the same triangulation
//! - **Rbf**: global radial basis function interpolant
//!
//! Linear and Cubic are only defined inside the convex hull of the samples;
//! other grid nodes receive the fill value (NaN by default).
//!
//! Cost grows quickly with the number of samples N: the triangulation behind
//! Linear and Cubic takes O(N²) time, and Rbf solves a dense N×N system.
//!
//! # Module Organization
//!
//! ```text
//! interpolate/
//! ├── mod.rs                # Exports only
//! ├── error.rs              # InterpolateError
//! ├── points.rs             # PointSet extraction and validation
//! ├── field.rs              # InterpolatedField, FieldSummary
//! ├── griddata.rs           # Grid-level entry points
//! ├── traits/               # Algorithm trait definitions
//! ├── impl_generic/         # Generic implementations (written once)
//! └── cpu/                  # CPU trait impls (pure delegation)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gridr::interpolate::interpolate;
//!
//! let points = [(0.0, 0.0, 0.0), (0.0, 1.0, 1.0), (1.0, 0.0, 1.0), (1.0, 1.0, 0.0)];
//! let field = interpolate(&points, None, None, "linear", None)?;
//! assert_eq!(field.shape(), (100, 100));
//! ```

mod cpu;
pub mod error;
pub mod field;
pub mod griddata;
pub mod impl_generic;
pub mod points;
pub mod traits;

pub use error::{InterpolateError, InterpolateResult};
pub use field::{FieldSummary, InterpolatedField};
pub use griddata::{interpolate, interpolate_with, interpolation};
pub use points::PointSet;
pub use traits::clough_tocher::{CloughTocher2D, CloughTocher2DAlgorithms};
pub use traits::rbf::{RbfAlgorithms, RbfKernel, RbfModel, RbfOptions};
pub use traits::scattered::{MISSING_VALUE, ScatteredInterpAlgorithms, ScatteredMethod};
