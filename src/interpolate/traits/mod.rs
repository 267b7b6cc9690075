pub mod clough_tocher;
pub mod rbf;
pub mod scattered;

pub use clough_tocher::{CloughTocher2D, CloughTocher2DAlgorithms};
pub use rbf::{RbfAlgorithms, RbfKernel, RbfModel, RbfOptions};
pub use scattered::{MISSING_VALUE, ScatteredInterpAlgorithms, ScatteredMethod};
