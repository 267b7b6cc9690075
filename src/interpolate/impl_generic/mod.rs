//! Generic implementations of scattered-data interpolation algorithms.
//!
//! Each function is generic over the numr runtime and is called by the
//! backend `impl` blocks in `cpu/`.

pub mod clough_tocher;
pub mod rbf;
pub mod scattered;

pub use clough_tocher::{clough_tocher_evaluate_impl, clough_tocher_fit_impl};
pub use rbf::{rbf_evaluate_impl, rbf_fit_impl};
pub use scattered::griddata_impl;
