//! CPU backend implementations of the interpolation traits.

mod clough_tocher;
mod rbf;
mod scattered;
