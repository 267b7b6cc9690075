//! Scattered data interpolation algorithm trait.
use crate::DType;

use crate::interpolate::error::{InterpolateError, InterpolateResult};
use crate::interpolate::traits::rbf::RbfOptions;
use numr::runtime::Runtime;
use numr::tensor::Tensor;
use std::fmt;
use std::str::FromStr;

/// Fill value used for queries outside the convex hull by the piecewise methods.
pub const MISSING_VALUE: f64 = f64::NAN;

/// Method for scattered data interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScatteredMethod {
    /// Value of the nearest data point; ties go to the earliest point.
    Nearest,
    /// Barycentric blend on the Delaunay triangulation.
    #[default]
    Linear,
    /// Clough-Tocher C1 cubic patches on the Delaunay triangulation.
    Cubic,
    /// Global radial basis function interpolant.
    Rbf(RbfOptions),
}

impl ScatteredMethod {
    const NAMES: &'static str = "nearest, linear, cubic, rbf";

    /// Method name as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
            Self::Cubic => "cubic",
            Self::Rbf(_) => "rbf",
        }
    }

    /// Parse a method name, attaching RBF options when the method is `rbf`.
    ///
    /// Options given for any other method are ignored.
    pub fn parse(name: &str, rbf: Option<RbfOptions>) -> InterpolateResult<Self> {
        let method: Self = name.parse()?;
        Ok(match (method, rbf) {
            (Self::Rbf(_), Some(options)) => Self::Rbf(options),
            (method, Some(_)) => {
                log::warn!("kernel options ignored for method '{}'", method.name());
                method
            }
            (method, None) => method,
        })
    }

    /// Whether queries outside the convex hull receive the fill value.
    pub fn is_hull_bounded(&self) -> bool {
        matches!(self, Self::Linear | Self::Cubic)
    }
}

impl fmt::Display for ScatteredMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rbf(options) => write!(f, "rbf({})", options.kernel),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for ScatteredMethod {
    type Err = InterpolateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "linear" => Ok(Self::Linear),
            "cubic" => Ok(Self::Cubic),
            "rbf" => Ok(Self::Rbf(RbfOptions::default())),
            _ => Err(InterpolateError::InvalidMethod {
                kind: "method",
                name: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Scattered data interpolation algorithms.
pub trait ScatteredInterpAlgorithms<R: Runtime<DType = DType>> {
    /// Interpolate scattered data at query points.
    ///
    /// # Arguments
    /// * `points` - Known data point coordinates, shape `[n, 2]`
    /// * `values` - Known values at data points, shape `[n]`
    /// * `xi` - Query point coordinates, shape `[m, 2]`
    /// * `method` - Interpolation method
    /// * `fill_value` - Value outside the convex hull for `Linear` and `Cubic`
    ///
    /// # Returns
    /// 1D tensor of interpolated values, shape `[m]`.
    fn griddata(
        &self,
        points: &Tensor<R>,
        values: &Tensor<R>,
        xi: &Tensor<R>,
        method: &ScatteredMethod,
        fill_value: f64,
    ) -> InterpolateResult<Tensor<R>>;
}
