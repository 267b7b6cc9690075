//! Radial Basis Function interpolation algorithm trait.

use crate::interpolate::error::{InterpolateError, InterpolateResult};
use crate::DType;
use numr::runtime::Runtime;
use numr::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RBF kernel function type. `ε` is the shape factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RbfKernel {
    /// r
    Linear,
    /// sqrt(1 + (εr)^2)
    #[default]
    Multiquadric,
    /// 1/sqrt(1 + (εr)^2)
    InverseMultiquadric,
    /// exp(-(εr)^2)
    Gaussian,
    /// r^2 * ln(r), with φ(0) = 0.
    ThinPlate,
    /// r^3
    Cubic,
    /// r^5
    Quintic,
}

impl RbfKernel {
    const NAMES: &'static str =
        "linear, multiquadric, inverse_multiquadric, gaussian, thin_plate, cubic, quintic";

    /// Canonical kernel name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Multiquadric => "multiquadric",
            Self::InverseMultiquadric => "inverse_multiquadric",
            Self::Gaussian => "gaussian",
            Self::ThinPlate => "thin_plate",
            Self::Cubic => "cubic",
            Self::Quintic => "quintic",
        }
    }

    /// Whether the shape factor enters the kernel.
    pub fn uses_epsilon(&self) -> bool {
        matches!(
            self,
            Self::Multiquadric | Self::InverseMultiquadric | Self::Gaussian
        )
    }
}

impl fmt::Display for RbfKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RbfKernel {
    type Err = InterpolateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "linear" => Ok(Self::Linear),
            "multiquadric" => Ok(Self::Multiquadric),
            "inverse_multiquadric" | "inverse" => Ok(Self::InverseMultiquadric),
            "gaussian" => Ok(Self::Gaussian),
            "thin_plate" | "thin_plate_spline" => Ok(Self::ThinPlate),
            "cubic" => Ok(Self::Cubic),
            "quintic" => Ok(Self::Quintic),
            _ => Err(InterpolateError::InvalidMethod {
                kind: "kernel",
                name: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Parameters of an RBF interpolant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbfOptions {
    /// Kernel function.
    pub kernel: RbfKernel,
    /// Shape factor; `None` selects 1 / (average node spacing).
    pub epsilon: Option<f64>,
    /// Added to the kernel matrix diagonal; 0 interpolates exactly.
    pub smoothing: f64,
}

impl Default for RbfOptions {
    fn default() -> Self {
        Self {
            kernel: RbfKernel::default(),
            epsilon: None,
            smoothing: 0.0,
        }
    }
}

impl RbfOptions {
    /// Options for `kernel` with automatic shape factor and no smoothing.
    pub fn new(kernel: RbfKernel) -> Self {
        Self {
            kernel,
            ..Self::default()
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }
}

/// A fitted RBF interpolation model.
#[derive(Debug, Clone)]
pub struct RbfModel<R: Runtime> {
    /// Center points relative to `offset`, shape [n, d].
    pub centers: Tensor<R>,
    /// Weights for each center, shape [n].
    pub weights: Tensor<R>,
    /// Kernel function.
    pub kernel: RbfKernel,
    /// Shape factor actually used.
    pub epsilon: f64,
    /// Mean of the input points, subtracted from centers and queries.
    pub offset: Vec<f64>,
    /// Dimension of input points.
    pub dim: usize,
}

/// Radial Basis Function interpolation algorithms.
///
/// Fitting solves a dense N×N system, O(N³); evaluation is O(N × M). This is
/// the dominant cost for large point sets.
pub trait RbfAlgorithms<R: Runtime<DType = DType>> {
    /// Fit an RBF interpolant to scattered data.
    ///
    /// # Arguments
    /// * `points` - Data point coordinates, shape [n, d]
    /// * `values` - Values at data points, shape [n]
    /// * `options` - Kernel, shape factor and smoothing
    ///
    /// # Errors
    /// `LinearSystem` when the kernel matrix is singular or the solve is not
    /// accurate, e.g. coincident points without smoothing.
    fn rbf_fit(
        &self,
        points: &Tensor<R>,
        values: &Tensor<R>,
        options: &RbfOptions,
    ) -> InterpolateResult<RbfModel<R>>;

    /// Evaluate an RBF interpolant at query points.
    ///
    /// Defined everywhere. Away from the data the magnitude may grow without
    /// bound for kernels such as thin-plate or multiquadric.
    ///
    /// # Arguments
    /// * `model` - Fitted RBF model
    /// * `query` - Query point coordinates, shape [m, d]
    fn rbf_evaluate(&self, model: &RbfModel<R>, query: &Tensor<R>) -> InterpolateResult<Tensor<R>>;
}
