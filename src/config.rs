//! JSON description of one interpolation run.
//!
//! ```json
//! {
//!   "method": "rbf",
//!   "kernel": "gaussian",
//!   "epsilon": 2.0,
//!   "x_range": { "start": 0.0, "stop": 3.0, "num": 10 },
//!   "grid_y": [0.0, 1.0, 2.0, 3.0]
//! }
//! ```
//!
//! Every field is optional. Column names default to `x`, `y` and `value`, the
//! method to `linear`, and each axis to 100 samples over `[0, 1]`.

use crate::grid::{QueryMesh, build_mesh, linspace};
use crate::interpolate::{
    InterpolateError, InterpolatedField, MISSING_VALUE, PointSet, RbfKernel, RbfOptions,
    ScatteredMethod, interpolate_with,
};
use crate::table::DataTable;
use log::debug;
use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
use serde::{Deserialize, Serialize};

/// Errors raised while reading or running a request.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error(transparent)]
    Interpolate(#[from] InterpolateError),
}

/// Evenly spaced axis samples, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub start: f64,
    pub stop: f64,
    pub num: usize,
}

impl AxisRange {
    pub fn samples(&self) -> Vec<f64> {
        linspace(self.start, self.stop, self.num)
    }
}

/// One interpolation call described as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpolationRequest {
    pub x_column: String,
    pub y_column: String,
    pub value_column: String,
    /// Explicit x samples; takes precedence over `x_range`.
    pub grid_x: Option<Vec<f64>>,
    pub grid_y: Option<Vec<f64>>,
    pub x_range: Option<AxisRange>,
    pub y_range: Option<AxisRange>,
    pub method: String,
    /// RBF kernel name; only read when `method` is `rbf`.
    pub kernel: Option<String>,
    pub epsilon: Option<f64>,
    pub smoothing: Option<f64>,
    /// Value for cells outside the convex hull; NaN when absent.
    pub fill_value: Option<f64>,
}

impl Default for InterpolationRequest {
    fn default() -> Self {
        Self {
            x_column: "x".to_string(),
            y_column: "y".to_string(),
            value_column: "value".to_string(),
            grid_x: None,
            grid_y: None,
            x_range: None,
            y_range: None,
            method: "linear".to_string(),
            kernel: None,
            epsilon: None,
            smoothing: None,
            fill_value: None,
        }
    }
}

impl InterpolationRequest {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve the method, attaching RBF options when present.
    pub fn scattered_method(&self) -> Result<ScatteredMethod, ConfigError> {
        let has_rbf_options =
            self.kernel.is_some() || self.epsilon.is_some() || self.smoothing.is_some();
        let options = if has_rbf_options {
            let kernel = match &self.kernel {
                Some(name) => name.parse::<RbfKernel>()?,
                None => RbfKernel::default(),
            };
            Some(RbfOptions {
                kernel,
                epsilon: self.epsilon,
                smoothing: self.smoothing.unwrap_or(0.0),
            })
        } else {
            None
        };
        Ok(ScatteredMethod::parse(&self.method, options)?)
    }

    /// The query mesh described by the axis fields.
    pub fn mesh(&self) -> Result<QueryMesh, ConfigError> {
        let x = axis_samples("grid_x", &self.grid_x, &self.x_range)?;
        let y = axis_samples("grid_y", &self.grid_y, &self.y_range)?;
        Ok(build_mesh(x.as_deref(), y.as_deref())?)
    }

    /// Run the request against `table` on the CPU.
    pub fn run(&self, table: &DataTable) -> Result<InterpolatedField, ConfigError> {
        let method = self.scattered_method()?;
        let mesh = self.mesh()?;
        let fill_value = self.fill_value.unwrap_or(MISSING_VALUE);

        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());
        let set = PointSet::<CpuRuntime>::extract(
            table,
            &self.x_column,
            &self.y_column,
            &self.value_column,
            &device,
        )?;
        debug!(
            "request: {} over columns ({}, {}, {})",
            method, self.x_column, self.y_column, self.value_column
        );
        Ok(interpolate_with(&client, &set, &mesh, &method, fill_value)?)
    }
}

fn axis_samples(
    field: &'static str,
    explicit: &Option<Vec<f64>>,
    range: &Option<AxisRange>,
) -> Result<Option<Vec<f64>>, ConfigError> {
    if let Some(samples) = explicit {
        return Ok(Some(samples.clone()));
    }
    match range {
        Some(r) if r.num == 0 => Err(ConfigError::Invalid {
            field,
            reason: "range must have at least one sample".to_string(),
        }),
        Some(r) => Ok(Some(r.samples())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> DataTable {
        DataTable::new()
            .with_column("x", vec![0.0, 0.0, 1.0, 1.0])
            .with_column("y", vec![0.0, 1.0, 0.0, 1.0])
            .with_column("value", vec![0.0, 1.0, 1.0, 0.0])
    }

    #[test]
    fn test_defaults() {
        let request = InterpolationRequest::from_json("{}").unwrap();
        assert_eq!(request, InterpolationRequest::default());
        assert_eq!(request.scattered_method().unwrap(), ScatteredMethod::Linear);
        assert_eq!(request.mesh().unwrap().shape(), (100, 100));
    }

    #[test]
    fn test_rbf_options() {
        let request = InterpolationRequest::from_json(
            r#"{"method": "rbf", "kernel": "thin-plate", "smoothing": 0.5}"#,
        )
        .unwrap();
        match request.scattered_method().unwrap() {
            ScatteredMethod::Rbf(options) => {
                assert_eq!(options.kernel, RbfKernel::ThinPlate);
                assert_eq!(options.epsilon, None);
                assert_eq!(options.smoothing, 0.5);
            }
            other => panic!("unexpected method {other}"),
        }
    }

    #[test]
    fn test_unknown_kernel() {
        let request =
            InterpolationRequest::from_json(r#"{"method": "rbf", "kernel": "sinc"}"#).unwrap();
        let err = request.scattered_method().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Interpolate(InterpolateError::InvalidMethod { kind: "kernel", .. })
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = InterpolationRequest::from_json(r#"{"methd": "linear"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_ranges_and_explicit_axes() {
        let request = InterpolationRequest::from_json(
            r#"{"x_range": {"start": 0, "stop": 3, "num": 10}, "grid_y": [0, 1, 2]}"#,
        )
        .unwrap();
        assert_eq!(request.mesh().unwrap().shape(), (3, 10));

        let request =
            InterpolationRequest::from_json(r#"{"y_range": {"start": 0, "stop": 1, "num": 0}}"#)
                .unwrap();
        assert!(matches!(
            request.mesh().unwrap_err(),
            ConfigError::Invalid { field: "grid_y", .. }
        ));
    }

    #[test]
    fn test_run_with_fill_value() {
        let request = InterpolationRequest::from_json(
            r#"{"grid_x": [0.0, 1.0, 2.0], "grid_y": [0.0], "fill_value": -1.0}"#,
        )
        .unwrap();
        let field = request.run(&corners()).unwrap();
        assert_eq!(field.shape(), (1, 3));
        assert!((field.get(0, 1).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(field.get(0, 2), Some(-1.0));
        assert!(field.is_missing(0, 2));
    }

    #[test]
    fn test_run_custom_columns() {
        let table = DataTable::new()
            .with_column("lon", vec![0.0, 1.0])
            .with_column("lat", vec![0.0, 0.0])
            .with_column("temp", vec![10.0, 20.0]);
        let request = InterpolationRequest::from_json(
            r#"{"x_column": "lon", "y_column": "lat", "value_column": "temp",
                "method": "nearest", "grid_x": [0.2, 0.9], "grid_y": [5.0]}"#,
        )
        .unwrap();
        let field = request.run(&table).unwrap();
        assert_eq!(field.as_slice(), &[10.0, 20.0]);
    }
}
