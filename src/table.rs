//! Column-oriented input tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named numeric columns, e.g. `{"x": [...], "y": [...], "value": [...]}`.
///
/// Columns may differ in length here; extraction checks that the columns it
/// reads agree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataTable {
    columns: BTreeMap<String, Vec<f64>>,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column.
    pub fn with_column(mut self, name: impl Into<String>, data: Vec<f64>) -> Self {
        self.insert(name, data);
        self
    }

    /// Add or replace a column, returning the previous data.
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<f64>) -> Option<Vec<f64>> {
        self.columns.insert(name.into(), data)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in sorted order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Build a table from a JSON object of numeric arrays.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
