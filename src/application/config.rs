use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{ExcludedCategories, MonthBucketing};

use super::AppError;

/// What to do with a row that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Stop at the first bad row.
    #[default]
    Abort,
    /// Record the bad row and keep going.
    Skip,
}

/// Settings that shape a summary. Loaded from JSON; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Categories left out of the expense breakdown.
    pub excluded_categories: ExcludedCategories,
    pub bucketing: MonthBucketing,
    pub on_row_error: RowErrorPolicy,
    /// Treat a ledger without transactions as an error.
    pub reject_empty: bool,
}

impl SummaryConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let data = fs::read_to_string(path).map_err(|source| AppError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}
