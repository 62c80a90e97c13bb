use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{AmountOverflowError, ParseCentsError};

/// Failures while turning raw CSV into transactions.
/// Line numbers are 1-based and count the header as line 1.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Line {line}: malformed date '{value}'")]
    MalformedDate { line: usize, value: String },

    #[error("Line {line}: missing category")]
    MissingCategory { line: usize },

    #[error("Line {line}: malformed amount '{value}': {source}")]
    MalformedAmount {
        line: usize,
        value: String,
        source: ParseCentsError,
    },

    #[error("Line {line}: CSV parse error: {source}")]
    Csv { line: usize, source: csv::Error },

    #[error("Line {line}: ledger totals exceed the representable amount range")]
    TotalOutOfRange { line: usize },

    #[error("Input contains no transactions")]
    EmptyInput,
}

impl ImportError {
    /// Line the error refers to, if it is tied to a single row.
    pub fn line(&self) -> Option<usize> {
        match self {
            ImportError::MalformedDate { line, .. }
            | ImportError::MissingCategory { line }
            | ImportError::TotalOutOfRange { line }
            | ImportError::MalformedAmount { line, .. }
            | ImportError::Csv { line, .. } => Some(*line),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    AmountOverflow(#[from] AmountOverflowError),

    #[error("Invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}
