//! Error types for pan-io

use std::path::PathBuf;

use pan_model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("Malformed report: {0}")]
    MalformedReport(String),

    #[error("line {line}: '{token}' is not a number")]
    NonNumericToken { line: usize, token: String },

    #[error("line {line}: expected {expected} columns, found {found}")]
    RaggedTable {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("network {network}: {missing} of {total} grid cells were never sampled")]
    IncompleteGrid {
        network: u32,
        missing: usize,
        total: usize,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub(crate) fn parse_number(token: &str, line: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|_| IoError::NonNumericToken {
        line,
        token: token.to_string(),
    })
}
