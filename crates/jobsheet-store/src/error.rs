//! Store error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The backing file has not been created yet
    #[error("record table not found at {}", .0.display())]
    StoreMissing(PathBuf),

    /// Field name not present in the header
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// No row matched the identifier
    #[error("no row found with {field} = \"{value}\"")]
    RowNotFound { field: String, value: String },

    /// Submitted record carried no values
    #[error("record is empty")]
    EmptyRecord,
}
