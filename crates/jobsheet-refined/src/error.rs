//! Suggestion cache error types

use thiserror::Error;

/// Result type for suggestion cache operations
pub type RefinedResult<T> = std::result::Result<T, RefinedError>;

/// Errors that can occur during suggestion cache operations
#[derive(Debug, Error)]
pub enum RefinedError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Core error (token collisions)
    #[error("core error: {0}")]
    Core(#[from] jobsheet_core::Error),
}
