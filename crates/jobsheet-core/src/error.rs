//! Error types for jobsheet-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared across the jobsheet crates
#[derive(Debug, Error)]
pub enum Error {
    /// Two distinct field names sanitize to the same on-disk token
    #[error("field token collision: \"{first}\" and \"{second}\" both map to \"{token}\"")]
    TokenCollision {
        token: String,
        first: String,
        second: String,
    },
}
