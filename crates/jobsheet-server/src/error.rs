//! HTTP-boundary error taxonomy

use jobsheet_refined::RefinedError;
use jobsheet_store::StoreError;
use thiserror::Error;

/// Result type for service operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced at the HTTP boundary.
///
/// Every failure from the store and the cache is mapped onto one of these
/// three shapes; nothing below this layer reaches a client untranslated.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Backing store or matching row absent (404)
    #[error("{0}")]
    NotFound(String),

    /// Malformed or empty input (400)
    #[error("{0}")]
    BadRequest(String),

    /// Filesystem or internal fault (500)
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// The HTTP status code for this failure
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 404,
            ServiceError::BadRequest(_) => 400,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Create a not-found error with a message
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        ServiceError::NotFound(msg.into())
    }

    /// Create a bad-request error with a message
    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        ServiceError::BadRequest(msg.into())
    }

    /// Create an internal error with a message
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        ServiceError::Internal(msg.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::StoreMissing(_) | StoreError::RowNotFound { .. } => {
                ServiceError::NotFound(err.to_string())
            }
            StoreError::UnknownField(_) | StoreError::EmptyRecord => {
                ServiceError::BadRequest(err.to_string())
            }
            StoreError::Io(_) | StoreError::Csv(_) => ServiceError::Internal(err.to_string()),
        }
    }
}

impl From<RefinedError> for ServiceError {
    fn from(err: RefinedError) -> Self {
        // Token collisions are a schema problem, not a caller mistake
        ServiceError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let missing: ServiceError = StoreError::StoreMissing(PathBuf::from("jobs.csv")).into();
        assert_eq!(missing.status(), 404);

        let empty: ServiceError = StoreError::EmptyRecord.into();
        assert_eq!(empty.status(), 400);

        let io: ServiceError =
            StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk")).into();
        assert_eq!(io.status(), 500);

        let collision: ServiceError = RefinedError::Core(jobsheet_core::Error::TokenCollision {
            token: "A_".into(),
            first: "A.".into(),
            second: "A ".into(),
        })
        .into();
        assert_eq!(collision.status(), 500);
    }
}
