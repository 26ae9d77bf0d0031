//! Bounded retry for transient I/O failures

use std::fmt::Display;
use std::thread;
use std::time::Duration;

use jobsheet_refined::RefinedError;
use jobsheet_store::StoreError;

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_STEP: Duration = Duration::from_millis(50);

/// Failures that may succeed when the operation is retried.
pub(crate) trait Retryable {
    fn is_transient(&self) -> bool;
}

impl Retryable for StoreError {
    fn is_transient(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }
}

impl Retryable for RefinedError {
    fn is_transient(&self) -> bool {
        matches!(self, RefinedError::Io(_))
    }
}

/// Run `op`, retrying transient failures up to [`MAX_ATTEMPTS`] total
/// attempts with linear backoff. Non-transient failures surface immediately.
pub(crate) fn with_retry<T, E, F>(mut op: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Retryable + Display,
{
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_ATTEMPTS && err.is_transient() => {
                log::warn!("transient failure (attempt {attempt}/{MAX_ATTEMPTS}): {err}");
                thread::sleep(BACKOFF_STEP * attempt);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
