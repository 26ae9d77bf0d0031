//! # jobsheet-refined
//!
//! The field suggestion cache: one deduplicated value list per field name,
//! persisted as one newline-separated text file per field (the "refined"
//! files). Lists only ever grow; there is no deletion path.

mod cache;
mod error;

pub use cache::RefinedCache;
pub use error::{RefinedError, RefinedResult};
