//! # jobsheet-store
//!
//! The record store: durable storage and retrieval of the full job table,
//! persisted as one CSV file whose header row is the canonical field list.

mod error;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::TableStore;
