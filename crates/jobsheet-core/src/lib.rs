//! # jobsheet-core
//!
//! Core data structures for the jobsheet record service.
//!
//! This crate provides the types shared by the store, the suggestion cache,
//! and the HTTP service:
//! - [`FieldValue`] - A scalar value held in one field of a record
//! - [`Record`] - One row of the job table, keyed by field name
//! - [`Schema`] - The ordered field list (table header)
//! - [`field_token`] - Field-name sanitization for on-disk suggestion files
//!
//! ## Example
//!
//! ```rust
//! use jobsheet_core::{FieldValue, Record, Schema};
//!
//! let schema = Schema::canonical();
//! let mut record = Record::new();
//! record.set("S.O.#", FieldValue::text("10234"));
//! record.set("Customer", FieldValue::text("Acme"));
//!
//! assert_eq!(record.text("Customer"), "Acme");
//! assert!(schema.contains("Customer"));
//! ```

pub mod error;
pub mod record;
pub mod schema;
pub mod token;

// Re-exports for convenience
pub use error::{Error, Result};
pub use record::{FieldValue, Record};
pub use schema::{Schema, CANONICAL_FIELDS};
pub use token::{check_collisions, field_token};
