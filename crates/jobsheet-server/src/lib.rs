//! # jobsheet-server
//!
//! The sync service: exposes the record store and the field suggestion cache
//! as a small synchronous HTTP JSON API, and sequences the side effects
//! between them (record writes feed the suggestion lists; a resync re-derives
//! them from the whole table).
//!
//! The server model is deliberately simple: one request is handled to
//! completion before the next is taken, and a single service-level lock
//! serializes store-mutating operations.

mod config;
mod error;
mod http;
mod locks;
mod retry;
mod service;

pub use config::ServerConfig;
pub use jobsheet_core::field_token;
pub use error::{ServiceError, ServiceResult};
pub use http::{dispatch, serve, ApiResponse};
pub use locks::LockFile;
pub use service::SyncService;
