//! SQLite backend for the nonbib namespaces.
//!
//! Raw column files are imported once into a single SQLite file; processing
//! sessions then load their namespaces from it through
//! [`NamespaceLoader`](nonbib_core::store::NamespaceLoader). Wraps
//! [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use encode::SourceInfo;
pub use error::{Error, Result};
pub use store::SqliteStore;
