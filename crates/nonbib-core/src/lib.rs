//! Core types and trait definitions for the nonbib record pipeline.
//!
//! This crate is deliberately free of database and file-format dependencies.
//! It defines the bibcode-keyed values every data source produces, the
//! ordered registry of declared sources, and the [`session::Session`] that
//! holds the loaded namespaces for one processing pass.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod bibcode;
pub mod error;
pub mod field;
pub mod link;
pub mod record;
pub mod session;
pub mod store;
pub mod value;

pub use bibcode::Bibcode;
pub use error::{Error, Result};
