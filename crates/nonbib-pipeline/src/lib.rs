//! The per-bibcode processing pipeline.
//!
//! A populated [`Session`](nonbib_core::session::Session) goes in; one
//! [`NonBibRecord`](convert::NonBibRecord) and optionally one
//! [`MetricsRecord`](metrics::MetricsRecord) per bibcode come out. Each stage
//! is a pure function of the session and the bibcode:
//!
//! 1. [`join`](join::join): one value per declared field, defaults filled in.
//! 2. [`derive`](derive::derive): identifiers, link summaries, properties.
//! 3. [`MetricsEngine::compute`](metrics::MetricsEngine::compute): citation
//!    statistics and the boost score.
//! 4. [`convert`](convert::convert): the external record schema.
//!
//! [`Processor`](process::Processor) drives the stages over a batch.

pub mod boost;
pub mod convert;
pub mod derive;
pub mod join;
pub mod metrics;
pub mod process;

pub use nonbib_core::{Error, Result};

#[cfg(test)]
mod fixtures;
