//! Column-file codec for the nonbib sources.
//!
//! Each raw data source is a tab-separated text file whose first column is a
//! bibcode. This crate turns such a file into a [`Namespace`] of
//! [`nonbib_core`] values, shaped by the source's declaration. Pure
//! synchronous; no database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use nonbib_columns::parse;
//! use nonbib_core::field::FieldRegistry;
//!
//! let registry = FieldRegistry::standard();
//! let decl = registry.get("author").unwrap();
//! let input = "1057wjlf.book.....C\tChao, C\n";
//! let namespace = parse(input, decl).unwrap();
//! println!("{} bibcodes", namespace.len());
//! ```

pub mod error;
mod parse;

pub use error::{Error, Result};
use nonbib_core::{Bibcode, field::FieldDecl, session::Namespace};

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse the full contents of the raw file backing `decl`.
///
/// Lines repeating a bibcode accumulate in file order (list shapes append,
/// link rows fold or append depending on the source's sub-type policy,
/// relevance keeps the last line).
pub fn parse(input: &str, decl: &FieldDecl) -> Result<Namespace> {
  parse::parse_source(input, decl)
}

/// Parse the canonical bibcode list: one bibcode per line, duplicates
/// dropped, first occurrence kept.
pub fn parse_canonical(input: &str) -> Vec<Bibcode> {
  parse::parse_canonical(input)
}
