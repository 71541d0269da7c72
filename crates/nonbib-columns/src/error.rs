//! Error types for the nonbib-columns parser.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{source_name} line {line}: expected {expected}")]
  MissingColumn {
    source_name: String,
    line:        usize,
    expected:    &'static str,
  },

  #[error("{source_name} line {line}: invalid number {value:?}")]
  InvalidNumber {
    source_name: String,
    line:        usize,
    value:       String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
