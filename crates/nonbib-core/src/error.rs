//! Error types for `nonbib-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A declared source was never loaded into the session. Fatal for the
  /// whole session, not recoverable per bibcode.
  #[error("source unavailable: {0}")]
  SourceUnavailable(String),

  /// The first four characters of a bibcode are not a publication year.
  #[error("malformed bibcode: {0:?}")]
  MalformedBibcode(String),

  #[error("field {field} does not hold a {expected} value")]
  ShapeMismatch {
    field:    String,
    expected: &'static str,
  },

  #[error("unknown field: {0}")]
  UnknownField(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Whether this error invalidates the whole session rather than a single
  /// record.
  pub fn is_fatal(&self) -> bool {
    matches!(self, Self::SourceUnavailable(_) | Self::UnknownField(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
