//! Error type for `nonbib-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] nonbib_core::Error),

  #[error("column file error: {0}")]
  Columns(#[from] nonbib_columns::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error reading {path}: {source}")]
  Io {
    path:   String,
    #[source]
    source: std::io::Error,
  },

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// True when the underlying failure is a source that was never imported.
  pub fn is_source_unavailable(&self) -> bool {
    matches!(self, Self::Core(nonbib_core::Error::SourceUnavailable(_)))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
