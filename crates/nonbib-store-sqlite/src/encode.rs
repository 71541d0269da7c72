//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; field values as compact,
//! shape-tagged JSON.

use chrono::{DateTime, Utc};
use nonbib_core::value::FieldValue;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── FieldValue ──────────────────────────────────────────────────────────────

pub fn encode_value(value: &FieldValue) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_value(s: &str) -> Result<FieldValue> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Bookkeeping for one imported source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
  pub field:       String,
  pub origin:      String,
  pub imported_at: DateTime<Utc>,
  pub entries:     usize,
}

/// Raw strings read directly from a `sources` row.
pub struct RawSource {
  pub field:       String,
  pub origin:      String,
  pub imported_at: String,
  pub entries:     i64,
}

impl RawSource {
  pub fn into_source(self) -> Result<SourceInfo> {
    Ok(SourceInfo {
      field:       self.field,
      origin:      self.origin,
      imported_at: decode_dt(&self.imported_at)?,
      entries:     usize::try_from(self.entries).unwrap_or_default(),
    })
  }
}
