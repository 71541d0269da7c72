//! The joined record: every declared field for one bibcode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
  Bibcode,
  link::LinkRow,
  value::{FieldValue, Relevance},
};

/// One bibcode with the value of every declared source.
///
/// Built by the joiner, which guarantees that every declared field is
/// present. The typed accessors treat a missing field, or one of a different
/// shape, as empty so that derivation code stays total over hand-built
/// records as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
  pub bibcode: Bibcode,
  #[serde(flatten)]
  fields:      BTreeMap<String, FieldValue>,
}

impl JoinedRecord {
  pub fn new(bibcode: impl Into<Bibcode>) -> Self {
    Self { bibcode: bibcode.into(), fields: BTreeMap::new() }
  }

  /// Builder-style [`insert`](Self::insert).
  pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
    self.fields.insert(name.into(), value);
  }

  pub fn get(&self, name: &str) -> Option<&FieldValue> { self.fields.get(name) }

  pub fn contains(&self, name: &str) -> bool { self.fields.contains_key(name) }

  pub fn len(&self) -> usize { self.fields.len() }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
    self.fields.iter().map(|(k, v)| (k.as_str(), v))
  }

  // ── Typed accessors ───────────────────────────────────────────────────────

  pub fn strings(&self, name: &str) -> &[String] {
    self.get(name).and_then(FieldValue::as_strings).unwrap_or_default()
  }

  pub fn counts(&self, name: &str) -> &[u32] {
    self.get(name).and_then(FieldValue::as_counts).unwrap_or_default()
  }

  pub fn flag(&self, name: &str) -> bool {
    self.get(name).and_then(FieldValue::as_flag).unwrap_or(false)
  }

  pub fn links(&self, name: &str) -> &[LinkRow] {
    self.get(name).and_then(FieldValue::as_links).unwrap_or_default()
  }

  pub fn relevance(&self, name: &str) -> Option<&Relevance> {
    self.get(name).and_then(FieldValue::as_relevance)
  }
}
