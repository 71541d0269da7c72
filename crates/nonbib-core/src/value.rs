//! Field values: the typed payload one data source holds for one bibcode.

use serde::{Deserialize, Serialize};

use crate::link::LinkRow;

/// Precomputed relevance inputs delivered by the upstream relevance source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relevance {
  /// Upstream boost; when present it wins over the locally modelled score.
  pub boost:      Option<f64>,
  pub read_count: u32,
  pub norm_cites: u32,
}

/// The value of one field for one bibcode. The variant is fixed by the
/// field's [`Shape`](crate::field::Shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
  Strings(Vec<String>),
  Counts(Vec<u32>),
  /// A boolean flag; the legacy `{"refereed": false}` wrapper.
  Flag(bool),
  Links(Vec<LinkRow>),
  Relevance(Relevance),
}

impl FieldValue {
  /// Name of the variant, used in shape-mismatch diagnostics.
  pub fn shape_name(&self) -> &'static str {
    match self {
      Self::Strings(_) => "strings",
      Self::Counts(_) => "counts",
      Self::Flag(_) => "flag",
      Self::Links(_) => "links",
      Self::Relevance(_) => "relevance",
    }
  }

  /// True for the value a source yields when it knows nothing about a
  /// bibcode.
  pub fn is_empty(&self) -> bool {
    match self {
      Self::Strings(v) => v.is_empty(),
      Self::Counts(v) => v.is_empty(),
      Self::Flag(set) => !set,
      Self::Links(v) => v.is_empty(),
      Self::Relevance(r) => *r == Relevance::default(),
    }
  }

  pub fn as_strings(&self) -> Option<&[String]> {
    match self {
      Self::Strings(v) => Some(v),
      _ => None,
    }
  }

  pub fn as_counts(&self) -> Option<&[u32]> {
    match self {
      Self::Counts(v) => Some(v),
      _ => None,
    }
  }

  pub fn as_flag(&self) -> Option<bool> {
    match self {
      Self::Flag(set) => Some(*set),
      _ => None,
    }
  }

  pub fn as_links(&self) -> Option<&[LinkRow]> {
    match self {
      Self::Links(v) => Some(v),
      _ => None,
    }
  }

  pub fn as_relevance(&self) -> Option<&Relevance> {
    match self {
      Self::Relevance(r) => Some(r),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn json_form_is_tagged_by_shape() {
    let v = FieldValue::Strings(vec!["Chao, C".into()]);
    let json = serde_json::to_value(&v).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "shape": "strings", "value": ["Chao, C"] })
    );
    let back: FieldValue = serde_json::from_value(json).unwrap();
    assert_eq!(back, v);
  }

  #[test]
  fn emptiness_per_shape() {
    assert!(FieldValue::Flag(false).is_empty());
    assert!(!FieldValue::Flag(true).is_empty());
    assert!(FieldValue::Relevance(Relevance::default()).is_empty());
    assert!(
      !FieldValue::Relevance(Relevance {
        read_count: 25,
        ..Relevance::default()
      })
      .is_empty()
    );
  }
}
