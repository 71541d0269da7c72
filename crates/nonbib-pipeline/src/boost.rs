//! Relevance boost scoring.

use serde::{Deserialize, Serialize};

/// Maps popularity signals to a bounded ranking boost.
pub trait BoostScorer: Send + Sync {
  /// Score a record from its author-normalised citation count and its
  /// read count.
  fn score(&self, citation_count_norm: f64, read_count: u32) -> f64;
}

/// Weighted sum of decimal logarithms, clamped to `[0, cap]`.
///
/// A tenfold change in either input moves the score by at most that input's
/// weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogBoost {
  pub citation_weight: f64,
  pub read_weight:     f64,
  pub cap:             f64,
}

impl Default for LogBoost {
  fn default() -> Self {
    Self {
      citation_weight: 0.1,
      read_weight:     0.2,
      cap:             1.0,
    }
  }
}

impl BoostScorer for LogBoost {
  fn score(&self, citation_count_norm: f64, read_count: u32) -> f64 {
    let citations = (1.0 + citation_count_norm.max(0.0)).log10();
    let reads = (1.0 + f64::from(read_count)).log10();
    let raw = self.citation_weight * citations + self.read_weight * reads;
    raw.clamp(0.0, self.cap.max(0.0))
  }
}
