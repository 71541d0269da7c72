//! Citation statistics for one record.
//!
//! The record's own `citation`, `reference` and `author` lists give the raw
//! counts; the session's reference graph and refereed set weight each citing
//! paper.

use serde::{Deserialize, Serialize};

use nonbib_core::{
  Bibcode, Result,
  bibcode::year_of,
  field::names,
  record::JoinedRecord,
  session::Session,
};

use crate::boost::{BoostScorer, LogBoost};

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
  /// Lower bound on the reference count a citing paper's weight is divided
  /// by. Zero disables the bound; five reproduces the legacy damping.
  pub reference_floor: usize,
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// Normalised contribution of one citing paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationData {
  pub bibcode:   String,
  pub pubyear:   i32,
  pub cityear:   i32,
  /// `1 / author_num` of the cited record.
  pub auth_norm: f64,
  /// `1 / reference count` of the citing paper.
  pub ref_norm:  f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
  pub bibcode:               Bibcode,
  pub refereed:              bool,
  pub author_num:            usize,
  pub reference_num:         usize,
  pub citation_num:          usize,
  pub refereed_citation_num: usize,
  pub citations:             Vec<String>,
  pub refereed_citations:    Vec<String>,
  pub rn_citation_data:      Vec<CitationData>,
  pub rn_citations:          f64,
  pub an_citations:          f64,
  pub an_refereed_citations: f64,
  pub boost:                 f64,
  pub reads:                 Vec<u32>,
  pub downloads:             Vec<u32>,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Computes [`MetricsRecord`]s relative to a fixed current year.
#[derive(Debug, Clone)]
pub struct MetricsEngine<B = LogBoost> {
  current_year: i32,
  config:       MetricsConfig,
  scorer:       B,
}

impl MetricsEngine<LogBoost> {
  pub fn new(current_year: i32) -> Self {
    Self::with_scorer(current_year, LogBoost::default())
  }
}

impl<B: BoostScorer> MetricsEngine<B> {
  pub fn with_scorer(current_year: i32, scorer: B) -> Self {
    Self {
      current_year,
      config: MetricsConfig::default(),
      scorer,
    }
  }

  pub fn with_config(mut self, config: MetricsConfig) -> Self {
    self.config = config;
    self
  }

  pub fn current_year(&self) -> i32 { self.current_year }

  /// Metrics for `record`. Fails with `MalformedBibcode` if the record's or
  /// a citing paper's bibcode does not start with a year.
  pub fn compute(&self, session: &Session, record: &JoinedRecord) -> Result<MetricsRecord> {
    let bibcode = &record.bibcode;
    let pubyear = bibcode.year()?;

    let citations = record.strings(names::CITATION);
    let author_num = record.strings(names::AUTHOR).len();
    let auth_norm = if author_num == 0 { 0.0 } else { 1.0 / author_num as f64 };

    let mut refereed_citations = Vec::new();
    let mut rn_citation_data = Vec::with_capacity(citations.len());
    let mut rn_citations = 0.0;

    for citing in citations {
      let ref_norm = self.reference_norm(session.references_of(citing)?.len());
      if citing.as_str() != bibcode.as_str() && session.is_refereed(citing)? {
        refereed_citations.push(citing.clone());
        rn_citations += ref_norm;
      }
      rn_citation_data.push(CitationData {
        bibcode: citing.clone(),
        pubyear,
        cityear: year_of(citing)?,
        auth_norm,
        ref_norm,
      });
    }

    let age = f64::from(self.current_year - pubyear + 1).max(1.0);

    Ok(MetricsRecord {
      bibcode:               bibcode.clone(),
      refereed:              record.flag(names::REFEREED),
      author_num,
      reference_num:         record.strings(names::REFERENCE).len(),
      citation_num:          citations.len(),
      refereed_citation_num: refereed_citations.len(),
      an_citations:          citations.len() as f64 / age,
      an_refereed_citations: refereed_citations.len() as f64 / age,
      citations:             citations.to_vec(),
      refereed_citations,
      rn_citation_data,
      rn_citations,
      boost:                 self.boost(record),
      reads:                 record.counts(names::READS).to_vec(),
      downloads:             record.counts(names::DOWNLOAD).to_vec(),
    })
  }

  /// The record's boost: the upstream relevance boost when there is one,
  /// otherwise the local scorer's.
  pub fn boost(&self, record: &JoinedRecord) -> f64 {
    let relevance = record.relevance(names::RELEVANCE);
    if let Some(boost) = relevance.and_then(|r| r.boost) {
      return boost;
    }
    let read_count = relevance.map_or(0, |r| r.read_count);
    self.scorer.score(citation_count_norm(record), read_count)
  }

  fn reference_norm(&self, references: usize) -> f64 {
    let divisor = references.max(self.config.reference_floor);
    if divisor == 0 { 0.0 } else { 1.0 / divisor as f64 }
  }
}

/// Citations per author, counting a record without authors as having one.
pub fn citation_count_norm(record: &JoinedRecord) -> f64 {
  let citations = record.strings(names::CITATION).len();
  let authors = record.strings(names::AUTHOR).len().max(1);
  citations as f64 / authors as f64
}
