//! The external nonbib record schema.

use serde::{Deserialize, Serialize};

use nonbib_core::{Bibcode, field::names, link::LinkRow};

use crate::{derive::DerivedRecord, metrics::citation_count_norm};

/// One output record. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonBibRecord {
  pub bibcode:             Bibcode,
  pub identifier:          Vec<String>,
  pub property:            Vec<String>,
  pub esource:             Vec<String>,
  pub data:                Vec<String>,
  pub data_links_rows:     Vec<LinkRow>,
  pub total_link_counts:   u64,
  pub boost:               f64,
  pub citation_count:      usize,
  pub citation_count_norm: f64,
  pub norm_cites:          u32,
  pub read_count:          u32,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub bibgroup:       Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub bibgroup_facet: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub grants:         Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub ned_objects:    Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub simbad_objects: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub readers:        Vec<String>,
}

/// Map a derived record and its boost onto the output schema.
pub fn convert(derived: &DerivedRecord, boost: f64) -> NonBibRecord {
  let record = &derived.record;
  let relevance = record.relevance(names::RELEVANCE);
  let list = |name: &str| record.strings(name).to_vec();

  NonBibRecord {
    bibcode:             record.bibcode.clone(),
    identifier:          derived.identifier.clone(),
    property:            derived.property.clone(),
    esource:             derived.esource.clone(),
    data:                derived.data.clone(),
    data_links_rows:     derived.data_links_rows.clone(),
    total_link_counts:   derived.total_link_counts,
    boost,
    citation_count:      record.strings(names::CITATION).len(),
    citation_count_norm: citation_count_norm(record),
    norm_cites:          relevance.map_or(0, |r| r.norm_cites),
    read_count:          relevance.map_or(0, |r| r.read_count),
    bibgroup:            list(names::BIBGROUP),
    bibgroup_facet:      derived.bibgroup_facet.clone().unwrap_or_default(),
    grants:              list(names::GRANTS),
    ned_objects:         list(names::NED_OBJECTS),
    simbad_objects:      list(names::SIMBAD_OBJECTS),
    readers:             list(names::READERS),
  }
}
