//! Fields derived from a joined record.
//!
//! Every function here is pure and total: a field the record lacks, or holds
//! with an unexpected shape, reads as empty.

use std::collections::{BTreeMap, BTreeSet};

use nonbib_core::{
  field::{FieldRegistry, names},
  link::{LinkRow, LinkType},
  record::JoinedRecord,
};

const REFEREED: &str = "REFEREED";
const NOT_REFEREED: &str = "NOT REFEREED";
const ARTICLE: &str = "ARTICLE";
const NONARTICLE: &str = "NONARTICLE";

// ─── DerivedRecord ───────────────────────────────────────────────────────────

/// A joined record together with everything computed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord {
  pub record:            JoinedRecord,
  pub identifier:        Vec<String>,
  pub bibgroup_facet:    Option<Vec<String>>,
  pub data_links_rows:   Vec<LinkRow>,
  pub data:              Vec<String>,
  pub esource:           Vec<String>,
  pub property:          Vec<String>,
  pub total_link_counts: u64,
}

/// Run every derivation over `record`.
pub fn derive(record: JoinedRecord, registry: &FieldRegistry) -> DerivedRecord {
  let rows = assemble_link_rows(&record, registry);
  let summary = compute_data_summary(&rows);

  DerivedRecord {
    identifier:        compute_identifier(&record),
    bibgroup_facet:    compute_bibgroup_facet(&record),
    esource:           compute_esource(&rows),
    property:          compute_property(&record, registry, &rows),
    data:              summary.data,
    total_link_counts: summary.total_link_counts,
    data_links_rows:   rows,
    record,
  }
}

// ─── Identifiers and groups ──────────────────────────────────────────────────

/// Every alternate identifier of the record, starting with its bibcode.
pub fn compute_identifier(record: &JoinedRecord) -> Vec<String> {
  let mut ids = vec![record.bibcode.to_string()];
  ids.extend(record.strings(names::DELETED).iter().cloned());
  ids.extend(record.strings(names::DOI).iter().cloned());
  ids.extend(
    record
      .strings(names::PREPRINT)
      .iter()
      .map(|p| format!("arxiv:{p}")),
  );
  ids.extend(record.strings(names::PUB2ARXIV).iter().cloned());
  ids
}

/// The bibliographic groups without repeats, first occurrence wins.
pub fn compute_bibgroup_facet(record: &JoinedRecord) -> Option<Vec<String>> {
  let groups = record.strings(names::BIBGROUP);
  if groups.is_empty() {
    return None;
  }
  let mut seen = BTreeSet::new();
  let mut facet = Vec::new();
  for group in groups {
    if seen.insert(group.as_str()) {
      facet.push(group.clone());
    }
  }
  Some(facet)
}

// ─── Links ───────────────────────────────────────────────────────────────────

/// Link rows of every link-shaped field, in registry order.
pub fn assemble_link_rows(record: &JoinedRecord, registry: &FieldRegistry) -> Vec<LinkRow> {
  registry
    .links()
    .flat_map(|decl| record.links(decl.name).iter().cloned())
    .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSummary {
  /// `"<sub type>:<item total>"` for each data service, sorted by sub type.
  pub data:              Vec<String>,
  /// Item counts summed over every row, data or not.
  pub total_link_counts: u64,
}

pub fn compute_data_summary(rows: &[LinkRow]) -> DataSummary {
  let mut per_service: BTreeMap<&str, u64> = BTreeMap::new();
  for row in rows.iter().filter(|r| r.link_type == LinkType::Data) {
    *per_service.entry(row.link_sub_type.as_str()).or_default() +=
      u64::from(row.item_count);
  }

  DataSummary {
    data:              per_service
      .into_iter()
      .map(|(service, total)| format!("{service}:{total}"))
      .collect(),
    total_link_counts: rows.iter().map(|r| u64::from(r.item_count)).sum(),
  }
}

/// Distinct electronic-source sub types, sorted.
pub fn compute_esource(rows: &[LinkRow]) -> Vec<String> {
  rows
    .iter()
    .filter(|r| r.link_type == LinkType::Esource)
    .map(|r| r.link_sub_type.clone())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

// ─── Properties ──────────────────────────────────────────────────────────────

/// Sorted property labels: those declared by non-empty fields, the type of
/// every link row, the refereed status and the article status.
pub fn compute_property(
  record: &JoinedRecord,
  registry: &FieldRegistry,
  rows: &[LinkRow],
) -> Vec<String> {
  let mut labels: BTreeSet<String> = BTreeSet::new();

  for decl in registry.iter() {
    if record.get(decl.name).is_some_and(|v| !v.is_empty()) {
      labels.extend(decl.properties.iter().map(|p| p.to_string()));
    }
  }
  labels.extend(rows.iter().map(|r| r.link_type.to_string()));

  if !labels.contains(REFEREED) {
    labels.insert(NOT_REFEREED.to_owned());
  }
  let article = if record.flag(names::NONARTICLE) { NONARTICLE } else { ARTICLE };
  labels.insert(article.to_owned());

  labels.into_iter().collect()
}

#[cfg(test)]
mod tests {
  use nonbib_core::value::FieldValue;

  use super::*;

  fn strings(values: &[&str]) -> FieldValue {
    FieldValue::Strings(values.iter().map(|s| s.to_string()).collect())
  }

  fn data_row(service: &str, count: u32) -> LinkRow {
    LinkRow::new(LinkType::Data, service, format!("http://{service}")).with_count(count)
  }

  fn esource_row(sub_type: &str) -> LinkRow {
    LinkRow::new(LinkType::Esource, sub_type, "http://example.org")
  }

  // ── Identifiers ───────────────────────────────────────────────────────────

  #[test]
  fn identifier_collects_alternates_in_order() {
    let record = JoinedRecord::new("2013MNRAS.435.1904M")
      .with(names::DELETED, strings(&["2013MNRAS.tmp.2206M"]))
      .with(names::DOI, strings(&["10.1093/mnras/stt1379"]))
      .with(names::PREPRINT, strings(&["1307.6556"]))
      .with(names::PUB2ARXIV, strings(&["2013arXiv1307.6556M"]));

    assert_eq!(
      compute_identifier(&record),
      [
        "2013MNRAS.435.1904M",
        "2013MNRAS.tmp.2206M",
        "10.1093/mnras/stt1379",
        "arxiv:1307.6556",
        "2013arXiv1307.6556M",
      ]
    );
  }

  #[test]
  fn bare_record_is_identified_by_bibcode_alone() {
    let record = JoinedRecord::new("2003ASPC..295..361M");
    assert_eq!(compute_identifier(&record), ["2003ASPC..295..361M"]);
  }

  #[test]
  fn empty_alternates_leave_only_the_bibcode() {
    let record = JoinedRecord::new("2003ASPC..295..361M")
      .with(names::DELETED, strings(&[]))
      .with(names::DOI, strings(&[]))
      .with(names::PREPRINT, strings(&[]))
      .with(names::PUB2ARXIV, strings(&[]));
    assert_eq!(compute_identifier(&record), ["2003ASPC..295..361M"]);
  }

  #[test]
  fn several_alternates_per_source_keep_their_order() {
    let record = JoinedRecord::new("bib")
      .with(names::DELETED, strings(&["deleted1", "deleted2"]))
      .with(names::DOI, strings(&["doia", "doib"]))
      .with(names::PREPRINT, strings(&["preprintA", "preprintB"]))
      .with(names::PUB2ARXIV, strings(&["pub2arxivA", "pub2arxivB"]));

    assert_eq!(
      compute_identifier(&record),
      [
        "bib",
        "deleted1",
        "deleted2",
        "doia",
        "doib",
        "arxiv:preprintA",
        "arxiv:preprintB",
        "pub2arxivA",
        "pub2arxivB",
      ]
    );
  }

  #[test]
  fn bibgroup_facet_drops_repeats() {
    let record = JoinedRecord::new("2003ASPC..295..361M")
      .with(names::BIBGROUP, strings(&["a", "b", "a"]));
    assert_eq!(
      compute_bibgroup_facet(&record),
      Some(vec!["a".to_owned(), "b".to_owned()])
    );
  }

  #[test]
  fn bibgroup_facet_absent_without_groups() {
    let record = JoinedRecord::new("2003ASPC..295..361M");
    assert_eq!(compute_bibgroup_facet(&record), None);

    let record = record.with(names::BIBGROUP, strings(&[]));
    assert_eq!(compute_bibgroup_facet(&record), None);
  }

  // ── Links ─────────────────────────────────────────────────────────────────

  #[test]
  fn data_summary_groups_by_service() {
    let rows = vec![
      data_row("CDS", 1),
      data_row("CDS", 1),
      data_row("NED", 1953),
      data_row("CDS", 2),
      data_row("SIMBAD", 1),
      data_row("Vizier", 2),
    ];
    let summary = compute_data_summary(&rows);
    assert_eq!(summary.data, ["CDS:4", "NED:1953", "SIMBAD:1", "Vizier:2"]);
    assert_eq!(summary.total_link_counts, 1960);
  }

  #[test]
  fn total_link_counts_includes_non_data_rows() {
    let rows = vec![
      data_row("CDS", 3),
      LinkRow::new(LinkType::Associated, "NA", "http://a").with_count(2),
    ];
    let summary = compute_data_summary(&rows);
    assert_eq!(summary.data, ["CDS:3"]);
    assert_eq!(summary.total_link_counts, 5);
  }

  #[test]
  fn no_rows_means_empty_summary() {
    assert_eq!(compute_data_summary(&[]), DataSummary::default());
  }

  #[test]
  fn esource_is_distinct_and_sorted() {
    let rows = vec![
      esource_row("ADS_SCAN"),
      esource_row("ADS_PDF"),
      esource_row("ADS_SCAN"),
      data_row("CDS", 1),
    ];
    assert_eq!(compute_esource(&rows), ["ADS_PDF", "ADS_SCAN"]);
  }

  #[test]
  fn link_rows_follow_registry_order() {
    let registry = FieldRegistry::standard();
    let record = JoinedRecord::new("2004MNRAS.354L..31M")
      .with("toc", FieldValue::Links(vec![LinkRow::new(LinkType::Toc, "NA", "http://t")]))
      .with("ads_pdf", FieldValue::Links(vec![esource_row("ADS_PDF")]));

    let rows = assemble_link_rows(&record, &registry);
    let types: Vec<_> = rows.iter().map(|r| r.link_type).collect();
    assert_eq!(types, [LinkType::Esource, LinkType::Toc]);
  }

  // ── Properties ────────────────────────────────────────────────────────────

  #[test]
  fn scanned_conference_paper_properties() {
    let registry = FieldRegistry::standard();
    let record = JoinedRecord::new("2003ASPC..295..361M")
      .with("ads_pdf", FieldValue::Links(vec![esource_row("ADS_PDF")]))
      .with("ads_scan", FieldValue::Links(vec![esource_row("ADS_SCAN")]))
      .with("toc", FieldValue::Links(vec![LinkRow::new(LinkType::Toc, "NA", "http://t")]));

    let derived = derive(record, &registry);
    assert_eq!(
      derived.property,
      [
        "ADS_OPENACCESS",
        "ARTICLE",
        "ESOURCE",
        "NOT REFEREED",
        "OPENACCESS",
        "TOC",
      ]
    );
    assert_eq!(derived.esource, ["ADS_PDF", "ADS_SCAN"]);
  }

  #[test]
  fn refereed_open_access_properties() {
    let registry = FieldRegistry::standard();
    let record = JoinedRecord::new("2004MNRAS.354L..31M")
      .with(names::REFEREED, FieldValue::Flag(true))
      .with("pub_openaccess", FieldValue::Flag(true))
      .with("eprint_html", FieldValue::Links(vec![esource_row("EPRINT_HTML")]))
      .with("ads_pdf", FieldValue::Links(vec![esource_row("ADS_PDF")]))
      .with(
        "associated",
        FieldValue::Links(vec![LinkRow::new(LinkType::Associated, "NA", "http://a")]),
      )
      .with(
        "inspire",
        FieldValue::Links(vec![LinkRow::new(LinkType::Inspire, "NA", "http://i")]),
      )
      .with("data_link", FieldValue::Links(vec![data_row("CDS", 1)]));

    let rows = assemble_link_rows(&record, &registry);
    assert_eq!(
      compute_property(&record, &registry, &rows),
      [
        "ADS_OPENACCESS",
        "ARTICLE",
        "ASSOCIATED",
        "DATA",
        "EPRINT_OPENACCESS",
        "ESOURCE",
        "INSPIRE",
        "OPENACCESS",
        "PUB_OPENACCESS",
        "REFEREED",
      ]
    );
  }

  #[test]
  fn nonarticle_flag_replaces_article() {
    let registry = FieldRegistry::standard();
    let record = JoinedRecord::new("1057wjlf.book.....C")
      .with(names::NONARTICLE, FieldValue::Flag(true))
      .with("private", FieldValue::Flag(true));

    assert_eq!(
      compute_property(&record, &registry, &[]),
      ["NONARTICLE", "NOT REFEREED", "PRIVATE"]
    );
  }

  #[test]
  fn ocr_abstract_flag_adds_its_property() {
    let registry = FieldRegistry::standard();
    let record = JoinedRecord::new("1057wjlf.book.....C")
      .with("ocrabstract", FieldValue::Flag(true));

    assert_eq!(
      compute_property(&record, &registry, &[]),
      ["ARTICLE", "NOT REFEREED", "OCRABSTRACT"]
    );
  }

  #[test]
  fn unset_flags_contribute_nothing() {
    let registry = FieldRegistry::standard();
    let record = JoinedRecord::new("2003ASPC..295..361M")
      .with(names::REFEREED, FieldValue::Flag(false))
      .with("ocrabstract", FieldValue::Flag(false))
      .with("pub_openaccess", FieldValue::Flag(false));

    assert_eq!(
      compute_property(&record, &registry, &[]),
      ["ARTICLE", "NOT REFEREED"]
    );
  }
}
