//! Column-file parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ content_lines()  → (line number, columns)
//!          └─ accumulate() → per-bibcode FieldValue, by declared shape
//!               └─ collect → Namespace

use std::collections::{HashMap, HashSet};

use nonbib_core::{
  Bibcode,
  field::{FieldDecl, LinkSpec, Shape, SubType},
  link::LinkRow,
  session::Namespace,
  value::{FieldValue, Relevance},
};

use crate::error::{Error, Result};

// ─── Line splitting ──────────────────────────────────────────────────────────

struct ContentLine<'a> {
  number:  usize,
  bibcode: &'a str,
  columns: Vec<&'a str>,
}

/// Non-blank, non-comment lines split on tabs. Tolerates CRLF endings.
fn content_lines(input: &str) -> impl Iterator<Item = ContentLine<'_>> {
  input.lines().enumerate().filter_map(|(i, raw)| {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.trim().is_empty() || line.starts_with('#') {
      return None;
    }
    let mut parts = line.split('\t');
    let bibcode = parts.next()?.trim();
    if bibcode.is_empty() {
      return None;
    }
    Some(ContentLine {
      number: i + 1,
      bibcode,
      columns: parts.map(str::trim).collect(),
    })
  })
}

// ─── Column helpers ──────────────────────────────────────────────────────────

struct Cursor<'a, 'l> {
  source: &'a str,
  line:   &'a ContentLine<'l>,
}

impl Cursor<'_, '_> {
  fn column(&self, index: usize, expected: &'static str) -> Result<&str> {
    self
      .line
      .columns
      .get(index)
      .copied()
      .ok_or_else(|| Error::MissingColumn {
        source_name: self.source.to_owned(),
        line: self.line.number,
        expected,
      })
  }

  fn number(&self, value: &str) -> Result<u32> {
    value.parse().map_err(|_| Error::InvalidNumber {
      source_name: self.source.to_owned(),
      line:        self.line.number,
      value:       value.to_owned(),
    })
  }

  /// A finite, non-negative score.
  fn boost(&self, value: &str) -> Result<f64> {
    match value.parse::<f64>() {
      Ok(boost) if boost.is_finite() && boost >= 0.0 => Ok(boost),
      _ => Err(Error::InvalidNumber {
        source_name: self.source.to_owned(),
        line:        self.line.number,
        value:       value.to_owned(),
      }),
    }
  }

  /// An empty column counts as zero.
  fn count(&self, index: usize, expected: &'static str) -> Result<u32> {
    match self.column(index, expected)? {
      "" => Ok(0),
      v => self.number(v),
    }
  }
}

// ─── Per-shape accumulation ──────────────────────────────────────────────────

fn accumulate(
  slot: &mut FieldValue,
  shape: &Shape,
  cursor: &Cursor<'_, '_>,
) -> Result<()> {
  let columns = &cursor.line.columns;
  match (shape, slot) {
    (Shape::Strings, FieldValue::Strings(values)) => {
      values.extend(
        columns
          .iter()
          .filter(|c| !c.is_empty())
          .map(|c| c.to_string()),
      );
    }
    (Shape::Counts, FieldValue::Counts(values)) => {
      for c in columns.iter().filter(|c| !c.is_empty()) {
        values.push(cursor.number(c)?);
      }
    }
    (Shape::Flag, FieldValue::Flag(set)) => *set = true,
    (Shape::Links(spec), FieldValue::Links(rows)) => {
      accumulate_link(rows, spec, cursor)?;
    }
    (Shape::Relevance, FieldValue::Relevance(relevance)) => {
      let boost = match cursor.column(0, "boost")? {
        "" => None,
        v => Some(cursor.boost(v)?),
      };
      // Column 1 is the upstream citation count; the `citation` source is
      // authoritative for it.
      *relevance = Relevance {
        boost,
        read_count: cursor.count(2, "read_count")?,
        norm_cites: cursor.count(3, "norm_cites")?,
      };
    }
    // The slot is always created from `shape.empty()`.
    _ => unreachable!("slot shape diverged from declaration"),
  }
  Ok(())
}

fn accumulate_link(
  rows: &mut Vec<LinkRow>,
  spec: &LinkSpec,
  cursor: &Cursor<'_, '_>,
) -> Result<()> {
  match spec.sub_type {
    SubType::Fixed(sub_type) => {
      let url = cursor.column(0, "url")?.to_owned();
      let title = cursor.line.columns.get(1).copied().unwrap_or_default();
      // All lines of one bibcode fold into a single row.
      if let Some(row) = rows.first_mut() {
        row.url.push(url);
        row.title.push(title.to_owned());
      } else {
        rows.push(LinkRow::new(spec.link_type, sub_type, url).with_title(title));
      }
    }
    SubType::PerRow => {
      let sub_type = cursor.column(0, "link_sub_type")?;
      let item_count = cursor.count(1, "item_count")?;
      let url = cursor.column(2, "url")?;
      let title = cursor.line.columns.get(3).copied().unwrap_or_default();
      rows.push(
        LinkRow::new(spec.link_type, sub_type, url)
          .with_count(item_count)
          .with_title(title),
      );
    }
  }
  Ok(())
}

// ─── Entry points ────────────────────────────────────────────────────────────

pub(crate) fn parse_source(input: &str, decl: &FieldDecl) -> Result<Namespace> {
  let mut values: HashMap<&str, FieldValue> = HashMap::new();
  for line in content_lines(input) {
    let cursor = Cursor { source: decl.name, line: &line };
    let slot = values
      .entry(line.bibcode)
      .or_insert_with(|| decl.shape.empty());
    accumulate(slot, &decl.shape, &cursor)?;
  }
  Ok(values.into_iter().collect())
}

pub(crate) fn parse_canonical(input: &str) -> Vec<Bibcode> {
  let mut seen = HashSet::new();
  content_lines(input)
    .filter(|line| seen.insert(line.bibcode))
    .map(|line| Bibcode::from(line.bibcode))
    .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use nonbib_core::{
    field::{FieldRegistry, names},
    link::LinkType,
  };

  use super::*;

  fn parse(input: &str, name: &str) -> Result<Namespace> {
    let registry = FieldRegistry::standard();
    parse_source(input, registry.get(name).unwrap())
  }

  // ── Lists ───────────────────────────────────────────────────────────────────

  #[test]
  fn strings_accumulate_across_lines() {
    let input = "1997BoLMe..85..475M\t1998PPGeo..22..553A\n\
                 1997BoLMe..85..475M\t1999P&SS...47..951S\n";
    let ns = parse(input, names::CITATION).unwrap();
    assert_eq!(
      ns.get("1997BoLMe..85..475M"),
      Some(&FieldValue::Strings(vec![
        "1998PPGeo..22..553A".into(),
        "1999P&SS...47..951S".into(),
      ]))
    );
  }

  #[test]
  fn strings_on_one_line_keep_column_order() {
    let input = "1057wjlf.book.....C\t4fc45951aa\t557ebfd055\t57fcb9018a\r\n";
    let ns = parse(input, names::READERS).unwrap();
    assert_eq!(
      ns.get("1057wjlf.book.....C").unwrap().as_strings().unwrap(),
      ["4fc45951aa", "557ebfd055", "57fcb9018a"]
    );
  }

  #[test]
  fn counts_parse_as_numbers() {
    let input = "1057wjlf.book.....C\t0\t0\t21\t6\n";
    let ns = parse(input, names::READS).unwrap();
    assert_eq!(
      ns.get("1057wjlf.book.....C"),
      Some(&FieldValue::Counts(vec![0, 0, 21, 6]))
    );
  }

  #[test]
  fn bad_count_reports_line() {
    let input = "# reads\n1057wjlf.book.....C\t0\tx\n";
    let err = parse(input, names::READS).unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidNumber { line: 2, ref value, .. } if value == "x"
    ));
  }

  // ── Flags ───────────────────────────────────────────────────────────────────

  #[test]
  fn flag_is_set_by_presence() {
    let ns = parse("2004MNRAS.354L..31M\n\n", names::REFEREED).unwrap();
    assert_eq!(ns.get("2004MNRAS.354L..31M"), Some(&FieldValue::Flag(true)));
    assert_eq!(ns.len(), 1);
  }

  // ── Links ───────────────────────────────────────────────────────────────────

  #[test]
  fn fixed_sub_type_links_fold_into_one_row() {
    let input = "2004MNRAS.354L..31M\t2004MNRAS.354L..31M\tSource Paper\n\
                 2004MNRAS.354L..31M\t2005yCat..73549031M\tCatalog Description\n";
    let ns = parse(input, "associated").unwrap();
    let rows = ns.get("2004MNRAS.354L..31M").unwrap().as_links().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].link_type, LinkType::Associated);
    assert_eq!(rows[0].link_sub_type, "NA");
    assert_eq!(rows[0].url, ["2004MNRAS.354L..31M", "2005yCat..73549031M"]);
    assert_eq!(rows[0].title, ["Source Paper", "Catalog Description"]);
  }

  #[test]
  fn esource_without_title_gets_blank_title() {
    let input =
      "2003ASPC..295..361M\thttp://articles.adsabs.harvard.edu/pdf/2003ASPC..295..361M\n";
    let ns = parse(input, "ads_pdf").unwrap();
    let rows = ns.get("2003ASPC..295..361M").unwrap().as_links().unwrap();
    assert_eq!(rows[0].link_sub_type, "ADS_PDF");
    assert_eq!(rows[0].title, [""]);
    assert_eq!(rows[0].item_count, 0);
  }

  #[test]
  fn data_links_keep_one_row_per_line() {
    let input = "2004MNRAS.354L..31M\tCDS\t1\thttp://$VIZIER$/viz-bin/VizieR?-source=J/MNRAS/354/L31\n\
                 2004MNRAS.354L..31M\tNED\t1953\thttps://$NED$/cgi-bin/objsearch\tNED Objects (1953)\n";
    let ns = parse(input, "data_link").unwrap();
    let rows = ns.get("2004MNRAS.354L..31M").unwrap().as_links().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].link_type, LinkType::Data);
    assert_eq!(rows[1].link_sub_type, "NED");
    assert_eq!(rows[1].item_count, 1953);
    assert_eq!(rows[1].title, ["NED Objects (1953)"]);
  }

  #[test]
  fn data_link_without_url_is_rejected() {
    let err = parse("2004MNRAS.354L..31M\tCDS\t1\n", "data_link").unwrap_err();
    assert!(matches!(err, Error::MissingColumn { expected: "url", .. }));
  }

  // ── Relevance ───────────────────────────────────────────────────────────────

  #[test]
  fn relevance_columns() {
    let input = "1057wjlf.book.....C\t0.32\t0\t25\t0\n\
                 2003ASPC..295..361M\t\t0\t4\t0\n";
    let ns = parse(input, names::RELEVANCE).unwrap();
    let first = ns.get("1057wjlf.book.....C").unwrap().as_relevance().unwrap();
    assert_eq!(first.boost, Some(0.32));
    assert_eq!(first.read_count, 25);
    let second = ns.get("2003ASPC..295..361M").unwrap().as_relevance().unwrap();
    assert_eq!(second.boost, None);
    assert_eq!(second.read_count, 4);
  }

  #[test]
  fn non_finite_boost_is_rejected() {
    for boost in ["NaN", "inf", "-inf", "-0.5"] {
      let input = format!("1057wjlf.book.....C\t{boost}\t0\t25\t0\n");
      let err = parse(&input, names::RELEVANCE).unwrap_err();
      assert!(
        matches!(&err, Error::InvalidNumber { value, line: 1, .. } if value == boost),
        "{boost}: {err:?}"
      );
    }
  }

  // ── Canonical ───────────────────────────────────────────────────────────────

  #[test]
  fn canonical_list_dedups_in_order() {
    let input = "2003ASPC..295..361M\n1057wjlf.book.....C\n2003ASPC..295..361M\n";
    let bibcodes = parse_canonical(input);
    assert_eq!(
      bibcodes,
      [
        Bibcode::from("2003ASPC..295..361M"),
        Bibcode::from("1057wjlf.book.....C"),
      ]
    );
  }
}
