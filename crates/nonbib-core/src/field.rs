//! The field-source registry.
//!
//! Every data source the joiner reads is declared once here, in the order
//! its values are merged. A declaration carries its [`Shape`], which doubles
//! as the default policy applied when the source has nothing for a bibcode,
//! and the property labels the field contributes when it is non-default.

use crate::{
  Error, Result,
  link::{LinkType, NO_SUB_TYPE},
  value::{FieldValue, Relevance},
};

// ─── Well-known field names ──────────────────────────────────────────────────

/// Names of the fields the derivation and metrics stages look up directly.
pub mod names {
  pub const AUTHOR: &str = "author";
  pub const BIBGROUP: &str = "bibgroup";
  pub const CITATION: &str = "citation";
  pub const DELETED: &str = "deleted";
  pub const DOI: &str = "doi";
  pub const DOWNLOAD: &str = "download";
  pub const GRANTS: &str = "grants";
  pub const NED_OBJECTS: &str = "ned_objects";
  pub const NONARTICLE: &str = "nonarticle";
  pub const PREPRINT: &str = "preprint";
  pub const PUB2ARXIV: &str = "pub2arxiv";
  pub const READERS: &str = "readers";
  pub const READS: &str = "reads";
  pub const REFERENCE: &str = "reference";
  pub const REFEREED: &str = "refereed";
  pub const RELEVANCE: &str = "relevance";
  pub const SIMBAD_OBJECTS: &str = "simbad_objects";
}

// ─── Shape ───────────────────────────────────────────────────────────────────

/// Where a link source takes the `link_sub_type` of its rows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubType {
  /// Every row of the source has the same sub type.
  Fixed(&'static str),
  /// Each row names its own sub type (data products).
  PerRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSpec {
  pub link_type: LinkType,
  pub sub_type:  SubType,
}

/// The value shape of a field, and with it the default substituted for a
/// bibcode the source does not mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
  /// Default: empty list.
  Strings,
  /// Default: empty list.
  Counts,
  /// Default: `false`.
  Flag,
  /// Default: no rows.
  Links(LinkSpec),
  /// Default: all counters zero, no upstream boost.
  Relevance,
}

impl Shape {
  pub fn empty(&self) -> FieldValue {
    match self {
      Self::Strings => FieldValue::Strings(Vec::new()),
      Self::Counts => FieldValue::Counts(Vec::new()),
      Self::Flag => FieldValue::Flag(false),
      Self::Links(_) => FieldValue::Links(Vec::new()),
      Self::Relevance => FieldValue::Relevance(Relevance::default()),
    }
  }

  pub fn name(&self) -> &'static str { self.empty().shape_name() }

  pub fn accepts(&self, value: &FieldValue) -> bool {
    matches!(
      (self, value),
      (Self::Strings, FieldValue::Strings(_))
        | (Self::Counts, FieldValue::Counts(_))
        | (Self::Flag, FieldValue::Flag(_))
        | (Self::Links(_), FieldValue::Links(_))
        | (Self::Relevance, FieldValue::Relevance(_))
    )
  }
}

// ─── Declarations ────────────────────────────────────────────────────────────

/// One declared data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
  pub name:       &'static str,
  /// Path of the raw column file, relative to the data root.
  pub file:       &'static str,
  pub shape:      Shape,
  /// Property labels added to a record whose value for this field is
  /// non-default.
  pub properties: &'static [&'static str],
}

impl FieldDecl {
  pub const fn new(name: &'static str, file: &'static str, shape: Shape) -> Self {
    Self { name, file, shape, properties: &[] }
  }

  pub const fn with_properties(
    mut self,
    properties: &'static [&'static str],
  ) -> Self {
    self.properties = properties;
    self
  }

  pub fn link_spec(&self) -> Option<LinkSpec> {
    match self.shape {
      Shape::Links(spec) => Some(spec),
      _ => None,
    }
  }

  /// Check that `value` has the shape this field declares.
  pub fn check(&self, value: &FieldValue) -> Result<()> {
    if self.shape.accepts(value) {
      Ok(())
    } else {
      Err(Error::ShapeMismatch {
        field:    self.name.to_owned(),
        expected: self.shape.name(),
      })
    }
  }
}

const fn link(
  name: &'static str,
  file: &'static str,
  link_type: LinkType,
  sub_type: SubType,
) -> FieldDecl {
  FieldDecl::new(name, file, Shape::Links(LinkSpec { link_type, sub_type }))
}

const fn esource(
  name: &'static str,
  file: &'static str,
  sub_type: &'static str,
) -> FieldDecl {
  link(name, file, LinkType::Esource, SubType::Fixed(sub_type))
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// Ordered list of declared sources.
///
/// Declaration order is the order in which link rows from different sources
/// are concatenated into `data_links_rows`.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
  decls: Vec<FieldDecl>,
}

impl FieldRegistry {
  pub fn new(decls: Vec<FieldDecl>) -> Self { Self { decls } }

  /// The full set of ADS non-bibliographic sources.
  pub fn standard() -> Self {
    use names::*;

    Self::new(vec![
      FieldDecl::new(AUTHOR, "facet_authors/all.links", Shape::Strings),
      FieldDecl::new(BIBGROUP, "bibgroups/all.links", Shape::Strings),
      FieldDecl::new(CITATION, "citation/all.links", Shape::Strings),
      FieldDecl::new(DELETED, "deleted/all.links", Shape::Strings),
      FieldDecl::new(DOI, "doi/all.links", Shape::Strings),
      FieldDecl::new(DOWNLOAD, "reads/downloads.links", Shape::Counts),
      FieldDecl::new(GRANTS, "grants/all.links", Shape::Strings),
      FieldDecl::new(NED_OBJECTS, "ned/ned_objects.tab", Shape::Strings),
      FieldDecl::new(NONARTICLE, "nonarticle/all.links", Shape::Flag),
      FieldDecl::new("ocrabstract", "ocr/all.links", Shape::Flag)
        .with_properties(&["OCRABSTRACT"]),
      FieldDecl::new(PREPRINT, "preprint/all.links", Shape::Strings),
      FieldDecl::new("private", "private/all.links", Shape::Flag)
        .with_properties(&["PRIVATE"]),
      FieldDecl::new("pub_openaccess", "openaccess/pub.links", Shape::Flag)
        .with_properties(&["PUB_OPENACCESS", "OPENACCESS"]),
      FieldDecl::new(PUB2ARXIV, "pub2arxiv/all.links", Shape::Strings),
      FieldDecl::new(READERS, "alsoread_bib/all.links", Shape::Strings),
      FieldDecl::new(READS, "reads/all.links", Shape::Counts),
      FieldDecl::new(REFERENCE, "reference/all.links", Shape::Strings),
      FieldDecl::new(REFEREED, "refereed/all.links", Shape::Flag)
        .with_properties(&["REFEREED"]),
      FieldDecl::new(RELEVANCE, "relevance/docmetrics.tab", Shape::Relevance),
      FieldDecl::new(SIMBAD_OBJECTS, "simbad/simbad_objects.tab", Shape::Strings),
      // Links, in the order their rows appear in `data_links_rows`.
      esource("pub_html", "links/pub_html/all.links", "PUB_HTML")
        .with_properties(&["ESOURCE"]),
      esource("eprint_html", "links/eprint_html/all.links", "EPRINT_HTML")
        .with_properties(&["ESOURCE", "EPRINT_OPENACCESS", "OPENACCESS"]),
      esource("pub_pdf", "links/pub_pdf/all.links", "PUB_PDF")
        .with_properties(&["ESOURCE"]),
      esource("ads_pdf", "links/ads_pdf/all.links", "ADS_PDF")
        .with_properties(&["ESOURCE", "ADS_OPENACCESS", "OPENACCESS"]),
      esource("eprint_pdf", "links/eprint_pdf/all.links", "EPRINT_PDF")
        .with_properties(&["ESOURCE", "EPRINT_OPENACCESS", "OPENACCESS"]),
      esource("ads_scan", "links/ads_scan/all.links", "ADS_SCAN")
        .with_properties(&["ESOURCE", "ADS_OPENACCESS", "OPENACCESS"]),
      esource("author_html", "links/author_html/all.links", "AUTHOR_HTML")
        .with_properties(&["ESOURCE", "AUTHOR_OPENACCESS", "OPENACCESS"]),
      esource("author_pdf", "links/author_pdf/all.links", "AUTHOR_PDF")
        .with_properties(&["ESOURCE", "AUTHOR_OPENACCESS", "OPENACCESS"]),
      link(
        "associated",
        "links/associated/all.links",
        LinkType::Associated,
        SubType::Fixed(NO_SUB_TYPE),
      )
      .with_properties(&["ASSOCIATED"]),
      link(
        "inspire",
        "links/inspire/all.links",
        LinkType::Inspire,
        SubType::Fixed(NO_SUB_TYPE),
      )
      .with_properties(&["INSPIRE"]),
      link(
        "data_link",
        "links/data/all.links",
        LinkType::Data,
        SubType::PerRow,
      )
      .with_properties(&["DATA"]),
      link("toc", "links/toc/all.links", LinkType::Toc, SubType::Fixed(NO_SUB_TYPE))
        .with_properties(&["TOC"]),
      link(
        "library_catalog",
        "links/librarycatalog/all.links",
        LinkType::LibraryCatalog,
        SubType::Fixed(NO_SUB_TYPE),
      )
      .with_properties(&["LIBRARYCATALOG"]),
      link(
        "presentation",
        "links/video/all.links",
        LinkType::Presentation,
        SubType::Fixed(NO_SUB_TYPE),
      )
      .with_properties(&["PRESENTATION"]),
    ])
  }

  pub fn get(&self, name: &str) -> Result<&FieldDecl> {
    self
      .decls
      .iter()
      .find(|d| d.name == name)
      .ok_or_else(|| Error::UnknownField(name.to_owned()))
  }

  pub fn iter(&self) -> impl Iterator<Item = &FieldDecl> { self.decls.iter() }

  /// Link-shaped declarations in registry order.
  pub fn links(&self) -> impl Iterator<Item = &FieldDecl> {
    self.decls.iter().filter(|d| d.link_spec().is_some())
  }

  pub fn len(&self) -> usize { self.decls.len() }

  pub fn is_empty(&self) -> bool { self.decls.is_empty() }
}

impl Default for FieldRegistry {
  fn default() -> Self { Self::standard() }
}
