//! Link rows: the per-bibcode list of electronic sources, data products and
//! associated resources.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// The kind of resource a [`LinkRow`] points at.
///
/// The string form doubles as the property label the link contributes to a
/// record.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LinkType {
  Esource,
  Data,
  Associated,
  Inspire,
  Toc,
  LibraryCatalog,
  Presentation,
}

/// Sub type used by link types that carry no service name.
pub const NO_SUB_TYPE: &str = "NA";

/// One entry of `data_links_rows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRow {
  pub url:           Vec<String>,
  pub link_type:     LinkType,
  /// Service name for `DATA` rows (e.g. `NED`, `SIMBAD`), the esource kind
  /// for `ESOURCE` rows, [`NO_SUB_TYPE`] otherwise.
  pub link_sub_type: String,
  #[serde(default)]
  pub item_count:    u32,
  #[serde(default = "blank_title")]
  pub title:         Vec<String>,
}

fn blank_title() -> Vec<String> { vec![String::new()] }

impl LinkRow {
  /// A row with a single url, no count and a blank title.
  pub fn new(
    link_type: LinkType,
    link_sub_type: impl Into<String>,
    url: impl Into<String>,
  ) -> Self {
    Self {
      url: vec![url.into()],
      link_type,
      link_sub_type: link_sub_type.into(),
      item_count: 0,
      title: blank_title(),
    }
  }

  pub fn with_count(mut self, item_count: u32) -> Self {
    self.item_count = item_count;
    self
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = vec![title.into()];
    self
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn link_type_labels() {
    assert_eq!(LinkType::Esource.to_string(), "ESOURCE");
    assert_eq!(LinkType::LibraryCatalog.as_ref(), "LIBRARYCATALOG");
    assert_eq!(LinkType::from_str("DATA").unwrap(), LinkType::Data);
  }

  #[test]
  fn missing_count_and_title_default_on_deserialize() {
    let row: LinkRow = serde_json::from_value(serde_json::json!({
      "url": ["http://inspirehep.net/search?p=find+j+MNRAA,354,L31"],
      "link_type": "INSPIRE",
      "link_sub_type": "NA",
    }))
    .unwrap();
    assert_eq!(row.item_count, 0);
    assert_eq!(row.title, vec![String::new()]);
  }
}
