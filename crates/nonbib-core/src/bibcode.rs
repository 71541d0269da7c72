//! Bibcode: the canonical publication key.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A 19-character ADS bibcode such as `2004MNRAS.354L..31M`.
///
/// No structural validation happens on construction; only [`Bibcode::year`]
/// requires the leading year and fails when it is missing.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Bibcode(String);

impl Bibcode {
  pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  /// The publication year encoded in the first four characters.
  pub fn year(&self) -> Result<i32> { year_of(&self.0) }
}

/// Parse the leading four-digit year of any bibcode-shaped string.
pub fn year_of(bibcode: &str) -> Result<i32> {
  match bibcode.as_bytes().get(..4) {
    Some(prefix) if prefix.iter().all(u8::is_ascii_digit) => Ok(
      prefix
        .iter()
        .fold(0, |year, digit| year * 10 + i32::from(digit - b'0')),
    ),
    _ => Err(Error::MalformedBibcode(bibcode.to_owned())),
  }
}

impl fmt::Display for Bibcode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for Bibcode {
  fn as_ref(&self) -> &str { &self.0 }
}

impl Borrow<str> for Bibcode {
  fn borrow(&self) -> &str { &self.0 }
}

impl From<&str> for Bibcode {
  fn from(value: &str) -> Self { Self(value.to_owned()) }
}

impl From<String> for Bibcode {
  fn from(value: String) -> Self { Self(value) }
}
