//! The processing session: the keyed store for one pass over the bibcodes.
//!
//! A [`Session`] owns one [`Namespace`] per declared source. Namespaces are
//! populated lazily and at most once; population needs `&mut Session`, so it
//! necessarily happens before the session is shared for joining and scoring.
//! After that the session is only read, and lookups never mutate it: a
//! bibcode a namespace does not mention simply yields an empty value.

use std::collections::{HashMap, hash_map::Entry};

use crate::{
  Bibcode, Error, Result,
  field::{FieldRegistry, names},
  store::NamespaceLoader,
  value::FieldValue,
};

// ─── Namespace ───────────────────────────────────────────────────────────────

/// All values of one source, keyed by bibcode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
  values: HashMap<Bibcode, FieldValue>,
}

impl Namespace {
  pub fn new() -> Self { Self::default() }

  /// Set the value for `bibcode`, returning the one it replaces.
  pub fn insert(
    &mut self,
    bibcode: impl Into<Bibcode>,
    value: FieldValue,
  ) -> Option<FieldValue> {
    self.values.insert(bibcode.into(), value)
  }

  pub fn get(&self, bibcode: &str) -> Option<&FieldValue> {
    self.values.get(bibcode)
  }

  pub fn contains(&self, bibcode: &str) -> bool {
    self.values.contains_key(bibcode)
  }

  pub fn len(&self) -> usize { self.values.len() }

  pub fn is_empty(&self) -> bool { self.values.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = (&Bibcode, &FieldValue)> {
    self.values.iter()
  }
}

impl<B: Into<Bibcode>> FromIterator<(B, FieldValue)> for Namespace {
  fn from_iter<I: IntoIterator<Item = (B, FieldValue)>>(iter: I) -> Self {
    Self {
      values: iter.into_iter().map(|(b, v)| (b.into(), v)).collect(),
    }
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// Loaded namespaces for one processing pass, plus the registry that
/// declares them.
#[derive(Debug)]
pub struct Session {
  registry:   FieldRegistry,
  namespaces: HashMap<&'static str, Namespace>,
}

impl Session {
  pub fn new(registry: FieldRegistry) -> Self {
    Self { registry, namespaces: HashMap::new() }
  }

  pub fn registry(&self) -> &FieldRegistry { &self.registry }

  pub fn is_populated(&self, name: &str) -> bool {
    self.namespaces.contains_key(name)
  }

  /// Names of the declared sources that are not loaded yet.
  pub fn missing(&self) -> Vec<&'static str> {
    self
      .registry
      .iter()
      .map(|d| d.name)
      .filter(|name| !self.namespaces.contains_key(name))
      .collect()
  }

  // ── Population ────────────────────────────────────────────────────────────

  /// Install an already-built namespace for the declared field `name`.
  ///
  /// Returns `Ok(false)` without touching anything if the namespace is
  /// already populated. Every value must have the declared shape.
  pub fn populate_with(&mut self, name: &str, namespace: Namespace) -> Result<bool> {
    let decl = self.registry.get(name)?;
    for value in namespace.values.values() {
      decl.check(value)?;
    }
    match self.namespaces.entry(decl.name) {
      Entry::Occupied(_) => Ok(false),
      Entry::Vacant(slot) => {
        slot.insert(namespace);
        Ok(true)
      }
    }
  }

  /// Load the namespace of `name` through `loader` unless it is already
  /// populated. Returns whether a load happened.
  pub async fn populate<L>(&mut self, loader: &L, name: &str) -> Result<bool, L::Error>
  where
    L: NamespaceLoader,
    L::Error: From<Error>,
  {
    if self.is_populated(name) {
      return Ok(false);
    }
    let decl = self.registry.get(name)?.clone();
    let namespace = loader.load_namespace(&decl).await?;
    Ok(self.populate_with(decl.name, namespace)?)
  }

  /// Populate every declared namespace; returns how many were loaded by this
  /// call.
  pub async fn populate_all<L>(&mut self, loader: &L) -> Result<usize, L::Error>
  where
    L: NamespaceLoader,
    L::Error: From<Error>,
  {
    let mut loaded = 0;
    for name in self.missing() {
      if self.populate(loader, name).await? {
        loaded += 1;
      }
    }
    Ok(loaded)
  }

  /// End the session, releasing every namespace. Returns how many were
  /// loaded.
  pub fn close(self) -> usize { self.namespaces.len() }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn namespace(&self, name: &str) -> Result<&Namespace> {
    self
      .namespaces
      .get(name)
      .ok_or_else(|| Error::SourceUnavailable(name.to_owned()))
  }

  /// The value `name` holds for `bibcode`; `Ok(None)` when the source does
  /// not mention the bibcode.
  pub fn read(&self, name: &str, bibcode: &str) -> Result<Option<&FieldValue>> {
    Ok(self.namespace(name)?.get(bibcode))
  }

  /// Bibcodes citing `bibcode`, in recorded order.
  pub fn citations_of(&self, bibcode: &str) -> Result<&[String]> {
    self.graph(names::CITATION, bibcode)
  }

  /// Bibcodes `bibcode` cites, in recorded order.
  pub fn references_of(&self, bibcode: &str) -> Result<&[String]> {
    self.graph(names::REFERENCE, bibcode)
  }

  pub fn is_refereed(&self, bibcode: &str) -> Result<bool> {
    Ok(
      self
        .read(names::REFEREED, bibcode)?
        .and_then(FieldValue::as_flag)
        .unwrap_or(false),
    )
  }

  fn graph(&self, name: &str, bibcode: &str) -> Result<&[String]> {
    Ok(
      self
        .read(name, bibcode)?
        .and_then(FieldValue::as_strings)
        .unwrap_or_default(),
    )
  }
}
