//! Session builders shared by the pipeline tests.

use nonbib_core::{
  field::FieldRegistry,
  session::{Namespace, Session},
  value::FieldValue,
};

/// A session over the standard registry with every namespace populated from
/// `entries` (`field`, `bibcode`, `value`); unmentioned namespaces are empty.
pub fn session_with(entries: Vec<(&'static str, &'static str, FieldValue)>) -> Session {
  let registry = FieldRegistry::standard();
  let names: Vec<&'static str> = registry.iter().map(|d| d.name).collect();
  let mut session = Session::new(registry);
  for name in names {
    let namespace: Namespace = entries
      .iter()
      .filter(|(field, _, _)| *field == name)
      .map(|(_, bibcode, value)| (*bibcode, value.clone()))
      .collect();
    session.populate_with(name, namespace).unwrap();
  }
  session
}

pub fn strings(values: &[&str]) -> FieldValue {
  FieldValue::Strings(values.iter().map(|s| s.to_string()).collect())
}
