//! Merging every declared source into one record.

use nonbib_core::{Bibcode, Result, record::JoinedRecord, session::Session};

/// Join every declared field for `bibcode`, in registry order.
///
/// A source that does not mention the bibcode contributes its shape's empty
/// value, so the result always holds every declared field. Fails with
/// `SourceUnavailable` if any declared namespace was never populated.
pub fn join(session: &Session, bibcode: &Bibcode) -> Result<JoinedRecord> {
  let mut record = JoinedRecord::new(bibcode.clone());
  for decl in session.registry().iter() {
    let value = session
      .read(decl.name, bibcode.as_str())?
      .cloned()
      .unwrap_or_else(|| decl.shape.empty());
    record.insert(decl.name, value);
  }
  Ok(record)
}
