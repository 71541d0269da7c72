//! [`SqliteStore`], the SQLite implementation of [`NamespaceLoader`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use nonbib_core::{
  Bibcode,
  field::FieldDecl,
  session::Namespace,
  store::NamespaceLoader,
};

use crate::{
  Error, Result,
  encode::{RawSource, SourceInfo, decode_value, encode_dt, encode_value},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Imported nonbib sources backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Import ────────────────────────────────────────────────────────────────

  /// Replace everything stored for `decl` with `namespace`.
  ///
  /// Every value is checked against the declared shape before anything is
  /// written. Returns the number of entries stored.
  pub async fn import_namespace(
    &self,
    decl: &FieldDecl,
    origin: &str,
    namespace: &Namespace,
  ) -> Result<usize> {
    let rows = namespace
      .iter()
      .map(|(bibcode, value)| {
        decl.check(value)?;
        Ok((bibcode.as_str().to_owned(), encode_value(value)?))
      })
      .collect::<Result<Vec<_>>>()?;

    let field   = decl.name.to_owned();
    let origin  = origin.to_owned();
    let at_str  = encode_dt(Utc::now());
    let entries = rows.len();
    let count   = i64::try_from(entries).unwrap_or(i64::MAX);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM field_values WHERE field = ?1",
          rusqlite::params![field],
        )?;
        tx.execute(
          "INSERT INTO sources (field, origin, imported_at, entries)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(field) DO UPDATE SET
             origin = excluded.origin,
             imported_at = excluded.imported_at,
             entries = excluded.entries",
          rusqlite::params![field, origin, at_str, count],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO field_values (field, bibcode, value_json) VALUES (?1, ?2, ?3)",
          )?;
          for (bibcode, json) in &rows {
            stmt.execute(rusqlite::params![field, bibcode, json])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(field = decl.name, entries, "imported source");
    Ok(entries)
  }

  /// Parse the column file at `path` for `decl` and import it.
  pub async fn import_file(
    &self,
    decl: &FieldDecl,
    path: impl AsRef<Path>,
  ) -> Result<usize> {
    let path = path.as_ref();
    let input = tokio::fs::read_to_string(path).await.map_err(|source| Error::Io {
      path: path.display().to_string(),
      source,
    })?;
    let namespace = nonbib_columns::parse(&input, decl)?;
    self
      .import_namespace(decl, &path.display().to_string(), &namespace)
      .await
  }

  /// Replace the canonical bibcode list, keeping the given order.
  pub async fn import_canonical(&self, bibcodes: &[Bibcode]) -> Result<usize> {
    let codes: Vec<String> = bibcodes.iter().map(|b| b.as_str().to_owned()).collect();
    let total = codes.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM canonical", [])?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO canonical (position, bibcode) VALUES (?1, ?2)",
          )?;
          for (position, bibcode) in codes.iter().enumerate() {
            let position = i64::try_from(position).unwrap_or(i64::MAX);
            stmt.execute(rusqlite::params![position, bibcode])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(total, "imported canonical bibcodes");
    Ok(total)
  }

  /// Parse a canonical bibcode file at `path` and import it.
  pub async fn import_canonical_file(&self, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let input = tokio::fs::read_to_string(path).await.map_err(|source| Error::Io {
      path: path.display().to_string(),
      source,
    })?;
    self
      .import_canonical(&nonbib_columns::parse_canonical(&input))
      .await
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  /// The canonical bibcode list in import order.
  pub async fn canonical_bibcodes(&self) -> Result<Vec<Bibcode>> {
    let codes: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT bibcode FROM canonical ORDER BY position")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(codes.into_iter().map(Bibcode::new).collect())
  }

  /// Bookkeeping for every imported source, ordered by field name.
  pub async fn sources(&self) -> Result<Vec<SourceInfo>> {
    let raws: Vec<RawSource> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT field, origin, imported_at, entries FROM sources ORDER BY field",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSource {
              field:       row.get(0)?,
              origin:      row.get(1)?,
              imported_at: row.get(2)?,
              entries:     row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSource::into_source).collect()
  }
}

// ─── NamespaceLoader impl ────────────────────────────────────────────────────

impl NamespaceLoader for SqliteStore {
  type Error = Error;

  async fn load_namespace(&self, decl: &FieldDecl) -> Result<Namespace> {
    let field = decl.name.to_owned();

    let rows: Option<Vec<(String, String)>> = self
      .conn
      .call(move |conn| {
        let known = conn
          .query_row(
            "SELECT 1 FROM sources WHERE field = ?1",
            rusqlite::params![field],
            |_| Ok(()),
          )
          .optional()?;
        if known.is_none() {
          return Ok(None);
        }

        let mut stmt = conn
          .prepare("SELECT bibcode, value_json FROM field_values WHERE field = ?1")?;
        let rows = stmt
          .query_map(rusqlite::params![field], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some(rows))
      })
      .await?;

    let rows = rows
      .ok_or_else(|| nonbib_core::Error::SourceUnavailable(decl.name.to_owned()))?;

    let mut namespace = Namespace::new();
    for (bibcode, json) in rows {
      let value = decode_value(&json)?;
      decl.check(&value)?;
      namespace.insert(bibcode, value);
    }

    tracing::debug!(field = decl.name, entries = namespace.len(), "loaded namespace");
    Ok(namespace)
  }
}
