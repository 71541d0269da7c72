//! SQL schema for the nonbib SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per imported source. A source without a row here is unavailable,
-- which is different from a source that mentions no bibcodes.
CREATE TABLE IF NOT EXISTS sources (
    field       TEXT PRIMARY KEY,  -- declared field name
    origin      TEXT NOT NULL,     -- path or label the data came from
    imported_at TEXT NOT NULL,     -- ISO 8601 UTC
    entries     INTEGER NOT NULL
);

-- Replaced wholesale on every import of a source.
CREATE TABLE IF NOT EXISTS field_values (
    field      TEXT NOT NULL REFERENCES sources(field),
    bibcode    TEXT NOT NULL,
    value_json TEXT NOT NULL,      -- shape-tagged FieldValue
    PRIMARY KEY (field, bibcode)
);

-- The canonical bibcode list, in file order.
CREATE TABLE IF NOT EXISTS canonical (
    position INTEGER PRIMARY KEY,
    bibcode  TEXT NOT NULL UNIQUE
);

PRAGMA user_version = 1;
";
