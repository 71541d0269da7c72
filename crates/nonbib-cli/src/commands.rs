//! Subcommand implementations.

use std::{
  fs::File,
  io::{BufWriter, Write as _},
  path::Path,
};

use anyhow::Context as _;
use nonbib_core::{Bibcode, field::FieldRegistry, session::Session};
use nonbib_pipeline::{
  metrics::MetricsEngine,
  process::{BatchReport, Processor},
};
use nonbib_store_sqlite::SqliteStore;

use crate::config::AppConfig;

const RECORDS_FILE: &str = "nonbib.jsonl";
const METRICS_FILE: &str = "metrics.jsonl";

// ─── import ──────────────────────────────────────────────────────────────────

/// Parse every declared source file and the canonical list into the store.
///
/// A missing source file is skipped with a warning; processing later fails
/// on it as an unavailable source.
pub async fn import(cfg: &AppConfig, store: &SqliteStore) -> anyhow::Result<()> {
  let registry = FieldRegistry::standard();
  let mut imported = 0;

  for decl in registry.iter() {
    let path = cfg.data_root.join(decl.file);
    if !path.exists() {
      tracing::warn!(field = decl.name, path = %path.display(), "source file missing");
      continue;
    }
    let entries = store
      .import_file(decl, &path)
      .await
      .with_context(|| format!("failed to import {}", path.display()))?;
    tracing::info!(field = decl.name, entries, "imported");
    imported += 1;
  }

  let canonical = cfg.data_root.join(&cfg.canonical_file);
  let bibcodes = store
    .import_canonical_file(&canonical)
    .await
    .with_context(|| format!("failed to import {}", canonical.display()))?;

  tracing::info!(
    sources = imported,
    declared = registry.len(),
    bibcodes,
    "import complete"
  );
  Ok(())
}

// ─── process ─────────────────────────────────────────────────────────────────

/// Run the pipeline over `bibcodes`, or the whole canonical list when empty,
/// and write the output files.
pub async fn process(
  cfg: &AppConfig,
  store: &SqliteStore,
  bibcodes: Vec<Bibcode>,
  compute_metrics: bool,
) -> anyhow::Result<()> {
  let session = open_session(store).await?;

  let bibcodes = if bibcodes.is_empty() {
    store
      .canonical_bibcodes()
      .await
      .context("failed to read canonical bibcodes")?
  } else {
    bibcodes
  };
  tracing::info!(bibcodes = bibcodes.len(), "processing");

  let report = processor(cfg, &session)
    .compute_metrics(compute_metrics)
    .process_batch(&bibcodes)
    .context("batch aborted")?;

  write_report(&cfg.output_dir, &report)?;

  for failure in &report.failures {
    tracing::warn!(bibcode = %failure.bibcode, error = %failure.error, "not processed");
  }
  tracing::info!(
    written = report.processed.len(),
    skipped = report.failures.len(),
    output = %cfg.output_dir.display(),
    "done"
  );

  let released = session.close();
  tracing::debug!(released, "session closed");
  Ok(())
}

// ─── show ────────────────────────────────────────────────────────────────────

/// Print one bibcode's output record, and its metrics when enabled.
pub async fn show(cfg: &AppConfig, store: &SqliteStore, bibcode: Bibcode) -> anyhow::Result<()> {
  let session = open_session(store).await?;
  let processed = processor(cfg, &session)
    .compute_metrics(cfg.compute_metrics)
    .process(&bibcode)
    .with_context(|| format!("failed to process {bibcode}"))?;

  let out = serde_json::json!({
    "record": processed.record,
    "metrics": processed.metrics,
  });
  println!("{}", serde_json::to_string_pretty(&out)?);
  Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn open_session(store: &SqliteStore) -> anyhow::Result<Session> {
  let mut session = Session::new(FieldRegistry::standard());
  let loaded = session
    .populate_all(store)
    .await
    .context("failed to populate session")?;
  tracing::info!(namespaces = loaded, "session populated");
  Ok(session)
}

fn processor<'s>(cfg: &AppConfig, session: &'s Session) -> Processor<'s> {
  let engine = MetricsEngine::with_scorer(cfg.current_year(), cfg.boost)
    .with_config(cfg.metrics);
  Processor::new(session, engine)
}

fn write_report(dir: &Path, report: &BatchReport) -> anyhow::Result<()> {
  std::fs::create_dir_all(dir)
    .with_context(|| format!("failed to create {}", dir.display()))?;

  let mut records = jsonl(&dir.join(RECORDS_FILE))?;
  let mut metrics = if report.processed.iter().any(|p| p.metrics.is_some()) {
    Some(jsonl(&dir.join(METRICS_FILE))?)
  } else {
    None
  };

  for processed in &report.processed {
    serde_json::to_writer(&mut records, &processed.record)?;
    records.write_all(b"\n")?;

    if let (Some(writer), Some(m)) = (metrics.as_mut(), &processed.metrics) {
      serde_json::to_writer(&mut *writer, m)?;
      writer.write_all(b"\n")?;
    }
  }

  records.flush()?;
  if let Some(w) = &mut metrics {
    w.flush()?;
  }
  Ok(())
}

fn jsonl(path: &Path) -> anyhow::Result<BufWriter<File>> {
  let file = File::create(path)
    .with_context(|| format!("failed to create {}", path.display()))?;
  Ok(BufWriter::new(file))
}
