//! `nonbib`: builds nonbib records and citation metrics.
//!
//! # Usage
//!
//! ```text
//! nonbib import
//! nonbib process
//! nonbib process --bibcode 2004MNRAS.354L..31M --no-metrics
//! nonbib --config prod.toml show 2003ASPC..295..361M
//! ```

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use nonbib_core::Bibcode;
use nonbib_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "nonbib", version, about = "Join nonbib sources and compute metrics")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "nonbib.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Parse every declared source file under the data root into the store.
  Import,

  /// Process bibcodes and write `nonbib.jsonl` and `metrics.jsonl`.
  Process {
    /// Bibcodes to process; defaults to the whole canonical list.
    #[arg(long = "bibcode", value_name = "BIBCODE")]
    bibcodes: Vec<String>,

    /// Skip writing metrics records.
    #[arg(long)]
    no_metrics: bool,
  },

  /// Print the output record for one bibcode.
  Show {
    bibcode: String,
  },
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match cli.command {
    Command::Import => commands::import(&cfg, &store).await,
    Command::Process { bibcodes, no_metrics } => {
      let bibcodes = bibcodes.into_iter().map(Bibcode::new).collect();
      let compute_metrics = cfg.compute_metrics && !no_metrics;
      commands::process(&cfg, &store, bibcodes, compute_metrics).await
    }
    Command::Show { bibcode } => commands::show(&cfg, &store, Bibcode::new(bibcode)).await,
  }
}
