//! Runtime configuration.
//!
//! Read from an optional TOML file, then overridden by `NONBIB_`-prefixed
//! environment variables (`NONBIB_STORE_PATH`, `NONBIB_BOOST__CAP`, ...).
//! Every key has a default, so an empty configuration is valid.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Datelike as _;
use nonbib_pipeline::{boost::LogBoost, metrics::MetricsConfig};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// SQLite file holding the imported sources.
  pub store_path:      PathBuf,
  /// Directory the declared source files are read from on import.
  pub data_root:       PathBuf,
  /// Canonical bibcode list, relative to `data_root`.
  pub canonical_file:  PathBuf,
  /// Directory `nonbib.jsonl` and `metrics.jsonl` are written to.
  pub output_dir:      PathBuf,
  /// Year citation rates are normalised against; defaults to the current
  /// UTC year.
  pub current_year:    Option<i32>,
  pub compute_metrics: bool,
  pub metrics:         MetricsConfig,
  pub boost:           LogBoost,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path:      PathBuf::from("nonbib.db"),
      data_root:       PathBuf::from("data"),
      canonical_file:  PathBuf::from("bibcodes.list.can"),
      output_dir:      PathBuf::from("out"),
      current_year:    None,
      compute_metrics: true,
      metrics:         MetricsConfig::default(),
      boost:           LogBoost::default(),
    }
  }
}

impl AppConfig {
  /// Layer the file at `path` (if it exists) under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("NONBIB")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise AppConfig")
  }

  pub fn current_year(&self) -> i32 {
    self.current_year.unwrap_or_else(|| chrono::Utc::now().year())
  }
}
