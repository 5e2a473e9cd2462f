//! Common CLI argument definitions for load commands.

use crate::config::LoaderConfig;
use crate::error::LoaderError;
use clap::Args;
use std::path::PathBuf;

/// Arguments shared by every command that loads a table.
///
/// Values given on the command line override the ones read from `--config`.
#[derive(Args, Clone, Debug, Default)]
pub struct CommonLoadArgs {
    /// Path to loader configuration YAML file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Path to catalog YAML file
    #[arg(long)]
    pub catalog: PathBuf,

    /// Table to load (required without --config)
    #[arg(long)]
    pub table: Option<String>,

    /// Record count before scaling (required without --config)
    #[arg(long)]
    pub record_count: Option<u64>,

    /// Multiplier applied to the record count
    #[arg(long)]
    pub scale_factor: Option<f64>,

    /// Rows per committed batch
    #[arg(long)]
    pub commit_count: Option<usize>,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, env = "OLTP_BENCH_SEED")]
    pub seed: Option<u64>,

    /// Dry-run mode: validate catalog and configuration without loading
    #[arg(long)]
    pub dry_run: bool,
}

impl CommonLoadArgs {
    /// Build the effective loader configuration.
    pub fn loader_config(&self) -> Result<LoaderConfig, LoaderError> {
        let base = match &self.config {
            Some(path) => LoaderConfig::from_file(path)?,
            None => {
                let table = self.table.clone().ok_or_else(|| {
                    LoaderError::Config("--table is required without --config".to_string())
                })?;
                let record_count = self.record_count.ok_or_else(|| {
                    LoaderError::Config("--record-count is required without --config".to_string())
                })?;
                LoaderConfig::new(table, record_count)
            }
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    /// Override `config` with every value set on the command line.
    pub fn apply(&self, mut config: LoaderConfig) -> LoaderConfig {
        if let Some(table) = &self.table {
            config.table = table.clone();
        }
        if let Some(record_count) = self.record_count {
            config.base_record_count = record_count;
        }
        if let Some(scale_factor) = self.scale_factor {
            config.scale_factor = scale_factor;
        }
        if let Some(commit_count) = self.commit_count {
            config.commit_count = commit_count;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config
    }
}
