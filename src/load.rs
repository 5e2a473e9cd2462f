//! The `load` command: reset and populate one table.

use anyhow::Context;
use oltp_loader::{BatchedLoader, Catalog, CommonLoadArgs, LoaderConfig, MemorySink};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// What a load did, or would do in dry-run mode.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub table: String,
    pub record_count: u64,
    pub commit_count: usize,
    pub planned_batches: u64,
    pub key_distribution: String,
    pub dry_run: bool,
    /// Rows removed by the unload that precedes the load.
    pub deleted_rows: u64,
    pub rows_inserted: u64,
    pub batches: u64,
    pub total_seconds: f64,
    pub rows_per_second: f64,
    pub table_counts: BTreeMap<String, u64>,
}

impl LoadReport {
    fn planned(config: &LoaderConfig, key_distribution: &str) -> Self {
        Self {
            table: config.table.clone(),
            record_count: config.record_count(),
            commit_count: config.commit_count,
            planned_batches: config.batch_count(),
            key_distribution: key_distribution.to_string(),
            dry_run: true,
            deleted_rows: 0,
            rows_inserted: 0,
            batches: 0,
            total_seconds: 0.0,
            rows_per_second: 0.0,
            table_counts: BTreeMap::new(),
        }
    }
}

/// Unload every catalog table, then load the configured one into the
/// in-memory sink.
///
/// Setting `stop` ends the load after the batch in flight.
pub async fn run_load(args: &CommonLoadArgs, stop: Arc<AtomicBool>) -> anyhow::Result<LoadReport> {
    let catalog = Catalog::from_file(&args.catalog)
        .with_context(|| format!("Failed to load catalog from {:?}", args.catalog))?;
    let config = args
        .loader_config()
        .context("Invalid loader configuration")?;

    let loader = BatchedLoader::new(config.clone(), &catalog)
        .with_context(|| format!("Failed to prepare loader for table '{}'", config.table))?;
    let key_distribution = loader.key_generator().name();
    let mut report = LoadReport::planned(&config, key_distribution);

    tracing::info!(
        "Loading {} records into '{}' (seed={}, keys={})",
        report.record_count,
        config.table,
        config.seed,
        key_distribution
    );

    if args.dry_run {
        tracing::info!("Running in dry-run mode - no data will be written");
        return Ok(report);
    }

    let mut loader = loader.with_stop_flag(stop);
    let mut sink = MemorySink::with_tables(catalog.table_names());

    report.deleted_rows = loader
        .unload(&mut sink, &catalog)
        .await
        .context("Failed to unload catalog tables")?;

    let metrics = loader
        .load(&mut sink)
        .await
        .with_context(|| format!("Failed to load table '{}'", config.table))?;

    report.dry_run = false;
    report.rows_inserted = metrics.rows_inserted;
    report.batches = metrics.batch_count;
    report.total_seconds = metrics.total_duration.as_secs_f64();
    report.rows_per_second = metrics.rows_per_second();
    report.table_counts = loader.table_counts().clone();
    Ok(report)
}
