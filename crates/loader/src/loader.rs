//! Batched, transactional table loader.
//!
//! One load draws `record_count` keys from a key generator, fills the
//! remaining columns with random values and stages the rows in fixed-size
//! batches. Each batch runs in its own sink transaction:
//!
//! ```text
//! begin ─▶ stage_insert × N ─▶ submit_batch ─▶ commit
//!   │            │                  │            │
//!   └────────────┴──── failure ─────┴────────────┴─▶ rollback, stop
//! ```
//!
//! A failed batch is rolled back and ends the load. Batches committed
//! before it stay committed; the error reports how many rows that is.

use crate::catalog::{CatalogError, TableCatalog, TableDescriptor};
use crate::config::LoaderConfig;
use crate::error::LoaderError;
use crate::sink::{DataSink, Row, SinkError};
use crate::values::{generate_column_value, ColumnValue};
use oltp_distributions::{IntegerGenerator, KeyGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Metrics from a load operation.
#[derive(Debug, Clone, Default)]
pub struct LoadMetrics {
    /// Number of rows committed.
    pub rows_inserted: u64,
    /// Number of batches committed.
    pub batch_count: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating keys and values.
    pub generation_duration: Duration,
    /// Time spent in the sink (staging, submitting, committing).
    pub insert_duration: Duration,
}

impl LoadMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_inserted as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Populates one table through a [`DataSink`] in committed batches.
///
/// Keys and values are both drawn from one random source. By default it is
/// seeded from `config.seed`; a run loading several tables passes its shared
/// source in with [`with_rng`](Self::with_rng) and takes it back with
/// [`into_rng`](Self::into_rng) so every table continues the same stream.
pub struct BatchedLoader<G: IntegerGenerator = KeyGenerator> {
    config: LoaderConfig,
    table: TableDescriptor,
    keys: G,
    rng: StdRng,
    start_index: u64,
    stop: Option<Arc<AtomicBool>>,
    table_counts: BTreeMap<String, u64>,
}

impl BatchedLoader<KeyGenerator> {
    /// Create a loader whose key generator comes from the configuration.
    pub fn new<C: TableCatalog + ?Sized>(
        config: LoaderConfig,
        catalog: &C,
    ) -> Result<Self, LoaderError> {
        config.validate()?;
        let keys = config.key_distribution.build(config.record_count())?;
        Self::with_key_generator(config, catalog, keys)
    }

    /// Skip the first `index` records, e.g. to retry after a failed batch.
    ///
    /// Sequential keys continue from `start + index`. The random source is
    /// re-seeded from the configured seed and `index`, so resuming at the
    /// same index always produces the same rows.
    pub fn with_start_index(mut self, index: u64) -> Self {
        if let KeyGenerator::Counter(counter) = &mut self.keys {
            *counter = oltp_distributions::CounterGenerator::new(counter.start());
            counter.skip(index);
        }
        self.start_index = index;
        self.rng = StdRng::seed_from_u64(rng_seed_for_index(self.config.seed, index));
        self
    }
}

impl<G: IntegerGenerator> BatchedLoader<G> {
    /// Create a loader with an explicit key generator.
    pub fn with_key_generator<C: TableCatalog + ?Sized>(
        config: LoaderConfig,
        catalog: &C,
        keys: G,
    ) -> Result<Self, LoaderError> {
        config.validate()?;
        let table = catalog
            .table(&config.table)
            .cloned()
            .ok_or_else(|| CatalogError::TableNotFound(config.table.clone()))?;
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            table,
            keys,
            rng,
            start_index: 0,
            stop: None,
            table_counts: BTreeMap::new(),
        })
    }

    /// Draw from `rng` instead of a source seeded from the configuration.
    ///
    /// `with_start_index` re-seeds the source, so call it first.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Hand the random source back, advanced past every row drawn so far.
    pub fn into_rng(self) -> StdRng {
        self.rng
    }

    /// Stop between batches once `flag` is set.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    /// Rows a full load inserts.
    pub fn record_count(&self) -> u64 {
        self.config.record_count()
    }

    /// Rows loaded per table. Only changes during `load` and `unload`.
    pub fn table_counts(&self) -> &BTreeMap<String, u64> {
        &self.table_counts
    }

    /// The table being loaded.
    pub fn table(&self) -> &TableDescriptor {
        &self.table
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn key_generator(&self) -> &G {
        &self.keys
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Draw one key and fill every non-key column.
    fn next_row(&mut self) -> Row {
        let key = self.keys.next_rank(&mut self.rng);
        let mut row = Vec::with_capacity(self.table.width());
        row.push(ColumnValue::from_key(key, &self.table.key.column_type));
        for column in &self.table.columns {
            row.push(generate_column_value(&column.column_type, &mut self.rng));
        }
        row
    }

    /// Populate the table.
    ///
    /// Returns metrics for this call. On a sink failure the failing batch is
    /// rolled back and [`LoaderError::Sink`] reports the rows committed so far.
    pub async fn load<S: DataSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<LoadMetrics, LoaderError> {
        let start_time = Instant::now();
        let mut metrics = LoadMetrics::default();
        let record_count = self.record_count();
        let commit_count = self.config.commit_count;
        let table_name = self.table.name.clone();

        info!(
            "Loading table '{}' with {} records (commit count: {}, start index: {})",
            table_name, record_count, commit_count, self.start_index
        );

        let capacity = commit_count.min(record_count.saturating_sub(self.start_index) as usize);
        let mut batch: Vec<Row> = Vec::with_capacity(capacity);
        let mut committed = self.start_index;

        for _ in self.start_index..record_count {
            if batch.is_empty() && self.stop_requested() {
                info!(
                    "Load of '{}' stopped after {} / {} records",
                    table_name, committed, record_count
                );
                return Err(LoaderError::Aborted {
                    table: table_name,
                    committed_rows: committed,
                });
            }

            let gen_start = Instant::now();
            let row = self.next_row();
            metrics.generation_duration += gen_start.elapsed();
            batch.push(row);

            if batch.len() >= commit_count {
                committed += self.flush(sink, &mut batch, committed, &mut metrics).await?;
                debug!("Records loaded {} / {}", committed, record_count);
            }
        }

        if !batch.is_empty() {
            committed += self.flush(sink, &mut batch, committed, &mut metrics).await?;
            debug!("Records loaded {} / {}", committed, record_count);
        }

        metrics.total_duration = start_time.elapsed();

        info!(
            "Finished loading '{}': {} rows in {} batches, {:?} ({:.2} rows/sec)",
            table_name,
            metrics.rows_inserted,
            metrics.batch_count,
            metrics.total_duration,
            metrics.rows_per_second()
        );
        if !self.table_counts.is_empty() {
            info!("Table counts: {:?}", self.table_counts);
        }

        Ok(metrics)
    }

    /// Run one batch as its own transaction and record it.
    async fn flush<S: DataSink + ?Sized>(
        &mut self,
        sink: &mut S,
        batch: &mut Vec<Row>,
        committed: u64,
        metrics: &mut LoadMetrics,
    ) -> Result<u64, LoaderError> {
        let insert_start = Instant::now();
        let size = batch.len() as u64;
        let rows = std::mem::take(batch);

        match submit_batch(sink, &self.table.name, rows).await {
            Ok(accepted) => {
                metrics.insert_duration += insert_start.elapsed();
                metrics.rows_inserted += accepted;
                metrics.batch_count += 1;
                *self.table_counts.entry(self.table.name.clone()).or_insert(0) += accepted;
                Ok(accepted)
            }
            Err(source) => {
                warn!(
                    "Batch of {} rows for '{}' failed after {} committed rows, rolling back: {}",
                    size, self.table.name, committed, source
                );
                if let Err(e) = sink.rollback().await {
                    warn!("Rollback failed: {}", e);
                }
                Err(LoaderError::Sink {
                    table: self.table.name.clone(),
                    committed_rows: committed,
                    source,
                })
            }
        }
    }

    /// Delete every row of every catalog table in one transaction.
    ///
    /// Resets the table counts of those tables and returns the number of
    /// rows deleted. Does not touch the key generator.
    pub async fn unload<S, C>(&mut self, sink: &mut S, catalog: &C) -> Result<u64, LoaderError>
    where
        S: DataSink + ?Sized,
        C: TableCatalog + ?Sized,
    {
        let mut deleted = 0;
        let mut current = String::new();

        let result: Result<(), SinkError> = async {
            sink.begin().await?;
            for table in catalog.tables() {
                current = table.name.clone();
                let n = sink.delete_all(&table.name).await?;
                debug!("Deleting {} rows from '{}'", n, table.name);
                deleted += n;
            }
            sink.commit().await
        }
        .await;

        if let Err(source) = result {
            warn!("Unload failed on '{}', rolling back: {}", current, source);
            if let Err(e) = sink.rollback().await {
                warn!("Rollback failed: {}", e);
            }
            return Err(LoaderError::Sink {
                table: current,
                committed_rows: 0,
                source,
            });
        }

        for table in catalog.tables() {
            self.table_counts.remove(&table.name);
        }
        info!(
            "Unloaded {} tables ({} rows deleted)",
            catalog.tables().len(),
            deleted
        );
        Ok(deleted)
    }
}

/// Stage, submit and commit one batch.
///
/// Any error leaves the transaction open for the caller to roll back.
async fn submit_batch<S: DataSink + ?Sized>(
    sink: &mut S,
    table: &str,
    rows: Vec<Row>,
) -> Result<u64, SinkError> {
    let staged = rows.len() as u64;
    sink.begin().await?;
    for row in rows {
        sink.stage_insert(table, row).await?;
    }
    let accepted = sink.submit_batch().await?;
    if accepted != staged {
        return Err(SinkError::Rejected(format!(
            "sink accepted {accepted} of {staged} staged rows"
        )));
    }
    sink.commit().await?;
    Ok(accepted)
}

/// Seed for resuming at `index`.
fn rng_seed_for_index(seed: u64, index: u64) -> u64 {
    seed.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15))
}
