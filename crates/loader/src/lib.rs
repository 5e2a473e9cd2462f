//! Batched, transactional table loader for OLTP benchmarks.
//!
//! The loader populates one table of a benchmark database: it draws a key
//! per row from an [`IntegerGenerator`](oltp_distributions::IntegerGenerator),
//! fills the non-key columns with random values and hands the rows to a
//! [`DataSink`] in committed batches of `commit_count` rows.
//!
//! # Example
//!
//! ```rust
//! use oltp_loader::{BatchedLoader, Catalog, LoaderConfig, MemorySink};
//!
//! # tokio_test::block_on(async {
//! let catalog = Catalog::from_yaml(r#"
//! tables:
//!   - name: usertable
//!     key: { name: ycsb_key, type: int }
//!     columns:
//!       - { name: field1, type: text }
//! "#).unwrap();
//!
//! let config = LoaderConfig::new("usertable", 2500).with_commit_count(1000);
//! let mut loader = BatchedLoader::new(config, &catalog).unwrap();
//! let mut sink = MemorySink::with_tables(catalog.table_names());
//!
//! let metrics = loader.load(&mut sink).await.unwrap();
//! assert_eq!(metrics.rows_inserted, 2500);
//! assert_eq!(sink.submissions(), &[1000, 1000, 500]);
//! # });
//! ```

pub mod args;
pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod sink;
pub mod values;

// Re-exports for convenience
pub use args::CommonLoadArgs;
pub use catalog::{Catalog, CatalogError, ColumnDescriptor, ColumnType, TableCatalog, TableDescriptor};
pub use config::{KeyDistribution, LoaderConfig};
pub use error::LoaderError;
pub use loader::{BatchedLoader, LoadMetrics};
pub use sink::{DataSink, MemorySink, Row, SinkError};
pub use values::{generate_column_value, ColumnValue};
