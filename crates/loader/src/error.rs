//! Error types for the batched loader.

use crate::catalog::CatalogError;
use crate::sink::SinkError;
use oltp_distributions::DistributionError;
use thiserror::Error;

/// Errors that can occur while loading or unloading a table.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Invalid loader configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reading a configuration file.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a configuration file.
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Catalog lookup error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Key generator could not be built.
    #[error("Distribution error: {0}")]
    Distribution(#[from] DistributionError),

    /// The sink failed a batch; earlier batches stay committed.
    #[error("Sink error on table '{table}' after {committed_rows} committed rows: {source}")]
    Sink {
        table: String,
        /// Rows of this table committed before the failing batch, counting
        /// any skipped start index. Pass this to `with_start_index` to resume.
        committed_rows: u64,
        #[source]
        source: SinkError,
    },

    /// The load was stopped between batches.
    #[error("Load of table '{table}' aborted after {committed_rows} committed rows")]
    Aborted { table: String, committed_rows: u64 },
}

impl LoaderError {
    /// Rows known to be committed when the error was raised, if applicable.
    pub fn committed_rows(&self) -> Option<u64> {
        match self {
            LoaderError::Sink { committed_rows, .. }
            | LoaderError::Aborted { committed_rows, .. } => Some(*committed_rows),
            _ => None,
        }
    }
}
