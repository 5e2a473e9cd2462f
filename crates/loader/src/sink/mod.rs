//! The data sink contract the loader writes through.
//!
//! A sink applies staged row inserts to storage under explicit transaction
//! control. The loader never builds statement text; dialect handling lives
//! entirely behind this trait.

pub mod memory;

use crate::values::ColumnValue;
use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemorySink;

/// One row, key first, in the table descriptor's column order.
pub type Row = Vec<ColumnValue>;

/// Errors reported by a data sink.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    /// The sink refused a staged operation, a batch or a commit.
    #[error("Sink rejected operation: {0}")]
    Rejected(String),

    /// The underlying connection failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The target table does not exist in the sink.
    #[error("Table '{0}' not found in sink")]
    TableNotFound(String),

    /// An operation needing a transaction was issued outside one.
    #[error("No open transaction")]
    NoTransaction,
}

/// Storage the loader populates.
///
/// Calls made by the loader for one batch always follow
/// `begin`, `stage_insert`*, `submit_batch`, `commit`, with `rollback`
/// replacing `commit` after any failure.
#[async_trait]
pub trait DataSink: Send {
    /// Open a transaction.
    async fn begin(&mut self) -> Result<(), SinkError>;

    /// Stage one row insert into `table` within the open transaction.
    async fn stage_insert(&mut self, table: &str, values: Row) -> Result<(), SinkError>;

    /// Submit every staged insert as one unit; returns the number accepted.
    async fn submit_batch(&mut self) -> Result<u64, SinkError>;

    /// Commit the open transaction.
    async fn commit(&mut self) -> Result<(), SinkError>;

    /// Discard the open transaction, including submitted but uncommitted rows.
    async fn rollback(&mut self) -> Result<(), SinkError>;

    /// Delete every row of `table` within the open transaction.
    ///
    /// Returns the number of rows deleted.
    async fn delete_all(&mut self, table: &str) -> Result<u64, SinkError>;
}

/// Boxed sinks forward, so a driver can hold `Box<dyn DataSink>`.
#[async_trait]
impl<S: DataSink + ?Sized> DataSink for Box<S> {
    async fn begin(&mut self) -> Result<(), SinkError> {
        (**self).begin().await
    }

    async fn stage_insert(&mut self, table: &str, values: Row) -> Result<(), SinkError> {
        (**self).stage_insert(table, values).await
    }

    async fn submit_batch(&mut self) -> Result<u64, SinkError> {
        (**self).submit_batch().await
    }

    async fn commit(&mut self) -> Result<(), SinkError> {
        (**self).commit().await
    }

    async fn rollback(&mut self) -> Result<(), SinkError> {
        (**self).rollback().await
    }

    async fn delete_all(&mut self, table: &str) -> Result<u64, SinkError> {
        (**self).delete_all(table).await
    }
}
