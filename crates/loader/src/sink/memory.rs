//! In-memory reference sink with real transaction semantics.
//!
//! Staged and submitted work stays invisible until `commit`; `rollback`
//! discards it. Fault injection hooks let tests fail a chosen batch or commit.

use super::{DataSink, Row, SinkError};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone)]
enum PendingOp {
    Insert { table: String, row: Row },
    DeleteAll { table: String },
}

/// Transactional in-memory table store.
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: BTreeMap<String, Vec<Row>>,
    in_transaction: bool,
    staged: Vec<PendingOp>,
    submitted: Vec<PendingOp>,
    /// Size of every accepted batch, in submission order.
    submissions: Vec<u64>,
    submit_calls: u64,
    commit_calls: u64,
    commits: u64,
    rollbacks: u64,
    fail_on_batch: Option<u64>,
    fail_on_commit: Option<u64>,
}

impl MemorySink {
    /// Create a sink with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink with the given (empty) tables.
    pub fn with_tables<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sink = Self::new();
        for name in names {
            sink.create_table(name);
        }
        sink
    }

    /// Create an empty table if it does not exist.
    pub fn create_table(&mut self, name: impl Into<String>) {
        self.tables.entry(name.into()).or_default();
    }

    /// Make the `n`-th call to `submit_batch` (1-based) fail.
    pub fn fail_on_batch(mut self, n: u64) -> Self {
        self.fail_on_batch = Some(n);
        self
    }

    /// Make the `n`-th call to `commit` (1-based) fail.
    pub fn fail_on_commit(mut self, n: u64) -> Self {
        self.fail_on_commit = Some(n);
        self
    }

    /// Clear any injected fault.
    pub fn clear_faults(&mut self) {
        self.fail_on_batch = None;
        self.fail_on_commit = None;
    }

    /// Committed rows of a table.
    pub fn rows(&self, table: &str) -> Option<&[Row]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    /// Number of committed rows in a table (0 if absent).
    pub fn row_count(&self, table: &str) -> u64 {
        self.tables.get(table).map_or(0, |rows| rows.len() as u64)
    }

    /// Sizes of accepted batches, in order.
    pub fn submissions(&self) -> &[u64] {
        &self.submissions
    }

    /// Number of `submit_batch` calls, including failed ones.
    pub fn submit_calls(&self) -> u64 {
        self.submit_calls
    }

    /// Number of successful commits.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    pub fn rollbacks(&self) -> u64 {
        self.rollbacks
    }

    /// Committed row count of every table.
    pub fn committed_counts(&self) -> HashMap<String, u64> {
        self.tables
            .iter()
            .map(|(name, rows)| (name.clone(), rows.len() as u64))
            .collect()
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn require_transaction(&self) -> Result<(), SinkError> {
        if self.in_transaction {
            Ok(())
        } else {
            Err(SinkError::NoTransaction)
        }
    }

    fn require_table(&self, table: &str) -> Result<(), SinkError> {
        if self.tables.contains_key(table) {
            Ok(())
        } else {
            Err(SinkError::TableNotFound(table.to_string()))
        }
    }

    /// Row count of `table` as seen from inside the open transaction.
    fn visible_row_count(&self, table: &str) -> u64 {
        let mut count = self.row_count(table);
        for op in &self.submitted {
            match op {
                PendingOp::Insert { table: t, .. } if t == table => count += 1,
                PendingOp::DeleteAll { table: t } if t == table => count = 0,
                _ => {}
            }
        }
        count
    }
}

#[async_trait]
impl DataSink for MemorySink {
    async fn begin(&mut self) -> Result<(), SinkError> {
        if self.in_transaction {
            return Err(SinkError::Rejected("transaction already open".to_string()));
        }
        self.in_transaction = true;
        self.staged.clear();
        self.submitted.clear();
        Ok(())
    }

    async fn stage_insert(&mut self, table: &str, values: Row) -> Result<(), SinkError> {
        self.require_transaction()?;
        self.require_table(table)?;
        self.staged.push(PendingOp::Insert {
            table: table.to_string(),
            row: values,
        });
        Ok(())
    }

    async fn submit_batch(&mut self) -> Result<u64, SinkError> {
        self.require_transaction()?;
        self.submit_calls += 1;
        if self.fail_on_batch == Some(self.submit_calls) {
            return Err(SinkError::Rejected(format!(
                "injected failure on batch {}",
                self.submit_calls
            )));
        }

        let accepted = self.staged.len() as u64;
        self.submitted.append(&mut self.staged);
        self.submissions.push(accepted);
        debug!("Memory sink accepted batch of {} rows", accepted);
        Ok(accepted)
    }

    async fn commit(&mut self) -> Result<(), SinkError> {
        self.require_transaction()?;
        self.commit_calls += 1;
        if self.fail_on_commit == Some(self.commit_calls) {
            return Err(SinkError::Rejected(format!(
                "injected failure on commit {}",
                self.commit_calls
            )));
        }

        // Staged but never submitted work does not survive the commit.
        self.staged.clear();
        for op in self.submitted.drain(..) {
            match op {
                PendingOp::Insert { table, row } => {
                    self.tables.entry(table).or_default().push(row);
                }
                PendingOp::DeleteAll { table } => {
                    if let Some(rows) = self.tables.get_mut(&table) {
                        rows.clear();
                    }
                }
            }
        }
        self.in_transaction = false;
        self.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), SinkError> {
        self.staged.clear();
        self.submitted.clear();
        self.in_transaction = false;
        self.rollbacks += 1;
        Ok(())
    }

    async fn delete_all(&mut self, table: &str) -> Result<u64, SinkError> {
        self.require_transaction()?;
        self.require_table(table)?;
        let deleted = self.visible_row_count(table);
        self.submitted.push(PendingOp::DeleteAll {
            table: table.to_string(),
        });
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ColumnValue;

    fn row(key: i64) -> Row {
        vec![ColumnValue::Int64(key), ColumnValue::Text("v".to_string())]
    }

    #[tokio::test]
    async fn test_commit_makes_rows_visible() {
        let mut sink = MemorySink::with_tables(["t"]);

        sink.begin().await.unwrap();
        sink.stage_insert("t", row(1)).await.unwrap();
        sink.stage_insert("t", row(2)).await.unwrap();
        assert_eq!(sink.row_count("t"), 0);

        assert_eq!(sink.submit_batch().await.unwrap(), 2);
        assert_eq!(sink.row_count("t"), 0);

        sink.commit().await.unwrap();
        assert_eq!(sink.row_count("t"), 2);
        assert_eq!(sink.submissions(), &[2]);
        assert_eq!(sink.commits(), 1);
        assert!(!sink.in_transaction());
    }

    #[tokio::test]
    async fn test_rollback_discards_submitted_rows() {
        let mut sink = MemorySink::with_tables(["t"]);

        sink.begin().await.unwrap();
        sink.stage_insert("t", row(1)).await.unwrap();
        sink.submit_batch().await.unwrap();
        sink.rollback().await.unwrap();

        assert_eq!(sink.row_count("t"), 0);
        assert_eq!(sink.rollbacks(), 1);
    }

    #[tokio::test]
    async fn test_operations_need_transaction() {
        let mut sink = MemorySink::with_tables(["t"]);
        assert_eq!(
            sink.stage_insert("t", row(1)).await,
            Err(SinkError::NoTransaction)
        );
        assert_eq!(sink.submit_batch().await, Err(SinkError::NoTransaction));
        assert_eq!(sink.commit().await, Err(SinkError::NoTransaction));
        assert_eq!(sink.delete_all("t").await, Err(SinkError::NoTransaction));
    }

    #[tokio::test]
    async fn test_unknown_table_rejected() {
        let mut sink = MemorySink::new();
        sink.begin().await.unwrap();
        assert_eq!(
            sink.stage_insert("missing", row(1)).await,
            Err(SinkError::TableNotFound("missing".to_string()))
        );
    }

    #[tokio::test]
    async fn test_nested_begin_rejected() {
        let mut sink = MemorySink::new();
        sink.begin().await.unwrap();
        assert!(matches!(sink.begin().await, Err(SinkError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_delete_all_applies_on_commit() {
        let mut sink = MemorySink::with_tables(["t"]);
        sink.begin().await.unwrap();
        sink.stage_insert("t", row(1)).await.unwrap();
        sink.submit_batch().await.unwrap();
        sink.commit().await.unwrap();

        sink.begin().await.unwrap();
        assert_eq!(sink.delete_all("t").await.unwrap(), 1);
        assert_eq!(sink.row_count("t"), 1);
        sink.commit().await.unwrap();
        assert_eq!(sink.row_count("t"), 0);
    }

    #[tokio::test]
    async fn test_injected_batch_failure() {
        let mut sink = MemorySink::with_tables(["t"]).fail_on_batch(2);

        for expected in [Ok(1), Err(()), Ok(1)] {
            sink.begin().await.unwrap();
            sink.stage_insert("t", row(1)).await.unwrap();
            match (sink.submit_batch().await, expected) {
                (Ok(n), Ok(e)) => {
                    assert_eq!(n, e);
                    sink.commit().await.unwrap();
                }
                (Err(SinkError::Rejected(_)), Err(())) => sink.rollback().await.unwrap(),
                (got, want) => panic!("unexpected {got:?}, wanted {want:?}"),
            }
        }
        assert_eq!(sink.row_count("t"), 2);
        assert_eq!(sink.submit_calls(), 3);
        assert_eq!(sink.committed_counts().get("t"), Some(&2));
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut sink: Box<MemorySink> = Box::new(MemorySink::with_tables(["t"]));
        tokio_test::block_on(async {
            sink.begin().await.unwrap();
            sink.stage_insert("t", row(9)).await.unwrap();
            sink.submit_batch().await.unwrap();
            sink.commit().await.unwrap();
        });
        assert_eq!(sink.row_count("t"), 1);
    }
}
