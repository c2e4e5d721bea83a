//! Single-connection data store facade.
//!
//! # Responsibility
//! - Own one SQLite connection for the lifetime of the store.
//! - Run raw read statements and marshal their rows.
//! - Run raw write/DDL statements and report change statistics.
//!
//! # Invariants
//! - Failures are logged and returned, never turned into process exits.
//! - Zero matching rows is an empty set, not an error.
//! - Statement text is not logged verbatim at `info` or above.

mod scan;

use crate::db::{open_connection, StoreConfig, StoreError, StoreLocation, StoreResult};
use crate::model::row::{RecordSet, RowSet, TypedRowSet};
use crate::model::value::{render_value_ref, ColumnValue};
use log::{debug, error, info};
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Statistics of a successful [`DataStore::execute`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecSummary {
    /// Rows inserted, updated or deleted by the whole statement batch.
    pub rows_affected: u64,
    /// Rowid of the most recent successful insert on this connection.
    pub last_insert_rowid: i64,
}

/// Facade over one embedded SQLite connection.
///
/// `DataStore` is `Send` but not `Sync`; share it behind a mutex.
#[derive(Debug)]
pub struct DataStore {
    conn: Connection,
    location: StoreLocation,
}

impl DataStore {
    /// Opens a store as described by `config`.
    ///
    /// # Errors
    /// - `StoreError::Truncate` when `truncate_on_open` is set and the old
    ///   file cannot be removed.
    /// - `StoreError::Open` when the engine cannot open or configure the
    ///   connection.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let conn = open_connection(config)?;
        Ok(Self {
            conn,
            location: config.location.clone(),
        })
    }

    /// Opens a file-backed store with default options, keeping any
    /// existing data.
    pub fn open_path(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open(&StoreConfig::file(path))
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(&StoreConfig::in_memory())
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Database file path, or `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.location.path()
    }

    pub fn is_in_memory(&self) -> bool {
        matches!(self.location, StoreLocation::Memory)
    }

    /// Runs a read statement and renders every column to text.
    ///
    /// SQL NULL becomes the text `"null"`. Use [`Self::query_typed`] when
    /// NULL must be told apart from the string `'null'`.
    ///
    /// # Errors
    /// - `StoreError::QueryExecute` when the statement cannot be prepared
    ///   or started.
    /// - `StoreError::RowScan` when a row cannot be stepped or decoded.
    pub fn query(&self, sql: &str) -> StoreResult<RowSet> {
        self.observe_query(sql, || scan::collect(&self.conn, sql, render_value_ref))
    }

    /// Runs a read statement and keeps engine values typed.
    pub fn query_typed(&self, sql: &str) -> StoreResult<TypedRowSet> {
        self.observe_query(sql, || {
            scan::collect(&self.conn, sql, |value| ColumnValue::from(value))
        })
    }

    /// Runs one or more statements that return no rows.
    ///
    /// `;`-separated batches run in order with no transactional wrapping;
    /// a failing statement stops the batch and earlier ones stay applied.
    /// A statement that fails to compile changes nothing.
    ///
    /// # Errors
    /// - `StoreError::Execute` carrying the engine error unchanged.
    pub fn execute(&self, sql: &str) -> StoreResult<ExecSummary> {
        let started_at = Instant::now();
        let keyword = leading_keyword(sql);

        let result = total_changes(&self.conn)
            .and_then(|before| {
                self.conn.execute_batch(sql)?;
                let after = total_changes(&self.conn)?;
                Ok(ExecSummary {
                    rows_affected: after.saturating_sub(before),
                    last_insert_rowid: self.conn.last_insert_rowid(),
                })
            })
            .map_err(|source| StoreError::Execute { source });

        match &result {
            Ok(summary) => debug!(
                "event=store_execute module=store status=ok keyword={} sql_len={} rows_affected={} duration_ms={}",
                keyword,
                sql.len(),
                summary.rows_affected,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_execute module=store status=error keyword={} sql_len={} duration_ms={} error_code={} error={}",
                keyword,
                sql.len(),
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result
    }

    /// Closes the connection, reporting any engine error.
    ///
    /// Dropping the store also closes it, but silently.
    pub fn close(self) -> StoreResult<()> {
        let mode = self.location.mode();
        match self.conn.close() {
            Ok(()) => {
                info!("event=store_close module=store status=ok mode={mode}");
                Ok(())
            }
            Err((_conn, source)) => {
                let err = StoreError::Close { source };
                error!(
                    "event=store_close module=store status=error mode={} error_code={} error={}",
                    mode,
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn observe_query<V>(
        &self,
        sql: &str,
        run: impl FnOnce() -> StoreResult<RecordSet<V>>,
    ) -> StoreResult<RecordSet<V>> {
        let started_at = Instant::now();
        let keyword = leading_keyword(sql);
        let result = run();
        match &result {
            Ok(rows) => debug!(
                "event=store_query module=store status=ok keyword={} sql_len={} rows={} duration_ms={}",
                keyword,
                sql.len(),
                rows.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_query module=store status=error keyword={} sql_len={} duration_ms={} error_code={} error={}",
                keyword,
                sql.len(),
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result
    }
}

fn total_changes(conn: &Connection) -> rusqlite::Result<u64> {
    let total: i64 = conn.query_row("SELECT total_changes();", [], |row| row.get(0))?;
    Ok(u64::try_from(total).unwrap_or(0))
}

/// Upper-cased first word of a statement, for log events.
fn leading_keyword(sql: &str) -> String {
    sql.split(|c: char| c.is_whitespace() || c == '(' || c == ';')
        .find(|word| !word.is_empty())
        .map(str::to_ascii_uppercase)
        .unwrap_or_else(|| "EMPTY".to_string())
}

#[cfg(test)]
mod tests {
    use super::leading_keyword;

    #[test]
    fn leading_keyword_skips_whitespace_and_uppercases() {
        assert_eq!(leading_keyword("  select a from t"), "SELECT");
        assert_eq!(leading_keyword("\ninsert into t values (1)"), "INSERT");
        assert_eq!(leading_keyword("WITH(x) AS"), "WITH");
    }

    #[test]
    fn leading_keyword_handles_blank_input() {
        assert_eq!(leading_keyword(""), "EMPTY");
        assert_eq!(leading_keyword(" ; "), "EMPTY");
    }
}
