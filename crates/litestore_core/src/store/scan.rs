//! Row marshaling for read statements.

use crate::db::{StoreError, StoreResult};
use crate::model::row::RecordSet;
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection, Statement};
use std::sync::Arc;

/// Runs every statement of `sql` in order and returns the rows of the last
/// one, decoding each column with `decode`.
///
/// Each statement runs before the next is prepared, so later statements see
/// schema changes made by earlier ones. Text with no statement at all
/// (blank or comments only) yields an empty set with no columns.
///
/// Prepare/start failures map to `QueryExecute`; step and column access
/// failures map to `RowScan`.
pub(super) fn collect<V>(
    conn: &Connection,
    sql: &str,
    decode: impl Fn(ValueRef<'_>) -> V,
) -> StoreResult<RecordSet<V>> {
    let mut batch = Batch::new(conn, sql);
    let mut last = RecordSet::new(Arc::from(Vec::new()));

    while let Some(mut stmt) = batch
        .next()
        .map_err(|source| StoreError::QueryExecute { source })?
    {
        last = collect_statement(&mut stmt, &decode)?;
    }

    Ok(last)
}

fn collect_statement<V>(
    stmt: &mut Statement<'_>,
    decode: &impl Fn(ValueRef<'_>) -> V,
) -> StoreResult<RecordSet<V>> {
    let columns: Arc<[String]> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let column_count = columns.len();
    let mut set = RecordSet::new(columns);

    let mut rows = stmt
        .query([])
        .map_err(|source| StoreError::QueryExecute { source })?;

    while let Some(row) = rows
        .next()
        .map_err(|source| StoreError::RowScan { source })?
    {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            let value = row
                .get_ref(index)
                .map_err(|source| StoreError::RowScan { source })?;
            values.push(decode(value));
        }
        set.push_values(values);
    }

    Ok(set)
}
