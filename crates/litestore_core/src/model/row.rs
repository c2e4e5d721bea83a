//! Query result rows.
//!
//! # Responsibility
//! - Hold one result tuple keyed by column name.
//! - Keep column discovery order for iteration and serialization.
//!
//! # Invariants
//! - A record's values align index-for-index with its column list.
//! - All records of a [`RecordSet`] share the set's column list.

use super::value::ColumnValue;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Text row: column name -> rendered text, SQL NULL as `"null"`.
pub type Row = Record<String>;
/// Ordered text rows of one query.
pub type RowSet = RecordSet<String>;
/// Typed row: column name -> [`ColumnValue`].
pub type TypedRow = Record<ColumnValue>;
/// Ordered typed rows of one query.
pub type TypedRowSet = RecordSet<ColumnValue>;

/// One result tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<V> {
    columns: Arc<[String]>,
    values: Vec<V>,
}

impl<V> Record<V> {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<V>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Returns the value of `column`.
    ///
    /// When a statement yields the same column name twice, the last one
    /// wins, as it would in a plain map.
    pub fn get(&self, column: &str) -> Option<&V> {
        self.columns
            .iter()
            .rposition(|name| name == column)
            .map(|index| &self.values[index])
    }

    pub fn get_index(&self, index: usize) -> Option<&V> {
        self.values.get(index)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn into_values(self) -> Vec<V> {
        self.values
    }
}

impl<V: Clone> Record<V> {
    /// Copies the record into an unordered map.
    pub fn to_map(&self) -> HashMap<String, V> {
        self.iter()
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect()
    }
}

impl Record<String> {
    /// Returns the text of `column` as `&str`.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).map(String::as_str)
    }
}

impl Record<ColumnValue> {
    /// Renders every value to its text form.
    pub fn render(&self) -> Row {
        Record::new(
            Arc::clone(&self.columns),
            self.values.iter().map(ColumnValue::render).collect(),
        )
    }
}

impl<V: Serialize> Serialize for Record<V> {
    /// Writes a map in column order. A repeated column name is written once,
    /// with its last value, matching [`Record::get`].
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kept: Vec<usize> = (0..self.columns.len())
            .filter(|&index| !self.columns[index + 1..].contains(&self.columns[index]))
            .collect();
        let mut map = serializer.serialize_map(Some(kept.len()))?;
        for index in kept {
            map.serialize_entry(&self.columns[index], &self.values[index])?;
        }
        map.end()
    }
}

/// Ordered rows of one query, in engine iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet<V> {
    columns: Arc<[String]>,
    rows: Vec<Record<V>>,
}

impl<V> RecordSet<V> {
    pub(crate) fn new(columns: Arc<[String]>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends one row of values in column order.
    pub(crate) fn push_values(&mut self, values: Vec<V>) {
        let record = Record::new(Arc::clone(&self.columns), values);
        self.rows.push(record);
    }

    /// Column names of the statement, known even when no row matched.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record<V>] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Record<V>> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record<V>> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<Record<V>> {
        self.rows
    }
}

impl RecordSet<ColumnValue> {
    /// Renders every row to its text form.
    pub fn render(&self) -> RowSet {
        RecordSet {
            columns: Arc::clone(&self.columns),
            rows: self.rows.iter().map(Record::render).collect(),
        }
    }
}

impl<V> IntoIterator for RecordSet<V> {
    type Item = Record<V>;
    type IntoIter = std::vec::IntoIter<Record<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a RecordSet<V> {
    type Item = &'a Record<V>;
    type IntoIter = std::slice::Iter<'a, Record<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<V: Serialize> Serialize for RecordSet<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.iter())
    }
}
