//! Result-row model returned by store queries.
//!
//! # Responsibility
//! - Define the text row shape (`Row`/`RowSet`) and its typed counterpart.
//! - Define how engine values are rendered to text.
//!
//! # Invariants
//! - Every row of a set shares the set's column list, in discovery order.
//! - SQL NULL renders as the text `null` in text rows only; typed rows keep
//!   it as `ColumnValue::Null`.

pub mod row;
pub mod value;
