//! Result set types shared by every session implementation.

use std::fmt;
use std::time::Duration;

/// Columns and rows returned by one statement.
///
/// Built once per execution and never mutated afterwards. Every row holds
/// exactly `columns.len()` values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Result columns, in database order.
    pub columns: Vec<ColumnInfo>,

    /// Rows, in the order the database returned them.
    pub rows: Vec<Row>,

    /// Wall-clock time spent fetching.
    pub execution_time: Duration,

    pub row_count: usize,
}

impl QueryResult {
    /// The empty result: no columns, no rows.
    ///
    /// Statements without a result set and failed statements both end up here.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps fetched columns and rows.
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self {
            row_count: rows.len(),
            columns,
            rows,
            execution_time: Duration::ZERO,
        }
    }

    pub fn with_execution_time(mut self, elapsed: Duration) -> Self {
        self.execution_time = elapsed;
        self
    }

    /// True when there are no rows to print.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names, as printed in the table header.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// A result column: its name and the database type name (`INT4`, `NUMERIC`...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// One result row, aligned with `QueryResult::columns`.
pub type Row = Vec<Value>;

/// A single cell.
///
/// `NUMERIC`, dates, times, UUIDs and JSON arrive as `String` in their
/// PostgreSQL text form.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text shown in a table cell. Only SQL NULL prints as `NULL`.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
