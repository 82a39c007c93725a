//! Core types for ZQLZ

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use crate::Result;

/// A database value that can represent any SQL type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// 8-bit signed integer
    Int8(i8),
    /// 16-bit signed integer
    Int16(i16),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit unsigned integer (MySQL `BIGINT UNSIGNED`)
    UInt64(u64),
    /// 32-bit floating point
    Float32(f32),
    /// 64-bit floating point
    Float64(f64),
    /// Decimal/Numeric (stored as string for precision)
    Decimal(String),
    /// UTF-8 string
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// UUID
    Uuid(Uuid),
    /// Date (year, month, day)
    Date(NaiveDate),
    /// Time (hour, minute, second, nanosecond)
    Time(NaiveTime),
    /// DateTime without timezone
    DateTime(NaiveDateTime),
    /// DateTime with timezone (UTC)
    DateTimeUtc(DateTime<Utc>),
    /// JSON value
    Json(serde_json::Value),
}

impl Value {
    /// Check if the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(v) => Some(*v as i64),
            Value::Int16(v) => Some(*v as i64),
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            Value::UInt64(v) => i64::try_from(*v).ok(),
            Value::String(s) => s.parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Raw bytes of the value as the server would send them over the text protocol
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Value::Bytes(bytes) => Cow::Borrowed(bytes.as_slice()),
            Value::String(s) => Cow::Borrowed(s.as_bytes()),
            other => match other.to_sql_text() {
                Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                Cow::Owned(s) => Cow::Owned(s.into_bytes()),
            },
        }
    }

    /// Binary data that has no UTF-8 text form.
    ///
    /// Such values must be written as hex literals; [`Value::to_sql_text`]
    /// would replace the invalid sequences.
    pub fn non_utf8_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) if std::str::from_utf8(bytes).is_err() => Some(bytes),
            _ => None,
        }
    }

    /// Textual form of the value as MySQL renders it in a result set.
    ///
    /// Booleans are `1`/`0` and temporal values use the `YYYY-MM-DD hh:mm:ss`
    /// layout. Binary data that is not valid UTF-8 is converted lossily.
    pub fn to_sql_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed("NULL"),
            Value::Bool(true) => Cow::Borrowed("1"),
            Value::Bool(false) => Cow::Borrowed("0"),
            Value::Int8(v) => Cow::Owned(v.to_string()),
            Value::Int16(v) => Cow::Owned(v.to_string()),
            Value::Int32(v) => Cow::Owned(v.to_string()),
            Value::Int64(v) => Cow::Owned(v.to_string()),
            Value::UInt64(v) => Cow::Owned(v.to_string()),
            Value::Float32(v) => Cow::Owned(v.to_string()),
            Value::Float64(v) => Cow::Owned(v.to_string()),
            Value::Decimal(v) | Value::String(v) => Cow::Borrowed(v.as_str()),
            Value::Bytes(v) => String::from_utf8_lossy(v),
            Value::Uuid(v) => Cow::Owned(v.to_string()),
            Value::Date(v) => Cow::Owned(v.format("%Y-%m-%d").to_string()),
            Value::Time(v) => Cow::Owned(v.format("%H:%M:%S%.f").to_string()),
            Value::DateTime(v) => Cow::Owned(v.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            Value::DateTimeUtc(v) => Cow::Owned(v.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            Value::Json(v) => Cow::Owned(v.to_string()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            other => f.write_str(&other.to_sql_text()),
        }
    }
}

/// A row from a query result
#[derive(Debug, Clone)]
pub struct Row {
    /// Column values
    pub values: Vec<Value>,
    /// Column names (shared reference)
    columns: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { values, columns }
    }

    /// Get a value by column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a value by column name
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|idx| self.values.get(idx))
    }
}

/// Column metadata of a result set
///
/// The flag fields mirror what the MySQL protocol reports per field and are
/// what value encoding keys off when a row is dumped.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ColumnMeta {
    /// Column name (or alias) as reported by the result set
    #[serde(default)]
    pub name: String,
    /// Data type, lower case (e.g. "int", "timestamp", "blob", "bit")
    #[serde(default)]
    pub data_type: String,
    /// Whether the column can be NULL
    #[serde(default)]
    pub nullable: bool,
    /// Column ordinal position (0-based)
    #[serde(default)]
    pub ordinal: usize,
    /// Display length; for BIT columns this is the bit width
    #[serde(default)]
    pub max_length: Option<i64>,
    /// Numeric type flag
    #[serde(default)]
    pub is_numeric: bool,
    /// BLOB/TEXT storage flag (TEXT columns report this too)
    #[serde(default)]
    pub is_blob: bool,
    /// BINARY flag; set for true BLOBs and binary strings, not for TEXT
    #[serde(default)]
    pub is_binary: bool,
    /// Part of the primary key
    #[serde(default)]
    pub is_primary_key: bool,
    /// Part of a unique key
    #[serde(default)]
    pub is_unique_key: bool,
    /// Table column behind an aliased result column
    #[serde(default)]
    pub original_name: Option<String>,
}

impl ColumnMeta {
    /// Create metadata for a column with the given name and type
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            ..Default::default()
        }
    }

    pub fn numeric(mut self) -> Self {
        self.is_numeric = true;
        self
    }

    pub fn blob(mut self) -> Self {
        self.is_blob = true;
        self
    }

    pub fn binary(mut self) -> Self {
        self.is_binary = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false;
        self
    }

    pub fn unique_key(mut self) -> Self {
        self.is_unique_key = true;
        self
    }

    pub fn with_length(mut self, length: i64) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    /// Name of the table column: the original name when known, else the result name
    pub fn source_name(&self) -> &str {
        self.original_name.as_deref().unwrap_or(&self.name)
    }

    /// Whether the column holds a TIMESTAMP (reported as numeric by some servers)
    pub fn is_timestamp(&self) -> bool {
        self.data_type.eq_ignore_ascii_case("timestamp")
    }

    /// Whether the column holds a BIT value
    pub fn is_bit(&self) -> bool {
        self.data_type.eq_ignore_ascii_case("bit")
    }
}

/// Query result
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Column metadata
    pub columns: Vec<ColumnMeta>,
    /// Result rows
    pub rows: Vec<Row>,
    /// Rows affected (for DML statements)
    pub affected_rows: u64,
    /// Warnings from the database
    pub warnings: Vec<String>,
}

impl QueryResult {
    /// First column of the first row, if any
    pub fn first_value(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.get(0))
    }
}

/// Result of a statement that does not return rows
#[derive(Debug, Clone, Default)]
pub struct StatementResult {
    /// Rows affected
    pub affected_rows: u64,
    /// Warnings from the database
    pub warnings: Vec<String>,
}

/// An unbuffered result set: column metadata up front, rows pulled one at a time
pub struct QueryStream {
    /// Column metadata
    pub columns: Vec<ColumnMeta>,
    /// Rows in server order; an `Err` item ends the fetch
    pub rows: BoxStream<'static, Result<Row>>,
}

impl std::fmt::Debug for QueryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStream")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}
