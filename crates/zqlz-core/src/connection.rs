//! Connection trait and row identification

use crate::{ColumnMeta, QueryResult, QueryStream, Result, Row, SchemaIntrospection, StatementResult, Value};
use async_trait::async_trait;
use futures::StreamExt;

/// WHERE clause that identifies one row of a result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueCondition {
    /// Conditions joined with `AND`, without the `WHERE` keyword
    pub clause: String,
    /// Whether the clause is built from a primary or unique key
    pub is_unique: bool,
}

/// A database connection
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "mysql", "drizzle")
    fn driver_name(&self) -> &str;

    /// Execute a statement that does not return rows (SET, DDL, DML)
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult>;

    /// Execute a query and buffer all of its rows
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Execute a query without buffering the result set.
    ///
    /// Drivers that can fetch unbuffered should override this so memory use
    /// stays at one row. The default buffers through [`Connection::query`].
    async fn query_stream(&self, sql: &str) -> Result<QueryStream> {
        let result = self.query(sql, &[]).await?;
        Ok(QueryStream {
            columns: result.columns,
            rows: futures::stream::iter(result.rows.into_iter().map(Ok)).boxed(),
        })
    }

    /// Escape a string for embedding between single quotes.
    ///
    /// Backslashes are doubled and single quotes are doubled, which is what
    /// MySQL and Drizzle accept in their default SQL mode.
    fn escape_string(&self, raw: &str) -> String {
        raw.replace('\\', "\\\\").replace('\'', "''")
    }

    /// Build a WHERE clause that identifies `row` as uniquely as possible.
    ///
    /// Primary key columns are preferred, then unique key columns, then every
    /// non-BLOB column of the result. Columns are named by
    /// [`ColumnMeta::source_name`]; binary values that are not valid UTF-8
    /// are compared as hex literals.
    fn unique_condition(&self, columns: &[ColumnMeta], row: &Row) -> UniqueCondition {
        let mut primary = Vec::new();
        let mut unique = Vec::new();
        let mut all = Vec::new();

        for (idx, column) in columns.iter().enumerate() {
            let name = format!("`{}`", column.source_name().replace('`', "``"));
            let condition = match row.get(idx).unwrap_or(&Value::Null) {
                Value::Null => format!("{} IS NULL", name),
                value if column.is_numeric && !column.is_blob => {
                    format!("{} = {}", name, value.to_sql_text())
                }
                value => match value.non_utf8_bytes() {
                    Some(bytes) => format!("{} = 0x{}", name, hex::encode(bytes)),
                    None => format!("{} = '{}'", name, self.escape_string(&value.to_sql_text())),
                },
            };

            if column.is_primary_key {
                primary.push(condition.clone());
            } else if column.is_unique_key {
                unique.push(condition.clone());
            }
            if !column.is_blob {
                all.push(condition);
            }
        }

        let (conditions, is_unique) = if !primary.is_empty() {
            (primary, true)
        } else if !unique.is_empty() {
            (unique, true)
        } else {
            (all, false)
        };

        UniqueCondition {
            clause: conditions.join(" AND "),
            is_unique,
        }
    }

    /// Get schema introspection interface if supported
    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        None
    }
}
