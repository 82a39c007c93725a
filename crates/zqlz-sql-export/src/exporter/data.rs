//! Table data as INSERT, REPLACE or UPDATE statements

use futures::StreamExt;
use zqlz_core::{ColumnMeta, Value};

use super::{SqlExporter, write};
use crate::columns::resolve_column_names;
use crate::error::SqlExportResult;
use crate::format::{backquote, heading_name};
use crate::options::DataStatement;
use crate::sink::OutputSink;
use crate::value_encoding::encode_value;

impl SqlExporter {
    /// Dump the rows returned by `sql_query` as statements for `table`.
    ///
    /// Rows are pulled one at a time. Extended INSERTs are split whenever the
    /// next tuple would push the statement past `max_query_size` bytes.
    #[tracing::instrument(skip(self, sink))]
    pub async fn export_data(
        &self,
        database: &str,
        table: &str,
        sql_query: &str,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        let crlf = self.crlf();
        let comments = self.comments();
        let options = &self.options;
        let formatted_name = heading_name(table, options.backquotes);

        if self.is_view(database, table).await {
            let head = format!(
                "{}{}{}{}{}{}",
                comments.possible_crlf(),
                comments.blank(),
                comments.comment(&format!("VIEW  {}", formatted_name)),
                comments.comment("Data: None"),
                comments.blank(),
                comments.possible_crlf()
            );
            return write(sink, &head);
        }

        let (columns, mut rows) = match self.connection.query_stream(sql_query).await {
            Ok(stream) => (stream.columns, stream.rows),
            Err(e) => {
                tracing::warn!(error = %e, table, "could not read table data");
                return write(sink, &comments.comment(&format!("Error reading data: ({})", e)));
            }
        };

        let names = resolve_column_names(sql_query, &columns);
        let field_set: Vec<String> = names
            .iter()
            .map(|name| backquote(name, options.backquotes))
            .collect();
        // UPDATE conditions must name table columns, not result aliases
        let columns: Vec<ColumnMeta> = columns
            .into_iter()
            .zip(names)
            .map(|(column, name)| column.with_original_name(name))
            .collect();
        let table_name = backquote(table, options.backquotes);

        let is_update = options.statement == DataStatement::Update;
        let mut schema_insert = if is_update {
            let ignore = if options.ignore { "IGNORE " } else { "" };
            format!("UPDATE {}{} SET", ignore, table_name)
        } else {
            let command = options.statement.keyword();
            let mut modifiers = String::new();
            if options.delayed && self.dialect().supports_insert_delayed() {
                modifiers.push_str(" DELAYED");
            }
            if options.ignore && options.statement == DataStatement::Insert {
                modifiers.push_str(" IGNORE");
            }

            if options.truncate && options.statement == DataStatement::Insert {
                let truncate_head = format!(
                    "{}{}{}{}{}",
                    comments.possible_crlf(),
                    comments.blank(),
                    comments.comment(&format!("Truncate table before insert {}", formatted_name)),
                    comments.blank(),
                    crlf
                );
                write(sink, &truncate_head)?;
                write(sink, &format!("TRUNCATE TABLE {};{}", table_name, crlf))?;
            }

            if options.insert_syntax.includes_column_names() {
                format!(
                    "{}{} INTO {} ({}) VALUES",
                    command,
                    modifiers,
                    table_name,
                    field_set.join(", ")
                )
            } else {
                format!("{}{} INTO {} VALUES", command, modifiers, table_name)
            }
        };

        let extended = !is_update && options.insert_syntax.is_extended();
        let separator = if extended {
            schema_insert.push_str(crlf);
            ","
        } else {
            ";"
        };

        let mut current_row: u64 = 0;
        let mut query_size: usize = 0;
        while let Some(row) = rows.next().await {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!(error = %e, table, rows = current_row, "row fetch failed");
                    if current_row > 0 {
                        write(sink, &format!(";{}", crlf))?;
                    }
                    return write(sink, &comments.comment(&format!("Error reading data: ({})", e)));
                }
            };

            if current_row == 0 {
                let head = format!(
                    "{}{}{}{}{}",
                    comments.possible_crlf(),
                    comments.blank(),
                    comments.comment(&format!("Dumping data for table {}", formatted_name)),
                    comments.blank(),
                    crlf
                );
                write(sink, &head)?;
            }
            current_row += 1;

            let values: Vec<String> = columns
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let value = row.get(idx).unwrap_or(&Value::Null);
                    encode_value(value, column, options.hex_for_blob, |raw| {
                        self.connection.escape_string(raw)
                    })
                })
                .collect();

            let insert_line = if is_update {
                let assignments: Vec<String> = field_set
                    .iter()
                    .zip(&values)
                    .map(|(field, value)| format!("{} = {}", field, value))
                    .collect();
                let condition = self.connection.unique_condition(&columns, &row);
                format!("{} {} WHERE {}", schema_insert, assignments.join(","), condition.clause)
            } else if extended {
                let tuple = format!("({})", values.join(", "));
                let mut line = if current_row == 1 {
                    format!("{}{}", schema_insert, tuple)
                } else {
                    tuple
                };
                if current_row > 1
                    && options.max_query_size > 0
                    && query_size + line.len() > options.max_query_size
                {
                    write(sink, &format!(";{}", crlf))?;
                    query_size = 0;
                    current_row = 1;
                    line = format!("{}{}", schema_insert, line);
                }
                query_size += line.len();
                line
            } else {
                format!("{}({})", schema_insert, values.join(", "))
            };

            if current_row == 1 {
                write(sink, &insert_line)?;
            } else {
                write(sink, &format!("{}{}{}", separator, crlf, insert_line))?;
            }
        }

        if current_row > 0 {
            write(sink, &format!(";{}", crlf))?;
        }
        tracing::debug!(table, rows = current_row, "table data dumped");
        Ok(())
    }

    async fn is_view(&self, database: &str, table: &str) -> bool {
        let Some(introspection) = self.connection.as_schema_introspection() else {
            return false;
        };
        introspection
            .is_view(Some(database), table)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, table, "could not check whether table is a view");
                false
            })
    }
}

