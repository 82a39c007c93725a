//! ZQLZ SQL dump export
//!
//! Writes MySQL and Drizzle compatible SQL dumps: `CREATE` statements for
//! databases, tables, views, routines, events and triggers, followed by the
//! table rows as INSERT, REPLACE or UPDATE statements.
//!
//! # Example
//!
//! ```rust,ignore
//! let exporter = SqlExporter::new(connection, SqlExportOptions::default());
//! let mut session = DumpSession::new();
//! let mut sink = StringSink::new();
//!
//! exporter.export_header(&mut session, &mut sink).await?;
//! exporter.dump_database(&mut session, "shop", &mut sink).await?;
//! exporter.export_footer(&mut session, &mut sink).await?;
//! ```

mod columns;
mod ddl;
mod dialect;
mod error;
mod exporter;
mod format;
mod options;
mod sink;
mod value_encoding;

pub use columns::{resolve_column_names, select_source_columns};
pub use ddl::*;
pub use dialect::DumpDialect;
pub use error::{SqlExportError, SqlExportResult};
pub use exporter::{DumpSession, SqlExporter, StructureMode};
pub use format::{SqlComments, backquote};
pub use options::{
    DataStatement, ExportScope, InsertSyntax, SqlExportOptions, StructureOrData, mysql_charset_name,
};
pub use sink::{OutputSink, SinkError, StringSink, WriterSink};
pub use value_encoding::{encode_value, escape_control_chars, printable_bit_value};
