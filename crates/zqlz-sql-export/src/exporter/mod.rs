//! SQL dump exporter
//!
//! `SqlExporter` produces the dump section by section. A host drives it in
//! this order:
//!
//! 1. [`SqlExporter::export_header`]
//! 2. per database: [`SqlExporter::export_db_header`] and optionally
//!    [`SqlExporter::export_db_create`]
//! 3. per table: [`SqlExporter::export_structure`] and
//!    [`SqlExporter::export_data`]
//! 4. per database: [`SqlExporter::export_db_footer`]
//! 5. [`SqlExporter::export_footer`]
//!
//! [`SqlExporter::dump_database`] and [`SqlExporter::dump_server`] run the
//! whole sequence.
//!
//! Every call writes through an [`OutputSink`]. A sink failure is returned
//! immediately. Metadata failures are written into the dump as comments and
//! the call still succeeds.

mod data;
mod routines;
mod session;
mod structure;

use std::sync::Arc;

use zqlz_core::{Connection, RelationStore, SchemaIntrospection, TableType};

use crate::dialect::DumpDialect;
use crate::error::{SqlExportError, SqlExportResult};
use crate::format::{SqlComments, backquote, heading_name};
use crate::options::{ExportScope, SqlExportOptions};
use crate::sink::OutputSink;

pub use session::DumpSession;
pub use structure::StructureMode;

const PRODUCT_NAME: &str = "ZQLZ SQL Dump";
const DATE_FORMAT: &str = "%B %d, %Y at %I:%M %p";

/// Writes MySQL/Drizzle SQL dumps
pub struct SqlExporter {
    connection: Arc<dyn Connection>,
    relations: Option<Arc<dyn RelationStore>>,
    options: SqlExportOptions,
}

impl SqlExporter {
    pub fn new(connection: Arc<dyn Connection>, options: SqlExportOptions) -> Self {
        Self {
            connection,
            relations: None,
            options,
        }
    }

    /// Use `store` for the relation and MIME comments of table structures
    pub fn with_relation_store(mut self, store: Arc<dyn RelationStore>) -> Self {
        self.relations = Some(store);
        self
    }

    pub fn options(&self) -> &SqlExportOptions {
        &self.options
    }

    fn dialect(&self) -> DumpDialect {
        self.options.dialect
    }

    fn crlf(&self) -> &str {
        &self.options.line_terminator
    }

    fn comments(&self) -> SqlComments<'_> {
        SqlComments::new(&self.options.line_terminator, self.options.include_comments)
    }

    fn get_schema_introspection(&self) -> SqlExportResult<&dyn SchemaIntrospection> {
        self.connection
            .as_schema_introspection()
            .ok_or(SqlExportError::SchemaIntrospectionNotSupported)
    }

    /// Run a session statement whose failure only degrades the dump
    async fn execute_quietly(&self, sql: &str) {
        if let Err(e) = self.connection.execute(sql, &[]).await {
            tracing::warn!(error = %e, sql, "session statement failed");
        }
    }

    /// Dump preamble: product comments, session settings, charset directives
    #[tracing::instrument(skip(self, session, sink))]
    pub async fn export_header(
        &self,
        session: &mut DumpSession,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        let crlf = self.crlf();
        let comments = self.comments();
        let dialect = self.dialect();

        if let Some(mode) = self.options.sql_mode() {
            self.execute_quietly(&format!("SET SQL_MODE=\"{}\"", mode)).await;
        }

        let mut head = String::new();
        head.push_str(&comments.comment(PRODUCT_NAME));
        head.push_str(&comments.comment(&format!("version {}", env!("CARGO_PKG_VERSION"))));
        head.push_str(&comments.blank());
        if let Some(host) = &self.options.host_label {
            head.push_str(&comments.comment(&format!("Host: {}", host)));
        }
        head.push_str(&comments.comment(&format!(
            "Generation Time: {}",
            chrono::Local::now().format(DATE_FORMAT)
        )));
        if let Some(version) = self.server_version().await {
            head.push_str(&comments.comment(&format!("Server version: {}", version)));
        }
        head.push_str(comments.possible_crlf());

        if let Some(header_comment) = self.options.header_comment.as_deref().filter(|c| !c.is_empty()) {
            // the two characters `\n`, not a newline
            head.push_str(&comments.blank());
            for line in header_comment.split("\\n") {
                head.push_str(&comments.comment(line));
            }
            head.push_str(&comments.blank());
        }

        if self.options.disable_fk {
            head.push_str(&format!("SET FOREIGN_KEY_CHECKS=0;{}", crlf));
        }

        // keeps exported zero AUTO_INCREMENT values
        if self.options.is_default_compatibility() && dialect.supports_zero_auto_values() {
            head.push_str(&format!("SET SQL_MODE = \"NO_AUTO_VALUE_ON_ZERO\";{}", crlf));
        }

        if self.options.use_transaction {
            head.push_str(&format!("SET AUTOCOMMIT = 0;{}START TRANSACTION;{}", crlf, crlf));
        }

        if self.options.utc_time && dialect.supports_utc_time_override() {
            head.push_str(&format!("SET time_zone = \"+00:00\";{}", crlf));
            match self.connection.query("SELECT @@session.time_zone", &[]).await {
                Ok(result) => {
                    if let Some(zone) = result.first_value().filter(|v| !v.is_null()) {
                        session.save_time_zone(zone.to_sql_text().into_owned());
                    }
                }
                Err(e) => tracing::warn!(error = %e, "could not read session time zone"),
            }
            self.execute_quietly("SET time_zone = \"+00:00\"").await;
        }

        head.push_str(comments.possible_crlf());

        if self.writes_charset_directives() {
            head.push_str(crlf);
            head.push_str(&format!(
                "/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;{}",
                crlf
            ));
            head.push_str(&format!(
                "/*!40101 SET @OLD_CHARACTER_SET_RESULTS=@@CHARACTER_SET_RESULTS */;{}",
                crlf
            ));
            head.push_str(&format!(
                "/*!40101 SET @OLD_COLLATION_CONNECTION=@@COLLATION_CONNECTION */;{}",
                crlf
            ));
            head.push_str(&format!(
                "/*!40101 SET NAMES {} */;{}{}",
                self.options.file_charset(),
                crlf,
                crlf
            ));
        }

        write(sink, &head)
    }

    /// Dump postamble; restores the session time zone saved by the header
    #[tracing::instrument(skip(self, session, sink))]
    pub async fn export_footer(
        &self,
        session: &mut DumpSession,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        let crlf = self.crlf();
        let mut foot = String::new();

        if self.options.disable_fk {
            foot.push_str(&format!("SET FOREIGN_KEY_CHECKS=1;{}", crlf));
        }

        if self.options.use_transaction {
            foot.push_str(&format!("COMMIT;{}", crlf));
        }

        if self.writes_charset_directives() {
            foot.push_str(crlf);
            foot.push_str(&format!(
                "/*!40101 SET CHARACTER_SET_CLIENT=@OLD_CHARACTER_SET_CLIENT */;{}",
                crlf
            ));
            foot.push_str(&format!(
                "/*!40101 SET CHARACTER_SET_RESULTS=@OLD_CHARACTER_SET_RESULTS */;{}",
                crlf
            ));
            foot.push_str(&format!(
                "/*!40101 SET COLLATION_CONNECTION=@OLD_COLLATION_CONNECTION */;{}",
                crlf
            ));
        }

        if let Some(zone) = session.take_saved_time_zone() {
            self.execute_quietly(&format!("SET time_zone = \"{}\"", zone)).await;
        }

        write(sink, &foot)
    }

    fn writes_charset_directives(&self) -> bool {
        self.options.as_file && self.dialect().supports_charset_directives()
    }

    async fn server_version(&self) -> Option<String> {
        let introspection = self.connection.as_schema_introspection()?;
        match introspection.server_version().await {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!(error = %e, "could not read server version");
                None
            }
        }
    }

    /// `DROP DATABASE`, `CREATE DATABASE` and `USE` for `database`
    #[tracing::instrument(skip(self, sink))]
    pub async fn export_db_create(
        &self,
        database: &str,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        let crlf = self.crlf();
        let name = backquote(database, self.options.backquotes);

        if self.options.drop_database {
            write(sink, &format!("DROP DATABASE {};{}", name, crlf))?;
        }

        let collation = match self.get_schema_introspection()?.database_collation(database).await {
            Ok(collation) => collation,
            Err(e) => {
                tracing::warn!(error = %e, database, "could not read database collation");
                return write(
                    sink,
                    &self.comments().comment(&format!("Error reading collation: ({})", e)),
                );
            }
        };
        write(
            sink,
            &format!(
                "CREATE DATABASE {}{};{}",
                name,
                self.dialect().database_charset_clause(&collation),
                crlf
            ),
        )?;

        let quote_use = self.options.backquotes
            && (self.options.is_default_compatibility() || self.dialect().always_backquotes_use());
        write(sink, &format!("USE {};{}", backquote(database, quote_use), crlf))
    }

    /// `-- Database: ...` heading
    #[tracing::instrument(skip(self, sink))]
    pub async fn export_db_header(
        &self,
        database: &str,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        let comments = self.comments();
        let head = format!(
            "{}{}{}",
            comments.blank(),
            comments.comment(&format!(
                "Database: {}",
                heading_name(database, self.options.backquotes)
            )),
            comments.blank()
        );
        write(sink, &head)
    }

    /// Flushes the collected constraints, then writes the events of `database`
    #[tracing::instrument(skip(self, session, sink))]
    pub async fn export_db_footer(
        &self,
        session: &mut DumpSession,
        database: &str,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        self.flush_constraints(session, sink)?;

        if self.options.structure_or_data.includes_structure()
            && self.options.procedure_function
            && self.dialect().supports_events()
        {
            self.export_events(database, sink).await?;
        }
        Ok(())
    }

    /// Write the collected `ALTER TABLE ... ADD CONSTRAINT` statements and clear them.
    ///
    /// The statements stay in the session when the sink fails.
    pub fn flush_constraints(
        &self,
        session: &mut DumpSession,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        write(sink, session.constraints().display())?;
        session.constraints_mut().take_display();
        Ok(())
    }

    /// Dump one database: structures, data, triggers, routines, views, constraints
    pub async fn dump_database(
        &self,
        session: &mut DumpSession,
        database: &str,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        let create_database = self.options.scope == ExportScope::Server;
        self.dump_database_with(session, database, create_database, sink).await
    }

    /// Dump several databases, each with its `CREATE DATABASE`, between one header and footer
    #[tracing::instrument(skip(self, session, sink))]
    pub async fn dump_server(
        &self,
        session: &mut DumpSession,
        databases: &[String],
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        self.export_header(session, sink).await?;
        for database in databases {
            self.dump_database_with(session, database, true, sink).await?;
        }
        self.export_footer(session, sink).await
    }

    #[tracing::instrument(skip(self, session, sink))]
    async fn dump_database_with(
        &self,
        session: &mut DumpSession,
        database: &str,
        create_database: bool,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        let introspection = self.get_schema_introspection()?;
        let structure = self.options.structure_or_data.includes_structure();
        let data = self.options.structure_or_data.includes_data();

        self.export_db_header(database, sink).await?;
        if create_database {
            self.export_db_create(database, sink).await?;
        }

        if structure && self.options.procedure_function && self.dialect().supports_routines() {
            self.export_routines(database, sink).await?;
        }

        let tables = match introspection.list_tables(Some(database)).await {
            Ok(tables) => tables,
            Err(e) => {
                tracing::warn!(error = %e, database, "could not list tables");
                write(sink, &self.comments().comment(&format!("Error listing tables: ({})", e)))?;
                Vec::new()
            }
        };
        let views = match introspection.list_views(Some(database)).await {
            Ok(views) => views,
            Err(e) => {
                tracing::warn!(error = %e, database, "could not list views");
                write(sink, &self.comments().comment(&format!("Error listing views: ({})", e)))?;
                Vec::new()
            }
        };

        for table in tables.iter().filter(|t| t.table_type == TableType::Table) {
            tracing::debug!(table = %table.name, "dumping table");
            if structure {
                self.export_structure(session, database, &table.name, StructureMode::CreateTable, sink)
                    .await?;
            }
            if data {
                let sql = format!(
                    "SELECT * FROM {}.{}",
                    backquote(database, true),
                    backquote(&table.name, true)
                );
                self.export_data(database, &table.name, &sql, sink).await?;
            }
            if structure {
                self.export_structure(session, database, &table.name, StructureMode::Triggers, sink)
                    .await?;
            }
        }

        if structure {
            for view in &views {
                self.export_structure(session, database, &view.name, StructureMode::StandIn, sink)
                    .await?;
            }
            for view in &views {
                tracing::debug!(view = %view.name, "dumping view");
                self.export_structure(session, database, &view.name, StructureMode::CreateView, sink)
                    .await?;
            }
        }

        self.export_db_footer(session, database, sink).await
    }
}

fn write(sink: &mut dyn OutputSink, text: &str) -> SqlExportResult<()> {
    if !text.is_empty() {
        sink.write_chunk(text)?;
    }
    Ok(())
}
