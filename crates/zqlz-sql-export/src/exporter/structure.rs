//! Table, view and trigger structure

use chrono::NaiveDateTime;
use zqlz_core::{DatabaseObject, ObjectType, TableStatus};

use super::{DATE_FORMAT, DumpSession, SqlExporter, write};
use crate::ddl;
use crate::error::SqlExportResult;
use crate::format::{backquote, heading_name};
use crate::options::ExportScope;
use crate::sink::OutputSink;

/// What [`SqlExporter::export_structure`] writes for an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureMode {
    /// `CREATE TABLE` of a base table
    CreateTable,
    /// Triggers defined on a table
    Triggers,
    /// `CREATE VIEW` of a view
    CreateView,
    /// Placeholder table standing in for a view until the view is created
    StandIn,
}

impl SqlExporter {
    /// Write the structure section of one table or view
    #[tracing::instrument(skip(self, session, sink))]
    pub async fn export_structure(
        &self,
        session: &mut DumpSession,
        database: &str,
        table: &str,
        mode: StructureMode,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        let crlf = self.crlf();
        let comments = self.comments();
        let formatted_name = heading_name(table, self.options.backquotes);

        let mut dump = format!(
            "{}{}{}{}",
            comments.possible_crlf(),
            comments.comment(&"-".repeat(56)),
            comments.possible_crlf(),
            comments.blank()
        );

        match mode {
            StructureMode::CreateTable => {
                dump.push_str(&comments.comment(&format!(
                    "Table structure for table {}",
                    formatted_name
                )));
                dump.push_str(&comments.blank());
                dump.push_str(
                    &self
                        .get_table_def(session, database, table, self.options.dates, true, false)
                        .await?,
                );
                dump.push_str(&self.table_comments(database, table).await);
            }
            StructureMode::Triggers => {
                dump = self.triggers_definition(database, table).await?;
            }
            StructureMode::CreateView => {
                dump.push_str(&comments.comment(&format!("Structure for view {}", formatted_name)));
                dump.push_str(&comments.blank());
                // replaces the stand-in table
                if self.options.scope != ExportScope::Table {
                    dump.push_str(&format!("DROP TABLE IF EXISTS {};{}", backquote(table, true), crlf));
                }
                dump.push_str(
                    &self
                        .get_table_def(session, database, table, self.options.dates, true, true)
                        .await?,
                );
            }
            StructureMode::StandIn => {
                dump.push_str(&comments.comment(&format!(
                    "Stand-in structure for view {}",
                    formatted_name
                )));
                dump.push_str(&comments.blank());
                dump.push_str(&self.get_table_def_stand_in(database, table).await?);
            }
        }

        // only table copy callers replay the constraint query
        session.constraints_mut().clear_query();

        write(sink, &dump)
    }

    /// `CREATE` statement of a table or view as it should appear in the dump.
    ///
    /// Constraints are moved out of the statement into the session. A failure
    /// to read the DDL yields an `in use(...)` comment instead of the
    /// statement.
    #[tracing::instrument(skip(self, session))]
    pub async fn get_table_def(
        &self,
        session: &mut DumpSession,
        database: &str,
        table: &str,
        show_dates: bool,
        add_semicolon: bool,
        view: bool,
    ) -> SqlExportResult<String> {
        let introspection = self.get_schema_introspection()?;
        let crlf = self.crlf();
        let comments = self.comments();
        let dialect = self.dialect();

        let mut schema_create = String::new();
        let mut auto_increment = String::new();
        let mut new_crlf = crlf.to_string();

        let status = match introspection.table_status(Some(database), table).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, table, "could not read table status");
                None
            }
        };
        if let Some(status) = status {
            if self.options.auto_increment {
                if let Some(next) = status.auto_increment.filter(|n| *n > 0) {
                    auto_increment = format!(" AUTO_INCREMENT={} ", next);
                }
            }
            if show_dates {
                for (label, time) in status_dates(&status) {
                    schema_create.push_str(&comments.comment(&format!(
                        "{}: {}",
                        label,
                        time.format(DATE_FORMAT)
                    )));
                    new_crlf = format!("{}{}", comments.blank(), crlf);
                }
            }
        }

        schema_create.push_str(&new_crlf);

        if self.options.drop_table && !view {
            schema_create.push_str(&format!(
                "DROP TABLE IF EXISTS {};{}",
                backquote(table, self.options.backquotes),
                crlf
            ));
        }

        if dialect.controls_quote_show_create() {
            let flag = if self.options.backquotes { 1 } else { 0 };
            self.execute_quietly(&format!("SET SQL_QUOTE_SHOW_CREATE = {}", flag))
                .await;
        }

        let object_type = if view { ObjectType::View } else { ObjectType::Table };
        let object = DatabaseObject::new(object_type, Some(database), table);
        let create_query = match introspection.generate_ddl(&object).await {
            Ok(ddl) => ddl,
            Err(e) => {
                tracing::warn!(error = %e, table, "could not read table definition");
                return Ok(comments.comment(&format!("in use({})", e)));
            }
        };

        let mut create_query = ddl::normalize_line_endings(&create_query, crlf);
        if view {
            create_query = ddl::strip_database_qualifier(&create_query, database);
        }
        if self.options.if_not_exists {
            create_query = ddl::add_if_not_exists(&create_query);
        }
        if dialect.quotes_row_format() {
            create_query = ddl::unquote_row_format(&create_query);
        }
        let create_query = ddl::extract_constraints(
            &create_query,
            database,
            table,
            &comments,
            !self.options.no_constraints_comments,
            session.constraints_mut(),
        );
        schema_create.push_str(&create_query);

        let mut schema_create = ddl::strip_auto_increment(&schema_create);
        schema_create.push_str(&auto_increment);
        if add_semicolon {
            schema_create.push(';');
            schema_create.push_str(crlf);
        }
        Ok(schema_create)
    }

    /// Placeholder `CREATE TABLE` with the columns of a view.
    ///
    /// Views may reference each other; creating stand-ins first lets every
    /// view definition be replayed in any order.
    #[tracing::instrument(skip(self))]
    pub async fn get_table_def_stand_in(&self, database: &str, view: &str) -> SqlExportResult<String> {
        let introspection = self.get_schema_introspection()?;
        let crlf = self.crlf();

        let columns = match introspection.get_columns(Some(database), view).await {
            Ok(columns) => columns,
            Err(e) => {
                tracing::warn!(error = %e, view, "could not read view columns");
                return Ok(self.comments().comment(&format!("in use({})", e)));
            }
        };

        let mut create_query = String::new();
        if self.options.drop_table {
            create_query.push_str(&format!("DROP VIEW IF EXISTS {};{}", backquote(view, true), crlf));
        }
        create_query.push_str("CREATE TABLE ");
        if self.options.if_not_exists {
            create_query.push_str("IF NOT EXISTS ");
        }
        create_query.push_str(&format!("{} ({}", backquote(view, true), crlf));

        let definitions: Vec<String> = columns
            .iter()
            .map(|column| format!("{} {}{}", backquote(&column.name, true), column.data_type, crlf))
            .collect();
        create_query.push_str(&definitions.join(","));
        create_query.push_str(&format!(");{}", crlf));
        Ok(create_query)
    }

    /// MIME type and relation comments for a table, from the relation store
    pub async fn table_comments(&self, database: &str, table: &str) -> String {
        let Some(store) = &self.relations else {
            return String::new();
        };
        let comments = self.comments();
        let backquotes = self.options.backquotes;
        let mut schema_create = String::new();

        if self.options.mime && store.supports_mime() {
            let mime_types = store.mime_types(database, table).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, table, "could not read MIME types");
                Vec::new()
            });
            if !mime_types.is_empty() {
                schema_create.push_str(comments.possible_crlf());
                schema_create.push_str(&comments.blank());
                schema_create.push_str(&comments.comment(&format!(
                    "MIME TYPES FOR TABLE {}:",
                    backquote(table, backquotes)
                )));
                for mime in &mime_types {
                    schema_create.push_str(&comments.comment(&format!(
                        "  {}",
                        backquote(&mime.column, backquotes)
                    )));
                    schema_create.push_str(&comments.comment(&format!(
                        "      {}",
                        backquote(&mime.mime_type, backquotes)
                    )));
                }
                schema_create.push_str(&comments.blank());
            }
        }

        if self.options.relation && store.supports_relations() {
            let relations = store.foreign_relations(database, table).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, table, "could not read relations");
                Vec::new()
            });
            if !relations.is_empty() {
                schema_create.push_str(comments.possible_crlf());
                schema_create.push_str(&comments.blank());
                schema_create.push_str(&comments.comment(&format!(
                    "RELATIONS FOR TABLE {}:",
                    backquote(table, backquotes)
                )));
                for relation in &relations {
                    schema_create.push_str(&comments.comment(&format!(
                        "  {}",
                        backquote(&relation.column, backquotes)
                    )));
                    schema_create.push_str(&comments.comment(&format!(
                        "      {} -> {}",
                        backquote(&relation.foreign_table, backquotes),
                        backquote(&relation.foreign_column, backquotes)
                    )));
                }
                schema_create.push_str(&comments.blank());
            }
        }

        schema_create
    }
}

fn status_dates(status: &TableStatus) -> impl Iterator<Item = (&'static str, NaiveDateTime)> {
    [
        ("Creation", status.create_time),
        ("Last update", status.update_time),
        ("Last check", status.check_time),
    ]
    .into_iter()
    .filter_map(|(label, time)| time.map(|time| (label, time)))
}
