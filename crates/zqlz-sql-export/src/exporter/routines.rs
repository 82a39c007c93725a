//! Stored routines, events and triggers
//!
//! Bodies of these objects contain semicolons, so each section switches the
//! client delimiter while the definitions are replayed.

use zqlz_core::{DatabaseObject, ObjectType, SchemaIntrospection, TriggerInfo};

use super::{SqlExporter, write};
use crate::error::SqlExportResult;
use crate::format::{SqlComments, backquote, heading_name};
use crate::sink::OutputSink;

const ROUTINE_DELIMITER: &str = "$$";
const TRIGGER_DELIMITER: &str = "//";

impl SqlExporter {
    /// Procedures and functions of `database`, wrapped in `DELIMITER $$`.
    ///
    /// Writes nothing when the database has neither.
    #[tracing::instrument(skip(self, sink))]
    pub async fn export_routines(
        &self,
        database: &str,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        let introspection = self.get_schema_introspection()?;
        let comments = self.comments();

        let procedures: Vec<String> = match introspection.list_procedures(Some(database)).await {
            Ok(procedures) => procedures.into_iter().map(|p| p.name).collect(),
            Err(e) => {
                tracing::warn!(error = %e, database, "could not list procedures");
                write(sink, &comments.comment(&format!("Error reading procedures: ({})", e)))?;
                Vec::new()
            }
        };
        let functions: Vec<String> = match introspection.list_functions(Some(database)).await {
            Ok(functions) => functions.into_iter().map(|f| f.name).collect(),
            Err(e) => {
                tracing::warn!(error = %e, database, "could not list functions");
                write(sink, &comments.comment(&format!("Error reading functions: ({})", e)))?;
                Vec::new()
            }
        };

        if procedures.is_empty() && functions.is_empty() {
            return Ok(());
        }

        let crlf = self.crlf();
        let mut text = format!("{}DELIMITER {}{}", crlf, ROUTINE_DELIMITER, crlf);
        for (object_type, heading, names) in [
            (ObjectType::Procedure, "Procedures", &procedures),
            (ObjectType::Function, "Functions", &functions),
        ] {
            if names.is_empty() {
                continue;
            }
            text.push_str(&comments.blank());
            text.push_str(&comments.comment(heading));
            text.push_str(&comments.blank());
            for name in names {
                text.push_str(
                    &self
                        .delimited_definition(introspection, &comments, database, object_type, name)
                        .await,
                );
            }
        }
        text.push_str(&format!("DELIMITER ;{}", crlf));

        write(sink, &text)
    }

    /// Scheduled events of `database`, wrapped in `DELIMITER $$`
    #[tracing::instrument(skip(self, sink))]
    pub async fn export_events(
        &self,
        database: &str,
        sink: &mut dyn OutputSink,
    ) -> SqlExportResult<()> {
        let introspection = self.get_schema_introspection()?;
        let comments = self.comments();

        let events = match introspection.list_events(Some(database)).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(error = %e, database, "could not list events");
                return write(sink, &comments.comment(&format!("Error reading events: ({})", e)));
            }
        };
        if events.is_empty() {
            return Ok(());
        }

        let crlf = self.crlf();
        let mut text = format!("{}DELIMITER {}{}", crlf, ROUTINE_DELIMITER, crlf);
        text.push_str(&comments.blank());
        text.push_str(&comments.comment("Events"));
        text.push_str(&comments.blank());
        for event in &events {
            text.push_str(
                &self
                    .delimited_definition(introspection, &comments, database, ObjectType::Event, &event.name)
                    .await,
            );
        }
        text.push_str(&format!("DELIMITER ;{}", crlf));

        write(sink, &text)
    }

    /// Optional `DROP ... IF EXISTS` and the engine's definition, each ended by `$$`
    async fn delimited_definition(
        &self,
        introspection: &dyn SchemaIntrospection,
        comments: &SqlComments<'_>,
        database: &str,
        object_type: ObjectType,
        name: &str,
    ) -> String {
        let crlf = self.crlf();
        let mut text = String::new();
        if self.options.drop_table {
            text.push_str(&format!(
                "DROP {} IF EXISTS {}{}{}",
                object_type.keyword(),
                backquote(name, true),
                ROUTINE_DELIMITER,
                crlf
            ));
        }

        let object = DatabaseObject::new(object_type, Some(database), name);
        match introspection.generate_ddl(&object).await {
            Ok(definition) => {
                text.push_str(&format!("{}{}{}{}", definition, ROUTINE_DELIMITER, crlf, crlf));
            }
            Err(e) => {
                tracing::warn!(error = %e, name, kind = object_type.keyword(), "could not read definition");
                text.push_str(&comments.comment(&format!(
                    "Error reading definition of {} {}: ({})",
                    object_type.keyword().to_lowercase(),
                    backquote(name, true),
                    e
                )));
            }
        }
        text
    }

    /// Triggers section of a table; empty when the table has no triggers
    pub(super) async fn triggers_definition(&self, database: &str, table: &str) -> SqlExportResult<String> {
        let introspection = self.get_schema_introspection()?;
        let comments = self.comments();

        let triggers = match introspection.list_triggers(Some(database), Some(table)).await {
            Ok(triggers) => triggers,
            Err(e) => {
                tracing::warn!(error = %e, table, "could not list triggers");
                return Ok(comments.comment(&format!("Error reading triggers: ({})", e)));
            }
        };
        if triggers.is_empty() {
            return Ok(String::new());
        }

        let crlf = self.crlf();
        let mut dump = format!(
            "{}{}{}{}",
            comments.possible_crlf(),
            comments.blank(),
            comments.comment(&format!(
                "Triggers {}",
                heading_name(table, self.options.backquotes)
            )),
            comments.blank()
        );
        for trigger in &triggers {
            dump.push_str(&format!("DROP TRIGGER IF EXISTS {};{}", backquote(&trigger.name, true), crlf));
            dump.push_str(&format!("DELIMITER {}{}", TRIGGER_DELIMITER, crlf));
            dump.push_str(&create_trigger_statement(trigger, crlf));
            dump.push_str(&format!("DELIMITER ;{}", crlf));
        }
        Ok(dump)
    }
}

/// `CREATE TRIGGER` ended by the trigger delimiter
fn create_trigger_statement(trigger: &TriggerInfo, crlf: &str) -> String {
    let events: Vec<&str> = trigger.events.iter().map(|event| event.as_sql()).collect();
    format!(
        "CREATE TRIGGER {} {} {} ON {}{} FOR EACH {} {}{}{}",
        backquote(&trigger.name, true),
        trigger.timing.as_sql(),
        events.join(" OR "),
        backquote(&trigger.table_name, true),
        crlf,
        trigger.for_each.as_sql(),
        trigger.definition.as_deref().unwrap_or_default(),
        TRIGGER_DELIMITER,
        crlf
    )
}
