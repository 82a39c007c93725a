//! In-memory database scripted per test

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::StreamExt;
use zqlz_core::{
    ColumnInfo, ColumnMeta, ColumnMimeType, Connection, DatabaseObject, EventInfo, ForeignRelation,
    FunctionInfo, ProcedureInfo, QueryResult, QueryStream, RelationStore, Result, Row,
    SchemaIntrospection, StatementResult, TableInfo, TableStatus, TableType, TriggerInfo, Value,
    ViewInfo, ZqlzError,
};
use zqlz_sql_export::{OutputSink, SinkError};

/// Rows returned for one data query; an `Err` entry fails the fetch at that point
pub struct ScriptedRows {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<std::result::Result<Vec<Value>, String>>,
}

pub struct ScriptedDatabase {
    driver: &'static str,
    collation: String,
    server_version: Option<String>,
    time_zone: String,
    tables: Vec<String>,
    views: Vec<String>,
    ddl: HashMap<String, std::result::Result<String, String>>,
    status: HashMap<String, TableStatus>,
    columns: HashMap<String, Vec<ColumnInfo>>,
    data: HashMap<String, ScriptedRows>,
    procedures: Vec<String>,
    functions: Vec<String>,
    events: Vec<String>,
    triggers: Vec<TriggerInfo>,
    executed: Mutex<Vec<String>>,
}

impl ScriptedDatabase {
    pub fn new(driver: &'static str) -> Self {
        Self {
            driver,
            collation: "utf8_general_ci".to_string(),
            server_version: Some("5.7.44".to_string()),
            time_zone: "SYSTEM".to_string(),
            tables: Vec::new(),
            views: Vec::new(),
            ddl: HashMap::new(),
            status: HashMap::new(),
            columns: HashMap::new(),
            data: HashMap::new(),
            procedures: Vec::new(),
            functions: Vec::new(),
            events: Vec::new(),
            triggers: Vec::new(),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn mysql() -> Self {
        Self::new("mysql")
    }

    pub fn with_collation(mut self, collation: &str) -> Self {
        self.collation = collation.to_string();
        self
    }

    pub fn with_table(mut self, name: &str, ddl: &str) -> Self {
        self.tables.push(name.to_string());
        self.ddl.insert(name.to_string(), Ok(ddl.to_string()));
        self
    }

    pub fn with_broken_table(mut self, name: &str, error: &str) -> Self {
        self.tables.push(name.to_string());
        self.ddl.insert(name.to_string(), Err(error.to_string()));
        self
    }

    pub fn with_view(mut self, name: &str, ddl: &str, columns: Vec<ColumnInfo>) -> Self {
        self.views.push(name.to_string());
        self.ddl.insert(name.to_string(), Ok(ddl.to_string()));
        self.columns.insert(name.to_string(), columns);
        self
    }

    pub fn with_status(mut self, table: &str, status: TableStatus) -> Self {
        self.status.insert(table.to_string(), status);
        self
    }

    pub fn with_rows(mut self, sql: &str, rows: ScriptedRows) -> Self {
        self.data.insert(sql.to_string(), rows);
        self
    }

    pub fn with_procedure(mut self, name: &str, ddl: &str) -> Self {
        self.procedures.push(name.to_string());
        self.ddl.insert(name.to_string(), Ok(ddl.to_string()));
        self
    }

    pub fn with_function(mut self, name: &str, ddl: &str) -> Self {
        self.functions.push(name.to_string());
        self.ddl.insert(name.to_string(), Ok(ddl.to_string()));
        self
    }

    pub fn with_event(mut self, name: &str, ddl: &str) -> Self {
        self.events.push(name.to_string());
        self.ddl.insert(name.to_string(), Ok(ddl.to_string()));
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerInfo) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

fn row_of(columns: &[ColumnMeta], values: Vec<Value>) -> Row {
    Row::new(columns.iter().map(|c| c.name.clone()).collect(), values)
}

#[async_trait]
impl Connection for ScriptedDatabase {
    fn driver_name(&self) -> &str {
        self.driver
    }

    async fn execute(&self, sql: &str, _params: &[Value]) -> Result<StatementResult> {
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(StatementResult::default())
    }

    async fn query(&self, sql: &str, _params: &[Value]) -> Result<QueryResult> {
        if sql == "SELECT @@session.time_zone" {
            let columns = vec![ColumnMeta::new("@@session.time_zone", "varchar")];
            let row = row_of(&columns, vec![Value::String(self.time_zone.clone())]);
            return Ok(QueryResult {
                columns,
                rows: vec![row],
                ..Default::default()
            });
        }
        Err(ZqlzError::Query(format!("unexpected query: {}", sql)))
    }

    async fn query_stream(&self, sql: &str) -> Result<QueryStream> {
        let Some(scripted) = self.data.get(sql) else {
            return Err(ZqlzError::Query(format!("Table for '{}' doesn't exist", sql)));
        };
        let columns = scripted.columns.clone();
        let rows: Vec<Result<Row>> = scripted
            .rows
            .iter()
            .map(|row| match row {
                Ok(values) => Ok(row_of(&columns, values.clone())),
                Err(message) => Err(ZqlzError::Query(message.clone())),
            })
            .collect();
        Ok(QueryStream {
            columns,
            rows: futures::stream::iter(rows).boxed(),
        })
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}

#[async_trait]
impl SchemaIntrospection for ScriptedDatabase {
    async fn list_tables(&self, schema: Option<&str>) -> Result<Vec<TableInfo>> {
        Ok(self
            .tables
            .iter()
            .map(|name| {
                let mut info = TableInfo::new(name, TableType::Table);
                info.schema = schema.map(str::to_string);
                info
            })
            .collect())
    }

    async fn list_views(&self, _schema: Option<&str>) -> Result<Vec<ViewInfo>> {
        Ok(self.views.iter().map(ViewInfo::new).collect())
    }

    async fn table_status(&self, _schema: Option<&str>, table: &str) -> Result<Option<TableStatus>> {
        Ok(self.status.get(table).cloned())
    }

    async fn get_columns(&self, _schema: Option<&str>, table: &str) -> Result<Vec<ColumnInfo>> {
        self.columns
            .get(table)
            .cloned()
            .ok_or_else(|| ZqlzError::NotFound(table.to_string()))
    }

    async fn list_functions(&self, schema: Option<&str>) -> Result<Vec<FunctionInfo>> {
        Ok(self
            .functions
            .iter()
            .map(|name| FunctionInfo {
                schema: schema.map(str::to_string),
                name: name.clone(),
                return_type: "int".to_string(),
                definition: None,
                comment: None,
            })
            .collect())
    }

    async fn list_procedures(&self, schema: Option<&str>) -> Result<Vec<ProcedureInfo>> {
        Ok(self
            .procedures
            .iter()
            .map(|name| ProcedureInfo {
                schema: schema.map(str::to_string),
                name: name.clone(),
                definition: None,
                comment: None,
            })
            .collect())
    }

    async fn list_events(&self, schema: Option<&str>) -> Result<Vec<EventInfo>> {
        Ok(self
            .events
            .iter()
            .map(|name| EventInfo {
                schema: schema.map(str::to_string),
                name: name.clone(),
                definition: None,
                enabled: true,
            })
            .collect())
    }

    async fn list_triggers(&self, _schema: Option<&str>, table: Option<&str>) -> Result<Vec<TriggerInfo>> {
        Ok(self
            .triggers
            .iter()
            .filter(|trigger| table.is_none_or(|t| trigger.table_name == t))
            .cloned()
            .collect())
    }

    async fn database_collation(&self, _database: &str) -> Result<String> {
        Ok(self.collation.clone())
    }

    async fn server_version(&self) -> Result<Option<String>> {
        Ok(self.server_version.clone())
    }

    async fn generate_ddl(&self, object: &DatabaseObject) -> Result<String> {
        match self.ddl.get(&object.name) {
            Some(Ok(ddl)) => Ok(ddl.clone()),
            Some(Err(message)) => Err(ZqlzError::Query(message.clone())),
            None => Err(ZqlzError::NotFound(object.name.clone())),
        }
    }
}

/// Relation annotations kept by the host
#[derive(Default)]
pub struct ScriptedRelations {
    pub relations: HashMap<String, Vec<ForeignRelation>>,
    pub mime_types: HashMap<String, Vec<ColumnMimeType>>,
}

#[async_trait]
impl RelationStore for ScriptedRelations {
    async fn foreign_relations(&self, _database: &str, table: &str) -> Result<Vec<ForeignRelation>> {
        Ok(self.relations.get(table).cloned().unwrap_or_default())
    }

    async fn mime_types(&self, _database: &str, table: &str) -> Result<Vec<ColumnMimeType>> {
        Ok(self.mime_types.get(table).cloned().unwrap_or_default())
    }
}

/// Sink that accepts `capacity` chunks and then fails every write
pub struct FailingSink {
    pub accepted: Vec<String>,
    pub attempts: usize,
    capacity: usize,
}

impl FailingSink {
    pub fn after(capacity: usize) -> Self {
        Self {
            accepted: Vec::new(),
            attempts: 0,
            capacity,
        }
    }
}

impl OutputSink for FailingSink {
    fn write_chunk(&mut self, chunk: &str) -> std::result::Result<(), SinkError> {
        self.attempts += 1;
        if self.accepted.len() >= self.capacity {
            return Err(SinkError::Rejected("disk full".to_string()));
        }
        self.accepted.push(chunk.to_string());
        Ok(())
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("zqlz_sql_export=debug")
        .with_test_writer()
        .try_init();
}
