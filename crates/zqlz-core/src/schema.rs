//! Schema introspection traits and types

use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Schema introspection interface
///
/// For MySQL-family servers the `schema` argument is the database name.
#[async_trait]
pub trait SchemaIntrospection: Send + Sync {
    /// List all base tables in a schema
    async fn list_tables(&self, schema: Option<&str>) -> Result<Vec<TableInfo>>;

    /// List all views in a schema
    async fn list_views(&self, schema: Option<&str>) -> Result<Vec<ViewInfo>>;

    /// Whether `name` is a view rather than a base table
    async fn is_view(&self, schema: Option<&str>, name: &str) -> Result<bool> {
        let views = self.list_views(schema).await?;
        Ok(views.iter().any(|view| view.name == name))
    }

    /// Engine-reported status of a table (`SHOW TABLE STATUS` equivalent).
    ///
    /// Returns `None` when the engine has no row for the table.
    async fn table_status(&self, schema: Option<&str>, table: &str) -> Result<Option<TableStatus>>;

    /// Get columns for a table or view
    async fn get_columns(&self, schema: Option<&str>, table: &str) -> Result<Vec<ColumnInfo>>;

    /// List all functions in a schema
    async fn list_functions(&self, schema: Option<&str>) -> Result<Vec<FunctionInfo>>;

    /// List all procedures in a schema
    async fn list_procedures(&self, schema: Option<&str>) -> Result<Vec<ProcedureInfo>>;

    /// List scheduled events in a schema.
    /// Default returns an empty list since not all servers support them.
    async fn list_events(&self, _schema: Option<&str>) -> Result<Vec<EventInfo>> {
        Ok(Vec::new())
    }

    /// List all triggers in a schema (optionally filtered by table)
    async fn list_triggers(
        &self,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> Result<Vec<TriggerInfo>>;

    /// Default collation of a database (e.g. `utf8_general_ci`)
    async fn database_collation(&self, database: &str) -> Result<String>;

    /// Server version string, if the server reports one
    async fn server_version(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Engine-reported DDL for a database object (`SHOW CREATE ...` equivalent)
    async fn generate_ddl(&self, object: &DatabaseObject) -> Result<String>;
}

/// Table information (basic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub schema: Option<String>,
    pub name: String,
    pub table_type: TableType,
    pub row_count: Option<i64>,
    pub comment: Option<String>,
}

impl TableInfo {
    pub fn new(name: impl Into<String>, table_type: TableType) -> Self {
        Self {
            schema: None,
            name: name.into(),
            table_type,
            row_count: None,
            comment: None,
        }
    }
}

/// Table type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableType {
    Table,
    View,
}

/// Engine status of one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableStatus {
    pub create_time: Option<NaiveDateTime>,
    pub update_time: Option<NaiveDateTime>,
    pub check_time: Option<NaiveDateTime>,
    /// Next AUTO_INCREMENT value
    pub auto_increment: Option<u64>,
}

/// View information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewInfo {
    pub schema: Option<String>,
    pub name: String,
    pub definition: Option<String>,
    pub comment: Option<String>,
}

impl ViewInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            definition: None,
            comment: None,
        }
    }
}

/// Column information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub ordinal: usize,
    /// Full declared type, e.g. `varchar(255)` or `int(10) unsigned`
    pub data_type: String,
    pub nullable: bool,
    pub default_value: Option<String>,
    pub is_primary_key: bool,
    pub is_auto_increment: bool,
    pub comment: Option<String>,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, ordinal: usize, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal,
            data_type: data_type.into(),
            nullable: true,
            default_value: None,
            is_primary_key: false,
            is_auto_increment: false,
            comment: None,
        }
    }
}

/// Function information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub schema: Option<String>,
    pub name: String,
    pub return_type: String,
    pub definition: Option<String>,
    pub comment: Option<String>,
}

/// Procedure information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureInfo {
    pub schema: Option<String>,
    pub name: String,
    pub definition: Option<String>,
    pub comment: Option<String>,
}

/// Scheduled event information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInfo {
    pub schema: Option<String>,
    pub name: String,
    pub definition: Option<String>,
    pub enabled: bool,
}

/// Trigger information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerInfo {
    pub schema: Option<String>,
    pub name: String,
    pub table_name: String,
    pub timing: TriggerTiming,
    pub events: Vec<TriggerEvent>,
    pub for_each: TriggerForEach,
    /// Trigger body (the action statement)
    pub definition: Option<String>,
    pub enabled: bool,
}

/// Trigger timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

impl TriggerTiming {
    pub fn as_sql(&self) -> &'static str {
        match self {
            TriggerTiming::Before => "BEFORE",
            TriggerTiming::After => "AFTER",
            TriggerTiming::InsteadOf => "INSTEAD OF",
        }
    }
}

/// Trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
    Truncate,
}

impl TriggerEvent {
    pub fn as_sql(&self) -> &'static str {
        match self {
            TriggerEvent::Insert => "INSERT",
            TriggerEvent::Update => "UPDATE",
            TriggerEvent::Delete => "DELETE",
            TriggerEvent::Truncate => "TRUNCATE",
        }
    }
}

/// Trigger for each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerForEach {
    Row,
    Statement,
}

impl TriggerForEach {
    pub fn as_sql(&self) -> &'static str {
        match self {
            TriggerForEach::Row => "ROW",
            TriggerForEach::Statement => "STATEMENT",
        }
    }
}

/// Database object reference (for DDL generation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseObject {
    pub object_type: ObjectType,
    pub schema: Option<String>,
    pub name: String,
}

impl DatabaseObject {
    pub fn new(object_type: ObjectType, schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            object_type,
            schema: schema.map(str::to_string),
            name: name.into(),
        }
    }
}

/// Object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Database,
    Table,
    View,
    Function,
    Procedure,
    Trigger,
    Event,
}

impl ObjectType {
    /// Keyword used in `DROP <kind>` / `SHOW CREATE <kind>` statements
    pub fn keyword(&self) -> &'static str {
        match self {
            ObjectType::Database => "DATABASE",
            ObjectType::Table => "TABLE",
            ObjectType::View => "VIEW",
            ObjectType::Function => "FUNCTION",
            ObjectType::Procedure => "PROCEDURE",
            ObjectType::Trigger => "TRIGGER",
            ObjectType::Event => "EVENT",
        }
    }
}
