//! Options for SQL dump export
//!
//! `SqlExportOptions` is an immutable snapshot handed to the exporter once per
//! run. Hosts usually keep it in a TOML file; every field has a default so a
//! partial file is enough.

use serde::{Deserialize, Serialize};

use crate::dialect::DumpDialect;
use crate::error::{SqlExportError, SqlExportResult};

/// What to dump for each table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureOrData {
    Structure,
    Data,
    #[default]
    StructureAndData,
}

impl StructureOrData {
    pub fn includes_structure(&self) -> bool {
        matches!(self, StructureOrData::Structure | StructureOrData::StructureAndData)
    }

    pub fn includes_data(&self) -> bool {
        matches!(self, StructureOrData::Data | StructureOrData::StructureAndData)
    }
}

/// Statement used for each dumped row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataStatement {
    #[default]
    Insert,
    Update,
    Replace,
}

impl DataStatement {
    pub fn keyword(&self) -> &'static str {
        match self {
            DataStatement::Insert => "INSERT",
            DataStatement::Update => "UPDATE",
            DataStatement::Replace => "REPLACE",
        }
    }
}

/// Shape of INSERT/REPLACE statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertSyntax {
    /// `INSERT INTO t (a, b) VALUES (1, 2);` per row
    Complete,
    /// `INSERT INTO t VALUES (1, 2), (3, 4);`
    Extended,
    /// Column list and multi-row values
    #[default]
    Both,
    /// `INSERT INTO t VALUES (1, 2);` per row
    None,
}

impl InsertSyntax {
    pub fn includes_column_names(&self) -> bool {
        matches!(self, InsertSyntax::Complete | InsertSyntax::Both)
    }

    pub fn is_extended(&self) -> bool {
        matches!(self, InsertSyntax::Extended | InsertSyntax::Both)
    }
}

/// Level the export was started from; decides a few DROP statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    Server,
    #[default]
    Database,
    Table,
}

/// Options for SQL dump export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlExportOptions {
    /// Target dialect
    pub dialect: DumpDialect,
    /// Level the export was started from
    pub scope: ExportScope,
    /// Line terminator used for every emitted line
    pub line_terminator: String,

    /// Emit `--` comments (export info, section headings)
    pub include_comments: bool,
    /// Extra header comment; the two characters `\n` split it into lines
    pub header_comment: Option<String>,
    /// Host label shown in the header
    pub host_label: Option<String>,
    /// Include creation/update/check times of tables
    pub dates: bool,
    /// Include configured relations as comments
    pub relation: bool,
    /// Include configured MIME types as comments
    pub mime: bool,
    /// Leave out the headings of the constraints section
    pub no_constraints_comments: bool,

    /// Wrap the dump in a transaction
    pub use_transaction: bool,
    /// Disable foreign key checks while loading
    pub disable_fk: bool,
    /// SQL mode to set before dumping; `None` or `"NONE"` keeps the server mode
    pub compatibility: Option<String>,
    /// Dump is written to a file; enables the charset directives
    pub as_file: bool,
    /// Charset of the output file (e.g. `utf-8`)
    pub charset_of_file: Option<String>,

    /// What to dump for each table
    pub structure_or_data: StructureOrData,
    /// Add `DROP DATABASE`
    pub drop_database: bool,
    /// Add `DROP TABLE / VIEW / PROCEDURE / FUNCTION / EVENT`
    pub drop_table: bool,
    /// Add `CREATE PROCEDURE / FUNCTION / EVENT`
    pub procedure_function: bool,
    /// Use `CREATE TABLE IF NOT EXISTS`
    pub if_not_exists: bool,
    /// Keep the next AUTO_INCREMENT value
    pub auto_increment: bool,
    /// Backquote table and column names
    pub backquotes: bool,

    /// `TRUNCATE TABLE` before inserting
    pub truncate: bool,
    /// `INSERT DELAYED`
    pub delayed: bool,
    /// `INSERT IGNORE` / `UPDATE IGNORE`
    pub ignore: bool,
    /// Statement used for rows
    #[serde(rename = "type")]
    pub statement: DataStatement,
    /// Shape of INSERT/REPLACE statements
    pub insert_syntax: InsertSyntax,
    /// Maximal length of one extended INSERT in bytes; 0 means unlimited
    pub max_query_size: usize,
    /// Dump binary columns as `0x...`
    pub hex_for_blob: bool,
    /// Dump TIMESTAMP columns in UTC
    pub utc_time: bool,
}

impl Default for SqlExportOptions {
    fn default() -> Self {
        Self {
            dialect: DumpDialect::MySql,
            scope: ExportScope::Database,
            line_terminator: "\n".to_string(),
            include_comments: true,
            header_comment: None,
            host_label: None,
            dates: false,
            relation: false,
            mime: false,
            no_constraints_comments: false,
            use_transaction: true,
            disable_fk: false,
            compatibility: None,
            as_file: false,
            charset_of_file: None,
            structure_or_data: StructureOrData::StructureAndData,
            drop_database: false,
            drop_table: false,
            procedure_function: true,
            if_not_exists: false,
            auto_increment: true,
            backquotes: true,
            truncate: false,
            delayed: false,
            ignore: false,
            statement: DataStatement::Insert,
            insert_syntax: InsertSyntax::Both,
            max_query_size: 50_000,
            hex_for_blob: true,
            utc_time: true,
        }
    }
}

impl SqlExportOptions {
    pub fn structure_only() -> Self {
        Self {
            structure_or_data: StructureOrData::Structure,
            ..Default::default()
        }
    }

    pub fn data_only() -> Self {
        Self {
            structure_or_data: StructureOrData::Data,
            ..Default::default()
        }
    }

    /// Parse options from TOML; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> SqlExportResult<Self> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Check combinations the exporter cannot honor
    pub fn validate(&self) -> SqlExportResult<()> {
        if self.line_terminator.is_empty() {
            return Err(SqlExportError::InvalidOptions(
                "line terminator must not be empty".into(),
            ));
        }
        if self.statement == DataStatement::Update && !self.structure_or_data.includes_data() {
            return Err(SqlExportError::InvalidOptions(
                "UPDATE statements need data export".into(),
            ));
        }
        if self.as_file {
            if let Some(charset) = self.charset_of_file.as_deref() {
                if mysql_charset_name(charset).is_none() {
                    return Err(SqlExportError::InvalidOptions(format!(
                        "unknown file charset '{}'",
                        charset
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn with_dialect(mut self, dialect: DumpDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_scope(mut self, scope: ExportScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.line_terminator = terminator.into();
        self
    }

    pub fn with_comments(mut self, include_comments: bool) -> Self {
        self.include_comments = include_comments;
        self
    }

    pub fn with_drop_table(mut self, drop_table: bool) -> Self {
        self.drop_table = drop_table;
        self
    }

    pub fn with_statement(mut self, statement: DataStatement) -> Self {
        self.statement = statement;
        self
    }

    pub fn with_insert_syntax(mut self, syntax: InsertSyntax) -> Self {
        self.insert_syntax = syntax;
        self
    }

    pub fn with_max_query_size(mut self, max_query_size: usize) -> Self {
        self.max_query_size = max_query_size;
        self
    }

    /// Compatibility mode is unset or `NONE`
    pub(crate) fn is_default_compatibility(&self) -> bool {
        self.compatibility
            .as_deref()
            .is_none_or(|mode| mode.eq_ignore_ascii_case("NONE"))
    }

    /// SQL mode to send to the server for the compatibility option
    pub(crate) fn sql_mode(&self) -> Option<&str> {
        let mode = self.compatibility.as_deref()?;
        if mode.eq_ignore_ascii_case("NONE") {
            Some("")
        } else {
            Some(mode)
        }
    }

    /// MySQL charset for `SET NAMES`, defaulting to the connection charset
    pub(crate) fn file_charset(&self) -> &'static str {
        self.charset_of_file
            .as_deref()
            .and_then(mysql_charset_name)
            .unwrap_or("utf8")
    }
}

/// MySQL charset name for an IANA charset label
pub fn mysql_charset_name(charset: &str) -> Option<&'static str> {
    let name = match charset.to_ascii_lowercase().as_str() {
        "big5" => "big5",
        "cp-866" => "cp866",
        "euc-jp" => "ujis",
        "euc-kr" => "euckr",
        "gb2312" => "gb2312",
        "gbk" => "gbk",
        "iso-8859-1" => "latin1",
        "iso-8859-2" => "latin2",
        "iso-8859-7" => "greek",
        "iso-8859-8" | "iso-8859-8-i" => "hebrew",
        "iso-8859-9" => "latin5",
        "iso-8859-13" => "latin7",
        "iso-8859-15" => "latin1",
        "koi8-r" => "koi8r",
        "shift_jis" => "sjis",
        "tis-620" => "tis620",
        "utf-8" => "utf8",
        "windows-1250" => "cp1250",
        "windows-1251" => "cp1251",
        "windows-1252" => "latin1",
        "windows-1256" => "cp1256",
        "windows-1257" => "cp1257",
        _ => return None,
    };
    Some(name)
}
