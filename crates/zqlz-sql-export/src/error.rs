//! Error types for SQL dump export

use thiserror::Error;
use zqlz_core::ZqlzError;

use crate::sink::SinkError;

/// Errors during SQL dump export
///
/// Metadata failures for a single table or routine are not errors: they are
/// written into the dump as comments and the export carries on. What ends up
/// here is what the caller has to act on.
#[derive(Debug, Error)]
pub enum SqlExportError {
    #[error("Output error: {0}")]
    Sink(#[from] SinkError),

    #[error("Database error: {0}")]
    Database(#[from] ZqlzError),

    #[error("Schema introspection not supported")]
    SchemaIntrospectionNotSupported,

    #[error("Invalid export options: {0}")]
    InvalidOptions(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for export operations
pub type SqlExportResult<T> = Result<T, SqlExportError>;
