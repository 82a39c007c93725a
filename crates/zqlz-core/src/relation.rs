//! Relation metadata store
//!
//! Hosts can keep their own annotations next to the schema: foreign key
//! relations defined outside the engine, and MIME types for columns. The
//! dump formatter renders them as comments when asked to.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A configured relation from a local column to a foreign column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignRelation {
    pub column: String,
    pub foreign_table: String,
    pub foreign_column: String,
}

/// A MIME type configured for a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMimeType {
    pub column: String,
    pub mime_type: String,
}

/// Lookup interface for host-managed relation metadata
#[async_trait]
pub trait RelationStore: Send + Sync {
    /// Whether relation tracking is configured
    fn supports_relations(&self) -> bool {
        true
    }

    /// Whether MIME tracking is configured
    fn supports_mime(&self) -> bool {
        true
    }

    /// Relations of the columns of `table`, in column order
    async fn foreign_relations(&self, database: &str, table: &str) -> Result<Vec<ForeignRelation>>;

    /// MIME types of the columns of `table`, in column order
    async fn mime_types(&self, database: &str, table: &str) -> Result<Vec<ColumnMimeType>>;
}
