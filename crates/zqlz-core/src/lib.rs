//! ZQLZ Core - Collaborator abstractions for SQL dumps
//!
//! This crate provides the traits and types the dump formatter depends on.
//! It defines:
//!
//! - `Connection` - Query execution, streaming fetch, and value escaping
//! - `SchemaIntrospection` - Table status, DDL, columns, routines, events, triggers
//! - `RelationStore` - Configured relation and MIME annotations per table
//! - Common types like `Value`, `Row`, `ColumnMeta`, etc.

mod connection;
mod error;
mod relation;
mod schema;
mod types;

pub use connection::*;
pub use error::*;
pub use relation::*;
pub use schema::*;
pub use types::*;
