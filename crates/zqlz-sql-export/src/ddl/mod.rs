//! Rewriting of engine-reported `CREATE` statements
//!
//! `SHOW CREATE TABLE` output is not always what the dump should replay:
//! line endings follow the server, views carry the database qualifier, and
//! foreign keys must be added only after every table exists.

mod constraints;
mod rewrite;


pub use constraints::*;
pub use rewrite::*;
