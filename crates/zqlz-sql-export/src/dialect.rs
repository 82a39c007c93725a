//! Target dialect capabilities
//!
//! The dump targets MySQL or Drizzle. Everything the two disagree on is
//! answered by a capability method here so the formatter never compares
//! driver names.

use serde::{Deserialize, Serialize};

/// SQL dialect the dump is produced for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpDialect {
    #[default]
    MySql,
    Drizzle,
}

impl DumpDialect {
    /// Pick the dialect for a connection's driver name
    pub fn from_driver_name(driver_name: &str) -> Self {
        if driver_name.eq_ignore_ascii_case("drizzle") {
            DumpDialect::Drizzle
        } else {
            DumpDialect::MySql
        }
    }

    /// The engine reports `ROW_FORMAT='...'` quoted, which its own parser rejects
    pub fn quotes_row_format(&self) -> bool {
        matches!(self, DumpDialect::Drizzle)
    }

    /// Stored procedures and functions exist
    pub fn supports_routines(&self) -> bool {
        matches!(self, DumpDialect::MySql)
    }

    /// Scheduled events exist
    pub fn supports_events(&self) -> bool {
        matches!(self, DumpDialect::MySql)
    }

    /// `INSERT DELAYED` is accepted
    pub fn supports_insert_delayed(&self) -> bool {
        matches!(self, DumpDialect::MySql)
    }

    /// The session time zone can be switched; Drizzle only runs in UTC
    pub fn supports_utc_time_override(&self) -> bool {
        matches!(self, DumpDialect::MySql)
    }

    /// `/*!40101 SET NAMES ... */` charset directives are understood
    pub fn supports_charset_directives(&self) -> bool {
        matches!(self, DumpDialect::MySql)
    }

    /// `SQL_MODE = "NO_AUTO_VALUE_ON_ZERO"` keeps zero AUTO_INCREMENT values
    pub fn supports_zero_auto_values(&self) -> bool {
        matches!(self, DumpDialect::MySql)
    }

    /// Identifier quoting in `SHOW CREATE TABLE` is toggled by `SQL_QUOTE_SHOW_CREATE`
    pub fn controls_quote_show_create(&self) -> bool {
        matches!(self, DumpDialect::MySql)
    }

    /// `CREATE DATABASE` takes only a `COLLATE` clause, no character set
    pub fn collate_only_database_charset(&self) -> bool {
        matches!(self, DumpDialect::Drizzle)
    }

    /// `USE` is always backquoted, whatever the compatibility mode
    pub fn always_backquotes_use(&self) -> bool {
        matches!(self, DumpDialect::Drizzle)
    }

    /// Character set and collation clause for `CREATE DATABASE`.
    ///
    /// The character set is the collation up to its first `_`; a collation
    /// without `_` is used as the character set and no `COLLATE` is emitted.
    pub fn database_charset_clause(&self, collation: &str) -> String {
        if self.collate_only_database_charset() {
            return format!(" COLLATE {}", collation);
        }
        match collation.find('_') {
            Some(pos) if pos > 0 => format!(
                " DEFAULT CHARACTER SET {} COLLATE {}",
                &collation[..pos],
                collation
            ),
            _ => format!(" DEFAULT CHARACTER SET {}", collation),
        }
    }
}
