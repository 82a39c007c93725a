//! Single-pass DDL text rewrites

use std::sync::LazyLock;

use regex::Regex;

use crate::format::backquote;

static QUOTED_ROW_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ROW_FORMAT='(\S+)'").expect("valid regex"));

static AUTO_INCREMENT_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AUTO_INCREMENT\s*=\s*[0-9]+").expect("valid regex"));

/// Convert the server's line endings to `crlf`.
///
/// The terminator is detected from the one that follows the opening
/// parenthesis of the column list; text without such a line is left as is.
pub fn normalize_line_endings(ddl: &str, crlf: &str) -> String {
    for terminator in ["\r\n", "\n", "\r"] {
        if ddl.contains(&format!("({} ", terminator)) {
            return ddl.replace(terminator, crlf);
        }
    }
    ddl.to_string()
}

/// Remove every `` `db`. `` qualifier so a view can be replayed into another database
pub fn strip_database_qualifier(ddl: &str, database: &str) -> String {
    ddl.replace(&format!("{}.", backquote(database, true)), "")
}

/// `CREATE TABLE` at the very start becomes `CREATE TABLE IF NOT EXISTS`
pub fn add_if_not_exists(ddl: &str) -> String {
    match ddl.strip_prefix("CREATE TABLE") {
        Some(rest) => format!("CREATE TABLE IF NOT EXISTS{}", rest),
        None => ddl.to_string(),
    }
}

/// `ROW_FORMAT='COMPACT'` becomes `ROW_FORMAT=COMPACT`
pub fn unquote_row_format(ddl: &str) -> String {
    QUOTED_ROW_FORMAT.replace_all(ddl, "ROW_FORMAT=$1").into_owned()
}

/// Drop `AUTO_INCREMENT = n` table options; the counter reflects live state
pub fn strip_auto_increment(ddl: &str) -> String {
    AUTO_INCREMENT_CLAUSE.replace_all(ddl, "").into_owned()
}
