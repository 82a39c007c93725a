//! Foreign key constraint extraction
//!
//! Constraint lines are cut out of each `CREATE TABLE` and collected as
//! `ALTER TABLE ... ADD ...` statements. The dump emits them once after all
//! tables of a database, so tables can be created in any order.

use std::sync::LazyLock;

use regex::Regex;

use crate::format::{SqlComments, backquote};

static HAS_CONSTRAINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CONSTRAINT|FOREIGN\s+KEY").expect("valid regex"));

static CONSTRAINT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(CONSTRAINT|FOREIGN\s+KEY)").expect("valid regex"));

static FOREIGN_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(FOREIGN\s+KEY)").expect("valid regex"));

static CONSTRAINT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CONSTRAINT\s(\S*)\s").expect("valid regex"));

/// Constraint statements collected over one export session
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    /// `None` until the first table with constraints opens the section
    display: Option<String>,
    query: String,
    drop_foreign_keys: String,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// ALTER statements with their headings, as written to the dump
    pub fn display(&self) -> &str {
        self.display.as_deref().unwrap_or_default()
    }

    /// ALTER statements without headings, for callers replaying them directly
    pub fn query(&self) -> &str {
        &self.query
    }

    /// `ALTER TABLE ... DROP FOREIGN KEY ...` statements for the named constraints.
    ///
    /// These are never written to the dump and are not reset by a flush; they
    /// accumulate over every database of the session until [`ConstraintSet::clear`].
    pub fn drop_foreign_keys(&self) -> &str {
        &self.drop_foreign_keys
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_none() && self.query.is_empty() && self.drop_foreign_keys.is_empty()
    }

    /// Hand out the display buffer and reset it, headings included
    pub fn take_display(&mut self) -> String {
        self.display.take().unwrap_or_default()
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Cut the constraint block out of `ddl` and record it in `constraints`.
///
/// `ddl` must already use `comments.crlf()` as its line terminator. The
/// block starts at the first line opening with `CONSTRAINT` or `FOREIGN KEY`
/// and runs while lines mention either keyword. Text without such a line is
/// returned unchanged.
pub fn extract_constraints(
    ddl: &str,
    database: &str,
    table: &str,
    comments: &SqlComments<'_>,
    with_headings: bool,
    constraints: &mut ConstraintSet,
) -> String {
    if !HAS_CONSTRAINT.is_match(ddl) {
        return ddl.to_string();
    }

    let crlf = comments.crlf();
    let mut lines: Vec<String> = ddl.split(crlf).map(str::to_string).collect();
    let Some(start) = lines.iter().position(|line| CONSTRAINT_LINE.is_match(line)) else {
        return ddl.to_string();
    };

    if start > 0 {
        strip_trailing_comma(&mut lines[start - 1]);
    }

    let display = constraints.display.get_or_insert_with(|| {
        if with_headings {
            format!(
                "{}{}{}{}",
                crlf,
                comments.blank(),
                comments.comment("Constraints for dumped tables"),
                comments.blank()
            )
        } else {
            String::new()
        }
    });
    if with_headings {
        display.push_str(crlf);
        display.push_str(&comments.blank());
        display.push_str(&comments.comment(&format!(
            "Constraints for table {}",
            backquote(table, true)
        )));
        display.push_str(&comments.blank());
    }

    let alter = format!("ALTER TABLE {}{}", backquote(table, true), crlf);
    display.push_str(&alter);
    constraints.query.push_str(&alter);

    let mut clauses = Vec::new();
    let mut drops = Vec::new();
    let mut end = start;
    while end < lines.len() && HAS_CONSTRAINT.is_match(&lines[end]) {
        let line = &lines[end];
        if line.contains("CONSTRAINT") {
            clauses.push(line.replacen("CONSTRAINT", "ADD CONSTRAINT", 1));
            if let Some(name) = CONSTRAINT_NAME.captures(line).and_then(|caps| caps.get(1)) {
                drops.push(format!("DROP FOREIGN KEY {}", name.as_str()));
            }
        } else {
            clauses.push(FOREIGN_KEY.replace(line, "ADD $1").into_owned());
        }
        end += 1;
    }
    if let Some(last) = clauses.last_mut() {
        strip_trailing_comma(last);
    }

    let clauses = clauses.join(crlf);
    display.push_str(&clauses);
    display.push(';');
    display.push_str(crlf);
    constraints.query.push_str(&clauses);
    constraints.query.push(';');

    if !drops.is_empty() {
        constraints.drop_foreign_keys.push_str(&format!(
            "ALTER TABLE {}.{}{}{};{}",
            backquote(database, true),
            backquote(table, true),
            crlf,
            drops.join(", "),
            crlf
        ));
    }

    format!("{}{}{}", lines[..start].join(crlf), crlf, lines[end..].join(crlf))
}

fn strip_trailing_comma(line: &mut String) {
    if line.ends_with(',') {
        line.pop();
    }
}
