//! Target column names for dumped rows
//!
//! A data query may alias its columns (`SELECT name AS n FROM t`). INSERT
//! and UPDATE statements in the dump must name the real table columns, so the
//! SELECT projection is parsed to map each output position back to its source
//! column.

use sqlparser::ast::{Expr, SelectItem, SetExpr, Statement};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use zqlz_core::ColumnMeta;

/// Source column of each projected expression, by output position.
///
/// Positions holding something other than a plain column reference are
/// `None`. A wildcard anywhere in the projection, or a statement that does not
/// parse as a single SELECT, yields an empty list.
pub fn select_source_columns(sql: &str) -> Vec<Option<String>> {
    let statements = match Parser::parse_sql(&MySqlDialect {}, sql) {
        Ok(statements) => statements,
        Err(e) => {
            tracing::debug!(error = %e, "data query not parsed, using result column names");
            return Vec::new();
        }
    };

    let [Statement::Query(query)] = statements.as_slice() else {
        return Vec::new();
    };
    let SetExpr::Select(select) = query.body.as_ref() else {
        return Vec::new();
    };

    let mut columns = Vec::with_capacity(select.projection.len());
    for item in &select.projection {
        let expr = match item {
            SelectItem::UnnamedExpr(expr) => expr,
            SelectItem::ExprWithAlias { expr, .. } => expr,
            SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => return Vec::new(),
        };
        columns.push(column_name(expr));
    }
    columns
}

fn column_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.clone()),
        Expr::CompoundIdentifier(parts) => parts.last().map(|ident| ident.value.clone()),
        Expr::Nested(inner) => column_name(inner),
        _ => None,
    }
}

/// Column names for the dumped statements, one per result column.
///
/// The parsed SELECT wins; otherwise the column's reported original name,
/// then its result name.
pub fn resolve_column_names(sql: &str, columns: &[ColumnMeta]) -> Vec<String> {
    let sources = select_source_columns(sql);
    columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            sources
                .get(idx)
                .cloned()
                .flatten()
                .unwrap_or_else(|| column.source_name().to_string())
        })
        .collect()
}
