//! Clause renderers: pure functions from clause state to SQL text.

use crate::clause::{ConditionType, FromClause, JoinClause, OrderByEntry};
use crate::entity::{TableNameResolver, resolve_table_name};
use crate::error::{QbError, QbResult};

/// `SELECT <columns> FROM <table>[ <alias>]`.
///
/// An empty projection renders as `*`.
pub fn render_select(
    columns: &[String],
    distinct: bool,
    from: Option<&FromClause>,
    resolver: Option<&TableNameResolver>,
) -> QbResult<String> {
    let table = resolve_table_name(from, resolver)?;
    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    };

    let mut sql = String::with_capacity(16 + projection.len() + table.len());
    sql.push_str("SELECT ");
    if distinct {
        sql.push_str("DISTINCT ");
    }
    sql.push_str(&projection);
    sql.push_str(" FROM ");
    sql.push_str(&table);
    if let Some(alias) = from.and_then(|f| present(f.alias.as_deref())) {
        sql.push(' ');
        sql.push_str(alias);
    }
    Ok(sql)
}

/// A trimmed alias, or `None` when it is absent or blank.
fn present(alias: Option<&str>) -> Option<&str> {
    alias.map(str::trim).filter(|a| !a.is_empty())
}

fn write_join(out: &mut String, join: &JoinClause) {
    out.push_str(join.join_type.keyword());
    out.push_str(" JOIN ");
    out.push_str(&join.entity);
    if let Some(alias) = present(join.alias.as_deref()) {
        out.push(' ');
        out.push_str(alias);
    }

    if join.join_type.takes_condition() {
        match (join.condition_type, join.criteria.as_deref()) {
            (Some(ConditionType::Using), Some(criteria)) => {
                out.push_str(" USING (");
                out.push_str(criteria);
                out.push(')');
            }
            (Some(ConditionType::On), Some(criteria)) => {
                out.push_str(" ON ");
                out.push_str(criteria);
            }
            _ => {}
        }
    }
}

/// Space-separated JOIN fragments in insertion order; `""` when there are none.
pub fn render_joins(joins: &[JoinClause]) -> String {
    let mut out = String::new();
    for (i, join) in joins.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_join(&mut out, join);
    }
    out
}

/// ` ORDER BY c1 ASC, c2 DESC`, or `""` for an empty list.
pub fn render_order_by(entries: &[OrderByEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = entries
        .iter()
        .map(|e| format!("{} {}", e.column, e.direction.unwrap_or_default()))
        .collect();
    format!(" ORDER BY {}", parts.join(", "))
}

/// Fails unless at least one column is non-blank.
pub fn validate_group_by<S: AsRef<str>>(columns: &[S]) -> QbResult<()> {
    if columns.iter().all(|c| c.as_ref().trim().is_empty()) {
        return Err(QbError::validation(
            "GROUP BY requires at least one non-empty column",
        ));
    }
    Ok(())
}

/// ` GROUP BY c1, c2`, or `""` for an empty list.
pub fn render_group_by(columns: &[String]) -> String {
    if columns.is_empty() {
        String::new()
    } else {
        format!(" GROUP BY {}", columns.join(", "))
    }
}
