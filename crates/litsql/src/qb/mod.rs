//! SELECT query builder for litsql.
//!
//! The builder collects FROM, JOIN, WHERE, GROUP BY, HAVING and ORDER BY state
//! and renders it to a single SQL string, with every `:name` parameter token
//! replaced by the literal form of its bound value.
//!
//! # Features
//!
//! - **Literal output**: the built string is self-contained; no placeholder binding
//! - **Structured joins**: INNER/LEFT/RIGHT/FULL with ON or USING, plus CROSS and NATURAL
//! - **Dynamic tables**: FROM a type token, resolved through an injected callback
//! - **Raw escape hatch**: `where_raw`/`having_raw` fragments with named parameters
//!
//! # Usage
//!
//! ```ignore
//! use litsql::{qb, OrderDirection};
//!
//! let sql = qb::select("users u")
//!     .left_join("sessions s", "u.id = s.user_id")?
//!     .where_raw("u.created_at > :since")
//!     .eq("u.status", "active")
//!     .order_by("u.created_at", OrderDirection::Desc)
//!     .limit(20)
//!     .set_param("since", chrono::Utc::now())
//!     .build()?;
//! ```

mod expr;
pub mod render;
mod select;

pub use expr::{Expr, ExprGroup};
pub use select::{BuiltQuery, QueryBuilder};

use crate::clause::FromClause;
use crate::entity::EntityRef;

/// Create a SELECT query builder for the given entity.
///
/// A plain name may carry its alias (`"users u"`).
///
/// # Example
/// ```ignore
/// let qb = litsql::qb::select("users").eq("id", 1);
/// ```
pub fn select(entity: impl Into<EntityRef>) -> QueryBuilder {
    QueryBuilder::new().from(entity)
}

/// Create a SELECT query builder with a verbatim FROM expression.
///
/// Use this for FROM clauses that should not be split into name and alias,
/// such as subqueries or comma lists.
///
/// # Example
/// ```ignore
/// let qb = litsql::qb::select_from("(SELECT user_id FROM orders) o");
/// ```
pub fn select_from(from_expr: &str) -> QueryBuilder {
    QueryBuilder::new().from_clause_verbatim(FromClause {
        entity: EntityRef::Table(from_expr.trim().to_string()),
        alias: None,
    })
}

#[cfg(test)]
mod tests;
