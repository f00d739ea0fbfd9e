//! # litsql
//!
//! A fluent SELECT builder that renders self-contained SQL text.
//!
//! ## Features
//!
//! - **Literal output**: `:name` parameters are replaced with escaped SQL literals at build time
//! - **Structured clauses**: FROM, JOIN (ON/USING/CROSS/NATURAL), WHERE, GROUP BY, HAVING, ORDER BY
//! - **Value semantics**: every mutator returns a new builder, so intermediate states can be kept
//! - **Dynamic tables**: FROM a type token, resolved by an injected callback
//! - **Explicit errors**: configuration and validation failures are `QbError` values, never panics
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use litsql::{qb, OrderDirection};
//!
//! let sql = qb::select("users u")
//!     .inner_join("sessions s", "u.id = s.user_id")?
//!     .where_raw("u.id = :id AND u.name = :name")
//!     .order_by("s.created_at", OrderDirection::Desc)
//!     .limit(10)
//!     .set_param(":id", 1)
//!     .set_param(":name", "John")
//!     .build()?;
//! ```
//!
//! ## Logging
//!
//! Built SQL is emitted at `debug` level under the `litsql.sql` target via
//! `tracing`. Install any subscriber to see it.

pub mod clause;
pub mod config;
pub mod entity;
pub mod error;
pub mod param;
pub mod qb;
pub mod schema;
pub mod value;

pub use clause::{
    ConditionType, FromClause, JoinClause, JoinType, OrderByEntry, OrderDirection,
};
pub use config::{BoolStyle, BuilderConfig};
pub use entity::{DynamicRef, EntityRef, TableNameResolver, resolve_table_name};
pub use error::{QbError, QbResult};
pub use param::{ParamRegistry, Parameter, substitute};
pub use schema::{
    ChangedColumn, ColumnMeta, ForeignKeyMeta, NoopSchemaBuilder, SchemaBuilder, TableMeta,
};
pub use value::{Value, format_value};

// Re-export qb module for easy access
pub use qb::{BuiltQuery, Expr, ExprGroup, QueryBuilder, select, select_from};
