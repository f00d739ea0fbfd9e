//! Entity references and table-name resolution.
//!
//! A FROM target is either a plain table name or a [`DynamicRef`], a type
//! token standing in for a table whose name is owned by some metadata layer.
//! Dynamic references are turned into names by a [`TableNameResolver`]
//! injected into the builder.
//!
//! # Example
//! ```ignore
//! use litsql::{DynamicRef, QueryBuilder};
//! use std::any::TypeId;
//! use std::sync::Arc;
//!
//! struct User;
//!
//! let qb = QueryBuilder::with_resolver(Arc::new(|r: &DynamicRef| {
//!     if r.type_id() == TypeId::of::<User>() { "users".into() } else { r.short_name().to_lowercase() }
//! }))
//! .from(DynamicRef::of::<User>());
//! assert_eq!(qb.table_name()?, "users");
//! # Ok::<(), litsql::QbError>(())
//! ```

use crate::clause::FromClause;
use crate::error::{QbError, QbResult};
use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::Arc;

/// Maps a dynamic reference to a table name.
pub type TableNameResolver = Arc<dyn Fn(&DynamicRef) -> String + Send + Sync>;

/// A type token standing in for a table name.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DynamicRef {
    type_id: TypeId,
    type_name: &'static str,
}

impl DynamicRef {
    /// Reference the table backing type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type name, e.g. `my_app::models::User`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Last path segment of the type name, e.g. `User`.
    pub fn short_name(&self) -> &'static str {
        let base = self.type_name.split('<').next().unwrap_or(self.type_name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Check whether this references type `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for DynamicRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DynamicRef").field(&self.type_name).finish()
    }
}

/// A FROM entity: a table name or a dynamic reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Table(String),
    Dynamic(DynamicRef),
}

impl EntityRef {
    /// Reference the table backing type `T`.
    pub fn model<T: ?Sized + 'static>() -> Self {
        EntityRef::Dynamic(DynamicRef::of::<T>())
    }
}

impl From<&str> for EntityRef {
    fn from(v: &str) -> Self {
        EntityRef::Table(v.to_string())
    }
}

impl From<String> for EntityRef {
    fn from(v: String) -> Self {
        EntityRef::Table(v)
    }
}

impl From<&String> for EntityRef {
    fn from(v: &String) -> Self {
        EntityRef::Table(v.clone())
    }
}

impl From<DynamicRef> for EntityRef {
    fn from(v: DynamicRef) -> Self {
        EntityRef::Dynamic(v)
    }
}

/// Resolve the table name of a FROM clause.
///
/// Plain names are returned unchanged, even when a resolver is configured.
pub fn resolve_table_name(
    from: Option<&FromClause>,
    resolver: Option<&TableNameResolver>,
) -> QbResult<String> {
    let from = from.ok_or_else(|| {
        QbError::configuration("Table name must be specified using from()")
    })?;

    match &from.entity {
        EntityRef::Table(name) => Ok(name.clone()),
        EntityRef::Dynamic(reference) => {
            let resolver = resolver.ok_or_else(|| {
                QbError::configuration("getTableNameCallback is required to resolve entity names")
            })?;
            Ok(resolver(reference))
        }
    }
}
