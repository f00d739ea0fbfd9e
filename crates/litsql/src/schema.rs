//! Schema DDL contract.
//!
//! [`SchemaBuilder`] is the surface a database driver implements to inspect
//! and alter tables. This crate ships only [`NoopSchemaBuilder`], which
//! answers every call with `false`, an empty value or `()`.

use crate::error::QbResult;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Table identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    /// Database schema, e.g. `public`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl TableMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// `schema.name`, or just `name` without a schema.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Column definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMeta {
    pub name: String,
    /// SQL type as written in DDL, e.g. `varchar(255)`.
    pub data_type: String,
    pub nullable: bool,
    pub primary: bool,
    pub unique: bool,
    /// Default expression, copied verbatim into DDL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            ..Self::default()
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }
}

/// Foreign key between two tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignKeyMeta {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
}

/// A column whose live definition differs from its declared one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedColumn {
    pub column_name: String,
    pub has_primary_key: bool,
}

/// DDL operations a database driver provides.
pub trait SchemaBuilder: Send + Sync {
    /// Add a column. Returns whether the column was added.
    fn add_column(
        &self,
        table_name: &str,
        column: &ColumnMeta,
    ) -> impl Future<Output = QbResult<bool>> + Send;

    /// Add a foreign key. Returns whether it was added.
    fn add_foreign_key(
        &self,
        foreign_key: &ForeignKeyMeta,
    ) -> impl Future<Output = QbResult<bool>> + Send;

    fn add_unique_key(
        &self,
        table_name: &str,
        column_name: &str,
        key_name: &str,
    ) -> impl Future<Output = QbResult<()>> + Send;

    /// Redefine `column_name` as `new_column`.
    ///
    /// With `skip_primary` the primary-key property is left untouched.
    fn change_column(
        &self,
        table_name: &str,
        column_name: &str,
        new_column: &ColumnMeta,
        skip_primary: bool,
    ) -> impl Future<Output = QbResult<()>> + Send;

    fn table_exists(&self, table_name: &str) -> impl Future<Output = QbResult<bool>> + Send;

    fn create_table(
        &self,
        table: &TableMeta,
        columns: &[ColumnMeta],
    ) -> impl Future<Output = QbResult<()>> + Send;

    /// Drop a column. Returns whether the column was dropped.
    fn drop_column(
        &self,
        table_name: &str,
        column_name: &str,
    ) -> impl Future<Output = QbResult<bool>> + Send;

    fn drop_foreign_key(
        &self,
        table_name: &str,
        foreign_key_name: &str,
    ) -> impl Future<Output = QbResult<()>> + Send;

    /// Drop a foreign key described by its metadata.
    ///
    /// The default implementation calls [`SchemaBuilder::drop_foreign_key`].
    fn drop_foreign_key_meta(
        &self,
        foreign_key: &ForeignKeyMeta,
    ) -> impl Future<Output = QbResult<()>> + Send {
        self.drop_foreign_key(&foreign_key.table, &foreign_key.name)
    }

    fn drop_index(
        &self,
        table_name: &str,
        index_name: &str,
    ) -> impl Future<Output = QbResult<()>> + Send;

    /// Columns of `entity` whose live definition differs from `columns`.
    fn changed_columns(
        &self,
        entity: &str,
        columns: &[ColumnMeta],
    ) -> impl Future<Output = QbResult<Vec<ChangedColumn>>> + Send;

    /// Names of the foreign keys defined on `table`.
    fn foreign_keys(&self, table: &TableMeta) -> impl Future<Output = QbResult<Vec<String>>> + Send;

    /// Name of the primary-key constraint, `""` when there is none.
    fn primary_constraint_name(
        &self,
        table_name: &str,
    ) -> impl Future<Output = QbResult<String>> + Send;

    fn table_columns(&self, table_name: &str) -> impl Future<Output = QbResult<Vec<String>>> + Send;

    fn table_unique_keys(
        &self,
        table_name: &str,
    ) -> impl Future<Output = QbResult<Vec<String>>> + Send;
}

/// A [`SchemaBuilder`] that performs no DDL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSchemaBuilder;

impl NoopSchemaBuilder {
    pub fn new() -> Self {
        Self
    }
}

macro_rules! noop {
    ($op:literal, $table:expr, $ret:expr) => {{
        tracing::trace!(target: "litsql.schema", op = $op, table = %$table, "noop schema operation");
        async move { QbResult::Ok($ret) }
    }};
}

impl SchemaBuilder for NoopSchemaBuilder {
    fn add_column(
        &self,
        table_name: &str,
        _column: &ColumnMeta,
    ) -> impl Future<Output = QbResult<bool>> + Send {
        noop!("add_column", table_name, false)
    }

    fn add_foreign_key(
        &self,
        foreign_key: &ForeignKeyMeta,
    ) -> impl Future<Output = QbResult<bool>> + Send {
        noop!("add_foreign_key", foreign_key.table, false)
    }

    fn add_unique_key(
        &self,
        table_name: &str,
        _column_name: &str,
        _key_name: &str,
    ) -> impl Future<Output = QbResult<()>> + Send {
        noop!("add_unique_key", table_name, ())
    }

    fn change_column(
        &self,
        table_name: &str,
        _column_name: &str,
        _new_column: &ColumnMeta,
        _skip_primary: bool,
    ) -> impl Future<Output = QbResult<()>> + Send {
        noop!("change_column", table_name, ())
    }

    fn table_exists(&self, table_name: &str) -> impl Future<Output = QbResult<bool>> + Send {
        noop!("table_exists", table_name, false)
    }

    fn create_table(
        &self,
        table: &TableMeta,
        _columns: &[ColumnMeta],
    ) -> impl Future<Output = QbResult<()>> + Send {
        noop!("create_table", table.name, ())
    }

    fn drop_column(
        &self,
        table_name: &str,
        _column_name: &str,
    ) -> impl Future<Output = QbResult<bool>> + Send {
        noop!("drop_column", table_name, false)
    }

    fn drop_foreign_key(
        &self,
        table_name: &str,
        _foreign_key_name: &str,
    ) -> impl Future<Output = QbResult<()>> + Send {
        noop!("drop_foreign_key", table_name, ())
    }

    fn drop_index(
        &self,
        table_name: &str,
        _index_name: &str,
    ) -> impl Future<Output = QbResult<()>> + Send {
        noop!("drop_index", table_name, ())
    }

    fn changed_columns(
        &self,
        entity: &str,
        _columns: &[ColumnMeta],
    ) -> impl Future<Output = QbResult<Vec<ChangedColumn>>> + Send {
        noop!("changed_columns", entity, Vec::new())
    }

    fn foreign_keys(&self, table: &TableMeta) -> impl Future<Output = QbResult<Vec<String>>> + Send {
        noop!("foreign_keys", table.name, Vec::new())
    }

    fn primary_constraint_name(
        &self,
        table_name: &str,
    ) -> impl Future<Output = QbResult<String>> + Send {
        noop!("primary_constraint_name", table_name, String::new())
    }

    fn table_columns(&self, table_name: &str) -> impl Future<Output = QbResult<Vec<String>>> + Send {
        noop!("table_columns", table_name, Vec::new())
    }

    fn table_unique_keys(
        &self,
        table_name: &str,
    ) -> impl Future<Output = QbResult<Vec<String>>> + Send {
        noop!("table_unique_keys", table_name, Vec::new())
    }
}
