//! SELECT query builder with literal parameter substitution.

use crate::clause::{
    ConditionType, FromClause, JoinClause, JoinType, OrderByEntry, OrderDirection, non_blank,
    split_alias,
};
use crate::config::BuilderConfig;
use crate::entity::{EntityRef, TableNameResolver, resolve_table_name};
use crate::error::QbResult;
use crate::param::{ParamRegistry, Parameter, substitute};
use crate::qb::expr::{Expr, ExprGroup};
use crate::qb::render;
use crate::value::Value;
use std::fmt;

/// Un-substituted SQL plus its named parameters, for callers that bind
/// parameters themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    /// SQL with `:name` tokens still in place.
    pub sql: String,
    /// Parameters in insertion order.
    pub params: Vec<Parameter>,
}

/// Fluent SELECT builder.
///
/// Every mutator consumes the builder and returns it, so intermediate states
/// can be cloned and inspected. Mutators that validate their input return
/// [`QbResult<Self>`](crate::QbResult).
///
/// # Example
/// ```ignore
/// use litsql::{OrderDirection, QueryBuilder};
///
/// let sql = QueryBuilder::new()
///     .from_as("users", "u")
///     .inner_join("sessions s", "u.id = s.user_id")?
///     .where_raw("u.id = :id")
///     .order_by("u.name", OrderDirection::Asc)
///     .set_param(":id", 1)
///     .build()?;
/// assert_eq!(
///     sql,
///     "SELECT * FROM users u INNER JOIN sessions s ON u.id = s.user_id WHERE u.id = 1 ORDER BY u.name ASC"
/// );
/// # Ok::<(), litsql::QbError>(())
/// ```
#[derive(Clone, Default)]
pub struct QueryBuilder {
    /// FROM target
    from: Option<FromClause>,
    /// SELECT columns (empty renders as `*`)
    select_cols: Vec<String>,
    distinct: bool,
    /// JOIN clauses
    joins: Vec<JoinClause>,
    /// WHERE conditions
    where_group: ExprGroup,
    /// GROUP BY columns
    group_by: Vec<String>,
    /// HAVING conditions
    having_group: ExprGroup,
    /// ORDER BY entries
    order_by: Vec<OrderByEntry>,
    limit: Option<u64>,
    offset: Option<u64>,
    /// Named parameters
    params: ParamRegistry,
    resolver: Option<TableNameResolver>,
    config: BuilderConfig,
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("from", &self.from)
            .field("select_cols", &self.select_cols)
            .field("distinct", &self.distinct)
            .field("joins", &self.joins)
            .field("where_group", &self.where_group)
            .field("group_by", &self.group_by)
            .field("having_group", &self.having_group)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("params", &self.params)
            .field("resolver", &self.resolver.as_ref().map(|_| "<fn>"))
            .field("config", &self.config)
            .finish()
    }
}

/// Split an `"entity alias"` string unless it looks like a subquery.
fn entity_and_alias(entity: &str) -> (String, Option<String>) {
    if entity.contains('(') {
        (entity.trim().to_string(), None)
    } else {
        split_alias(entity)
    }
}

impl QueryBuilder {
    /// Create an empty builder without a table-name resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder that resolves dynamic entity references with `resolver`.
    pub fn with_resolver(resolver: TableNameResolver) -> Self {
        Self {
            resolver: Some(resolver),
            ..Self::default()
        }
    }

    /// Create an empty builder with the given configuration.
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the table-name resolver.
    pub fn resolver(mut self, resolver: TableNameResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replace the builder configuration.
    pub fn config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn builder_config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Clear all clause state and parameters, keeping resolver and configuration.
    pub fn reset(self) -> Self {
        Self {
            resolver: self.resolver,
            config: self.config,
            ..Self::default()
        }
    }

    // ==================== FROM ====================

    /// Set the FROM target. The last call wins.
    ///
    /// A plain name may carry its alias (`"users u"`).
    pub fn from(mut self, entity: impl Into<EntityRef>) -> Self {
        self.from = Some(match entity.into() {
            EntityRef::Table(name) => {
                let (name, alias) = entity_and_alias(&name);
                FromClause {
                    entity: EntityRef::Table(name),
                    alias,
                }
            }
            dynamic => FromClause {
                entity: dynamic,
                alias: None,
            },
        });
        self
    }

    /// Set the FROM target with an explicit alias.
    pub fn from_as(mut self, entity: impl Into<EntityRef>, alias: &str) -> Self {
        self.from = Some(FromClause {
            entity: entity.into(),
            alias: non_blank(alias),
        });
        self
    }

    pub(crate) fn from_clause_verbatim(mut self, from: FromClause) -> Self {
        self.from = Some(from);
        self
    }

    /// The FROM clause, if set.
    pub fn from_clause(&self) -> Option<&FromClause> {
        self.from.as_ref()
    }

    /// Resolve the FROM table name.
    pub fn table_name(&self) -> QbResult<String> {
        resolve_table_name(self.from.as_ref(), self.resolver.as_ref())
    }

    // ==================== SELECT columns ====================

    /// Set SELECT columns (string form, supports complex expressions).
    pub fn select(mut self, cols: &str) -> Self {
        self.select_cols = vec![cols.to_string()];
        self
    }

    /// Set SELECT columns (array form).
    pub fn select_cols(mut self, cols: &[&str]) -> Self {
        self.select_cols = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Append one SELECT column.
    pub fn add_select(mut self, col: &str) -> Self {
        if self.select_cols.len() == 1 && self.select_cols[0] == "*" {
            self.select_cols[0] = col.to_string();
        } else {
            self.select_cols.push(col.to_string());
        }
        self
    }

    /// Render `SELECT DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ==================== JOIN ====================

    /// Append a validated join.
    ///
    /// Fails when the entity is empty, or when a join that takes a condition
    /// uses `ON` without criteria.
    pub fn join(mut self, clause: JoinClause) -> QbResult<Self> {
        clause.validate()?;
        self.joins.push(clause);
        Ok(self)
    }

    /// Append a join from its parts. A blank alias counts as no alias.
    pub fn add_join(
        self,
        join_type: JoinType,
        entity: &str,
        alias: Option<&str>,
        condition_type: Option<ConditionType>,
        criteria: Option<&str>,
    ) -> QbResult<Self> {
        self.join(JoinClause {
            join_type,
            entity: entity.to_string(),
            alias: alias.and_then(non_blank),
            condition_type,
            criteria: criteria.map(str::to_string),
        })
    }

    fn join_on(self, join_type: JoinType, entity: &str, on: &str) -> QbResult<Self> {
        let (entity, alias) = entity_and_alias(entity);
        self.join(JoinClause {
            join_type,
            entity,
            alias,
            condition_type: Some(ConditionType::On),
            criteria: Some(on.to_string()),
        })
    }

    fn join_using(self, join_type: JoinType, entity: &str, columns: &[&str]) -> QbResult<Self> {
        let (entity, alias) = entity_and_alias(entity);
        self.join(JoinClause {
            join_type,
            entity,
            alias,
            condition_type: Some(ConditionType::Using),
            criteria: Some(columns.join(", ")),
        })
    }

    /// Add `INNER JOIN <entity> ON <on>`.
    pub fn inner_join(self, entity: &str, on: &str) -> QbResult<Self> {
        self.join_on(JoinType::Inner, entity, on)
    }

    /// Add `LEFT JOIN <entity> ON <on>`.
    pub fn left_join(self, entity: &str, on: &str) -> QbResult<Self> {
        self.join_on(JoinType::Left, entity, on)
    }

    /// Add `RIGHT JOIN <entity> ON <on>`.
    pub fn right_join(self, entity: &str, on: &str) -> QbResult<Self> {
        self.join_on(JoinType::Right, entity, on)
    }

    /// Add `FULL JOIN <entity> ON <on>`.
    pub fn full_join(self, entity: &str, on: &str) -> QbResult<Self> {
        self.join_on(JoinType::Full, entity, on)
    }

    /// Add `INNER JOIN <entity> USING (<columns>)`.
    pub fn inner_join_using(self, entity: &str, columns: &[&str]) -> QbResult<Self> {
        self.join_using(JoinType::Inner, entity, columns)
    }

    /// Add `LEFT JOIN <entity> USING (<columns>)`.
    pub fn left_join_using(self, entity: &str, columns: &[&str]) -> QbResult<Self> {
        self.join_using(JoinType::Left, entity, columns)
    }

    /// Add `RIGHT JOIN <entity> USING (<columns>)`.
    pub fn right_join_using(self, entity: &str, columns: &[&str]) -> QbResult<Self> {
        self.join_using(JoinType::Right, entity, columns)
    }

    /// Add `FULL JOIN <entity> USING (<columns>)`.
    pub fn full_join_using(self, entity: &str, columns: &[&str]) -> QbResult<Self> {
        self.join_using(JoinType::Full, entity, columns)
    }

    /// Add `CROSS JOIN <entity>`.
    pub fn cross_join(self, entity: &str) -> QbResult<Self> {
        let (entity, alias) = entity_and_alias(entity);
        self.join(JoinClause {
            alias,
            ..JoinClause::new(JoinType::Cross, entity)
        })
    }

    /// Add `NATURAL JOIN <entity>`.
    pub fn natural_join(self, entity: &str) -> QbResult<Self> {
        let (entity, alias) = entity_and_alias(entity);
        self.join(JoinClause {
            alias,
            ..JoinClause::new(JoinType::Natural, entity)
        })
    }

    /// Joins in insertion order.
    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    // ==================== WHERE ====================

    /// Add a raw WHERE fragment. It may contain `:name` tokens.
    pub fn where_raw(mut self, sql: &str) -> Self {
        self.where_group.and_expr(Expr::raw(sql));
        self
    }

    /// Add WHERE: column = value
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.where_group.and_expr(Expr::eq(column, value));
        self
    }

    /// Add WHERE: column != value
    pub fn ne(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.where_group.and_expr(Expr::ne(column, value));
        self
    }

    /// Add WHERE: column > value
    pub fn gt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.where_group.and_expr(Expr::gt(column, value));
        self
    }

    /// Add WHERE: column >= value
    pub fn gte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.where_group.and_expr(Expr::gte(column, value));
        self
    }

    /// Add WHERE: column < value
    pub fn lt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.where_group.and_expr(Expr::lt(column, value));
        self
    }

    /// Add WHERE: column <= value
    pub fn lte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.where_group.and_expr(Expr::lte(column, value));
        self
    }

    /// Add WHERE: column LIKE pattern
    pub fn like(mut self, column: &str, pattern: impl Into<Value>) -> Self {
        self.where_group.and_expr(Expr::like(column, pattern));
        self
    }

    /// Add WHERE: column ILIKE pattern
    pub fn ilike(mut self, column: &str, pattern: impl Into<Value>) -> Self {
        self.where_group.and_expr(Expr::ilike(column, pattern));
        self
    }

    /// Add WHERE: column NOT LIKE pattern
    pub fn not_like(mut self, column: &str, pattern: impl Into<Value>) -> Self {
        self.where_group.and_expr(Expr::not_like(column, pattern));
        self
    }

    /// Add WHERE: column IS NULL
    pub fn is_null(mut self, column: &str) -> Self {
        self.where_group.and_expr(Expr::is_null(column));
        self
    }

    /// Add WHERE: column IS NOT NULL
    pub fn is_not_null(mut self, column: &str) -> Self {
        self.where_group.and_expr(Expr::is_not_null(column));
        self
    }

    /// Add WHERE: column IN (values...)
    pub fn in_list<T: Into<Value>>(mut self, column: &str, values: Vec<T>) -> Self {
        self.where_group.and_expr(Expr::in_list(column, values));
        self
    }

    /// Add WHERE: column NOT IN (values...)
    pub fn not_in<T: Into<Value>>(mut self, column: &str, values: Vec<T>) -> Self {
        self.where_group.and_expr(Expr::not_in(column, values));
        self
    }

    /// Add WHERE: column BETWEEN from AND to
    pub fn between(mut self, column: &str, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        self.where_group.and_expr(Expr::between(column, from, to));
        self
    }

    /// AND a custom expression into WHERE.
    pub fn and_expr(mut self, expr: Expr) -> Self {
        self.where_group.and_expr(expr);
        self
    }

    /// OR a custom expression with everything already in WHERE.
    pub fn or_where(mut self, expr: Expr) -> Self {
        self.where_group.or_expr(expr);
        self
    }

    // ==================== GROUP BY / HAVING ====================

    /// Set GROUP BY columns. Blank entries are dropped; at least one must remain.
    pub fn group_by<S: AsRef<str>>(mut self, columns: &[S]) -> QbResult<Self> {
        render::validate_group_by(columns)?;
        self.group_by = columns
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Ok(self)
    }

    /// AND a HAVING condition.
    pub fn having(mut self, expr: Expr) -> Self {
        self.having_group.and_expr(expr);
        self
    }

    /// Add a raw HAVING fragment. It may contain `:name` tokens.
    pub fn having_raw(mut self, sql: &str) -> Self {
        self.having_group.and_expr(Expr::raw(sql));
        self
    }

    // ==================== ORDER BY ====================

    /// Replace ORDER BY with a single entry.
    pub fn order_by(mut self, column: &str, direction: impl Into<Option<OrderDirection>>) -> Self {
        self.order_by = vec![OrderByEntry::new(column, direction.into())];
        self
    }

    /// Append an ORDER BY entry.
    pub fn add_order_by(
        mut self,
        column: &str,
        direction: impl Into<Option<OrderDirection>>,
    ) -> Self {
        self.order_by.push(OrderByEntry::new(column, direction.into()));
        self
    }

    /// ORDER BY entries in insertion order.
    pub fn order_by_entries(&self) -> &[OrderByEntry] {
        &self.order_by
    }

    // ==================== Pagination ====================

    /// Set LIMIT.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        let p = page.max(1);
        let size = per_page.max(1);
        self.limit = Some(size);
        self.offset = Some((p - 1).saturating_mul(size));
        self
    }

    // ==================== Parameters ====================

    /// Insert or overwrite a named parameter.
    pub fn set_parameter(mut self, param: Parameter) -> Self {
        self.params.set(param);
        self
    }

    /// Insert or overwrite a named parameter from its parts.
    pub fn set_param(self, name: &str, value: impl Into<Value>) -> Self {
        self.set_parameter(Parameter::new(name, value))
    }

    /// Insert or overwrite several parameters.
    pub fn set_parameters(mut self, params: impl IntoIterator<Item = Parameter>) -> Self {
        for param in params {
            self.params.set(param);
        }
        self
    }

    /// Registered parameters.
    pub fn parameters(&self) -> &ParamRegistry {
        &self.params
    }

    // ==================== Rendering ====================

    /// `SELECT <columns> FROM <table>[ <alias>]`.
    pub fn render_select(&self) -> QbResult<String> {
        render::render_select(
            &self.select_cols,
            self.distinct,
            self.from.as_ref(),
            self.resolver.as_ref(),
        )
    }

    /// JOIN fragments, `""` when there are none.
    pub fn render_joins(&self) -> String {
        render::render_joins(&self.joins)
    }

    /// ` ORDER BY ...`, `""` when there are no entries.
    pub fn render_order_by(&self) -> String {
        render::render_order_by(&self.order_by)
    }

    /// Everything after the FROM entity up to, not including, ORDER BY.
    fn render_body(&self, sql: &mut String) {
        let joins = self.render_joins();
        if !joins.is_empty() {
            sql.push(' ');
            sql.push_str(&joins);
        }

        let where_sql = self.where_group.build(self.config.bool_style);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        sql.push_str(&render::render_group_by(&self.group_by));

        let having_sql = self.having_group.build(self.config.bool_style);
        if !having_sql.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&having_sql);
        }
    }

    fn render_raw(&self) -> QbResult<String> {
        let mut sql = self.render_select()?;
        self.render_body(&mut sql);
        sql.push_str(&self.render_order_by());

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        Ok(sql)
    }

    fn finish(&self, raw: &str) -> QbResult<String> {
        let sql = substitute(raw, &self.params, &self.config)?;
        tracing::debug!(
            target: "litsql.sql",
            sql = %self.config.truncate_for_log(&sql),
            params = self.params.len(),
            "built query"
        );
        Ok(sql)
    }

    /// Build the SQL with `:name` tokens left in place, plus the parameters.
    pub fn build_parts(&self) -> QbResult<BuiltQuery> {
        Ok(BuiltQuery {
            sql: self.render_raw()?,
            params: self.params.to_vec(),
        })
    }

    /// Build the final SQL with parameter literals substituted.
    pub fn build(&self) -> QbResult<String> {
        let raw = self.render_raw()?;
        self.finish(&raw)
    }

    /// Alias for [`build`](Self::build).
    pub fn to_sql(&self) -> QbResult<String> {
        self.build()
    }

    /// Build a `COUNT(*)` query over the same rows.
    ///
    /// With DISTINCT, GROUP BY or HAVING the query is wrapped in a subquery,
    /// keeping the DISTINCT projection so duplicates are not counted.
    pub fn to_count_sql(&self) -> QbResult<String> {
        let grouped = !self.group_by.is_empty() || !self.having_group.is_empty();
        let wrapped = grouped || self.distinct;

        let mut sql = if self.distinct {
            self.render_select()?
        } else {
            let table = self.table_name()?;
            let from_sql = match self.from.as_ref().and_then(|f| f.alias.as_deref()) {
                Some(alias) => format!("{table} {alias}"),
                None => table,
            };
            if grouped {
                format!("SELECT 1 FROM {from_sql}")
            } else {
                format!("SELECT COUNT(*) FROM {from_sql}")
            }
        };
        self.render_body(&mut sql);
        if wrapped {
            sql = format!("SELECT COUNT(*) FROM ({sql}) AS t");
        }
        self.finish(&sql)
    }
}
