//! Expression layer for WHERE/HAVING conditions.
//!
//! [`Expr`] supports AND/OR/NOT grouping, the usual comparison operators and
//! raw fragments. Values are rendered inline as SQL literals through
//! [`Value::to_sql_literal`]; raw fragments may carry `:name` tokens that are
//! substituted when the whole statement is built.

use crate::config::BoolStyle;
use crate::value::Value;

/// Expression node for building WHERE/HAVING clauses.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// AND group: all conditions must be true.
    And(Vec<Expr>),

    /// OR group: at least one condition must be true.
    Or(Vec<Expr>),

    /// NOT: negate the inner expression.
    Not(Box<Expr>),

    /// Simple comparison: column op literal
    Compare {
        column: String,
        op: &'static str,
        value: Value,
    },

    /// NULL check: column IS NULL or column IS NOT NULL
    NullCheck { column: String, is_null: bool },

    /// IN list: column IN (v1, v2, ...) or column NOT IN (...)
    InList {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },

    /// BETWEEN: column BETWEEN a AND b
    Between {
        column: String,
        from: Value,
        to: Value,
        negated: bool,
    },

    /// Raw SQL fragment, may contain `:name` tokens.
    Raw(String),

    /// Always true (used for empty NOT IN lists).
    True,

    /// Always false (used for empty IN lists).
    False,
}

impl Expr {
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    fn compare(column: impl Into<String>, op: &'static str, value: impl Into<Value>) -> Self {
        Expr::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// column = value
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "=", value)
    }

    /// column != value
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "!=", value)
    }

    /// column > value
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, ">", value)
    }

    /// column >= value
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, ">=", value)
    }

    /// column < value
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "<", value)
    }

    /// column <= value
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "<=", value)
    }

    /// column LIKE pattern
    pub fn like(column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::compare(column, "LIKE", pattern)
    }

    /// column ILIKE pattern
    pub fn ilike(column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::compare(column, "ILIKE", pattern)
    }

    /// column NOT LIKE pattern
    pub fn not_like(column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::compare(column, "NOT LIKE", pattern)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            is_null: true,
        }
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            is_null: false,
        }
    }

    /// column IN (values...); an empty list is always false.
    pub fn in_list<T: Into<Value>>(column: impl Into<String>, values: Vec<T>) -> Self {
        if values.is_empty() {
            return Expr::False;
        }
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// column NOT IN (values...); an empty list is always true.
    pub fn not_in<T: Into<Value>>(column: impl Into<String>, values: Vec<T>) -> Self {
        if values.is_empty() {
            return Expr::True;
        }
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    pub fn between(column: impl Into<String>, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Expr::Between {
            column: column.into(),
            from: from.into(),
            to: to.into(),
            negated: false,
        }
    }

    pub fn not_between(
        column: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        Expr::Between {
            column: column.into(),
            from: from.into(),
            to: to.into(),
            negated: true,
        }
    }

    /// Raw SQL fragment. `:name` tokens inside it are substituted at build time.
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    /// Check if this expression contains no conditions.
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::And(exprs) | Expr::Or(exprs) => exprs.iter().all(Expr::is_empty),
            Expr::Not(inner) => inner.is_empty(),
            Expr::Raw(sql) => sql.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the SQL fragment with literal values.
    pub fn build(&self, bool_style: BoolStyle) -> String {
        match self {
            Expr::And(exprs) => Self::join_group(exprs, " AND ", bool_style),
            Expr::Or(exprs) => Self::join_group(exprs, " OR ", bool_style),
            Expr::Not(inner) => {
                let sql = inner.build(bool_style);
                if sql.is_empty() {
                    String::new()
                } else {
                    format!("NOT ({sql})")
                }
            }
            Expr::Compare { column, op, value } => {
                format!("{column} {op} {}", value.to_sql_literal(bool_style))
            }
            Expr::NullCheck { column, is_null } => {
                if *is_null {
                    format!("{column} IS NULL")
                } else {
                    format!("{column} IS NOT NULL")
                }
            }
            Expr::InList {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    return if *negated { "1=1" } else { "1=0" }.to_string();
                }
                let op = if *negated { "NOT IN" } else { "IN" };
                let list = Value::List(values.clone()).to_sql_literal(bool_style);
                format!("{column} {op} {list}")
            }
            Expr::Between {
                column,
                from,
                to,
                negated,
            } => {
                let op = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                format!(
                    "{column} {op} {} AND {}",
                    from.to_sql_literal(bool_style),
                    to.to_sql_literal(bool_style)
                )
            }
            Expr::Raw(sql) => sql.trim().to_string(),
            Expr::True => "1=1".to_string(),
            Expr::False => "1=0".to_string(),
        }
    }

    /// Whether this expression needs parentheses when it is one member of a group.
    fn needs_parens(&self) -> bool {
        match self {
            Expr::And(v) | Expr::Or(v) => v.iter().filter(|e| !e.is_empty()).count() > 1,
            Expr::Raw(_) => true,
            _ => false,
        }
    }

    fn join_group(exprs: &[Expr], sep: &str, bool_style: BoolStyle) -> String {
        let members: Vec<&Expr> = exprs.iter().filter(|e| !e.is_empty()).collect();
        if let [only] = members.as_slice() {
            return only.build(bool_style);
        }
        members
            .iter()
            .map(|e| {
                let sql = e.build(bool_style);
                if e.needs_parens() { format!("({sql})") } else { sql }
            })
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// An incrementally built AND-list of expressions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExprGroup {
    exprs: Vec<Expr>,
}

impl ExprGroup {
    pub fn new() -> Self {
        Self { exprs: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.iter().all(Expr::is_empty)
    }

    /// Add an expression to be ANDed.
    pub fn and_expr(&mut self, expr: Expr) {
        self.exprs.push(expr);
    }

    /// OR the whole current group with `expr`.
    ///
    /// `a AND b` followed by `or_expr(c)` becomes `(a AND b) OR c`.
    pub fn or_expr(&mut self, expr: Expr) {
        if self.is_empty() {
            self.exprs = vec![expr];
            return;
        }
        let current = std::mem::take(&mut self.exprs);
        let current = if current.len() == 1 {
            current.into_iter().next().unwrap_or(Expr::True)
        } else {
            Expr::And(current)
        };
        self.exprs = vec![Expr::Or(vec![current, expr])];
    }

    pub fn clear(&mut self) {
        self.exprs.clear();
    }

    /// Render the group, or an empty string when there are no conditions.
    pub fn build(&self, bool_style: BoolStyle) -> String {
        Expr::join_group(&self.exprs, " AND ", bool_style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql(expr: &Expr) -> String {
        expr.build(BoolStyle::Keyword)
    }

    #[test]
    fn comparisons_render_literals() {
        assert_eq!(sql(&Expr::eq("status", "active")), "status = 'active'");
        assert_eq!(sql(&Expr::gt("age", 18)), "age > 18");
        assert_eq!(sql(&Expr::ne("deleted", true)), "deleted != TRUE");
        assert_eq!(sql(&Expr::like("name", "J%")), "name LIKE 'J%'");
    }

    #[test]
    fn null_in_between() {
        assert_eq!(sql(&Expr::is_null("deleted_at")), "deleted_at IS NULL");
        assert_eq!(sql(&Expr::is_not_null("email")), "email IS NOT NULL");
        assert_eq!(sql(&Expr::in_list("id", vec![1, 2, 3])), "id IN (1, 2, 3)");
        assert_eq!(sql(&Expr::not_in("id", vec!["a"])), "id NOT IN ('a')");
        assert_eq!(sql(&Expr::in_list("id", Vec::<i32>::new())), "1=0");
        assert_eq!(sql(&Expr::not_in("id", Vec::<i32>::new())), "1=1");
        assert_eq!(sql(&Expr::between("age", 18, 65)), "age BETWEEN 18 AND 65");
        assert_eq!(
            sql(&Expr::not_between("age", 18, 65)),
            "age NOT BETWEEN 18 AND 65"
        );
    }

    #[test]
    fn nested_groups_are_parenthesised() {
        let expr = Expr::and(vec![
            Expr::eq("status", "active"),
            Expr::or(vec![
                Expr::eq("role", "admin"),
                Expr::and(vec![Expr::eq("role", "user"), Expr::gt("reputation", 100)]),
            ]),
        ]);
        assert_eq!(
            sql(&expr),
            "status = 'active' AND (role = 'admin' OR (role = 'user' AND reputation > 100))"
        );
    }

    #[test]
    fn single_member_groups_are_flattened() {
        let expr = Expr::and(vec![Expr::or(vec![Expr::eq("a", 1)]), Expr::eq("b", 2)]);
        assert_eq!(sql(&expr), "a = 1 AND b = 2");
    }

    #[test]
    fn not_and_empty() {
        assert_eq!(sql(&Expr::not(Expr::eq("a", 1))), "NOT (a = 1)");
        assert_eq!(sql(&Expr::not(Expr::and(vec![]))), "");
        assert!(Expr::and(vec![Expr::or(vec![])]).is_empty());
    }

    #[test]
    fn raw_fragments() {
        assert_eq!(sql(&Expr::raw("id = :id")), "id = :id");
        let expr = Expr::and(vec![Expr::raw("a = 1 OR b = 2"), Expr::eq("c", 3)]);
        assert_eq!(sql(&expr), "(a = 1 OR b = 2) AND c = 3");
    }

    #[test]
    fn group_or_wraps_existing() {
        let mut group = ExprGroup::new();
        group.and_expr(Expr::eq("a", 1));
        group.and_expr(Expr::eq("b", 2));
        group.or_expr(Expr::eq("c", 3));
        assert_eq!(group.build(BoolStyle::Keyword), "(a = 1 AND b = 2) OR c = 3");
    }

    #[test]
    fn group_or_on_empty_is_plain() {
        let mut group = ExprGroup::new();
        group.or_expr(Expr::eq("c", 3));
        assert_eq!(group.build(BoolStyle::Keyword), "c = 3");
        group.clear();
        assert!(group.is_empty());
        assert_eq!(group.build(BoolStyle::Keyword), "");
    }
}
