//! Clause model: the structured pieces of a SELECT before rendering.

use crate::entity::EntityRef;
use crate::error::{QbError, QbResult};
use std::fmt;
use std::str::FromStr;

/// FROM target.
#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    /// Table name or dynamic reference.
    pub entity: EntityRef,
    /// Optional table alias.
    pub alias: Option<String>,
}

/// JOIN kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Natural,
}

impl JoinType {
    /// SQL keyword (without `JOIN`).
    pub fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
            JoinType::Cross => "CROSS",
            JoinType::Natural => "NATURAL",
        }
    }

    /// Whether this join kind takes an ON/USING condition.
    pub fn takes_condition(self) -> bool {
        !matches!(self, JoinType::Cross | JoinType::Natural)
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for JoinType {
    type Err = QbError;

    fn from_str(s: &str) -> QbResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            "FULL" => Ok(JoinType::Full),
            "CROSS" => Ok(JoinType::Cross),
            "NATURAL" => Ok(JoinType::Natural),
            other => Err(QbError::validation(format!("Unknown join type: {other}"))),
        }
    }
}

/// How a join's criteria is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionType {
    /// `ON <predicate>`
    On,
    /// `USING (<columns>)`
    Using,
}

impl FromStr for ConditionType {
    type Err = QbError;

    fn from_str(s: &str) -> QbResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ON" => Ok(ConditionType::On),
            "USING" => Ok(ConditionType::Using),
            other => Err(QbError::validation(format!(
                "Unknown join condition type: {other}"
            ))),
        }
    }
}

/// A single JOIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub entity: String,
    pub alias: Option<String>,
    pub condition_type: Option<ConditionType>,
    pub criteria: Option<String>,
}

impl JoinClause {
    /// Create a join without alias or condition.
    pub fn new(join_type: JoinType, entity: impl Into<String>) -> Self {
        Self {
            join_type,
            entity: entity.into(),
            alias: None,
            condition_type: None,
            criteria: None,
        }
    }

    /// Set the alias. A blank alias clears it.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = non_blank(&alias.into());
        self
    }

    /// Set `ON <criteria>`.
    pub fn on(mut self, criteria: impl Into<String>) -> Self {
        self.condition_type = Some(ConditionType::On);
        self.criteria = Some(criteria.into());
        self
    }

    /// Set `USING (<columns>)`.
    pub fn using(mut self, columns: impl Into<String>) -> Self {
        self.condition_type = Some(ConditionType::Using);
        self.criteria = Some(columns.into());
        self
    }

    /// Check the insertion-time invariants.
    pub fn validate(&self) -> QbResult<()> {
        if self.entity.trim().is_empty() {
            return Err(QbError::validation("Join entity is required"));
        }
        if self.join_type.takes_condition()
            && self.condition_type == Some(ConditionType::On)
            && self.criteria.as_deref().is_none_or(|c| c.trim().is_empty())
        {
            return Err(QbError::validation(format!(
                "{} JOIN requires a condition criteria when using ON",
                self.join_type
            )));
        }
        Ok(())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for OrderDirection {
    type Err = QbError;

    fn from_str(s: &str) -> QbResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(OrderDirection::Asc),
            "DESC" => Ok(OrderDirection::Desc),
            other => Err(QbError::validation(format!(
                "Unknown sort direction: {other}"
            ))),
        }
    }
}

/// ORDER BY entry. A missing direction renders as `ASC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByEntry {
    pub column: String,
    pub direction: Option<OrderDirection>,
}

impl OrderByEntry {
    pub fn new(column: impl Into<String>, direction: Option<OrderDirection>) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Trimmed `s`, or `None` when it is blank.
pub(crate) fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Split `"sessions s"` into `("sessions", Some("s"))`.
///
/// An `AS` keyword between name and alias is dropped; a trailing bare `AS`
/// leaves no alias.
pub(crate) fn split_alias(entity: &str) -> (String, Option<String>) {
    let entity = entity.trim();
    let Some((name, rest)) = entity.split_once(char::is_whitespace) else {
        return (entity.to_string(), None);
    };
    let rest = rest.trim();
    let alias = match rest.split_once(char::is_whitespace) {
        Some((keyword, alias)) if keyword.eq_ignore_ascii_case("as") => alias,
        None if rest.eq_ignore_ascii_case("as") => "",
        _ => rest,
    };
    (name.to_string(), non_blank(alias))
}
