//! Builder configuration.

use serde::{Deserialize, Serialize};

/// How boolean values are rendered as SQL literals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolStyle {
    /// `TRUE` / `FALSE` (ANSI).
    #[default]
    Keyword,
    /// `1` / `0`, for engines without a boolean literal.
    Numeric,
}

/// Configuration for a [`QueryBuilder`](crate::QueryBuilder).
///
/// Defaults: keyword booleans, permissive parameter substitution,
/// logged SQL truncated to 200 chars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Boolean literal convention.
    pub bool_style: BoolStyle,
    /// Fail on `:name` tokens that have no registered parameter.
    pub strict_parameters: bool,
    /// Truncate SQL in log events (in chars). `None` means no truncation.
    pub max_log_sql_length: Option<usize>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            bool_style: BoolStyle::Keyword,
            strict_parameters: false,
            max_log_sql_length: Some(200),
        }
    }
}

impl BuilderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the boolean literal convention.
    pub fn bool_style(mut self, style: BoolStyle) -> Self {
        self.bool_style = style;
        self
    }

    /// Reject unresolved `:name` tokens at build time.
    pub fn strict(mut self) -> Self {
        self.strict_parameters = true;
        self
    }

    /// Leave unresolved `:name` tokens in the SQL as-is (default).
    pub fn permissive(mut self) -> Self {
        self.strict_parameters = false;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_log_sql_length(mut self, len: usize) -> Self {
        self.max_log_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_log_truncate(mut self) -> Self {
        self.max_log_sql_length = None;
        self
    }

    pub(crate) fn truncate_for_log<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_log_sql_length {
            Some(max) if sql.chars().count() > max => {
                let cut: String = sql.chars().take(max).collect();
                std::borrow::Cow::Owned(format!("{cut}..."))
            }
            _ => std::borrow::Cow::Borrowed(sql),
        }
    }
}
