//! Named parameters and literal substitution.
//!
//! Parameters are keyed by their `:name` token. Substitution replaces each
//! registered token in the SQL text with the literal form of its value
//! (see [`Value::to_sql_literal`]). This is textual substitution, not
//! prepared-statement binding: the safety of the output rests on the
//! escaping done by the value formatter.

use crate::config::BuilderConfig;
use crate::error::{QbError, QbResult};
use crate::value::Value;

/// A named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Token name including the leading colon (e.g. `:id`).
    pub name: String,
    /// Bound value.
    pub value: Value,
}

impl Parameter {
    /// Create a parameter. A missing leading colon is added.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: normalize_name(name.into()),
            value: value.into(),
        }
    }
}

fn normalize_name(name: String) -> String {
    if name.starts_with(':') {
        name
    } else {
        format!(":{name}")
    }
}

/// Insertion-ordered store of named parameters.
///
/// Re-setting a name overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamRegistry {
    params: Vec<Parameter>,
}

impl ParamRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Insert or overwrite a parameter.
    pub fn set(&mut self, mut param: Parameter) {
        param.name = normalize_name(param.name);
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => existing.value = param.value,
            None => self.params.push(param),
        }
    }

    /// Look up a value by name (with or without the leading colon).
    pub fn get(&self, name: &str) -> Option<&Value> {
        let name = name.strip_prefix(':').unwrap_or(name);
        self.params
            .iter()
            .find(|p| &p.name[1..] == name)
            .map(|p| &p.value)
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let name = name.strip_prefix(':').unwrap_or(name);
        let idx = self.params.iter().position(|p| &p.name[1..] == name)?;
        Some(self.params.remove(idx).value)
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Clear all parameters.
    pub fn clear(&mut self) {
        self.params.clear();
    }

    pub(crate) fn to_vec(&self) -> Vec<Parameter> {
        self.params.clone()
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Replace every registered `:name` token in `raw_sql` with its literal.
///
/// - A token is `:` followed by a letter or `_`, then any run of letters,
///   digits and `_` (longest match, Unicode-aware), so `:id` never matches
///   inside `:identifier` and `:na` never matches inside `:naïve`.
/// - A `:` directly after another `:` or an identifier character does not start
///   a token (`created_at::date` is left alone).
/// - Single-quoted literals and double-quoted identifiers are copied verbatim.
/// - Unregistered tokens are left in place unless `config.strict_parameters`
///   is set, in which case they are an error.
pub fn substitute(raw_sql: &str, params: &ParamRegistry, config: &BuilderConfig) -> QbResult<String> {
    let mut out = String::with_capacity(raw_sql.len());
    let mut chars = raw_sql.char_indices().peekable();
    let mut prev: Option<char> = None;

    while let Some((start, c)) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                // Copy through the closing quote; doubled quotes stay inside the literal.
                while let Some((_, inner)) = chars.next() {
                    out.push(inner);
                    if inner == c {
                        if chars.peek().map(|&(_, n)| n) == Some(c) {
                            if let Some((_, escaped)) = chars.next() {
                                out.push(escaped);
                            }
                        } else {
                            break;
                        }
                    }
                }
                prev = Some(c);
            }
            ':' if prev.is_none_or(|p| p != ':' && !is_ident_char(p))
                && chars.peek().is_some_and(|&(_, n)| is_ident_start(n)) =>
            {
                let mut end = start + 1;
                while let Some(&(i, n)) = chars.peek() {
                    if !is_ident_char(n) {
                        break;
                    }
                    end = i + n.len_utf8();
                    chars.next();
                }
                let token = &raw_sql[start..end];
                match params.get(token) {
                    Some(value) => {
                        if value.needs_escaping() {
                            tracing::warn!(
                                target: "litsql.sql",
                                token,
                                "substituting a value that required quote escaping"
                            );
                        }
                        value.write_sql_literal(&mut out, config.bool_style);
                    }
                    None if config.strict_parameters => {
                        return Err(QbError::validation(format!(
                            "Unresolved parameter {token}"
                        )));
                    }
                    None => {
                        tracing::trace!(target: "litsql.sql", token, "leaving unresolved parameter token");
                        out.push_str(token);
                    }
                }
                prev = raw_sql[..end].chars().next_back();
            }
            _ => {
                out.push(c);
                prev = Some(c);
            }
        }
    }

    Ok(out)
}
