//! Host values and their SQL literal form.
//!
//! [`Value`] is the closed set of values the builder can substitute into SQL
//! text. Rendering is deterministic and has no side effects:
//!
//! | value | literal |
//! |---|---|
//! | `Null` | `NULL` |
//! | `Bool` | `TRUE` / `FALSE` (or `1` / `0`, see [`BoolStyle`]) |
//! | `Int` / `UInt` / `Float` | decimal text, unquoted |
//! | `Text` | `'...'` with `'` doubled |
//! | `Timestamp` | `'2025-03-21T00:00:00.000Z'` |
//! | `Date` | `'2025-03-21'` |
//! | `Uuid` | `'67e55044-10b1-426f-9247-bb680e5fe0c8'` |
//! | `Json` | `'{"a":1}'` |
//! | `List` | `(v1, v2, ...)` |

use crate::config::BoolStyle;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// A value that can be rendered as a SQL literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer that may not fit in `i64`.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Text, rendered as a quoted string literal.
    Text(String),
    /// Point in time, rendered as an ISO-8601 UTC timestamp with millisecond precision.
    ///
    /// Years outside `0..=9999` use the ISO-8601 expanded form with an
    /// explicit sign (`'+10000-01-01T00:00:00.000Z'`, `'-0001-...'`), so the
    /// literal is no longer fixed width.
    Timestamp(DateTime<Utc>),
    /// Calendar date. Out-of-range years are signed, as for `Timestamp`.
    Date(NaiveDate),
    /// UUID.
    Uuid(Uuid),
    /// JSON document, rendered as quoted compact JSON text.
    Json(serde_json::Value),
    /// Parenthesised list, for `IN (...)`.
    List(Vec<Value>),
}

impl Value {
    /// Render as a SQL literal using the given boolean convention.
    pub fn to_sql_literal(&self, bool_style: BoolStyle) -> String {
        let mut out = String::new();
        self.write_sql_literal(&mut out, bool_style);
        out
    }

    pub(crate) fn write_sql_literal(&self, out: &mut String, bool_style: BoolStyle) {
        match self {
            Value::Null => out.push_str("NULL"),
            Value::Bool(b) => out.push_str(match (bool_style, b) {
                (BoolStyle::Keyword, true) => "TRUE",
                (BoolStyle::Keyword, false) => "FALSE",
                (BoolStyle::Numeric, true) => "1",
                (BoolStyle::Numeric, false) => "0",
            }),
            Value::Int(n) => out.push_str(&n.to_string()),
            Value::UInt(n) => out.push_str(&n.to_string()),
            Value::Float(f) => {
                if f.is_nan() {
                    out.push_str("'NaN'");
                } else if f.is_infinite() {
                    out.push_str(if *f > 0.0 { "'Infinity'" } else { "'-Infinity'" });
                } else {
                    out.push_str(&f.to_string());
                }
            }
            Value::Text(s) => push_quoted(out, s),
            Value::Timestamp(ts) => {
                push_quoted(out, &ts.to_rfc3339_opts(SecondsFormat::Millis, true));
            }
            Value::Date(d) => push_quoted(out, &d.format("%Y-%m-%d").to_string()),
            Value::Uuid(u) => push_quoted(out, &u.hyphenated().to_string()),
            Value::Json(j) => push_quoted(out, &j.to_string()),
            Value::List(items) => {
                if items.is_empty() {
                    out.push_str("(NULL)");
                    return;
                }
                out.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_sql_literal(out, bool_style);
                }
                out.push(')');
            }
        }
    }

    /// Check if this is `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the literal form needed quote escaping.
    pub(crate) fn needs_escaping(&self) -> bool {
        match self {
            Value::Text(s) => s.contains('\''),
            Value::Json(j) => j.to_string().contains('\''),
            Value::List(items) => items.iter().any(Value::needs_escaping),
            _ => false,
        }
    }
}

/// Render a value as a SQL literal using ANSI booleans.
pub fn format_value(value: &Value) -> String {
    value.to_sql_literal(BoolStyle::Keyword)
}

fn push_quoted(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(<$target>::from(v))
                }
            }
        )*
    };
}

impl_from_int!(Int, i64: i8, i16, i32, i64, u8, u16, u32);
impl_from_int!(UInt, u64: u64);
impl_from_int!(Float, f64: f32, f64);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

/// Naive timestamps are taken to be UTC.
impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v.and_utc())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}
