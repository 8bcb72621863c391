use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Placeholder shown wherever a value is missing or not a finite number.
pub const MISSING: &str = "N/A";

/// A single feature property value.
///
/// Numbers keep their original JSON representation so integers written by a
/// source file are written back as integers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Arrays and objects are carried through untouched.
    Nested(Value),
}

impl FieldValue {
    /// Numeric value from an `f64`; integral values are stored as integers,
    /// non-finite values become `Null`.
    pub fn from_f64(x: f64) -> Self {
        const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
        if x.is_finite() && x.fract() == 0.0 && x.abs() <= MAX_SAFE {
            FieldValue::Number(Number::from(x as i64))
        } else {
            Number::from_f64(x).map_or(FieldValue::Null, FieldValue::Number)
        }
    }

    #[inline] pub fn zero() -> Self { FieldValue::Number(Number::from(0)) }

    #[inline] pub fn text(s: impl Into<String>) -> Self { FieldValue::Text(s.into()) }

    #[inline] pub fn is_null(&self) -> bool { matches!(self, FieldValue::Null) }

    /// Null or empty text; the values a `||` fallback would skip over.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The value as a finite number, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64().filter(|x| x.is_finite()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// String form used as a join or identity key. Only text and numbers qualify.
    pub fn as_key(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `true` for a boolean `true` or the number `1`.
    pub fn is_set(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => n.as_f64() == Some(1.0),
            _ => false,
        }
    }

    /// Human-readable rendering; missing and non-finite values show as [`MISSING`].
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => MISSING.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => match n.as_f64() {
                Some(x) if x.is_finite() => n.to_string(),
                _ => MISSING.to_string(),
            },
            FieldValue::Text(s) => s.clone(),
            FieldValue::Nested(v) => v.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self { FieldValue::Bool(b) }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self { FieldValue::Number(Number::from(n)) }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self { FieldValue::from_f64(x) }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self { FieldValue::Text(s.to_string()) }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self { FieldValue::Text(s) }
}
