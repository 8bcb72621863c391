use std::sync::LazyLock;

use regex::Regex;

use crate::feature::FieldValue;

static LEADING_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());
static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

/// Declared type of one delimited-text column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnType {
    /// Leading integer digits; anything after them is ignored (`"12.9"` is 12).
    Integer,
    /// Leading decimal number.
    Float,
    /// `true` only for the exact `truthy` literal, `false` for everything else.
    Boolean { truthy: String },
    /// Passed through unchanged.
    #[default]
    Text,
}

impl ColumnType {
    pub fn boolean(truthy: impl Into<String>) -> Self {
        ColumnType::Boolean { truthy: truthy.into() }
    }

    /// Coerce one raw text cell. Unparsable numbers become `Null`.
    pub fn coerce_text(&self, cell: Option<&str>) -> FieldValue {
        match self {
            ColumnType::Integer => cell.and_then(parse_int).map_or(FieldValue::Null, FieldValue::from_f64),
            ColumnType::Float => cell.and_then(parse_float).map_or(FieldValue::Null, FieldValue::from_f64),
            ColumnType::Boolean { truthy } => FieldValue::Bool(cell == Some(truthy.as_str())),
            ColumnType::Text => cell.map_or(FieldValue::Null, FieldValue::text),
        }
    }

    /// Coerce a value that already has a JSON type.
    pub fn coerce_value(&self, value: &FieldValue) -> FieldValue {
        match (self, value) {
            (ColumnType::Text, v) => v.clone(),
            (ColumnType::Integer, FieldValue::Number(n)) => n.as_f64()
                .filter(|x| x.is_finite())
                .map_or(FieldValue::Null, |x| FieldValue::from_f64(x.trunc())),
            (ColumnType::Float, FieldValue::Number(_)) => value.clone(),
            (ColumnType::Boolean { .. }, FieldValue::Bool(_)) => value.clone(),
            (_, FieldValue::Text(s)) => self.coerce_text(Some(s)),
            (ColumnType::Boolean { .. }, _) => FieldValue::Bool(false),
            _ => FieldValue::Null,
        }
    }

    #[inline] pub fn is_numeric(&self) -> bool { matches!(self, ColumnType::Integer | ColumnType::Float) }
}

fn parse_int(s: &str) -> Option<f64> {
    let digits = LEADING_INT.captures(s)?.get(1)?.as_str();
    digits.parse::<i64>().map(|n| n as f64).or_else(|_| digits.parse::<f64>()).ok()
}

fn parse_float(s: &str) -> Option<f64> {
    LEADING_FLOAT.captures(s)?.get(1)?.as_str().parse::<f64>().ok()
}

/// Explicit per-column types for one delimited-text source.
///
/// Columns that are not declared are treated as [`ColumnType::Text`]; types are
/// never inferred from the data.
#[derive(Debug, Clone, Default)]
pub struct CsvSchema {
    columns: Vec<(String, ColumnType)>,
}

impl CsvSchema {
    pub fn new() -> Self { Self::default() }

    pub fn column(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.columns.push((name.into(), ty));
        self
    }

    /// Declared type of `name`, defaulting to text.
    pub fn type_of(&self, name: &str) -> &ColumnType {
        static TEXT: ColumnType = ColumnType::Text;
        self.columns.iter().find(|(n, _)| n == name).map_or(&TEXT, |(_, ty)| ty)
    }
}
