//! Input rows: one already-resolved statistical record per observation.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// A single cell value.
///
/// Deserializes from any JSON/TOML scalar; `null` means the value is absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicitly absent.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Integer(i64),
    /// A number that is not an `i64`: fractional or out of range.
    Float(f64),
    /// Text.
    Text(String),
}

impl FieldValue {
    /// The value as text, or `None` if it is null or blank.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Text(s) if s.trim().is_empty() => None,
            FieldValue::Text(s) => Some(s.clone()),
        }
    }

    /// The value as an integer; numeric text and integral floats are accepted.
    /// Floats outside the `i64` range are `None`, never saturated.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            FieldValue::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The value as a decimal number.
    #[must_use]
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) if f.is_finite() => Some(*f),
            FieldValue::Text(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
            _ => None,
        }
    }

    /// True for null and blank text.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.as_text().is_none()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(s) => f.write_str(&s),
            None => f.write_str("null"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

/// A record: field name → value.
pub type Row = BTreeMap<String, FieldValue>;

/// Builds a row from `(field, value)` pairs.
pub fn row<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Parses rows from a JSON array of objects.
///
/// # Errors
///
/// Returns the JSON error if `json` is not an array of flat objects.
pub fn parse_rows(json: &str) -> serde_json::Result<Vec<Row>> {
    serde_json::from_str(json)
}
