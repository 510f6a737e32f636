//! Structured values accepted by the sanitizer

use serde_json::{Map, Number, Value};

/// Non-text leaf values; these pass through sanitization unchanged
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`
    Unsigned(u64),
    Float(f64),
}

/// Tree of values a caller may hand to [`crate::sanitization::Sanitizer::sanitize`]
///
/// Only values are sanitized unless `scan_mapping_keys` is set, in which case
/// keys go through the text path too.
#[derive(Debug, Clone, PartialEq)]
pub enum SanitizableValue {
    Scalar(Scalar),
    Text(String),
    /// Ordered key/value pairs
    Mapping(Vec<(String, SanitizableValue)>),
    Sequence(Vec<SanitizableValue>),
    /// Unordered collection; sanitized element-wise like a sequence
    SetLike(Vec<SanitizableValue>),
}

impl SanitizableValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SanitizableValue)>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a mapping entry by key
    pub fn get(&self, key: &str) -> Option<&SanitizableValue> {
        match self {
            Self::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Nesting depth; leaves count as depth 0
    pub fn depth(&self) -> usize {
        match self {
            Self::Scalar(_) | Self::Text(_) => 0,
            Self::Mapping(entries) => 1 + entries.iter().map(|(_, v)| v.depth()).max().unwrap_or(0),
            Self::Sequence(items) | Self::SetLike(items) => {
                1 + items.iter().map(SanitizableValue::depth).max().unwrap_or(0)
            }
        }
    }
}

impl From<&str> for SanitizableValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SanitizableValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for SanitizableValue {
    fn from(n: i64) -> Self {
        Self::Scalar(Scalar::Integer(n))
    }
}

impl From<bool> for SanitizableValue {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<Value> for SanitizableValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Self::Scalar(Scalar::Integer(i)),
                (None, Some(u)) => Self::Scalar(Scalar::Unsigned(u)),
                (None, None) => Self::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<SanitizableValue> for Value {
    fn from(value: SanitizableValue) -> Self {
        match value {
            SanitizableValue::Scalar(Scalar::Null) => Value::Null,
            SanitizableValue::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            SanitizableValue::Scalar(Scalar::Integer(i)) => Value::Number(i.into()),
            SanitizableValue::Scalar(Scalar::Unsigned(u)) => Value::Number(u.into()),
            SanitizableValue::Scalar(Scalar::Float(f)) => {
                Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
            }
            SanitizableValue::Text(s) => Value::String(s),
            SanitizableValue::Sequence(items) | SanitizableValue::SetLike(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            SanitizableValue::Mapping(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}
