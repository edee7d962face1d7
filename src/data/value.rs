use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed attribute value. Missing values are tracked explicitly per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(Option<f64>),
    Text(Option<String>),
}

impl Value {
    #[inline] pub fn number(x: f64) -> Self { Value::Number(Some(x)) }

    #[inline] pub fn text(s: impl Into<String>) -> Self { Value::Text(Some(s.into())) }

    /// Finite numeric content, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(Some(x)) if x.is_finite() => Some(*x),
            _ => None,
        }
    }

    /// Non-blank text content, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(Some(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(Some(x)) => write!(f, "{x:.2}"),
            Value::Text(Some(s)) => f.write_str(s),
            Value::Number(None) | Value::Text(None) => f.write_str("N/A"),
        }
    }
}
