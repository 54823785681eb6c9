//! Dynamic values for `enum`, `const`, `default`, and example positions.

use serde_json::Value;

/// A dynamic value that preserves its origin type.
///
/// Distinguishes the number `1` from the string `"1"`, and keeps arbitrary
/// JSON (objects, arrays) as an opaque fragment for pass-through positions
/// like specification extensions.
#[derive(Debug, Clone, PartialEq)]
pub enum Any {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number, kept in JSON representation.
    Number(serde_json::Number),
    /// A string.
    Str(String),
    /// An opaque JSON fragment (object or array).
    Json(Value),
}

impl Any {
    /// Converts a parsed JSON value into an `Any`, preserving its kind.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Any::Null,
            Value::Bool(b) => Any::Bool(*b),
            Value::Number(n) => Any::Number(n.clone()),
            Value::String(s) => Any::Str(s.clone()),
            other => Any::Json(other.clone()),
        }
    }

    /// Converts back to a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Any::Null => Value::Null,
            Any::Bool(b) => Value::Bool(*b),
            Any::Number(n) => Value::Number(n.clone()),
            Any::Str(s) => Value::String(s.clone()),
            Any::Json(v) => v.clone(),
        }
    }

    /// The string payload, when this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Any::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn preserves_origin_type() {
        assert_eq!(Any::from_value(&json!(1)), Any::Number(1.into()));
        assert_eq!(Any::from_value(&json!("1")), Any::Str("1".to_owned()));
        assert_ne!(
            Any::from_value(&json!(1)).to_value(),
            Any::from_value(&json!("1")).to_value()
        );
    }

    #[test]
    fn json_fragments_round_trip() {
        let fragment = json!({"a": [1, "2", null]});
        assert_eq!(Any::from_value(&fragment).to_value(), fragment);
    }
}
