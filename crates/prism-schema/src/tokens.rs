//! Token types of JSON nodes, for conformance checks and diagnostics.

use std::fmt;

/// The lexical type of a JSON node.
///
/// Numbers are split by representation: a literal such as `3` is an
/// [`Integer`](JsonToken::Integer), `3.0` is a [`Float`](JsonToken::Float).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonToken {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl JsonToken {
    #[must_use]
    pub fn of(node: &serde_json::Value) -> Self {
        match node {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(_) => Self::Boolean,
            serde_json::Value::Number(n) if n.is_f64() => Self::Float,
            serde_json::Value::Number(_) => Self::Integer,
            serde_json::Value::String(_) => Self::String,
            serde_json::Value::Array(_) => Self::Array,
            serde_json::Value::Object(_) => Self::Object,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), JsonToken::Null)]
    #[case(json!(true), JsonToken::Boolean)]
    #[case(json!(3), JsonToken::Integer)]
    #[case(json!(-3), JsonToken::Integer)]
    #[case(json!(u64::MAX), JsonToken::Integer)]
    #[case(json!(3.0), JsonToken::Float)]
    #[case(json!("3"), JsonToken::String)]
    #[case(json!([3]), JsonToken::Array)]
    #[case(json!({"a": 3}), JsonToken::Object)]
    fn classifies_nodes(#[case] node: serde_json::Value, #[case] expected: JsonToken) {
        assert_eq!(JsonToken::of(&node), expected);
    }
}
