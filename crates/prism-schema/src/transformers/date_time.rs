use chrono::{DateTime, SecondsFormat, Utc};
use prism_core::Value;

use crate::error::TransformError;
use crate::json_schema::JsonType;
use crate::tokens::JsonToken;
use crate::transform::Transformer;

const DATE_TIME_FORMAT: &str = "date-time";

/// Converts `int64` millisecond timestamps to ISO-8601 strings in UTC.
///
/// Output always carries millisecond precision and a `Z` suffix
/// (`1981-10-17T23:00:00.000Z`). Input must carry an explicit offset or `Z`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeTransformer;

impl Transformer for DateTimeTransformer {
    fn json_type(&self) -> JsonType {
        JsonType::String
    }

    fn serialize(&self, value: &Value) -> Result<serde_json::Value, TransformError> {
        let Value::I64(millis) = value else {
            return Err(TransformError::UnexpectedValue {
                expected: "i64",
                found: value.kind_name(),
            });
        };
        let instant =
            DateTime::<Utc>::from_timestamp_millis(*millis).ok_or_else(|| {
                TransformError::InvalidFormat {
                    format: DATE_TIME_FORMAT,
                    value: millis.to_string(),
                    reason: "timestamp out of range".to_string(),
                }
            })?;
        Ok(serde_json::Value::String(
            instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        ))
    }

    fn parse(&self, node: &serde_json::Value) -> Result<Value, TransformError> {
        let serde_json::Value::String(text) = node else {
            return Err(TransformError::UnexpectedToken {
                expected: JsonToken::String,
                found: JsonToken::of(node),
            });
        };
        let parsed =
            DateTime::parse_from_rfc3339(text).map_err(|e| TransformError::InvalidFormat {
                format: DATE_TIME_FORMAT,
                value: text.clone(),
                reason: e.to_string(),
            })?;
        Ok(Value::I64(parsed.timestamp_millis()))
    }

    fn external_format(&self) -> Option<&str> {
        Some(DATE_TIME_FORMAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_to_utc() {
        let transformer = DateTimeTransformer;
        let millis = transformer
            .parse(&json!("1981-10-17T21:00:00.000-02:00"))
            .unwrap();
        assert_eq!(
            transformer.serialize(&millis).unwrap(),
            json!("1981-10-17T23:00:00.000Z")
        );
    }

    #[test]
    fn epoch_round_trips() {
        let transformer = DateTimeTransformer;
        let node = transformer.serialize(&Value::I64(0)).unwrap();
        assert_eq!(node, json!("1970-01-01T00:00:00.000Z"));
        assert_eq!(transformer.parse(&node).unwrap(), Value::I64(0));
    }

    #[test]
    fn rejects_rubbish() {
        let err = DateTimeTransformer.parse(&json!("qux")).unwrap_err();
        assert!(matches!(err, TransformError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_missing_timezone() {
        let err = DateTimeTransformer
            .parse(&json!("1981-10-17T21:00:00.000"))
            .unwrap_err();
        assert!(matches!(err, TransformError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_non_string_tokens() {
        let err = DateTimeTransformer.parse(&json!(374_713_200_000_i64)).unwrap_err();
        assert!(matches!(
            err,
            TransformError::UnexpectedToken {
                found: JsonToken::Integer,
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_timestamp_values() {
        let err = DateTimeTransformer.serialize(&Value::from("now")).unwrap_err();
        assert!(matches!(err, TransformError::UnexpectedValue { .. }));
    }

    #[test]
    fn reports_date_time_format() {
        assert_eq!(DateTimeTransformer.external_format(), Some("date-time"));
        assert_eq!(DateTimeTransformer.json_type(), JsonType::String);
    }
}
