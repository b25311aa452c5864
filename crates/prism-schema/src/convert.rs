//! Kind-based conversion of scalar field values, shared by both schema kinds.
//!
//! Record-typed fields are not handled here: they need a registry to find the
//! nested schema, which each serializer and parser does on its own.

use prism_core::{CaseFormat, EnumType, FieldDescriptor, FieldKind, Value};

use crate::error::ParseError;
use crate::json_schema::JsonType;
use crate::tokens::JsonToken;

/// Declared case of record field names.
pub const FIELD_CASE_FORMAT: CaseFormat = CaseFormat::LowerUnderscore;
/// Case of JSON property names derived from field names.
pub const PROPERTY_CASE_FORMAT: CaseFormat = CaseFormat::LowerCamel;
/// Declared case of enum value names.
pub const ENUM_CASE_FORMAT: CaseFormat = CaseFormat::UpperUnderscore;

/// Default JSON property name for a field: `string_value` -> `stringValue`.
#[must_use]
pub fn property_name(field: &FieldDescriptor) -> String {
    FIELD_CASE_FORMAT.convert(PROPERTY_CASE_FORMAT, field.name())
}

/// Settings that change how scalar values look in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueCodec {
    pub enum_case_format: CaseFormat,
    pub longs_as_strings: bool,
}

impl ValueCodec {
    /// The fixed settings of zero-config schemas.
    pub const AUTO: Self = Self {
        enum_case_format: CaseFormat::LowerCamel,
        longs_as_strings: false,
    };

    /// Convert a non-record value. `None` for kinds with no JSON form and for
    /// floats JSON cannot represent.
    pub fn to_json(self, field: &FieldDescriptor, value: &Value) -> Option<serde_json::Value> {
        let node = match value {
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::I32(v) => serde_json::Value::from(*v),
            Value::U32(v) => serde_json::Value::from(*v),
            Value::I64(v) if self.longs_as_strings => serde_json::Value::String(v.to_string()),
            Value::I64(v) => serde_json::Value::from(*v),
            Value::U64(v) if self.longs_as_strings => serde_json::Value::String(v.to_string()),
            Value::U64(v) => serde_json::Value::from(*v),
            Value::F32(v) => serde_json::Value::from(f64::from(*v)),
            Value::F64(v) => serde_json::Value::from(*v),
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::EnumNumber(number) => {
                let enum_type = field.enum_type()?;
                let declared = enum_type.value_by_number(*number)?;
                serde_json::Value::String(self.enum_name(&declared.name))
            }
            Value::Bytes(_) | Value::Message(_) | Value::List(_) => return None,
        };
        (!node.is_null()).then_some(node)
    }

    /// Parse a non-record value for `field`, found under JSON `property`.
    ///
    /// Returns `Ok(None)` for kinds with no JSON form.
    pub fn from_json(
        self,
        field: &FieldDescriptor,
        property: &str,
        node: &serde_json::Value,
    ) -> Result<Option<Value>, ParseError> {
        let kind = field.kind();
        let value = match kind {
            FieldKind::Bytes | FieldKind::Group | FieldKind::Message(_) => return Ok(None),
            FieldKind::Bool => {
                expect(property, node, JsonToken::Boolean)?;
                Value::Bool(node.as_bool().unwrap_or_default())
            }
            FieldKind::String => {
                expect(property, node, JsonToken::String)?;
                Value::String(node.as_str().unwrap_or_default().to_string())
            }
            FieldKind::Enum(_) => {
                expect(property, node, JsonToken::String)?;
                let text = node.as_str().unwrap_or_default();
                let declared = self.enum_case_format.convert(ENUM_CASE_FORMAT, text);
                let number = field
                    .enum_type()
                    .and_then(|e| e.value_by_name(&declared).map(|v| v.number))
                    .ok_or_else(|| ParseError::UnknownEnumValue {
                        field: property.to_string(),
                        value: text.to_string(),
                    })?;
                Value::EnumNumber(number)
            }
            FieldKind::Float => {
                expect(property, node, JsonToken::Float)?;
                let wide = node.as_f64().unwrap_or_default();
                #[allow(clippy::cast_possible_truncation)]
                let narrowed = wide as f32;
                if narrowed.is_infinite() && wide.is_finite() {
                    return Err(out_of_range(property, node, kind));
                }
                Value::F32(narrowed)
            }
            FieldKind::Double => {
                expect(property, node, JsonToken::Float)?;
                Value::F64(node.as_f64().unwrap_or_default())
            }
            FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32 => {
                expect(property, node, JsonToken::Integer)?;
                let value = node
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| out_of_range(property, node, kind))?;
                Value::I32(value)
            }
            FieldKind::Uint32 | FieldKind::Fixed32 => {
                expect(property, node, JsonToken::Integer)?;
                let value = node
                    .as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| out_of_range(property, node, kind))?;
                Value::U32(value)
            }
            FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64 => {
                if self.longs_as_strings {
                    Value::I64(parse_long_string(property, node, kind)?)
                } else {
                    expect(property, node, JsonToken::Integer)?;
                    Value::I64(node.as_i64().ok_or_else(|| out_of_range(property, node, kind))?)
                }
            }
            FieldKind::Uint64 | FieldKind::Fixed64 => {
                if self.longs_as_strings {
                    Value::U64(parse_long_string(property, node, kind)?)
                } else {
                    expect(property, node, JsonToken::Integer)?;
                    Value::U64(node.as_u64().ok_or_else(|| out_of_range(property, node, kind))?)
                }
            }
        };
        Ok(Some(value))
    }

    /// External spelling of a declared enum value name.
    pub fn enum_name(self, declared: &str) -> String {
        ENUM_CASE_FORMAT.convert(self.enum_case_format, declared)
    }

    /// External spellings of every value of an enum, in declaration order.
    pub fn enum_names(self, enum_type: &EnumType) -> Vec<String> {
        enum_type
            .values()
            .iter()
            .map(|v| self.enum_name(&v.name))
            .collect()
    }

    /// A field's declared default as documentation text.
    pub fn default_text(self, field: &FieldDescriptor) -> Option<String> {
        match field.default_value()? {
            Value::EnumNumber(number) => {
                let enum_type = field.enum_type()?;
                let declared = enum_type.value_by_number(*number)?;
                Some(self.enum_name(&declared.name))
            }
            other => Some(other.to_string()),
        }
    }

    /// The JSON type of a single value of `kind`. `None` for kinds with no
    /// JSON form.
    pub fn json_type(self, kind: &FieldKind) -> Option<JsonType> {
        let json_type = match kind {
            FieldKind::Bytes | FieldKind::Group => return None,
            FieldKind::Bool => JsonType::Boolean,
            FieldKind::String | FieldKind::Enum(_) => JsonType::String,
            FieldKind::Float | FieldKind::Double => JsonType::Number,
            FieldKind::Message(_) => JsonType::Object,
            _ if kind.is_64_bit() && self.longs_as_strings => JsonType::String,
            _ => JsonType::Integer,
        };
        Some(json_type)
    }

    /// The `format` marking a 64-bit integer surfaced as a string.
    pub const fn long_format(self, kind: &FieldKind) -> Option<&'static str> {
        if !self.longs_as_strings || !kind.is_64_bit() {
            return None;
        }
        if kind.is_unsigned() {
            Some("uint64")
        } else {
            Some("int64")
        }
    }
}

fn expect(property: &str, node: &serde_json::Value, expected: JsonToken) -> Result<(), ParseError> {
    let found = JsonToken::of(node);
    if found == expected {
        Ok(())
    } else {
        Err(ParseError::Unmappable {
            field: property.to_string(),
            expected,
            found,
        })
    }
}

fn out_of_range(property: &str, node: &serde_json::Value, kind: &FieldKind) -> ParseError {
    ParseError::OutOfRange {
        field: property.to_string(),
        value: node.to_string(),
        kind: kind.to_string(),
    }
}

fn parse_long_string<T: std::str::FromStr>(
    property: &str,
    node: &serde_json::Value,
    kind: &FieldKind,
) -> Result<T, ParseError> {
    expect(property, node, JsonToken::String)?;
    let text = node.as_str().unwrap_or_default();
    text.parse().map_err(|_| ParseError::InvalidNumber {
        field: property.to_string(),
        value: text.to_string(),
        kind: kind.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prism_core::testing;
    use rstest::rstest;
    use serde_json::json;

    fn field(record: &str, name: &str) -> FieldDescriptor {
        testing::record_type(record).field(name).unwrap()
    }

    fn long_codec() -> ValueCodec {
        ValueCodec {
            longs_as_strings: true,
            ..ValueCodec::AUTO
        }
    }

    #[test]
    fn property_names_are_lower_camel() {
        assert_eq!(property_name(&field("test.Union", "string_value")), "stringValue");
        assert_eq!(property_name(&field("test.Movie", "title")), "title");
    }

    #[rstest]
    #[case("bool_value", Value::Bool(true), json!(true))]
    #[case("string_value", Value::from("foo"), json!("foo"))]
    #[case("int32_value", Value::I32(-7), json!(-7))]
    #[case("int64_value", Value::I64(1_234_567_890), json!(1_234_567_890))]
    #[case("uint64_value", Value::U64(u64::MAX), json!(u64::MAX))]
    #[case("double_value", Value::F64(1.5), json!(1.5))]
    #[case("float_value", Value::F32(0.25), json!(0.25))]
    #[case("enum_value", Value::EnumNumber(2), json!("second"))]
    fn scalars_round_trip(#[case] name: &str, #[case] value: Value, #[case] node: serde_json::Value) {
        let field = field("test.Union", name);
        let property = property_name(&field);
        assert_eq!(ValueCodec::AUTO.to_json(&field, &value), Some(node.clone()));
        assert_eq!(
            ValueCodec::AUTO.from_json(&field, &property, &node).unwrap(),
            Some(value)
        );
    }

    #[rstest]
    #[case("int64_value", Value::I64(1_234_567_890), json!("1234567890"))]
    #[case("uint64_value", Value::U64(u64::MAX), json!("18446744073709551615"))]
    fn longs_as_strings(#[case] name: &str, #[case] value: Value, #[case] node: serde_json::Value) {
        let field = field("test.Union", name);
        assert_eq!(long_codec().to_json(&field, &value), Some(node.clone()));
        assert_eq!(long_codec().from_json(&field, name, &node).unwrap(), Some(value));
    }

    #[test]
    fn long_strings_must_be_numeric() {
        let field = field("test.Union", "int64_value");
        let err = long_codec()
            .from_json(&field, "int64Value", &json!("twelve"))
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));

        let err = long_codec()
            .from_json(&field, "int64Value", &json!(12))
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unmappable {
                expected: JsonToken::String,
                found: JsonToken::Integer,
                ..
            }
        ));
    }

    #[test]
    fn enum_case_format_applies_both_ways() {
        let field = field("test.Movie", "genre");
        let codec = ValueCodec {
            enum_case_format: CaseFormat::UpperUnderscore,
            ..ValueCodec::AUTO
        };
        assert_eq!(
            codec.to_json(&field, &Value::EnumNumber(2)),
            Some(json!("SCIENCE_FICTION"))
        );
        assert_eq!(
            ValueCodec::AUTO.to_json(&field, &Value::EnumNumber(2)),
            Some(json!("scienceFiction"))
        );
        assert_eq!(
            codec.from_json(&field, "genre", &json!("SCIENCE_FICTION")).unwrap(),
            Some(Value::EnumNumber(2))
        );
    }

    #[rstest]
    #[case("bool_value", json!("true"), JsonToken::Boolean, JsonToken::String)]
    #[case("string_value", json!(1), JsonToken::String, JsonToken::Integer)]
    #[case("int32_value", json!(1.5), JsonToken::Integer, JsonToken::Float)]
    #[case("int64_value", json!("1"), JsonToken::Integer, JsonToken::String)]
    #[case("double_value", json!(1), JsonToken::Float, JsonToken::Integer)]
    #[case("enum_value", json!(1), JsonToken::String, JsonToken::Integer)]
    #[case("bool_value", json!(null), JsonToken::Boolean, JsonToken::Null)]
    fn mismatched_tokens_are_rejected(
        #[case] name: &str,
        #[case] node: serde_json::Value,
        #[case] expected_token: JsonToken,
        #[case] found_token: JsonToken,
    ) {
        let field = field("test.Union", name);
        let err = ValueCodec::AUTO.from_json(&field, name, &node).unwrap_err();
        match err {
            ParseError::Unmappable { expected, found, .. } => {
                assert_eq!(expected, expected_token);
                assert_eq!(found, found_token);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_range_integers_are_rejected() {
        let int32 = field("test.Union", "int32_value");
        let err = ValueCodec::AUTO
            .from_json(&int32, "int32Value", &json!(1_u64 << 40))
            .unwrap_err();
        assert!(matches!(err, ParseError::OutOfRange { .. }));

        let uint32 = field("test.Numbers", "uint32_value");
        let err = ValueCodec::AUTO
            .from_json(&uint32, "uint32Value", &json!(-1))
            .unwrap_err();
        assert!(matches!(err, ParseError::OutOfRange { .. }));
    }

    #[test]
    fn unknown_enum_names_are_rejected() {
        let field = field("test.Union", "enum_value");
        let err = ValueCodec::AUTO
            .from_json(&field, "enumValue", &json!("third"))
            .unwrap_err();
        assert!(matches!(err, ParseError::UnknownEnumValue { .. }));
    }

    #[test]
    fn bytes_and_groups_have_no_json_form() {
        let payload = field("test.Legacy", "payload");
        let grouped = field("test.Legacy", "grouped");
        assert_eq!(ValueCodec::AUTO.to_json(&payload, &Value::Bytes(vec![1])), None);
        assert_eq!(ValueCodec::AUTO.from_json(&payload, "payload", &json!("AQ==")).unwrap(), None);
        assert_eq!(ValueCodec::AUTO.from_json(&grouped, "grouped", &json!({})).unwrap(), None);
        assert_eq!(ValueCodec::AUTO.json_type(payload.kind()), None);
    }

    #[test]
    fn non_finite_floats_are_dropped() {
        let field = field("test.Union", "double_value");
        assert_eq!(ValueCodec::AUTO.to_json(&field, &Value::F64(f64::NAN)), None);
    }

    #[test]
    fn defaults_render_as_text() {
        let record = testing::default_value();
        let codec = ValueCodec::AUTO;
        let text = |name: &str| codec.default_text(&record.field(name).unwrap());
        assert_eq!(text("string_value").as_deref(), Some("foo"));
        assert_eq!(text("enum_value").as_deref(), Some("second"));
        assert_eq!(text("int32_value").as_deref(), Some("42"));
        assert_eq!(text("double_value").as_deref(), Some("1.5"));
    }

    #[test]
    fn long_format_depends_on_signedness() {
        assert_eq!(long_codec().long_format(&FieldKind::Sfixed64), Some("int64"));
        assert_eq!(long_codec().long_format(&FieldKind::Fixed64), Some("uint64"));
        assert_eq!(long_codec().long_format(&FieldKind::Int32), None);
        assert_eq!(ValueCodec::AUTO.long_format(&FieldKind::Int64), None);
        assert_eq!(long_codec().json_type(&FieldKind::Uint64), Some(JsonType::String));
    }
}
