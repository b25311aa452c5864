//! Serialize/parse behavior through the public API, for both schema kinds.

use pretty_assertions::assert_eq;
use prism_core::{CaseFormat, Record, Value, testing};
use prism_schema::{
    AutoSchema, DateTimeTransformer, EMPTY, JsonToken, JsonType, NamedSchema, ParseError, Schema,
    SchemaRegistry, SchemaSource, TransformError, Transformer, WritableSchemaRegistry,
};
use serde_json::json;

/// Writes `int32` values as decimal strings.
#[derive(Debug)]
struct DecimalString;

impl Transformer for DecimalString {
    fn json_type(&self) -> JsonType {
        JsonType::String
    }

    fn serialize(&self, value: &Value) -> Result<serde_json::Value, TransformError> {
        match value {
            Value::I32(v) => Ok(json!(v.to_string())),
            other => Err(TransformError::UnexpectedValue {
                expected: "i32",
                found: other.kind_name(),
            }),
        }
    }

    fn parse(&self, node: &serde_json::Value) -> Result<Value, TransformError> {
        let text = node.as_str().ok_or(TransformError::UnexpectedToken {
            expected: JsonToken::String,
            found: JsonToken::of(node),
        })?;
        let parsed: i32 = text
            .parse()
            .map_err(|e| anyhow::anyhow!("{text:?} is not an int32: {e}"))?;
        Ok(Value::I32(parsed))
    }
}

fn union_schema() -> NamedSchema {
    NamedSchema::of(testing::union(), "Union")
        .unwrap()
        .use_schema("union_value", "Union")
        .unwrap()
        .use_schema("union_repeated", "Union")
        .unwrap()
}

fn round_trip(schema: &NamedSchema, record: &Record) -> (serde_json::Value, Record) {
    let registry = SchemaRegistry::new();
    registry.register(schema.clone());
    let node = schema.serialize(record, &registry).unwrap();
    let parsed = schema.parse(&node, &registry).unwrap();
    (node, parsed)
}

fn full_union() -> Record {
    let leaf = testing::record("test.Union")
        .with("string_value", "leaf")
        .unwrap()
        .with("enum_value", Value::EnumNumber(2))
        .unwrap();
    testing::record("test.Union")
        .with("bool_value", false)
        .unwrap()
        .with("enum_value", Value::EnumNumber(1))
        .unwrap()
        .with("string_value", "")
        .unwrap()
        .with("int32_value", -12)
        .unwrap()
        .with("int64_value", i64::MIN)
        .unwrap()
        .with("uint64_value", u64::MAX)
        .unwrap()
        .with("double_value", 0.1)
        .unwrap()
        .with("float_value", 1.25_f32)
        .unwrap()
        .with("union_value", leaf.clone())
        .unwrap()
        .with_all("union_repeated", [leaf.clone(), leaf])
        .unwrap()
        .with_all("int32_repeated", [3, 1, 2])
        .unwrap()
        .with_all("int64_repeated", [i64::MAX])
        .unwrap()
        .with_all("enum_repeated", [Value::EnumNumber(2), Value::EnumNumber(1)])
        .unwrap()
}

#[test]
fn person_with_only_a_name() {
    let schema = AutoSchema::of(testing::person()).unwrap();
    let record = testing::record("test.Person").with("name", "X").unwrap();
    let node = schema.serialize(&record, &EMPTY).unwrap();
    assert_eq!(node, json!({"name": "X"}));
    assert_eq!(schema.parse(&node, &EMPTY).unwrap(), record);
}

#[test]
fn empty_records_serialize_to_null() {
    let registry = SchemaRegistry::new();
    for record_type in [testing::person(), testing::movie(), testing::actor()] {
        let schema = registry.auto_schema(&record_type).unwrap();
        let node = schema.serialize(&Record::new(record_type), &registry).unwrap();
        assert_eq!(node, serde_json::Value::Null);
    }
    let (node, parsed) = round_trip(&union_schema(), &testing::record("test.Union"));
    assert_eq!(node, serde_json::Value::Null);
    assert!(parsed.is_empty());
}

#[test]
fn every_kind_round_trips() {
    let record = full_union();
    let (node, parsed) = round_trip(&union_schema(), &record);
    assert_eq!(parsed, record);
    assert_eq!(node["int32Repeated"], json!([3, 1, 2]));
    assert_eq!(node["enumRepeated"], json!(["second", "first"]));
    assert_eq!(node["stringValue"], json!(""));
}

#[test]
fn every_kind_round_trips_with_longs_as_strings() {
    let record = full_union();
    let schema = union_schema()
        .surface_longs_as_strings()
        .enum_case_format(CaseFormat::UpperUnderscore);
    let (node, parsed) = round_trip(&schema, &record);
    assert_eq!(parsed, record);
    assert_eq!(node["int64Value"], json!(i64::MIN.to_string()));
    assert_eq!(node["uint64Value"], json!(u64::MAX.to_string()));
    assert_eq!(node["enumValue"], json!("FIRST"));
}

#[test]
fn long_as_string_scenario() {
    let schema = union_schema().surface_longs_as_strings();
    let record = testing::record("test.Union")
        .with("int64_value", 1_234_567_890_i64)
        .unwrap();
    let (node, parsed) = round_trip(&schema, &record);
    assert_eq!(node, json!({"int64Value": "1234567890"}));
    assert_eq!(parsed, record);
}

#[test]
fn unsigned_and_zigzag_kinds_round_trip() {
    let schema = AutoSchema::of(testing::numbers()).unwrap();
    let record = testing::record("test.Numbers")
        .with("sint32_value", -5)
        .unwrap()
        .with("sfixed32_value", i32::MIN)
        .unwrap()
        .with("uint32_value", u32::MAX)
        .unwrap()
        .with("fixed32_value", 7_u32)
        .unwrap()
        .with("sint64_value", -9_i64)
        .unwrap()
        .with("sfixed64_value", i64::MAX)
        .unwrap()
        .with("fixed64_value", 11_u64)
        .unwrap()
        .with_all("uint64_repeated", [0_u64, u64::MAX])
        .unwrap();
    let node = schema.serialize(&record, &EMPTY).unwrap();
    assert_eq!(node["uint32Value"], json!(u32::MAX));
    assert_eq!(schema.parse(&node, &EMPTY).unwrap(), record);
}

#[test]
fn out_of_range_integers_are_rejected() {
    let schema = AutoSchema::of(testing::numbers()).unwrap();
    let err = schema
        .parse(&json!({"sint32Value": 1_u64 << 40}), &EMPTY)
        .unwrap_err();
    assert!(matches!(err, ParseError::OutOfRange { ref field, .. } if field == "sint32Value"));

    let err = schema.parse(&json!({"uint32Value": -1}), &EMPTY).unwrap_err();
    assert!(matches!(err, ParseError::OutOfRange { .. }));
}

#[test]
fn zero_element_repeated_fields_are_absent() {
    let schema = AutoSchema::of(testing::actor()).unwrap();
    let record = testing::record("test.Actor").with("name", "Nobody").unwrap();
    let node = schema.serialize(&record, &EMPTY).unwrap();
    assert_eq!(node, json!({"name": "Nobody"}));

    let parsed = schema.parse(&node, &EMPTY).unwrap();
    let quotes = parsed.record_type().field("quotes").unwrap();
    assert!(parsed.repeated(&quotes).is_empty());

    let parsed = schema
        .parse(&json!({"name": "Nobody", "quotes": []}), &EMPTY)
        .unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn enum_case_formats() {
    let record = testing::record("test.Union")
        .with("enum_value", Value::EnumNumber(1))
        .unwrap();
    let (node, _) = round_trip(&union_schema(), &record);
    assert_eq!(node, json!({"enumValue": "first"}));

    let upper = union_schema().enum_case_format(CaseFormat::UpperUnderscore);
    let (node, parsed) = round_trip(&upper, &record);
    assert_eq!(node, json!({"enumValue": "FIRST"}));
    assert_eq!(parsed, record);

    let movie = testing::record("test.Movie")
        .with("genre", Value::EnumNumber(2))
        .unwrap();
    let hyphen = NamedSchema::of(testing::movie(), "Movie")
        .unwrap()
        .enum_case_format(CaseFormat::LowerHyphen);
    let (node, parsed) = round_trip(&hyphen, &movie);
    assert_eq!(node, json!({"genre": "science-fiction"}));
    assert_eq!(parsed, movie);
}

#[test]
fn key_mapped_round_trip() {
    let schema = union_schema()
        .map_repeated_field("union_repeated", "string_value")
        .unwrap();
    let element = |key: &str, number: i32| {
        testing::record("test.Union")
            .with("string_value", key)
            .unwrap()
            .with("int32_value", number)
            .unwrap()
    };
    let record = testing::record("test.Union")
        .with_all("union_repeated", [element("a", 1), element("b", 2)])
        .unwrap();

    let (node, parsed) = round_trip(&schema, &record);
    assert_eq!(
        node,
        json!({"unionRepeated": {"a": {"int32Value": 1}, "b": {"int32Value": 2}}})
    );

    let field = parsed.record_type().field("union_repeated").unwrap();
    let mut keys: Vec<_> = parsed
        .repeated(&field)
        .iter()
        .filter_map(|v| v.as_record())
        .map(|r| r.get_by_name("string_value").and_then(Value::as_str).map(str::to_string))
        .collect();
    keys.sort();
    assert_eq!(keys, [Some("a".to_string()), Some("b".to_string())]);
    assert_eq!(parsed, record);
}

#[test]
fn transformers_take_precedence() {
    let schema = union_schema().transform("int32_value", DecimalString).unwrap();
    let record = testing::record("test.Union").with("int32_value", 42).unwrap();
    let (node, parsed) = round_trip(&schema, &record);
    assert_eq!(node, json!({"int32Value": "42"}));
    assert_eq!(parsed, record);

    let registry = SchemaRegistry::new();
    registry.register(schema.clone());
    let err = schema
        .parse(&json!({"int32Value": "forty-two"}), &registry)
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::Transform { source: TransformError::Other(_), .. }
    ));
}

#[test]
fn date_time_transformer_round_trips() {
    let schema = union_schema()
        .transform("int64_value", DateTimeTransformer)
        .unwrap();
    let record = testing::record("test.Union")
        .with("int64_value", 403_743_600_000_i64)
        .unwrap();
    let (node, parsed) = round_trip(&schema, &record);
    assert_eq!(node, json!({"int64Value": "1982-10-17T23:00:00.000Z"}));
    assert_eq!(parsed, record);
}

#[test]
fn cyclic_types_round_trip_through_named_schemas() {
    let schema = NamedSchema::of(testing::node(), "Node")
        .unwrap()
        .use_schema("children", "Node")
        .unwrap();
    let leaf = |label: &str| testing::record("test.Node").with("label", label).unwrap();
    let record = testing::record("test.Node")
        .with("label", "root")
        .unwrap()
        .with_all(
            "children",
            [
                leaf("a"),
                testing::record("test.Node")
                    .with("label", "b")
                    .unwrap()
                    .with_all("children", [leaf("c")])
                    .unwrap(),
            ],
        )
        .unwrap();
    let registry = SchemaRegistry::new();
    registry.register(schema.clone());
    let node = schema.serialize(&record, &registry).unwrap();
    assert_eq!(
        node,
        json!({
            "label": "root",
            "children": [
                {"label": "a"},
                {"label": "b", "children": [{"label": "c"}]}
            ]
        })
    );
    assert_eq!(schema.parse(&node, &registry).unwrap(), record);
}

#[test]
fn nested_auto_schemas_come_from_the_registry() {
    let registry = SchemaRegistry::new();
    let schema = NamedSchema::of(testing::actor(), "Actor")
        .unwrap()
        .substitute("movies", "filmography")
        .unwrap();
    let record = testing::record("test.Actor")
        .with_all("movies", [testing::movie_record("Alien", 1979)])
        .unwrap();
    let node = schema.serialize(&record, &registry).unwrap();
    assert_eq!(node, json!({"filmography": [{"title": "Alien", "year": 1979}]}));
    assert_eq!(schema.parse(&node, &registry).unwrap(), record);
}
