//! The schema abstraction shared by zero-config and configured schemas.

use std::fmt::Debug;

use prism_core::{FieldDescriptor, Record, RecordType, Value};

use crate::error::{JsonSchemaError, ParseError, SerializationError};
use crate::json_schema::JsonSchema;
use crate::registry::ReadableSchemaRegistry;
use crate::tokens::JsonToken;

/// Converts records of one type to JSON.
pub trait Serializer {
    /// Serialize `record`, resolving nested record types through `registry`.
    ///
    /// A record with no field set serializes to `null`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] if a nested schema cannot be resolved,
    /// a transformer fails, or the record is of another type.
    fn serialize(
        &self,
        record: &Record,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<serde_json::Value, SerializationError>;
}

/// Builds records of one type from JSON.
pub trait Parser {
    /// Parse `node`, resolving nested record types through `registry`.
    ///
    /// `null` parses to a record with no field set.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on structural or token mismatches, or if a
    /// nested schema cannot be resolved.
    fn parse(
        &self,
        node: &serde_json::Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Record, ParseError>;
}

/// A mapping between one record type and its JSON shape.
pub trait Schema: Send + Sync + Debug {
    fn record_type(&self) -> &RecordType;

    fn serializer(&self) -> Box<dyn Serializer + '_>;

    fn parser(&self) -> Box<dyn Parser + '_>;

    /// Describe the JSON shape this schema produces.
    ///
    /// # Errors
    ///
    /// Returns [`JsonSchemaError`] if a nested schema cannot be derived or a
    /// named sub-schema is missing or describes another type.
    fn json_schema(
        &self,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<JsonSchema, JsonSchemaError>;

    /// Shorthand for `self.serializer().serialize(..)`.
    ///
    /// # Errors
    ///
    /// See [`Serializer::serialize`].
    fn serialize(
        &self,
        record: &Record,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<serde_json::Value, SerializationError> {
        self.serializer().serialize(record, registry)
    }

    /// Shorthand for `self.parser().parse(..)`.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse`].
    fn parse(
        &self,
        node: &serde_json::Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Record, ParseError> {
        self.parser().parse(node, registry)
    }
}

/// Reject records that are not instances of `expected`.
pub(crate) fn check_record_type(
    schema: &str,
    expected: &RecordType,
    record: &Record,
) -> Result<(), SerializationError> {
    if record.record_type() == expected {
        Ok(())
    } else {
        Err(SerializationError::WrongRecordType {
            schema: schema.to_string(),
            expected: expected.full_name().to_string(),
            found: record.record_type().full_name().to_string(),
        })
    }
}

/// Nested records that serialize to nothing are dropped rather than emitted
/// as `{}` or `null`.
pub(crate) fn non_empty(node: serde_json::Value) -> Option<serde_json::Value> {
    match &node {
        serde_json::Value::Null => None,
        serde_json::Value::Object(object) if object.is_empty() => None,
        _ => Some(node),
    }
}

/// The object holding a record's properties. `null` stands for an empty one.
pub(crate) fn record_object<'a>(
    record_type: &RecordType,
    node: &'a serde_json::Value,
) -> Result<Option<&'a serde_json::Map<String, serde_json::Value>>, ParseError> {
    match node {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(object) => Ok(Some(object)),
        other => Err(ParseError::NotAnObject {
            record: record_type.full_name().to_string(),
            found: JsonToken::of(other),
        }),
    }
}

/// Store a parsed value, naming the JSON property on failure.
pub(crate) fn populate(
    record: &mut Record,
    field: &FieldDescriptor,
    property: &str,
    value: Value,
) -> Result<(), ParseError> {
    record
        .set(field, value)
        .map_err(|source| ParseError::Record {
            field: property.to_string(),
            source,
        })
}

/// The array under a repeated property.
pub(crate) fn expect_array<'a>(
    property: &str,
    node: &'a serde_json::Value,
) -> Result<&'a [serde_json::Value], ParseError> {
    node.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ParseError::ExpectedArray {
            field: property.to_string(),
            found: JsonToken::of(node),
        })
}

/// The object under a record-typed or key-mapped property.
pub(crate) fn expect_object<'a>(
    property: &str,
    node: &'a serde_json::Value,
) -> Result<&'a serde_json::Map<String, serde_json::Value>, ParseError> {
    node.as_object().ok_or_else(|| ParseError::ExpectedObject {
        field: property.to_string(),
        found: JsonToken::of(node),
    })
}
