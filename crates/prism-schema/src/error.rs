//! Error types for schema configuration, derivation, conversion and generation.
//!
//! Configuration mistakes surface as [`RuleError`] as soon as a rule is added.
//! Everything else is reported lazily, by the operation that hits it.

use prism_core::RecordError;
use thiserror::Error;

use crate::tokens::JsonToken;

/// A configuration rule that cannot apply to the schema's record type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Schema name must not be empty")]
    EmptyName,

    /// The record type declares no field with this name.
    #[error("Schema {schema} has no field named {field}")]
    UnknownField { schema: String, field: String },

    /// The field exists but has already been skipped.
    #[error("Field {field} of schema {schema} is skipped")]
    SkippedField { schema: String, field: String },

    /// A constant key collides with a field or an earlier constant.
    #[error("Schema {schema} already defines {key}")]
    DuplicateConstant { schema: String, key: String },

    /// Key mappings only apply to repeated record fields.
    #[error("Field {field} of schema {schema} is not a repeated record field")]
    NotRepeatedRecord { schema: String, field: String },

    /// The key of a mapping must be a singular string field of the element type.
    #[error("{key} is not a singular string field of {element}, the element type of {schema}.{field}")]
    InvalidKeyField {
        schema: String,
        field: String,
        key: String,
        element: String,
    },

    /// Sub-schemas only apply to record fields.
    #[error("Field {field} of schema {schema} is not a record field")]
    NotRecord { schema: String, field: String },

    #[error("Sub-schema name for {schema}.{field} must not be empty")]
    EmptySchemaReference { schema: String, field: String },

    #[error("Format for {schema}.{field} must not be blank")]
    BlankFormat { schema: String, field: String },

    /// Byte-sequence and group fields have no JSON representation.
    #[error("Field {field} of schema {schema} has a kind with no JSON representation")]
    UnsupportedField { schema: String, field: String },
}

/// A zero-config schema cannot be derived for a record type.
///
/// Cheap to clone, so one failed derivation can be handed to every caller
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error(
        "Cannot derive a schema for {type_name}: record references loop through {}",
        .cycle.join(", ")
    )]
    Cyclic { type_name: String, cycle: Vec<String> },
}

/// A named sub-schema cannot be used for a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error(
        "Schema {schema} refers to schema {reference} to format field {field} but no such schema can be found in the registry"
    )]
    Missing {
        schema: String,
        field: String,
        reference: String,
    },

    #[error(
        "Schema {schema} refers to schema {reference} to format field {field} but {reference} describes {found}, not {expected}"
    )]
    Mismatched {
        schema: String,
        field: String,
        reference: String,
        expected: String,
        found: String,
    },
}

/// Failure inside a [`Transformer`](crate::Transformer).
#[derive(Debug, Error)]
pub enum TransformError {
    /// The record value is not of the kind the transformer handles.
    #[error("Expected a {expected} value, got {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },

    /// The JSON node is not of the token type the transformer reads.
    #[error("Expected a {expected} token, got {found}")]
    UnexpectedToken { expected: JsonToken, found: JsonToken },

    /// The JSON text does not match the transformer's external format.
    #[error("Invalid {format} value {value:?}: {reason}")]
    InvalidFormat {
        format: &'static str,
        value: String,
        reason: String,
    },

    /// Escape hatch for user-defined transformers.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure while converting a record to JSON.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The record is not an instance of the schema's record type.
    #[error("Schema {schema} describes {expected} and cannot serialize a {found} record")]
    WrongRecordType {
        schema: String,
        expected: String,
        found: String,
    },

    #[error("Cannot serialize field {field} of schema {schema}: {source}")]
    Transform {
        schema: String,
        field: String,
        #[source]
        source: TransformError,
    },
}

/// Failure while building a record from JSON.
///
/// `field` is always the external (JSON) property name.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The document for a record is neither an object nor null.
    #[error("Expected an object for {record}, but was {found}")]
    NotAnObject { record: String, found: JsonToken },

    #[error("Field '{field}' is expected to be an array, but was {found}")]
    ExpectedArray { field: String, found: JsonToken },

    #[error("Field '{field}' is expected to be an object, but was {found}")]
    ExpectedObject { field: String, found: JsonToken },

    /// The token type does not match the field kind.
    #[error("Field '{field}' expects a {expected} value, but was {found}")]
    Unmappable {
        field: String,
        expected: JsonToken,
        found: JsonToken,
    },

    /// A number (or numeric string) that does not fit the field kind.
    #[error("Value {value} of field '{field}' is out of range for {kind}")]
    OutOfRange {
        field: String,
        value: String,
        kind: String,
    },

    /// A long-as-string value that is not a base-10 integer.
    #[error("Value {value:?} of field '{field}' is not a valid {kind}")]
    InvalidNumber {
        field: String,
        value: String,
        kind: String,
    },

    #[error("Field '{field}' has no enum value matching {value:?}")]
    UnknownEnumValue { field: String, value: String },

    #[error("Cannot parse field '{field}': {source}")]
    Transform {
        field: String,
        #[source]
        source: TransformError,
    },

    /// A parsed value was rejected by the record.
    #[error("Cannot populate field '{field}': {source}")]
    Record {
        field: String,
        #[source]
        source: RecordError,
    },
}

/// Failure while generating a JSON Schema document.
#[derive(Debug, Error)]
pub enum JsonSchemaError {
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),
}
