//! Error types for descriptor pools and dynamic records.
//!
//! Codec-level errors (rules, parsing, serialization) live in `prism-schema`;
//! the types here only cover building type definitions and populating records.

use thiserror::Error;

/// Errors raised while assembling a [`DescriptorPool`](crate::DescriptorPool).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Two records, two enums, or a record and an enum share a full name.
    #[error("Duplicate type name: {0}")]
    DuplicateType(String),

    /// A record declares the same field name twice.
    #[error("Duplicate field {field} in record {record}")]
    DuplicateField { record: String, field: String },

    /// A field refers to an enum or record type that is not in the pool.
    #[error("Field {record}.{field} refers to unknown type {type_name}")]
    UnresolvedType {
        record: String,
        field: String,
        type_name: String,
    },

    /// A default value is present where none is allowed, or does not fit the kind.
    #[error("Invalid default for {record}.{field}: {reason}")]
    InvalidDefault {
        record: String,
        field: String,
        reason: String,
    },

    /// An enum declares no values.
    #[error("Enum {0} declares no values")]
    EmptyEnum(String),

    /// An enum declares the same value name twice.
    #[error("Duplicate value {value} in enum {enum_name}")]
    DuplicateEnumValue { enum_name: String, value: String },
}

/// Errors raised while reading or writing fields of a [`Record`](crate::Record).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// No field with this name is declared on the record type.
    #[error("Record {record} has no field named {field}")]
    UnknownField { record: String, field: String },

    /// The field descriptor belongs to a different record type.
    #[error("Field {field} does not belong to record {record}")]
    ForeignField { record: String, field: String },

    /// The value's kind does not match the field's declared kind.
    #[error("Field {field} expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// A repeated operation was attempted on a singular field.
    #[error("Field {0} is not repeated")]
    NotRepeated(String),

    /// A single value was assigned to a repeated field.
    #[error("Field {0} is repeated and takes a list")]
    Repeated(String),

    /// The enum number is not declared by the field's enum type.
    #[error("Field {field} has no enum value numbered {number}")]
    UnknownEnumNumber { field: String, number: i32 },
}
