//! Field kinds and cardinality.

use std::fmt;

/// The declared kind of a record field.
///
/// `Enum` and `Message` carry the full name of the referenced type, resolved
/// through the owning [`DescriptorPool`](crate::DescriptorPool).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Bytes,
    Int32,
    Sint32,
    Sfixed32,
    Uint32,
    Fixed32,
    Int64,
    Sint64,
    Sfixed64,
    Uint64,
    Fixed64,
    Float,
    Double,
    String,
    Enum(String),
    Message(String),
    /// Legacy grouped sub-record. Carried in descriptors but never converted.
    Group,
}

impl FieldKind {
    /// Shorthand for [`FieldKind::Enum`].
    pub fn enumeration(full_name: impl Into<String>) -> Self {
        Self::Enum(full_name.into())
    }

    /// Shorthand for [`FieldKind::Message`].
    pub fn message(full_name: impl Into<String>) -> Self {
        Self::Message(full_name.into())
    }

    /// Whether values of this kind are 64-bit integers.
    #[must_use]
    pub const fn is_64_bit(&self) -> bool {
        matches!(
            self,
            Self::Int64 | Self::Sint64 | Self::Sfixed64 | Self::Uint64 | Self::Fixed64
        )
    }

    /// Whether values of this kind are unsigned integers.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Self::Uint32 | Self::Fixed32 | Self::Uint64 | Self::Fixed64
        )
    }

    #[must_use]
    pub const fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }

    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    /// Kinds that the codec leaves out of every conversion.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Bytes | Self::Group)
    }

    /// Full name of the referenced enum or record type, if any.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Enum(name) | Self::Message(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Bytes => f.write_str("bytes"),
            Self::Int32 => f.write_str("int32"),
            Self::Sint32 => f.write_str("sint32"),
            Self::Sfixed32 => f.write_str("sfixed32"),
            Self::Uint32 => f.write_str("uint32"),
            Self::Fixed32 => f.write_str("fixed32"),
            Self::Int64 => f.write_str("int64"),
            Self::Sint64 => f.write_str("sint64"),
            Self::Sfixed64 => f.write_str("sfixed64"),
            Self::Uint64 => f.write_str("uint64"),
            Self::Fixed64 => f.write_str("fixed64"),
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double"),
            Self::String => f.write_str("string"),
            Self::Enum(name) => write!(f, "enum {name}"),
            Self::Message(name) => write!(f, "message {name}"),
            Self::Group => f.write_str("group"),
        }
    }
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    #[default]
    Optional,
    Required,
    Repeated,
}
