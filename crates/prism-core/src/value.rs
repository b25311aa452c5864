//! Dynamic field values.

use std::fmt;

use crate::kind::FieldKind;
use crate::record::Record;

/// The value of a record field.
///
/// Repeated fields hold a [`Value::List`]; every other variant is a single
/// value of the matching [`FieldKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Number of an enum value declared by the field's enum type.
    EnumNumber(i32),
    Message(Record),
    List(Vec<Value>),
}

impl Value {
    /// Whether this value can be stored in a single slot of `kind`.
    ///
    /// Enum numbers are not checked against the declared value set here;
    /// [`Record::set`] does that with the field's enum type at hand.
    #[must_use]
    pub fn conforms_to(&self, kind: &FieldKind) -> bool {
        match (self, kind) {
            (Self::Bool(_), FieldKind::Bool)
            | (Self::I32(_), FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32)
            | (Self::U32(_), FieldKind::Uint32 | FieldKind::Fixed32)
            | (Self::I64(_), FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64)
            | (Self::U64(_), FieldKind::Uint64 | FieldKind::Fixed64)
            | (Self::F32(_), FieldKind::Float)
            | (Self::F64(_), FieldKind::Double)
            | (Self::String(_), FieldKind::String)
            | (Self::Bytes(_), FieldKind::Bytes)
            | (Self::EnumNumber(_), FieldKind::Enum(_)) => true,
            (Self::Message(record), FieldKind::Message(name)) => {
                record.record_type().full_name() == name
            }
            _ => false,
        }
    }

    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::EnumNumber(_) => "enum",
            Self::Message(_) => "message",
            Self::List(_) => "list",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Message(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

/// Plain-text rendering used for documented defaults: numbers in base 10,
/// floats always with a fractional part, strings verbatim.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::I32(v) | Self::EnumNumber(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v:?}"),
            Self::F64(v) => write!(f, "{v:?}"),
            Self::String(v) => f.write_str(v),
            Self::Bytes(v) => write!(f, "{v:?}"),
            Self::Message(record) => write!(f, "{}{{..}}", record.record_type().full_name()),
            Self::List(values) => write!(f, "[{} values]", values.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Message(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_variants_match_their_kinds() {
        assert!(Value::I32(1).conforms_to(&FieldKind::Sfixed32));
        assert!(Value::U32(1).conforms_to(&FieldKind::Fixed32));
        assert!(Value::I64(1).conforms_to(&FieldKind::Sint64));
        assert!(Value::U64(1).conforms_to(&FieldKind::Uint64));
        assert!(!Value::I32(1).conforms_to(&FieldKind::Int64));
        assert!(!Value::U64(1).conforms_to(&FieldKind::Int64));
    }

    #[test]
    fn nothing_conforms_to_group() {
        assert!(!Value::Bytes(vec![1]).conforms_to(&FieldKind::Group));
        assert!(!Value::String("x".into()).conforms_to(&FieldKind::Group));
    }

    #[test]
    fn display_keeps_float_fraction() {
        assert_eq!(Value::F64(1.0).to_string(), "1.0");
        assert_eq!(Value::F32(2.5).to_string(), "2.5");
        assert_eq!(Value::I32(42).to_string(), "42");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::from("foo").to_string(), "foo");
    }
}
