//! # prism-core
//!
//! Typed record model for Prism.
//!
//! This crate provides the types every Prism layer is written against:
//! - Record and enum definitions, validated into an immutable [`DescriptorPool`]
//! - Field kinds and cardinality
//! - Dynamic [`Record`] instances with explicit field presence
//! - Case-format conversion for field and enum names
//! - Error types for building pools and populating records

pub mod case;
pub mod descriptor;
pub mod errors;
pub mod kind;
pub mod record;
#[cfg(feature = "testing")]
pub mod testing;
pub mod value;

pub use case::CaseFormat;
pub use descriptor::{
    DescriptorPool, DescriptorPoolBuilder, EnumDef, EnumType, EnumValueDef, FieldDef,
    FieldDescriptor, RecordDef, RecordType,
};
pub use errors::{DescriptorError, RecordError};
pub use kind::{Cardinality, FieldKind};
pub use record::Record;
pub use value::Value;
