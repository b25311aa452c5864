//! # prism-schema
//!
//! Schema-driven conversion between typed records and JSON trees, with
//! JSON-Schema generation.
//!
//! This crate provides:
//! - [`AutoSchema`]: the zero-config mapping derived from a record type alone
//! - [`NamedSchema`]: an immutable, rule-configured mapping registered by name
//! - [`SchemaRegistry`]: named schemas plus a memoized cache of zero-config
//!   schemas, resolved by every nested conversion
//! - [`JsonSchema`]: the generated description of a schema's JSON shape
//!
//! ## Architecture
//!
//! Record types and values come from `prism-core`. A caller picks a
//! [`Schema`], asks it for a [`Serializer`] or [`Parser`] and passes the
//! registry explicitly, so nested records resolve either to a named
//! sub-schema or to the zero-config schema of their type. Zero-config
//! derivation refuses cyclic record types, detected on the
//! [`ReferenceGraph`] of the type.

pub mod auto;
mod convert;
pub mod error;
pub mod graph;
pub mod json_schema;
pub mod named;
pub mod registry;
pub mod schema;
pub mod tokens;
pub mod transform;
pub mod transformers;

pub use auto::{AutoParser, AutoSchema, AutoSerializer};
pub use error::{
    DerivationError, JsonSchemaError, ParseError, ReferenceError, RuleError, SerializationError,
    TransformError,
};
pub use graph::ReferenceGraph;
pub use json_schema::{JsonSchema, JsonType};
pub use named::{NamedParser, NamedSchema, NamedSerializer};
pub use registry::{
    EMPTY, EmptyRegistry, ReadableSchemaRegistry, SchemaRegistry, SchemaSource,
    WritableSchemaRegistry,
};
pub use schema::{Parser, Schema, Serializer};
pub use tokens::JsonToken;
pub use transform::Transformer;
pub use transformers::DateTimeTransformer;
