//! Pluggable value converters.

use std::fmt::Debug;

use prism_core::Value;

use crate::error::TransformError;
use crate::json_schema::JsonType;

/// A bidirectional converter between one field's record values and JSON.
///
/// A transformer registered on a field replaces the kind-based conversion in
/// both directions. Implementations are stateless and shared across threads.
pub trait Transformer: Send + Sync + Debug {
    /// The JSON type [`serialize`](Self::serialize) produces.
    fn json_type(&self) -> JsonType;

    /// Convert a record value to a JSON node. `Null` drops the value.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] if the value cannot be represented.
    fn serialize(&self, value: &Value) -> Result<serde_json::Value, TransformError>;

    /// Convert a JSON node back to a record value.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] if the node has the wrong token type or
    /// content.
    fn parse(&self, node: &serde_json::Value) -> Result<Value, TransformError>;

    /// A JSON-Schema `format` describing the produced strings, if any. Only
    /// used for schema generation.
    fn external_format(&self) -> Option<&str> {
        None
    }
}
