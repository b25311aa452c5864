use prism_core::{FieldDescriptor, Record, Value};

use super::NamedSchema;
use crate::error::SerializationError;
use crate::registry::ReadableSchemaRegistry;
use crate::schema::{Schema, Serializer, check_record_type, non_empty};

/// Serializer of a [`NamedSchema`].
pub struct NamedSerializer<'a> {
    schema: &'a NamedSchema,
}

impl<'a> NamedSerializer<'a> {
    pub(super) const fn new(schema: &'a NamedSchema) -> Self {
        Self { schema }
    }

    /// One value of `field`: the field's transformer wins over kind-based
    /// conversion. `None` drops the value.
    fn value(
        &self,
        field: &FieldDescriptor,
        value: &Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Option<serde_json::Value>, SerializationError> {
        if let Some(transformer) = self.schema.transforms.get(field.name()) {
            let node = transformer
                .serialize(value)
                .map_err(|source| SerializationError::Transform {
                    schema: self.schema.name.clone(),
                    field: field.name().to_string(),
                    source,
                })?;
            return Ok(non_empty(node));
        }
        match value {
            Value::Message(nested) => Ok(non_empty(self.record(field, nested, registry)?)),
            other => Ok(self.schema.codec().to_json(field, other)),
        }
    }

    fn record(
        &self,
        field: &FieldDescriptor,
        nested: &Record,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<serde_json::Value, SerializationError> {
        match self.schema.referenced_schema(field, registry)? {
            Some(schema) => schema.serialize(nested, registry),
            None => registry
                .auto_schema(nested.record_type())?
                .serialize(nested, registry),
        }
    }

    fn array(
        &self,
        field: &FieldDescriptor,
        items: &[Value],
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Option<serde_json::Value>, SerializationError> {
        let mut array = Vec::with_capacity(items.len());
        for item in items {
            if let Some(node) = self.value(field, item, registry)? {
                array.push(node);
            }
        }
        Ok((!array.is_empty()).then_some(serde_json::Value::Array(array)))
    }

    /// Key-mapped elements as `{key: element}`. Elements without a usable
    /// key are dropped. An element that is empty once its key is removed
    /// stays in the object as `{}` instead of being omitted like other null
    /// values, since its key alone still carries data.
    fn mapped(
        &self,
        field: &FieldDescriptor,
        key_field: &FieldDescriptor,
        items: &[Value],
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Option<serde_json::Value>, SerializationError> {
        let mut object = serde_json::Map::new();
        for item in items {
            let Value::Message(element) = item else {
                continue;
            };
            let Some(key) = element
                .get(key_field)
                .and_then(Value::as_str)
                .filter(|key| !key.trim().is_empty())
            else {
                continue;
            };
            // Keys are not checked for uniqueness; a later element replaces an
            // earlier one under the same key.
            let mut stripped = element.clone();
            stripped.clear(key_field);

            let node = if self.schema.transforms.contains_key(field.name()) {
                self.value(field, &Value::Message(stripped), registry)?
            } else {
                // Unlike other null values, an element holding nothing but its
                // key is kept as `{}`, so parsing it back restores the element.
                Some(match self.record(field, &stripped, registry)? {
                    serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
                    node => node,
                })
            };
            if let Some(node) = node {
                object.insert(key.to_string(), node);
            }
        }
        Ok((!object.is_empty()).then_some(serde_json::Value::Object(object)))
    }
}

impl Serializer for NamedSerializer<'_> {
    fn serialize(
        &self,
        record: &Record,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<serde_json::Value, SerializationError> {
        let schema = self.schema;
        check_record_type(&schema.name, &schema.record_type, record)?;

        let mut object = serde_json::Map::new();
        for (key, value) in &schema.constants {
            object.insert(key.clone(), serde_json::Value::String(value.clone()));
        }

        for field in schema.record_type.fields() {
            if schema.is_skipped(&field) {
                continue;
            }
            let node = if field.is_repeated() {
                let items = record.repeated(&field);
                if items.is_empty() {
                    continue;
                }
                match schema.mappings.get(field.name()) {
                    Some(key_field) => self.mapped(&field, key_field, items, registry)?,
                    None => self.array(&field, items, registry)?,
                }
            } else if let Some(value) = record.get(&field) {
                self.value(&field, value, registry)?
            } else {
                None
            };
            if let Some(node) = node {
                object.insert(schema.external_name(&field), node);
            }
        }

        if object.is_empty() {
            Ok(serde_json::Value::Null)
        } else {
            Ok(serde_json::Value::Object(object))
        }
    }
}
