use prism_core::{FieldDescriptor, Record, RecordType, Value};

use super::NamedSchema;
use crate::error::ParseError;
use crate::registry::ReadableSchemaRegistry;
use crate::schema::{Parser, Schema, expect_array, expect_object, populate, record_object};

/// Parser of a [`NamedSchema`].
pub struct NamedParser<'a> {
    schema: &'a NamedSchema,
}

impl<'a> NamedParser<'a> {
    pub(super) const fn new(schema: &'a NamedSchema) -> Self {
        Self { schema }
    }

    /// One value of `field`. `None` leaves the value out: unsupported kinds
    /// and `{}` for a record.
    fn value(
        &self,
        field: &FieldDescriptor,
        property: &str,
        node: &serde_json::Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Option<Value>, ParseError> {
        if let Some(transformer) = self.schema.transforms.get(field.name()) {
            return transformer
                .parse(node)
                .map(Some)
                .map_err(|source| ParseError::Transform {
                    field: property.to_string(),
                    source,
                });
        }
        let Some(nested) = field.record_type() else {
            return self.schema.codec().from_json(field, property, node);
        };
        if expect_object(property, node)?.is_empty() {
            return Ok(None);
        }
        let record = self.record(field, &nested, property, node, registry)?;
        Ok(Some(Value::Message(record)))
    }

    fn record(
        &self,
        field: &FieldDescriptor,
        nested: &RecordType,
        property: &str,
        node: &serde_json::Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Record, ParseError> {
        expect_object(property, node)?;
        match self.schema.referenced_schema(field, registry)? {
            Some(schema) => schema.parse(node, registry),
            None => registry.auto_schema(nested)?.parse(node, registry),
        }
    }

    fn array(
        &self,
        field: &FieldDescriptor,
        property: &str,
        node: &serde_json::Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Vec<Value>, ParseError> {
        let mut values = Vec::new();
        for item in expect_array(property, node)? {
            if let Some(value) = self.value(field, property, item, registry)? {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// `{key: element}` back to elements, restoring each key field from its
    /// JSON key.
    fn mapped(
        &self,
        field: &FieldDescriptor,
        key_field: &FieldDescriptor,
        property: &str,
        node: &serde_json::Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Vec<Value>, ParseError> {
        let entries = expect_object(property, node)?;
        let mut values = Vec::with_capacity(entries.len());
        for (key, entry) in entries {
            let element = if self.schema.transforms.contains_key(field.name()) {
                self.value(field, property, entry, registry)?
            } else {
                let element_type = key_field.containing_type();
                Some(Value::Message(
                    self.record(field, element_type, property, entry, registry)?,
                ))
            };
            let Some(mut element) = element else {
                continue;
            };
            if let Value::Message(record) = &mut element {
                record
                    .set(key_field, Value::String(key.clone()))
                    .map_err(|source| ParseError::Record {
                        field: property.to_string(),
                        source,
                    })?;
            }
            values.push(element);
        }
        Ok(values)
    }
}

impl Parser for NamedParser<'_> {
    fn parse(
        &self,
        node: &serde_json::Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Record, ParseError> {
        let schema = self.schema;
        let mut record = Record::new(schema.record_type.clone());
        let Some(object) = record_object(&schema.record_type, node)? else {
            return Ok(record);
        };

        for field in schema.record_type.fields() {
            if schema.is_skipped(&field) {
                continue;
            }
            let property = schema.external_name(&field);
            let Some(value_node) = object.get(&property).filter(|n| !n.is_null()) else {
                continue;
            };
            if field.is_repeated() {
                let values = match schema.mappings.get(field.name()) {
                    Some(key_field) => {
                        self.mapped(&field, key_field, &property, value_node, registry)?
                    }
                    None => self.array(&field, &property, value_node, registry)?,
                };
                populate(&mut record, &field, &property, Value::List(values))?;
            } else if let Some(value) = self.value(&field, &property, value_node, registry)? {
                populate(&mut record, &field, &property, value)?;
            }
        }
        Ok(record)
    }
}
