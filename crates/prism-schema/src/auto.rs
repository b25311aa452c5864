//! Zero-config schemas: the JSON shape follows from the record type alone.
//!
//! Field names become `lowerCamel` properties, enum values `lowerCamel`
//! strings, and nested records are converted with their own zero-config
//! schema. Since nothing bounds that recursion, cyclic record types are
//! rejected up front.

use prism_core::{FieldDescriptor, Record, RecordType, Value};

use crate::convert::{ValueCodec, property_name};
use crate::error::{DerivationError, JsonSchemaError, ParseError, SerializationError};
use crate::graph::ReferenceGraph;
use crate::json_schema::{JsonSchema, JsonType};
use crate::registry::ReadableSchemaRegistry;
use crate::schema::{
    Parser, Schema, Serializer, check_record_type, expect_array, expect_object, non_empty,
    populate, record_object,
};

/// A schema derived purely from a record type's structure.
#[derive(Debug, Clone)]
pub struct AutoSchema {
    record_type: RecordType,
}

impl AutoSchema {
    /// Derive the schema of `record_type`.
    ///
    /// # Errors
    ///
    /// Returns [`DerivationError::Cyclic`] if any record type reachable from
    /// `record_type` (itself included) can reach itself again.
    pub fn of(record_type: RecordType) -> Result<Self, DerivationError> {
        let graph = ReferenceGraph::of(&record_type);
        if graph.is_looping() {
            let cycle = graph.cycles().into_iter().next().unwrap_or_default();
            tracing::debug!(
                record_type = record_type.full_name(),
                cycle = ?cycle,
                "cyclic record type has no zero-config schema"
            );
            return Err(DerivationError::Cyclic {
                type_name: record_type.full_name().to_string(),
                cycle,
            });
        }
        Ok(Self { record_type })
    }

    fn name(&self) -> &str {
        self.record_type.full_name()
    }
}

impl Schema for AutoSchema {
    fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    fn serializer(&self) -> Box<dyn Serializer + '_> {
        Box::new(AutoSerializer { schema: self })
    }

    fn parser(&self) -> Box<dyn Parser + '_> {
        Box::new(AutoParser { schema: self })
    }

    fn json_schema(
        &self,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<JsonSchema, JsonSchemaError> {
        let codec = ValueCodec::AUTO;
        let mut schema = JsonSchema::of_type(JsonType::Object);

        for field in self.record_type.fields() {
            let Some(value_type) = codec.json_type(field.kind()) else {
                continue;
            };
            let mut property = JsonSchema::property(property_name(&field));
            property.default = codec.default_text(&field);
            property.required = field.is_required();
            let enum_values = field
                .enum_type()
                .map(|e| codec.enum_names(&e))
                .unwrap_or_default();

            match (field.is_repeated(), field.record_type()) {
                (true, Some(nested)) => {
                    property.json_type = Some(JsonType::Array);
                    let items = registry.auto_schema(&nested)?.json_schema(registry)?;
                    property.items = Some(Box::new(items));
                }
                (true, None) => {
                    property.json_type = Some(JsonType::Array);
                    property.items = Some(Box::new(JsonSchema::of_type(value_type)));
                    property.enum_values = enum_values;
                }
                (false, Some(nested)) => {
                    property.merge_from(registry.auto_schema(&nested)?.json_schema(registry)?);
                }
                (false, None) => {
                    property.json_type = Some(value_type);
                    property.enum_values = enum_values;
                }
            }
            schema.properties.push(property);
        }
        Ok(schema)
    }
}

/// Serializer of an [`AutoSchema`].
pub struct AutoSerializer<'a> {
    schema: &'a AutoSchema,
}

impl AutoSerializer<'_> {
    fn value(
        field: &FieldDescriptor,
        value: &Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Option<serde_json::Value>, SerializationError> {
        match value {
            Value::Message(nested) => {
                let schema = registry.auto_schema(nested.record_type())?;
                Ok(non_empty(schema.serializer().serialize(nested, registry)?))
            }
            other => Ok(ValueCodec::AUTO.to_json(field, other)),
        }
    }
}

impl Serializer for AutoSerializer<'_> {
    fn serialize(
        &self,
        record: &Record,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<serde_json::Value, SerializationError> {
        check_record_type(self.schema.name(), &self.schema.record_type, record)?;
        let mut object = serde_json::Map::new();

        for field in self.schema.record_type.fields() {
            if field.is_repeated() {
                let mut array = Vec::new();
                for item in record.repeated(&field) {
                    if let Some(node) = Self::value(&field, item, registry)? {
                        array.push(node);
                    }
                }
                if !array.is_empty() {
                    object.insert(property_name(&field), serde_json::Value::Array(array));
                }
            } else if let Some(value) = record.get(&field)
                && let Some(node) = Self::value(&field, value, registry)?
            {
                object.insert(property_name(&field), node);
            }
        }

        if object.is_empty() {
            Ok(serde_json::Value::Null)
        } else {
            Ok(serde_json::Value::Object(object))
        }
    }
}

/// Parser of an [`AutoSchema`].
pub struct AutoParser<'a> {
    schema: &'a AutoSchema,
}

impl AutoParser<'_> {
    fn value(
        field: &FieldDescriptor,
        property: &str,
        node: &serde_json::Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Option<Value>, ParseError> {
        let Some(nested) = field.record_type() else {
            return ValueCodec::AUTO.from_json(field, property, node);
        };
        if expect_object(property, node)?.is_empty() {
            return Ok(None);
        }
        let schema = registry.auto_schema(&nested)?;
        Ok(Some(Value::Message(schema.parser().parse(node, registry)?)))
    }
}

impl Parser for AutoParser<'_> {
    fn parse(
        &self,
        node: &serde_json::Value,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Record, ParseError> {
        let record_type = &self.schema.record_type;
        let mut record = Record::new(record_type.clone());
        let Some(object) = record_object(record_type, node)? else {
            return Ok(record);
        };

        for field in record_type.fields() {
            let property = property_name(&field);
            let Some(value_node) = object.get(&property).filter(|n| !n.is_null()) else {
                continue;
            };
            if field.is_repeated() {
                let mut values = Vec::new();
                for item in expect_array(&property, value_node)? {
                    if let Some(value) = Self::value(&field, &property, item, registry)? {
                        values.push(value);
                    }
                }
                populate(&mut record, &field, &property, Value::List(values))?;
            } else if let Some(value) = Self::value(&field, &property, value_node, registry)? {
                populate(&mut record, &field, &property, value)?;
            }
        }
        Ok(record)
    }
}
