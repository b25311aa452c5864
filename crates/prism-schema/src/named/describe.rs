use prism_core::{FieldDescriptor, RecordType};

use super::NamedSchema;
use crate::error::JsonSchemaError;
use crate::json_schema::{JsonSchema, JsonType};
use crate::registry::ReadableSchemaRegistry;
use crate::schema::Schema;

impl NamedSchema {
    /// The JSON-Schema document of this schema: constants first, then every
    /// unskipped field in declaration order.
    pub(super) fn describe_json(
        &self,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<JsonSchema, JsonSchemaError> {
        let mut schema = JsonSchema::of_type(JsonType::Object);
        schema.id = Some(self.name.clone());

        for (key, _) in &self.constants {
            let mut property = JsonSchema::property(key.clone());
            property.json_type = Some(JsonType::String);
            property.description = self.descriptions.get(key).cloned();
            schema.properties.push(property);
        }

        for field in self.record_type.fields() {
            if self.is_skipped(&field) {
                continue;
            }
            if let Some(property) = self.field_property(&field, registry)? {
                schema.properties.push(property);
            }
        }
        Ok(schema)
    }

    fn field_property(
        &self,
        field: &FieldDescriptor,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Option<JsonSchema>, JsonSchemaError> {
        let codec = self.codec();
        let Some(value_type) = codec.json_type(field.kind()) else {
            return Ok(None);
        };
        let name = field.name();
        let transformer = self.transforms.get(name);

        let mut property = JsonSchema::property(self.external_name(field));
        property.description = self.descriptions.get(name).cloned();
        property.default = codec.default_text(field);
        property.required = field.is_required();
        property.format = self
            .formats
            .get(name)
            .cloned()
            .or_else(|| transformer.and_then(|t| t.external_format()).map(str::to_string));

        if let Some(transformer) = transformer {
            if field.is_repeated() {
                property.json_type = Some(JsonType::Array);
                property.items = Some(Box::new(JsonSchema::of_type(transformer.json_type())));
            } else {
                property.json_type = Some(transformer.json_type());
            }
            return Ok(Some(property));
        }

        let long_format = codec.long_format(field.kind()).map(str::to_string);
        let enum_values = field
            .enum_type()
            .map(|e| codec.enum_names(&e))
            .unwrap_or_default();

        match (field.is_repeated(), field.record_type()) {
            (true, Some(nested)) => {
                let element = self.element_schema(field, &nested, registry)?;
                if self.mappings.contains_key(name) {
                    property.json_type = Some(JsonType::Object);
                    property.additional_properties = Some(Box::new(element));
                } else {
                    property.json_type = Some(JsonType::Array);
                    property.items = Some(Box::new(element));
                }
            }
            (true, None) => {
                let mut items = JsonSchema::of_type(value_type);
                items.format = long_format;
                property.json_type = Some(JsonType::Array);
                property.items = Some(Box::new(items));
                property.enum_values = enum_values;
            }
            (false, Some(nested)) => {
                property.merge_from(self.element_schema(field, &nested, registry)?);
            }
            (false, None) => {
                property.json_type = Some(value_type);
                property.enum_values = enum_values;
                if property.format.is_none() {
                    property.format = long_format;
                }
            }
        }
        Ok(Some(property))
    }

    /// A reference to the configured sub-schema, else the zero-config
    /// schema of `nested`, inlined.
    fn element_schema(
        &self,
        field: &FieldDescriptor,
        nested: &RecordType,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<JsonSchema, JsonSchemaError> {
        match self.referenced_schema(field, registry)? {
            Some(schema) => Ok(JsonSchema::reference(schema.name())),
            None => Ok(registry.auto_schema(nested)?.json_schema(registry)?),
        }
    }
}
