//! The generated JSON Schema value model.
//!
//! [`JsonSchema`] mirrors the JSON-Schema vocabulary the codec emits: `id`,
//! `type`, `properties`, `items`, `additionalProperties`, `required`,
//! `default`, `format`, `enum`, `description` and a `$ref` pointer naming
//! another registered schema. Properties keep declaration order; in the
//! serialized document they become an object keyed by property name.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// JSON value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl JsonType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Null => "null",
            Self::Number => "number",
            Self::Object => "object",
            Self::String => "string",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON Schema node.
///
/// `name` is only meaningful for entries of a parent's `properties`, where it
/// is the property key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip)]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub json_type: Option<JsonType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_properties",
        deserialize_with = "deserialize_properties"
    )]
    pub properties: Vec<JsonSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<JsonSchema>>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub schema_reference: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

impl JsonSchema {
    /// A node of the given type.
    #[must_use]
    pub fn of_type(json_type: JsonType) -> Self {
        Self {
            json_type: Some(json_type),
            ..Self::default()
        }
    }

    /// An object node pointing at a registered schema by name.
    #[must_use]
    pub fn reference(schema_name: impl Into<String>) -> Self {
        Self {
            json_type: Some(JsonType::Object),
            schema_reference: Some(schema_name.into()),
            ..Self::default()
        }
    }

    /// A property with no type information yet.
    #[must_use]
    pub fn property(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Look up a direct property by name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Self> {
        self.properties
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
    }

    /// Merge `other` into `self`.
    ///
    /// Scalar members set on `other` replace those on `self`, list members
    /// are appended, and nested `items`/`additionalProperties` merge
    /// recursively. This is how an unnamed nested record is flattened into
    /// the property that holds it.
    pub fn merge_from(&mut self, other: Self) {
        let Self {
            id,
            name,
            json_type,
            description,
            default,
            required,
            format,
            enum_values,
            properties,
            items,
            additional_properties,
            schema_reference,
        } = other;

        merge_option(&mut self.id, id);
        merge_option(&mut self.name, name);
        merge_option(&mut self.json_type, json_type);
        merge_option(&mut self.description, description);
        merge_option(&mut self.default, default);
        self.required |= required;
        merge_option(&mut self.format, format);
        self.enum_values.extend(enum_values);
        self.properties.extend(properties);
        merge_nested(&mut self.items, items);
        merge_nested(&mut self.additional_properties, additional_properties);
        merge_option(&mut self.schema_reference, schema_reference);
    }
}

fn merge_option<T>(target: &mut Option<T>, source: Option<T>) {
    if source.is_some() {
        *target = source;
    }
}

fn merge_nested(target: &mut Option<Box<JsonSchema>>, source: Option<Box<JsonSchema>>) {
    match (target.as_mut(), source) {
        (Some(existing), Some(incoming)) => existing.merge_from(*incoming),
        (None, Some(incoming)) => *target = Some(incoming),
        (_, None) => {}
    }
}

fn serialize_properties<S: Serializer>(
    properties: &[JsonSchema],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(properties.len()))?;
    for property in properties {
        map.serialize_entry(property.name.as_deref().unwrap_or_default(), property)?;
    }
    map.end()
}

fn deserialize_properties<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<JsonSchema>, D::Error> {
    struct PropertiesVisitor;

    impl<'de> Visitor<'de> for PropertiesVisitor {
        type Value = Vec<JsonSchema>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of named property schemas")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut properties = Vec::with_capacity(access.size_hint().unwrap_or_default());
            while let Some((name, mut property)) = access.next_entry::<String, JsonSchema>()? {
                property.name = Some(name);
                properties.push(property);
            }
            Ok(properties)
        }
    }

    deserializer.deserialize_map(PropertiesVisitor)
}
