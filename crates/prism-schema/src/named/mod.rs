//! Configured schemas.
//!
//! A [`NamedSchema`] starts out shaped exactly like the zero-config schema of
//! its record type and is refined with rules: skipped fields, constants,
//! renames, transformers, key-mapped repeated fields, descriptions, formats
//! and sub-schema references. Every rule is validated against the record
//! type when it is added and returns a new schema, leaving the receiver
//! untouched.
//!
//! ```ignore
//! let schema = NamedSchema::of(movie_type, "Movie")?
//!     .substitute("title", "name")?
//!     .describe("year", "Year of the theatrical release")?
//!     .enum_case_format(CaseFormat::UpperUnderscore);
//! registry.register(schema);
//! ```

mod describe;
mod parser;
mod serializer;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use prism_config::SchemaDefaults;
use prism_core::{CaseFormat, FieldDescriptor, FieldKind, RecordType};

pub use parser::NamedParser;
pub use serializer::NamedSerializer;

use crate::convert::{ValueCodec, property_name};
use crate::error::{JsonSchemaError, ReferenceError, RuleError};
use crate::json_schema::{JsonSchema, JsonType};
use crate::registry::ReadableSchemaRegistry;
use crate::schema::{Parser, Schema, Serializer};
use crate::transform::Transformer;

/// An immutable, explicitly configured schema registered under a name.
#[derive(Debug, Clone)]
pub struct NamedSchema {
    record_type: RecordType,
    name: String,
    skipped: BTreeSet<String>,
    constants: Vec<(String, String)>,
    enum_case_format: CaseFormat,
    longs_as_strings: bool,
    substitutions: HashMap<String, String>,
    transforms: HashMap<String, Arc<dyn Transformer>>,
    mappings: HashMap<String, FieldDescriptor>,
    descriptions: HashMap<String, String>,
    sub_schemas: HashMap<String, String>,
    formats: HashMap<String, String>,
}

impl NamedSchema {
    /// A schema for `record_type` with no rules, registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptyName`] if `name` is empty.
    pub fn of(record_type: RecordType, name: impl Into<String>) -> Result<Self, RuleError> {
        Self::with_defaults(record_type, name, &SchemaDefaults::default())
    }

    /// Like [`of`](Self::of), starting from configured defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptyName`] if `name` is empty.
    pub fn with_defaults(
        record_type: RecordType,
        name: impl Into<String>,
        defaults: &SchemaDefaults,
    ) -> Result<Self, RuleError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RuleError::EmptyName);
        }
        Ok(Self {
            record_type,
            name,
            skipped: BTreeSet::new(),
            constants: Vec::new(),
            enum_case_format: defaults.enum_case_format,
            longs_as_strings: defaults.longs_as_strings,
            substitutions: HashMap::new(),
            transforms: HashMap::new(),
            mappings: HashMap::new(),
            descriptions: HashMap::new(),
            sub_schemas: HashMap::new(),
            formats: HashMap::new(),
        })
    }

    // --- Rules ---

    /// Leave fields out of the JSON shape entirely.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownField`] or [`RuleError::SkippedField`] for
    /// the first name that is not an unskipped field.
    pub fn skip<I, S>(&self, fields: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next = self.clone();
        for field in fields {
            let field = field.as_ref();
            next.live_field(field)?;
            next.skipped.insert(field.to_string());
        }
        Ok(next)
    }

    /// Emit `key: value` in every serialized object.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::DuplicateConstant`] if `key` names an unskipped
    /// field or an existing constant.
    pub fn add_constant(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let key = key.into();
        if self.has(&key) {
            return Err(RuleError::DuplicateConstant {
                schema: self.name.clone(),
                key,
            });
        }
        let mut next = self.clone();
        next.constants.push((key, value.into()));
        Ok(next)
    }

    /// Case format of enum values in JSON. Defaults to `lowerCamel`.
    #[must_use]
    pub fn enum_case_format(&self, format: CaseFormat) -> Self {
        Self {
            enum_case_format: format,
            ..self.clone()
        }
    }

    /// Write 64-bit integers as decimal strings, which JSON consumers
    /// decoding numbers as doubles cannot corrupt.
    #[must_use]
    pub fn surface_longs_as_strings(&self) -> Self {
        Self {
            longs_as_strings: true,
            ..self.clone()
        }
    }

    /// Use `property` as the JSON name of `field`, verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if `field` is unknown, skipped or unsupported.
    pub fn substitute(&self, field: &str, property: impl Into<String>) -> Result<Self, RuleError> {
        self.field_rule(field)?;
        let mut next = self.clone();
        next.substitutions.insert(field.to_string(), property.into());
        Ok(next)
    }

    /// Convert `field` with `transformer` instead of by kind.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if `field` is unknown, skipped or unsupported.
    pub fn transform(
        &self,
        field: &str,
        transformer: impl Transformer + 'static,
    ) -> Result<Self, RuleError> {
        self.transform_shared(field, Arc::new(transformer))
    }

    /// Like [`transform`](Self::transform) for a transformer shared between
    /// schemas.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if `field` is unknown, skipped or unsupported.
    pub fn transform_shared(
        &self,
        field: &str,
        transformer: Arc<dyn Transformer>,
    ) -> Result<Self, RuleError> {
        self.field_rule(field)?;
        let mut next = self.clone();
        next.transforms.insert(field.to_string(), transformer);
        Ok(next)
    }

    /// Write the repeated record field `field` as an object keyed by each
    /// element's `key_field` rather than as an array.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::NotRepeatedRecord`] unless `field` is a repeated
    /// record field, and [`RuleError::InvalidKeyField`] unless its element
    /// type has a singular string field named `key_field`.
    pub fn map_repeated_field(&self, field: &str, key_field: &str) -> Result<Self, RuleError> {
        let descriptor = self.field_rule(field)?;
        let element = descriptor
            .record_type()
            .filter(|_| descriptor.is_repeated())
            .ok_or_else(|| RuleError::NotRepeatedRecord {
                schema: self.name.clone(),
                field: field.to_string(),
            })?;
        let key = element
            .field(key_field)
            .filter(|key| !key.is_repeated() && *key.kind() == FieldKind::String)
            .ok_or_else(|| RuleError::InvalidKeyField {
                schema: self.name.clone(),
                field: field.to_string(),
                key: key_field.to_string(),
                element: element.full_name().to_string(),
            })?;
        let mut next = self.clone();
        next.mappings.insert(field.to_string(), key);
        Ok(next)
    }

    /// Attach a human-readable description to a field or constant.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if `field` is neither a constant nor a usable
    /// field.
    pub fn describe(&self, field: &str, description: impl Into<String>) -> Result<Self, RuleError> {
        if !self.is_constant(field) {
            self.field_rule(field)?;
        }
        let mut next = self.clone();
        next.descriptions.insert(field.to_string(), description.into());
        Ok(next)
    }

    /// Convert the record field `field` with the schema registered as
    /// `schema_name`. This is how cyclic record types are configured.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::NotRecord`] unless `field` holds records and
    /// [`RuleError::EmptySchemaReference`] if `schema_name` is empty.
    pub fn use_schema(&self, field: &str, schema_name: impl Into<String>) -> Result<Self, RuleError> {
        let descriptor = self.field_rule(field)?;
        if !descriptor.kind().is_message() {
            return Err(RuleError::NotRecord {
                schema: self.name.clone(),
                field: field.to_string(),
            });
        }
        let schema_name = schema_name.into();
        if schema_name.is_empty() {
            return Err(RuleError::EmptySchemaReference {
                schema: self.name.clone(),
                field: field.to_string(),
            });
        }
        let mut next = self.clone();
        next.sub_schemas.insert(field.to_string(), schema_name);
        Ok(next)
    }

    /// Override the JSON-Schema `format` of `field`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::BlankFormat`] if `format` is empty or whitespace.
    pub fn set_format(&self, field: &str, format: impl Into<String>) -> Result<Self, RuleError> {
        self.field_rule(field)?;
        let format = format.into();
        if format.trim().is_empty() {
            return Err(RuleError::BlankFormat {
                schema: self.name.clone(),
                field: field.to_string(),
            });
        }
        let mut next = self.clone();
        next.formats.insert(field.to_string(), format);
        Ok(next)
    }

    // --- Introspection ---

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full name of the record type.
    #[must_use]
    pub fn id(&self) -> &str {
        self.record_type.full_name()
    }

    /// Whether `name` is an unskipped field or a constant.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        (self.record_type.field(name).is_some() && !self.skipped.contains(name))
            || self.is_constant(name)
    }

    /// JSON property name of a field or constant.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if `name` is neither a constant nor a usable
    /// field.
    pub fn property_name(&self, name: &str) -> Result<String, RuleError> {
        if self.is_constant(name) {
            return Ok(name.to_string());
        }
        let field = self.field_rule(name)?;
        Ok(self.external_name(&field))
    }

    /// JSON type of a field or constant's property.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if `name` is neither a constant nor a usable
    /// field.
    pub fn property_type(&self, name: &str) -> Result<JsonType, RuleError> {
        if self.is_constant(name) {
            return Ok(JsonType::String);
        }
        let field = self.field_rule(name)?;
        if let Some(transformer) = self.transforms.get(name) {
            return Ok(transformer.json_type());
        }
        if field.is_repeated() {
            return Ok(if self.mappings.contains_key(name) {
                JsonType::Object
            } else {
                JsonType::Array
            });
        }
        self.reified_type(&field)
            .ok_or_else(|| self.unsupported(name))
    }

    /// JSON type of one value of `field`, ignoring cardinality and
    /// transformers. `None` for kinds with no JSON representation.
    #[must_use]
    pub fn reified_type(&self, field: &FieldDescriptor) -> Option<JsonType> {
        self.codec().json_type(field.kind())
    }

    #[must_use]
    pub const fn enum_format(&self) -> CaseFormat {
        self.enum_case_format
    }

    #[must_use]
    pub const fn longs_as_strings(&self) -> bool {
        self.longs_as_strings
    }

    #[must_use]
    pub const fn skipped_fields(&self) -> &BTreeSet<String> {
        &self.skipped
    }

    /// Constants in insertion order.
    #[must_use]
    pub fn constants(&self) -> &[(String, String)] {
        &self.constants
    }

    #[must_use]
    pub const fn substitutions(&self) -> &HashMap<String, String> {
        &self.substitutions
    }

    #[must_use]
    pub const fn transforms(&self) -> &HashMap<String, Arc<dyn Transformer>> {
        &self.transforms
    }

    /// Key field of every key-mapped repeated field.
    #[must_use]
    pub const fn mappings(&self) -> &HashMap<String, FieldDescriptor> {
        &self.mappings
    }

    #[must_use]
    pub const fn descriptions(&self) -> &HashMap<String, String> {
        &self.descriptions
    }

    /// Registered schema name used for each record field.
    #[must_use]
    pub const fn sub_schemas(&self) -> &HashMap<String, String> {
        &self.sub_schemas
    }

    #[must_use]
    pub const fn formats(&self) -> &HashMap<String, String> {
        &self.formats
    }

    // --- Internals shared by the serializer, parser and describer ---

    const fn codec(&self) -> ValueCodec {
        ValueCodec {
            enum_case_format: self.enum_case_format,
            longs_as_strings: self.longs_as_strings,
        }
    }

    fn is_constant(&self, key: &str) -> bool {
        self.constants.iter().any(|(k, _)| k == key)
    }

    fn is_skipped(&self, field: &FieldDescriptor) -> bool {
        self.skipped.contains(field.name())
    }

    fn external_name(&self, field: &FieldDescriptor) -> String {
        self.substitutions
            .get(field.name())
            .cloned()
            .unwrap_or_else(|| property_name(field))
    }

    fn live_field(&self, name: &str) -> Result<FieldDescriptor, RuleError> {
        let field = self
            .record_type
            .field(name)
            .ok_or_else(|| RuleError::UnknownField {
                schema: self.name.clone(),
                field: name.to_string(),
            })?;
        if self.skipped.contains(name) {
            return Err(RuleError::SkippedField {
                schema: self.name.clone(),
                field: name.to_string(),
            });
        }
        Ok(field)
    }

    /// A field rules can target: declared, not skipped, representable.
    fn field_rule(&self, name: &str) -> Result<FieldDescriptor, RuleError> {
        let field = self.live_field(name)?;
        if field.kind().is_unsupported() {
            return Err(self.unsupported(name));
        }
        Ok(field)
    }

    fn unsupported(&self, field: &str) -> RuleError {
        RuleError::UnsupportedField {
            schema: self.name.clone(),
            field: field.to_string(),
        }
    }

    /// The registered schema configured for a record field, if any.
    ///
    /// A configured name must resolve, and to a schema of the field's record
    /// type.
    fn referenced_schema(
        &self,
        field: &FieldDescriptor,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<Option<Arc<Self>>, ReferenceError> {
        let Some(reference) = self.sub_schemas.get(field.name()) else {
            return Ok(None);
        };
        let schema = registry
            .named(reference)
            .ok_or_else(|| ReferenceError::Missing {
                schema: self.name.clone(),
                field: field.name().to_string(),
                reference: reference.clone(),
            })?;
        let expected = field.record_type();
        if expected.as_ref() != Some(schema.record_type()) {
            return Err(ReferenceError::Mismatched {
                schema: self.name.clone(),
                field: field.name().to_string(),
                reference: reference.clone(),
                expected: field.kind().type_name().unwrap_or_default().to_string(),
                found: schema.id().to_string(),
            });
        }
        Ok(Some(schema))
    }
}

impl Schema for NamedSchema {
    fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    fn serializer(&self) -> Box<dyn Serializer + '_> {
        Box::new(NamedSerializer::new(self))
    }

    fn parser(&self) -> Box<dyn Parser + '_> {
        Box::new(NamedParser::new(self))
    }

    fn json_schema(
        &self,
        registry: &dyn ReadableSchemaRegistry,
    ) -> Result<JsonSchema, JsonSchemaError> {
        self.describe_json(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prism_core::testing;
    use rstest::rstest;

    use crate::transformers::DateTimeTransformer;

    fn union_schema() -> NamedSchema {
        NamedSchema::of(testing::union(), "Union").unwrap()
    }

    #[test]
    fn name_and_id() {
        let schema = NamedSchema::of(testing::movie(), "Film").unwrap();
        assert_eq!(schema.name(), "Film");
        assert_eq!(schema.id(), "test.Movie");
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            NamedSchema::of(testing::movie(), "").unwrap_err(),
            RuleError::EmptyName
        );
    }

    #[test]
    fn defaults_seed_the_schema() {
        let defaults = SchemaDefaults {
            enum_case_format: CaseFormat::UpperUnderscore,
            longs_as_strings: true,
        };
        let schema = NamedSchema::with_defaults(testing::union(), "Union", &defaults).unwrap();
        assert_eq!(schema.enum_format(), CaseFormat::UpperUnderscore);
        assert!(schema.longs_as_strings());
    }

    #[rstest]
    #[case("string_value", JsonType::String)]
    #[case("int32_value", JsonType::Integer)]
    #[case("int64_value", JsonType::Integer)]
    #[case("bool_value", JsonType::Boolean)]
    #[case("double_value", JsonType::Number)]
    #[case("union_value", JsonType::Object)]
    #[case("union_repeated", JsonType::Array)]
    #[case("int32_repeated", JsonType::Array)]
    #[case("enum_value", JsonType::String)]
    fn property_types(#[case] field: &str, #[case] expected: JsonType) {
        assert_eq!(union_schema().property_type(field).unwrap(), expected);
    }

    #[test]
    fn property_type_follows_rules() {
        let schema = union_schema()
            .surface_longs_as_strings()
            .transform("int32_value", DateTimeTransformer)
            .unwrap()
            .map_repeated_field("union_repeated", "string_value")
            .unwrap()
            .add_constant("kind", "union")
            .unwrap();
        assert_eq!(schema.property_type("int64_value").unwrap(), JsonType::String);
        assert_eq!(schema.property_type("int32_value").unwrap(), JsonType::String);
        assert_eq!(schema.property_type("union_repeated").unwrap(), JsonType::Object);
        assert_eq!(schema.property_type("kind").unwrap(), JsonType::String);
    }

    #[test]
    fn property_names() {
        let schema = union_schema().substitute("string_value", "foo_bar").unwrap();
        assert_eq!(schema.property_name("string_value").unwrap(), "foo_bar");
        assert_eq!(schema.property_name("int32_value").unwrap(), "int32Value");
    }

    #[test]
    fn rules_leave_the_receiver_unchanged() {
        let original = union_schema();
        let skipped = original.skip(["int32_value"]).unwrap();
        let constant = original.add_constant("kind", "union").unwrap();
        let _ = original.enum_case_format(CaseFormat::UpperUnderscore);
        assert!(original.skipped_fields().is_empty());
        assert!(original.constants().is_empty());
        assert_eq!(original.enum_format(), CaseFormat::LowerCamel);
        assert!(skipped.skipped_fields().contains("int32_value"));
        assert_eq!(constant.constants(), [("kind".to_string(), "union".to_string())]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = union_schema().substitute("no_such_field", "x").unwrap_err();
        assert_eq!(
            err,
            RuleError::UnknownField {
                schema: "Union".into(),
                field: "no_such_field".into(),
            }
        );
    }

    #[test]
    fn skipped_fields_are_rejected() {
        let schema = union_schema().skip(["string_value"]).unwrap();
        assert!(!schema.has("string_value"));
        assert!(matches!(
            schema.describe("string_value", "text"),
            Err(RuleError::SkippedField { .. })
        ));
        assert!(matches!(
            schema.skip(["string_value"]),
            Err(RuleError::SkippedField { .. })
        ));
    }

    #[test]
    fn constants_cannot_shadow_fields_or_constants() {
        let schema = union_schema().add_constant("kind", "a").unwrap();
        assert!(matches!(
            schema.add_constant("kind", "b"),
            Err(RuleError::DuplicateConstant { .. })
        ));
        assert!(matches!(
            schema.add_constant("string_value", "b"),
            Err(RuleError::DuplicateConstant { .. })
        ));
        let skipped = schema.skip(["string_value"]).unwrap();
        assert!(skipped.add_constant("string_value", "b").is_ok());
    }

    #[test]
    fn constants_can_be_described() {
        let schema = union_schema()
            .add_constant("kind", "a")
            .unwrap()
            .describe("kind", "Discriminator")
            .unwrap();
        assert_eq!(schema.descriptions()["kind"], "Discriminator");
    }

    #[rstest]
    #[case("string_value", "string_value")]
    #[case("union_value", "string_value")]
    #[case("int32_repeated", "string_value")]
    fn mapping_requires_repeated_records(#[case] field: &str, #[case] key: &str) {
        assert!(matches!(
            union_schema().map_repeated_field(field, key),
            Err(RuleError::NotRepeatedRecord { .. })
        ));
    }

    #[rstest]
    #[case("no_such_field")]
    #[case("int32_value")]
    #[case("int32_repeated")]
    fn mapping_requires_singular_string_key(#[case] key: &str) {
        let err = union_schema()
            .map_repeated_field("union_repeated", key)
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::InvalidKeyField {
                schema: "Union".into(),
                field: "union_repeated".into(),
                key: key.into(),
                element: "test.Union".into(),
            }
        );
    }

    #[test]
    fn mapping_records_the_key_field() {
        let schema = union_schema()
            .map_repeated_field("union_repeated", "string_value")
            .unwrap();
        assert_eq!(schema.mappings()["union_repeated"].name(), "string_value");
    }

    #[test]
    fn sub_schemas_require_record_fields() {
        assert!(matches!(
            union_schema().use_schema("int32_value", "Union"),
            Err(RuleError::NotRecord { .. })
        ));
        assert!(matches!(
            union_schema().use_schema("union_value", ""),
            Err(RuleError::EmptySchemaReference { .. })
        ));
        let schema = union_schema().use_schema("union_repeated", "Union").unwrap();
        assert_eq!(schema.sub_schemas()["union_repeated"], "Union");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_formats_are_rejected(#[case] format: &str) {
        assert!(matches!(
            union_schema().set_format("string_value", format),
            Err(RuleError::BlankFormat { .. })
        ));
    }

    #[test]
    fn unsupported_fields_only_accept_skip() {
        let schema = NamedSchema::of(testing::legacy(), "Legacy").unwrap();
        assert!(matches!(
            schema.describe("payload", "raw bytes"),
            Err(RuleError::UnsupportedField { .. })
        ));
        assert!(matches!(
            schema.property_type("grouped"),
            Err(RuleError::UnsupportedField { .. })
        ));
        assert!(schema.skip(["payload", "grouped"]).is_ok());
    }
}
