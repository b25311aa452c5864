//! Record and enum type definitions, and the immutable pool that resolves them.
//!
//! Definitions ([`RecordDef`], [`FieldDef`], [`EnumDef`]) are plain data. Once
//! handed to [`DescriptorPoolBuilder::build`] they are validated and frozen;
//! from then on the pool is only reached through cheap handles
//! ([`RecordType`], [`FieldDescriptor`], [`EnumType`]) that share it via `Arc`.
//!
//! ```
//! use prism_core::{DescriptorPool, FieldDef, FieldKind, RecordDef};
//!
//! let pool = DescriptorPool::builder()
//!     .record(
//!         RecordDef::new("demo.Person")
//!             .field(FieldDef::optional("name", FieldKind::String))
//!             .field(FieldDef::optional("age", FieldKind::Int32)),
//!     )
//!     .build()
//!     .expect("valid definitions");
//!
//! let person = pool.record_type("demo.Person").unwrap();
//! assert_eq!(person.field_count(), 2);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::errors::DescriptorError;
use crate::kind::{Cardinality, FieldKind};
use crate::value::Value;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Definition of a single record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
    pub default: Option<Value>,
}

impl FieldDef {
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::with_cardinality(name, kind, Cardinality::Optional)
    }

    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::with_cardinality(name, kind, Cardinality::Required)
    }

    pub fn repeated(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::with_cardinality(name, kind, Cardinality::Repeated)
    }

    fn with_cardinality(name: impl Into<String>, kind: FieldKind, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            kind,
            cardinality,
            default: None,
        }
    }

    /// Declare a default value. Only valid on singular scalar and enum fields.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Definition of a record type: a full name and an ordered field list.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDef {
    pub full_name: String,
    pub fields: Vec<FieldDef>,
}

impl RecordDef {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

/// A named, numbered enum value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValueDef {
    pub name: String,
    pub number: i32,
}

/// Definition of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub full_name: String,
    pub values: Vec<EnumValueDef>,
}

impl EnumDef {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValueDef {
            name: name.into(),
            number,
        });
        self
    }
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct PoolInner {
    records: Vec<RecordDef>,
    enums: Vec<EnumDef>,
    record_index: HashMap<String, usize>,
    enum_index: HashMap<String, usize>,
}

/// An immutable, validated set of record and enum types.
///
/// Cloning is cheap: all clones share the same definitions.
#[derive(Debug, Clone)]
pub struct DescriptorPool {
    inner: Arc<PoolInner>,
}

impl DescriptorPool {
    #[must_use]
    pub fn builder() -> DescriptorPoolBuilder {
        DescriptorPoolBuilder::default()
    }

    /// Look up a record type by full name.
    #[must_use]
    pub fn record_type(&self, full_name: &str) -> Option<RecordType> {
        self.inner
            .record_index
            .get(full_name)
            .map(|&index| RecordType {
                pool: self.clone(),
                index,
            })
    }

    /// Look up an enum type by full name.
    #[must_use]
    pub fn enum_type(&self, full_name: &str) -> Option<EnumType> {
        self.inner.enum_index.get(full_name).map(|&index| EnumType {
            pool: self.clone(),
            index,
        })
    }

    /// All record types, in definition order.
    pub fn record_types(&self) -> impl ExactSizeIterator<Item = RecordType> + '_ {
        (0..self.inner.records.len()).map(|index| RecordType {
            pool: self.clone(),
            index,
        })
    }

    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn identity(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }
}

/// Collects definitions and validates them into a [`DescriptorPool`].
#[derive(Debug, Default)]
pub struct DescriptorPoolBuilder {
    records: Vec<RecordDef>,
    enums: Vec<EnumDef>,
}

impl DescriptorPoolBuilder {
    #[must_use]
    pub fn record(mut self, record: RecordDef) -> Self {
        self.records.push(record);
        self
    }

    #[must_use]
    pub fn enumeration(mut self, enumeration: EnumDef) -> Self {
        self.enums.push(enumeration);
        self
    }

    /// Validate every definition and freeze the pool.
    ///
    /// # Errors
    ///
    /// Returns a [`DescriptorError`] for duplicate type, field or enum value
    /// names, unresolvable type references, empty enums, and defaults that are
    /// misplaced or do not fit the field kind.
    pub fn build(self) -> Result<DescriptorPool, DescriptorError> {
        let mut record_index = HashMap::with_capacity(self.records.len());
        let mut enum_index = HashMap::with_capacity(self.enums.len());

        for (i, e) in self.enums.iter().enumerate() {
            if e.values.is_empty() {
                return Err(DescriptorError::EmptyEnum(e.full_name.clone()));
            }
            let mut seen = HashSet::new();
            for v in &e.values {
                if !seen.insert(v.name.as_str()) {
                    return Err(DescriptorError::DuplicateEnumValue {
                        enum_name: e.full_name.clone(),
                        value: v.name.clone(),
                    });
                }
            }
            if enum_index.insert(e.full_name.clone(), i).is_some() {
                return Err(DescriptorError::DuplicateType(e.full_name.clone()));
            }
        }

        for (i, r) in self.records.iter().enumerate() {
            if enum_index.contains_key(&r.full_name)
                || record_index.insert(r.full_name.clone(), i).is_some()
            {
                return Err(DescriptorError::DuplicateType(r.full_name.clone()));
            }
        }

        for r in &self.records {
            let mut seen = HashSet::new();
            for field in &r.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(DescriptorError::DuplicateField {
                        record: r.full_name.clone(),
                        field: field.name.clone(),
                    });
                }
                let resolved = match &field.kind {
                    FieldKind::Enum(name) => enum_index.contains_key(name),
                    FieldKind::Message(name) => record_index.contains_key(name),
                    _ => true,
                };
                if !resolved {
                    return Err(DescriptorError::UnresolvedType {
                        record: r.full_name.clone(),
                        field: field.name.clone(),
                        type_name: field.kind.type_name().unwrap_or_default().to_string(),
                    });
                }
                if let Some(default) = &field.default {
                    validate_default(r, field, default, &self.enums, &enum_index)?;
                }
            }
        }

        Ok(DescriptorPool {
            inner: Arc::new(PoolInner {
                records: self.records,
                enums: self.enums,
                record_index,
                enum_index,
            }),
        })
    }
}

fn validate_default(
    record: &RecordDef,
    field: &FieldDef,
    default: &Value,
    enums: &[EnumDef],
    enum_index: &HashMap<String, usize>,
) -> Result<(), DescriptorError> {
    let invalid = |reason: String| DescriptorError::InvalidDefault {
        record: record.full_name.clone(),
        field: field.name.clone(),
        reason,
    };

    if field.cardinality == Cardinality::Repeated {
        return Err(invalid("repeated fields cannot declare a default".into()));
    }
    if matches!(field.kind, FieldKind::Message(_) | FieldKind::Group) {
        return Err(invalid("record fields cannot declare a default".into()));
    }
    if !default.conforms_to(&field.kind) {
        return Err(invalid(format!(
            "expected {}, got {}",
            field.kind,
            default.kind_name()
        )));
    }
    if let (FieldKind::Enum(name), Value::EnumNumber(number)) = (&field.kind, default) {
        let declared = enum_index
            .get(name)
            .is_some_and(|&i| enums[i].values.iter().any(|v| v.number == *number));
        if !declared {
            return Err(invalid(format!("{name} has no value numbered {number}")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// RecordType
// ---------------------------------------------------------------------------

/// Handle to a record type inside a [`DescriptorPool`].
///
/// Equality and hashing are by identity: two handles are equal when they point
/// at the same definition of the same pool instance.
#[derive(Clone)]
pub struct RecordType {
    pool: DescriptorPool,
    index: usize,
}

impl RecordType {
    fn def(&self) -> &RecordDef {
        &self.pool.inner.records[self.index]
    }

    /// Fully qualified name, e.g. `test.Movie`.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.def().full_name
    }

    /// Last segment of the full name.
    #[must_use]
    pub fn name(&self) -> &str {
        let full = self.full_name();
        full.rsplit_once('.').map_or(full, |(_, short)| short)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = FieldDescriptor> + '_ {
        (0..self.def().fields.len()).map(|index| FieldDescriptor {
            record: self.clone(),
            index,
        })
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.def().fields.len()
    }

    /// Look up a field by its declared name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldDescriptor> {
        self.def()
            .fields
            .iter()
            .position(|f| f.name == name)
            .map(|index| FieldDescriptor {
                record: self.clone(),
                index,
            })
    }

    #[must_use]
    pub const fn pool(&self) -> &DescriptorPool {
        &self.pool
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.pool.same(&other.pool) && self.index == other.index
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pool.identity().hash(state);
        self.index.hash(state);
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.full_name()).finish()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

// ---------------------------------------------------------------------------
// FieldDescriptor
// ---------------------------------------------------------------------------

/// Handle to one field of a [`RecordType`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    record: RecordType,
    index: usize,
}

impl FieldDescriptor {
    fn def(&self) -> &FieldDef {
        &self.record.def().fields[self.index]
    }

    /// Declared (`lower_underscore`) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// `Record.field`, for diagnostics.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.record.full_name(), self.name())
    }

    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.def().kind
    }

    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.def().cardinality
    }

    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.cardinality() == Cardinality::Repeated
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.cardinality() == Cardinality::Required
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.def().default.as_ref()
    }

    /// Position within the containing record's field list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn containing_type(&self) -> &RecordType {
        &self.record
    }

    /// The nested record type, for `Message` fields.
    #[must_use]
    pub fn record_type(&self) -> Option<RecordType> {
        match self.kind() {
            FieldKind::Message(name) => self.record.pool.record_type(name),
            _ => None,
        }
    }

    /// The enum type, for `Enum` fields.
    #[must_use]
    pub fn enum_type(&self) -> Option<EnumType> {
        match self.kind() {
            FieldKind::Enum(name) => self.record.pool.enum_type(name),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldDescriptor")
            .field(&self.qualified_name())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// EnumType
// ---------------------------------------------------------------------------

/// Handle to an enum type inside a [`DescriptorPool`].
#[derive(Clone)]
pub struct EnumType {
    pool: DescriptorPool,
    index: usize,
}

impl EnumType {
    fn def(&self) -> &EnumDef {
        &self.pool.inner.enums[self.index]
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.def().full_name
    }

    /// Declared values, in declaration order.
    #[must_use]
    pub fn values(&self) -> &[EnumValueDef] {
        &self.def().values
    }

    #[must_use]
    pub fn value_by_name(&self, name: &str) -> Option<&EnumValueDef> {
        self.values().iter().find(|v| v.name == name)
    }

    #[must_use]
    pub fn value_by_number(&self, number: i32) -> Option<&EnumValueDef> {
        self.values().iter().find(|v| v.number == number)
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.pool.same(&other.pool) && self.index == other.index
    }
}

impl Eq for EnumType {}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumType").field(&self.full_name()).finish()
    }
}
