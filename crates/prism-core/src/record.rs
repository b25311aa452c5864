//! Dynamic record instances with explicit field presence.

use std::collections::BTreeMap;

use crate::descriptor::{FieldDescriptor, RecordType};
use crate::errors::RecordError;
use crate::value::Value;

/// An instance of a [`RecordType`].
///
/// A singular field is either explicitly set or absent; absence is distinct
/// from holding the default value. A repeated field is present when it holds
/// at least one element, and an empty list is never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    record_type: RecordType,
    values: BTreeMap<usize, Value>,
}

impl Record {
    /// A record with no field set.
    #[must_use]
    pub const fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether a singular field is set, or a repeated field is non-empty.
    #[must_use]
    pub fn has_field(&self, field: &FieldDescriptor) -> bool {
        self.owns(field) && self.values.contains_key(&field.index())
    }

    /// The explicitly set value of a field, if any.
    ///
    /// Repeated fields return their [`Value::List`].
    #[must_use]
    pub fn get(&self, field: &FieldDescriptor) -> Option<&Value> {
        if !self.owns(field) {
            return None;
        }
        self.values.get(&field.index())
    }

    /// The elements of a repeated field; empty when unset.
    #[must_use]
    pub fn repeated(&self, field: &FieldDescriptor) -> &[Value] {
        self.get(field).and_then(Value::as_list).unwrap_or(&[])
    }

    /// Set a field's value.
    ///
    /// Repeated fields take a [`Value::List`]; an empty list clears the field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the field belongs to another record type,
    /// when the value does not match the field's kind or cardinality, or when
    /// an enum number is not declared by the field's enum type.
    pub fn set(&mut self, field: &FieldDescriptor, value: Value) -> Result<(), RecordError> {
        self.check_owner(field)?;
        if field.is_repeated() {
            let Value::List(items) = value else {
                return Err(RecordError::Repeated(field.qualified_name()));
            };
            for item in &items {
                check_element(field, item)?;
            }
            if items.is_empty() {
                self.values.remove(&field.index());
            } else {
                self.values.insert(field.index(), Value::List(items));
            }
        } else {
            check_element(field, &value)?;
            self.values.insert(field.index(), value);
        }
        Ok(())
    }

    /// Append one element to a repeated field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotRepeated`] on singular fields, and the same
    /// ownership and kind errors as [`Record::set`].
    pub fn push(&mut self, field: &FieldDescriptor, value: Value) -> Result<(), RecordError> {
        self.check_owner(field)?;
        if !field.is_repeated() {
            return Err(RecordError::NotRepeated(field.qualified_name()));
        }
        check_element(field, &value)?;
        match self
            .values
            .entry(field.index())
            .or_insert_with(|| Value::List(Vec::new()))
        {
            Value::List(items) => items.push(value),
            // Only lists are ever stored for repeated fields.
            other => *other = Value::List(vec![value]),
        }
        Ok(())
    }

    /// Unset a field.
    pub fn clear(&mut self, field: &FieldDescriptor) {
        if self.owns(field) {
            self.values.remove(&field.index());
        }
    }

    /// Resolve a field of this record's type by declared name.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownField`] if no such field is declared.
    pub fn field(&self, name: &str) -> Result<FieldDescriptor, RecordError> {
        self.record_type
            .field(name)
            .ok_or_else(|| RecordError::UnknownField {
                record: self.record_type.full_name().to_string(),
                field: name.to_string(),
            })
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        let field = self.record_type.field(name)?;
        self.get(&field)
    }

    /// Set a field by declared name.
    ///
    /// # Errors
    ///
    /// See [`Record::field`] and [`Record::set`].
    pub fn set_by_name(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        let field = self.field(name)?;
        self.set(&field, value.into())
    }

    /// Append to a repeated field by declared name.
    ///
    /// # Errors
    ///
    /// See [`Record::field`] and [`Record::push`].
    pub fn push_by_name(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        let field = self.field(name)?;
        self.push(&field, value.into())
    }

    /// Chaining form of [`Record::set_by_name`].
    ///
    /// # Errors
    ///
    /// See [`Record::set_by_name`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, RecordError> {
        self.set_by_name(name, value)?;
        Ok(self)
    }

    /// Chaining form of repeated [`Record::push_by_name`].
    ///
    /// # Errors
    ///
    /// See [`Record::push_by_name`].
    pub fn with_all<V: Into<Value>>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, RecordError> {
        let field = self.field(name)?;
        for value in values {
            self.push(&field, value.into())?;
        }
        Ok(self)
    }

    fn owns(&self, field: &FieldDescriptor) -> bool {
        field.containing_type() == &self.record_type
    }

    fn check_owner(&self, field: &FieldDescriptor) -> Result<(), RecordError> {
        if self.owns(field) {
            Ok(())
        } else {
            Err(RecordError::ForeignField {
                record: self.record_type.full_name().to_string(),
                field: field.qualified_name(),
            })
        }
    }
}

fn check_element(field: &FieldDescriptor, value: &Value) -> Result<(), RecordError> {
    if !value.conforms_to(field.kind()) {
        return Err(RecordError::TypeMismatch {
            field: field.qualified_name(),
            expected: field.kind().to_string(),
            found: value.kind_name().to_string(),
        });
    }
    if let Value::Message(record) = value
        && field.record_type().as_ref() != Some(record.record_type())
    {
        return Err(RecordError::TypeMismatch {
            field: field.qualified_name(),
            expected: field.kind().to_string(),
            found: format!("message from another pool: {}", record.record_type()),
        });
    }
    if let Value::EnumNumber(number) = value {
        let declared = field
            .enum_type()
            .is_some_and(|e| e.value_by_number(*number).is_some());
        if !declared {
            return Err(RecordError::UnknownEnumNumber {
                field: field.qualified_name(),
                number: *number,
            });
        }
    }
    Ok(())
}
