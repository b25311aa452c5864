//! Shared record fixtures for test suites.
//!
//! Every fixture type lives in one process-wide [`DescriptorPool`], so record
//! types obtained from different helpers compare equal by identity.

use std::sync::LazyLock;

use crate::descriptor::{DescriptorPool, EnumDef, EnumType, FieldDef, RecordDef, RecordType};
use crate::kind::FieldKind;
use crate::record::Record;
use crate::value::Value;

static POOL: LazyLock<DescriptorPool> = LazyLock::new(|| {
    DescriptorPool::builder()
        .enumeration(EnumDef::new("test.SomeEnum").value("FIRST", 1).value("SECOND", 2))
        .enumeration(
            EnumDef::new("test.Genre")
                .value("DRAMA", 1)
                .value("SCIENCE_FICTION", 2)
                .value("COMEDY", 3),
        )
        .record(
            RecordDef::new("test.Union")
                .field(FieldDef::optional("bool_value", FieldKind::Bool))
                .field(FieldDef::optional("enum_value", FieldKind::enumeration("test.SomeEnum")))
                .field(FieldDef::optional("string_value", FieldKind::String))
                .field(FieldDef::optional("int32_value", FieldKind::Int32))
                .field(FieldDef::optional("int64_value", FieldKind::Int64))
                .field(FieldDef::optional("uint64_value", FieldKind::Uint64))
                .field(FieldDef::optional("double_value", FieldKind::Double))
                .field(FieldDef::optional("float_value", FieldKind::Float))
                .field(FieldDef::optional("union_value", FieldKind::message("test.Union")))
                .field(FieldDef::repeated("union_repeated", FieldKind::message("test.Union")))
                .field(FieldDef::repeated("int32_repeated", FieldKind::Int32))
                .field(FieldDef::repeated("int64_repeated", FieldKind::Int64))
                .field(FieldDef::repeated("enum_repeated", FieldKind::enumeration("test.SomeEnum"))),
        )
        .record(
            RecordDef::new("test.Movie")
                .field(FieldDef::optional("title", FieldKind::String))
                .field(FieldDef::optional("year", FieldKind::Int32))
                .field(FieldDef::optional("genre", FieldKind::enumeration("test.Genre"))),
        )
        .record(
            RecordDef::new("test.Actor")
                .field(FieldDef::optional("name", FieldKind::String))
                .field(FieldDef::repeated("quotes", FieldKind::String))
                .field(FieldDef::repeated("movies", FieldKind::message("test.Movie"))),
        )
        .record(
            RecordDef::new("test.DefaultValue")
                .field(FieldDef::optional("string_value", FieldKind::String).with_default("foo"))
                .field(
                    FieldDef::optional("enum_value", FieldKind::enumeration("test.SomeEnum"))
                        .with_default(Value::EnumNumber(2)),
                )
                .field(FieldDef::optional("int32_value", FieldKind::Int32).with_default(42))
                .field(FieldDef::optional("double_value", FieldKind::Double).with_default(1.5)),
        )
        .record(
            RecordDef::new("test.RequiredValue")
                .field(FieldDef::required("required_string", FieldKind::String))
                .field(FieldDef::optional("optional_int", FieldKind::Int32)),
        )
        .record(
            RecordDef::new("test.Person")
                .field(FieldDef::optional("name", FieldKind::String))
                .field(FieldDef::optional("age", FieldKind::Int32)),
        )
        .record(
            RecordDef::new("test.Numbers")
                .field(FieldDef::optional("sint32_value", FieldKind::Sint32))
                .field(FieldDef::optional("sfixed32_value", FieldKind::Sfixed32))
                .field(FieldDef::optional("uint32_value", FieldKind::Uint32))
                .field(FieldDef::optional("fixed32_value", FieldKind::Fixed32))
                .field(FieldDef::optional("sint64_value", FieldKind::Sint64))
                .field(FieldDef::optional("sfixed64_value", FieldKind::Sfixed64))
                .field(FieldDef::optional("fixed64_value", FieldKind::Fixed64))
                .field(FieldDef::repeated("uint64_repeated", FieldKind::Uint64)),
        )
        .record(
            RecordDef::new("test.Legacy")
                .field(FieldDef::optional("name", FieldKind::String))
                .field(FieldDef::optional("payload", FieldKind::Bytes))
                .field(FieldDef::optional("grouped", FieldKind::Group)),
        )
        .record(
            RecordDef::new("test.Node")
                .field(FieldDef::optional("label", FieldKind::String))
                .field(FieldDef::repeated("children", FieldKind::message("test.Node"))),
        )
        .record(
            RecordDef::new("test.Foo")
                .field(FieldDef::optional("bar", FieldKind::message("test.Bar"))),
        )
        .record(
            RecordDef::new("test.Bar")
                .field(FieldDef::repeated("foos", FieldKind::message("test.Foo"))),
        )
        .record(
            RecordDef::new("test.Root")
                .field(FieldDef::optional("left", FieldKind::message("test.Leaf")))
                .field(FieldDef::optional("right", FieldKind::message("test.Branch"))),
        )
        .record(
            RecordDef::new("test.Branch")
                .field(FieldDef::optional("leaf", FieldKind::message("test.Leaf")))
                .field(FieldDef::repeated("leaves", FieldKind::message("test.Leaf"))),
        )
        .record(RecordDef::new("test.Leaf").field(FieldDef::optional("label", FieldKind::String)))
        .build()
        .expect("fixture definitions are valid")
});

/// The shared fixture pool.
#[must_use]
pub fn pool() -> DescriptorPool {
    POOL.clone()
}

/// A fixture record type by full name.
///
/// # Panics
///
/// Panics if `full_name` is not a fixture type.
#[must_use]
pub fn record_type(full_name: &str) -> RecordType {
    POOL.record_type(full_name)
        .unwrap_or_else(|| panic!("no fixture record type {full_name}"))
}

/// A fixture enum type by full name.
///
/// # Panics
///
/// Panics if `full_name` is not a fixture enum.
#[must_use]
pub fn enum_type(full_name: &str) -> EnumType {
    POOL.enum_type(full_name)
        .unwrap_or_else(|| panic!("no fixture enum type {full_name}"))
}

/// An empty record of a fixture type.
#[must_use]
pub fn record(full_name: &str) -> Record {
    Record::new(record_type(full_name))
}

/// Every scalar kind plus self-referencing singular and repeated fields.
#[must_use]
pub fn union() -> RecordType {
    record_type("test.Union")
}

#[must_use]
pub fn movie() -> RecordType {
    record_type("test.Movie")
}

/// Holds repeated `test.Movie` records; acyclic.
#[must_use]
pub fn actor() -> RecordType {
    record_type("test.Actor")
}

/// Declares defaults on string, enum, int32 and double fields.
#[must_use]
pub fn default_value() -> RecordType {
    record_type("test.DefaultValue")
}

#[must_use]
pub fn required_value() -> RecordType {
    record_type("test.RequiredValue")
}

/// `name: string`, `age: int32`.
#[must_use]
pub fn person() -> RecordType {
    record_type("test.Person")
}

/// The integer kinds `test.Union` does not cover.
#[must_use]
pub fn numbers() -> RecordType {
    record_type("test.Numbers")
}

/// Carries bytes and group fields next to a plain string.
#[must_use]
pub fn legacy() -> RecordType {
    record_type("test.Legacy")
}

/// Refers to itself through a repeated field.
#[must_use]
pub fn node() -> RecordType {
    record_type("test.Node")
}

/// `test.Foo` refers to `test.Bar`, which refers back to `test.Foo`.
#[must_use]
pub fn foo() -> RecordType {
    record_type("test.Foo")
}

/// Reaches `test.Leaf` along several paths without a cycle.
#[must_use]
pub fn diamond() -> RecordType {
    record_type("test.Root")
}

/// A movie with title and year set.
///
/// # Panics
///
/// Never, for the fixture definitions.
#[must_use]
pub fn movie_record(title: &str, year: i32) -> Record {
    record("test.Movie")
        .with("title", title)
        .and_then(|r| r.with("year", year))
        .expect("movie fields match the fixture")
}
