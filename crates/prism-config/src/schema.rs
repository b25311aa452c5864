//! Defaults applied to newly configured schemas.

use prism_core::CaseFormat;
use serde::{Deserialize, Serialize};

/// The `[schema]` section.
///
/// These values seed `NamedSchema::with_defaults`; every schema can still
/// override them through its own rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SchemaDefaults {
    /// External case format for enum value names.
    #[serde(default)]
    pub enum_case_format: CaseFormat,

    /// Emit 64-bit integers as JSON strings.
    #[serde(default)]
    pub longs_as_strings: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let defaults = SchemaDefaults::default();
        assert_eq!(defaults.enum_case_format, CaseFormat::LowerCamel);
        assert!(!defaults.longs_as_strings);
    }
}
