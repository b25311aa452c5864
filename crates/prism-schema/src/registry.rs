//! Schema registries.
//!
//! A registry stores configured schemas by name and derives zero-config
//! schemas for every other record type on demand. Lookups are split into
//! capability traits so code that only reads schemas cannot register new
//! ones.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use prism_config::RegistryConfig;
use prism_core::RecordType;

use crate::auto::AutoSchema;
use crate::error::{DerivationError, JsonSchemaError};
use crate::json_schema::JsonSchema;
use crate::named::NamedSchema;
use crate::schema::Schema;

/// Source of zero-config schemas.
pub trait SchemaSource {
    /// The zero-config schema of `record_type`.
    ///
    /// # Errors
    ///
    /// Returns [`DerivationError::Cyclic`] if the type's reference graph loops.
    fn auto_schema(&self, record_type: &RecordType) -> Result<Arc<AutoSchema>, DerivationError>;
}

/// Read access to a registry.
pub trait ReadableSchemaRegistry: SchemaSource + Send + Sync {
    /// The configured schema registered under `name`.
    fn named(&self, name: &str) -> Option<Arc<NamedSchema>>;

    fn contains(&self, name: &str) -> bool {
        self.named(name).is_some()
    }

    /// The JSON Schema of every registered schema, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns the first [`JsonSchemaError`] raised while generating.
    fn json_schemas(&self) -> Result<Vec<JsonSchema>, JsonSchemaError>;
}

/// Write access to a registry.
pub trait WritableSchemaRegistry {
    /// Register `schema` under its own name, replacing any earlier schema of
    /// that name.
    fn register(&self, schema: NamedSchema);
}

type AutoSchemaCell = Arc<OnceLock<Result<Arc<AutoSchema>, DerivationError>>>;

/// Concurrent registry of configured schemas with a memoized zero-config
/// cache.
///
/// The zero-config cache computes each record type at most once, even under
/// concurrent first access; callers racing on the same type wait for the one
/// computation. Failed derivations are handed to every waiter but not kept.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: DashMap<String, Arc<NamedSchema>>,
    auto_schemas: DashMap<RecordType, AutoSchemaCell>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Registered schema names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered schemas, sorted by name. Detached from the map so callers
    /// can look up other schemas while walking the result.
    fn sorted_schemas(&self) -> Vec<Arc<NamedSchema>> {
        let mut schemas: Vec<Arc<NamedSchema>> =
            self.schemas.iter().map(|e| Arc::clone(e.value())).collect();
        schemas.sort_by(|a, b| a.name().cmp(b.name()));
        schemas
    }
}

impl SchemaSource for SchemaRegistry {
    fn auto_schema(&self, record_type: &RecordType) -> Result<Arc<AutoSchema>, DerivationError> {
        let cell = Arc::clone(&*self.auto_schemas.entry(record_type.clone()).or_default());

        let mut derived = false;
        let result = cell
            .get_or_init(|| {
                derived = true;
                AutoSchema::of(record_type.clone()).map(Arc::new)
            })
            .clone();

        if derived {
            tracing::debug!(
                record_type = record_type.full_name(),
                ok = result.is_ok(),
                "derived zero-config schema"
            );
        } else {
            tracing::trace!(record_type = record_type.full_name(), "zero-config schema cache hit");
        }

        if result.is_err() {
            self.auto_schemas
                .remove_if(record_type, |_, existing| Arc::ptr_eq(existing, &cell));
        }
        result
    }
}

impl ReadableSchemaRegistry for SchemaRegistry {
    fn named(&self, name: &str) -> Option<Arc<NamedSchema>> {
        self.schemas.get(name).map(|e| Arc::clone(e.value()))
    }

    fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    fn json_schemas(&self) -> Result<Vec<JsonSchema>, JsonSchemaError> {
        self.sorted_schemas()
            .iter()
            .map(|schema| schema.json_schema(self))
            .collect()
    }
}

impl WritableSchemaRegistry for SchemaRegistry {
    fn register(&self, schema: NamedSchema) {
        let name = schema.name().to_string();
        let record_type = schema.record_type().full_name().to_string();
        let replaced = self.schemas.insert(name.clone(), Arc::new(schema));
        match replaced {
            Some(previous) if self.config.warn_on_replace => tracing::warn!(
                name = %name,
                record_type = %record_type,
                previous = previous.record_type().full_name(),
                "replaced registered schema"
            ),
            Some(_) => tracing::debug!(name = %name, record_type = %record_type, "replaced registered schema"),
            None => tracing::debug!(name = %name, record_type = %record_type, "registered schema"),
        }
    }
}

/// A registry with no configured schemas that derives every zero-config
/// schema afresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRegistry;

/// The shared [`EmptyRegistry`].
pub static EMPTY: EmptyRegistry = EmptyRegistry;

impl SchemaSource for EmptyRegistry {
    fn auto_schema(&self, record_type: &RecordType) -> Result<Arc<AutoSchema>, DerivationError> {
        AutoSchema::of(record_type.clone()).map(Arc::new)
    }
}

impl ReadableSchemaRegistry for EmptyRegistry {
    fn named(&self, _name: &str) -> Option<Arc<NamedSchema>> {
        None
    }

    fn contains(&self, _name: &str) -> bool {
        false
    }

    fn json_schemas(&self) -> Result<Vec<JsonSchema>, JsonSchemaError> {
        Ok(Vec::new())
    }
}
