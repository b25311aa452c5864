//! # prism-config
//!
//! Layered configuration loading for Prism using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PRISM_*` prefix, `__` as separator)
//! 2. Project-level `.prism/config.toml`
//! 3. User-level `~/.config/prism/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PRISM_SCHEMA__ENUM_CASE_FORMAT` -> `schema.enum_case_format`,
//! `PRISM_REGISTRY__WARN_ON_REPLACE` -> `registry.warn_on_replace`.
//!
//! # Usage
//!
//! ```no_run
//! use prism_config::PrismConfig;
//!
//! let config = PrismConfig::load().expect("config");
//! if config.schema.longs_as_strings {
//!     println!("64-bit integers are emitted as strings");
//! }
//! ```

mod error;
mod registry;
mod schema;

pub use error::ConfigError;
pub use registry::RegistryConfig;
pub use schema::SchemaDefaults;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PrismConfig {
    #[serde(default)]
    pub schema: SchemaDefaults,
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl PrismConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be read or a value
    /// does not deserialize (e.g. an unknown case format name).
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".prism/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("PRISM_").split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("prism").join("config.toml"))
    }
}
