//! Schema registry behavior.

use serde::{Deserialize, Serialize};

/// The `[registry]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Log a warning when a registration replaces a schema of the same name.
    /// Replacement itself always succeeds.
    #[serde(default)]
    pub warn_on_replace: bool,
}
