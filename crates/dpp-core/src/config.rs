//! # Run Configuration
//!
//! Where the schema lives, which documents to check, and the tolerance policy
//! for percentage sums. Every field has a default, so an absent or partial
//! configuration file is valid. The CLI layers its flags on top.
//!
//! ```yaml
//! schema_path: packages/schema/dpp.schema.json
//! documents: examples/*.json
//! tolerance:
//!   target: 100.0
//!   tolerance: 0.1
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policy::TolerancePolicy;

/// Default location of the passport schema, relative to the working directory.
pub const DEFAULT_SCHEMA_PATH: &str = "packages/schema/dpp.schema.json";

/// Default selection pattern for candidate documents.
pub const DEFAULT_DOCUMENTS_PATTERN: &str = "examples/*.json";

/// Configuration for one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Path to the structural schema.
    pub schema_path: PathBuf,
    /// Glob-style pattern selecting candidate documents.
    pub documents: String,
    /// Target and tolerance for percentage sums.
    pub tolerance: TolerancePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            documents: DEFAULT_DOCUMENTS_PATTERN.to_string(),
            tolerance: TolerancePolicy::default(),
        }
    }
}

impl RunConfig {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] if the file cannot be read, [`ConfigError::Parse`]
    /// for malformed YAML or unknown keys, and the errors of [`RunConfig::check`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    /// Parse configuration from YAML text. `origin` names the source in errors.
    pub fn from_yaml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes to `null`, which means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;
        config.check()?;
        Ok(config)
    }

    /// Verify the configuration is usable.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.documents.trim().is_empty() {
            return Err(ConfigError::EmptyDocumentPattern);
        }
        self.tolerance.check()
    }
}
