//! Configuration
//!
//! [`FormsConfig`] carries the few knobs the builder and the CLI need. It can
//! be built in code with the `with_*` methods or read from a TOML file:
//!
//! ```toml
//! data_dir = "/var/lib/formwright"
//! autosave_delay_ms = 5000
//! form_index_key = "formIds"
//! ```

use crate::error::ConfigError;
use formwright_store::DEFAULT_INDEX_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default debounce before an autosave
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 10_000;

/// Workspace configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormsConfig {
    /// Directory of the file-backed store
    pub data_dir: PathBuf,
    /// Quiet period after the last edit before autosave writes
    pub autosave_delay_ms: u64,
    /// Storage key of the form index
    pub form_index_key: String,
}

impl FormsConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// With autosave delay
    #[inline]
    #[must_use]
    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With form index key
    #[inline]
    #[must_use]
    pub fn with_form_index_key(mut self, key: impl Into<String>) -> Self {
        self.form_index_key = key.into();
        self
    }

    /// Autosave delay as a duration
    #[inline]
    #[must_use]
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns error if the TOML is invalid or a value is out of range
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns error on a zero autosave delay or an empty index key
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autosave_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "autosave_delay_ms must be greater than zero".to_string(),
            ));
        }
        if self.form_index_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "form_index_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".formwright"),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            form_index_key: DEFAULT_INDEX_KEY.to_string(),
        }
    }
}
