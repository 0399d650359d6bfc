//! Map configuration
//!
//! A `CacheConfig` is an in-process value, optionally parsed from TOML text
//! supplied by the caller. Nothing is read from the environment or disk.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Construction-time settings for a concurrent map.
///
/// # Example
///
/// ```toml
/// # Number of entries to reserve up front (a hint, not a bound)
/// initial_capacity = 1024
///
/// # Label attached to log events emitted by the map
/// name = "sessions"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entries to reserve when the map is built. Performance hint only.
    #[serde(default)]
    pub initial_capacity: usize,
    /// Optional label for log events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CacheConfig {
    /// Create a config with no capacity hint and no name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capacity hint.
    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Set the label used in log events.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse and validate a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed TOML or unknown value
    /// types, and [`Error::InvalidConfig`] if validation fails.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: CacheConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config for values no map can be built from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when `name` is present but blank.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "name must not be blank when set".to_string(),
                ));
            }
        }
        Ok(())
    }
}
