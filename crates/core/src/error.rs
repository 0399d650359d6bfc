//! Error types for Sleipnir
//!
//! Map operations never fail: absence and failed comparisons are ordinary
//! results. The only fallible path is building a map from a [`CacheConfig`],
//! which can reject the configuration or fail to reserve the requested
//! capacity. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! [`CacheConfig`]: crate::CacheConfig

use thiserror::Error;

/// Result type alias for Sleipnir operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Sleipnir
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The capacity hint could not be reserved
    #[error("Capacity overflow: cannot reserve {requested} entries")]
    CapacityOverflow {
        /// Number of entries that was requested
        requested: usize,
    },

    /// Configuration text could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ConfigParse(e.to_string())
    }
}
