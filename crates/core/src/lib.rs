//! Core types for Sleipnir
//!
//! This crate defines the pieces shared by the cache crates:
//! - Error: Error type for fallible construction
//! - CacheConfig: Construction-time settings for a map

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;

pub use config::CacheConfig;
pub use error::{Error, Result};
