//! Sleipnir - generic thread-safe in-memory key-value store
//!
//! Sleipnir provides a shared map with atomic single-key compound operations:
//! load-or-store, swap, compare-and-swap, compare-and-delete, load-and-delete
//! and bulk iteration. There is no persistence, eviction or expiry.
//!
//! # Quick Start
//!
//! ```
//! use sleipnir::ConcurrentMap;
//!
//! let cache = ConcurrentMap::new();
//! assert_eq!(cache.load("foo"), None);
//!
//! cache.store("foo".to_string(), 1);
//! assert_eq!(cache.load("foo"), Some(1));
//!
//! cache.store("foo".to_string(), 2);
//! assert_eq!(cache.load("foo"), Some(2));
//! ```
//!
//! # Architecture
//!
//! All state lives in [`ConcurrentMap`]. Construction from a [`CacheConfig`]
//! is the only fallible path and reports [`Error`].

pub use sleipnir_cache::*;
pub use sleipnir_core::{CacheConfig, Error, Result};
