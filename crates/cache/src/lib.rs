//! Concurrent map for Sleipnir
//!
//! This crate implements the shared in-memory key-value store:
//! - ConcurrentMap: HashMap guarded by a single `parking_lot::RwLock`
//! - Atomic compound operations (load-or-store, swap, compare-and-swap,
//!   compare-and-delete, load-and-delete)
//! - Bulk iteration under the shared lock
//!
//! # Locking
//!
//! Pure reads take the shared lock. Compound operations check under the
//! shared lock first and only take the exclusive lock, re-checking there,
//! when a mutation may be needed.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod concurrent;

pub use concurrent::ConcurrentMap;
