//! ConcurrentMap: HashMap behind a single reader-writer lock
//!
//! This module implements a generic shared map using:
//! - `HashMap<K, V, S>` for O(1) keyed storage
//! - `parking_lot::RwLock` for thread-safe access
//!
//! # Design Notes
//!
//! - **Shared lock for reads**: `load`, `contains_key`, `range` never block
//!   each other.
//! - **Double-checked compound operations**: `load_or_store`,
//!   `load_and_delete`, `compare_and_swap` and `compare_and_delete` evaluate
//!   their condition under the shared lock first and return early when no
//!   mutation is needed. Otherwise the shared guard is dropped, the exclusive
//!   lock is taken and the condition is evaluated again before mutating. The
//!   second check is required: between the two acquisitions any other thread
//!   may have inserted, replaced or removed the entry.
//! - **No upgradable reads**: parking_lot admits a single upgradable holder at
//!   a time, which would serialize the fast path.
//! - **Clear retains capacity**: the table keeps its allocation.
//!
//! # Caller Obligations
//!
//! Keys must honour the `Eq`/`Hash` contract and comparison predicates must
//! be consistent (reflexive and symmetric). Violations give wrong answers,
//! never a panic or a detectable error.
//!
//! Callbacks (`range`, `load_with`) run while the shared lock is held. They
//! must not call back into the same map: the lock is not re-entrant, and a
//! writer queued in between turns a nested read into a deadlock.

use std::borrow::Borrow;
use std::collections::hash_map::{Entry, RandomState};
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use parking_lot::RwLock;
use sleipnir_core::{CacheConfig, Error, Result};
use tracing::{debug, trace};

/// Thread-safe map with atomic single-key compound operations
///
/// All state lives in one `HashMap` guarded by one `RwLock`. Operations are
/// linearizable per key; there is no cross-key atomicity.
///
/// Absence is never an error: lookups return `Option`, conditional
/// mutations return `bool`.
///
/// # Example
///
/// ```
/// use sleipnir_cache::ConcurrentMap;
///
/// let map = ConcurrentMap::new();
/// assert_eq!(map.load("foo"), None);
///
/// map.store("foo".to_string(), 1);
/// assert_eq!(map.load("foo"), Some(1));
///
/// let (value, loaded) = map.load_or_store("foo".to_string(), 7);
/// assert_eq!((value, loaded), (1, true));
///
/// assert!(map.compare_and_swap("foo", &1, 2, |a, b| a == b));
/// assert_eq!(map.load("foo"), Some(2));
/// ```
pub struct ConcurrentMap<K, V, S = RandomState> {
    /// The guarded data store
    store: RwLock<HashMap<K, V, S>>,
    /// Label attached to log events
    name: Option<Box<str>>,
}

impl<K, V> ConcurrentMap<K, V, RandomState> {
    /// Create an empty map
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Create an empty map with room for at least `capacity` entries
    ///
    /// The capacity is a performance hint, not a bound.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V> ConcurrentMap<K, V, RandomState>
where
    K: Eq + Hash,
{
    /// Build a map from a validated [`CacheConfig`]
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] if the config fails validation
    /// - [`Error::CapacityOverflow`] if `initial_capacity` cannot be reserved
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::from_config_with_hasher(config, RandomState::new())
    }
}

impl<K, V, S> ConcurrentMap<K, V, S> {
    /// Create an empty map using `hasher` to hash keys
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            store: RwLock::new(HashMap::with_hasher(hasher)),
            name: None,
        }
    }

    /// Create an empty map with a capacity hint and a custom hasher
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            store: RwLock::new(HashMap::with_capacity_and_hasher(capacity, hasher)),
            name: None,
        }
    }

    /// Number of entries at the moment the shared lock is held
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /// Whether the map held no entries at the moment of the call
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Number of entries the backing table can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.store.read().capacity()
    }

    /// Remove every entry
    ///
    /// Takes the exclusive lock. The backing table keeps its capacity.
    pub fn clear(&self) {
        let mut store = self.store.write();
        let dropped = store.len();
        store.clear();
        drop(store);

        debug!(map = self.label(), entries = dropped, "cleared map");
    }

    /// Visit every entry until `visit` returns `false`
    ///
    /// Order is unspecified. The shared lock is held for the whole traversal:
    /// other readers proceed, writers wait until `range` returns. `visit` must
    /// not call back into this map.
    ///
    /// # Example
    ///
    /// ```
    /// use sleipnir_cache::ConcurrentMap;
    ///
    /// let map: ConcurrentMap<u32, u32> = (0..10).map(|i| (i, i * 10)).collect();
    ///
    /// let mut seen = 0;
    /// map.range(|_, _| {
    ///     seen += 1;
    ///     seen < 3
    /// });
    /// assert_eq!(seen, 3);
    /// ```
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let store = self.store.read();
        for (key, value) in store.iter() {
            if !visit(key, value) {
                break;
            }
        }
    }

    /// Consume the map and return the underlying `HashMap`
    pub fn into_inner(self) -> HashMap<K, V, S> {
        self.store.into_inner()
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    fn recheck_failed(&self, op: &'static str) {
        trace!(
            map = self.label(),
            op,
            "optimistic check invalidated before exclusive lock"
        );
    }
}

impl<K, V, S> ConcurrentMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Build a map from a validated [`CacheConfig`] with a custom hasher
    ///
    /// The capacity hint is reserved fallibly, so an absurd hint is reported
    /// instead of aborting the process.
    ///
    /// # Errors
    ///
    /// Same as [`ConcurrentMap::from_config`].
    pub fn from_config_with_hasher(config: &CacheConfig, hasher: S) -> Result<Self> {
        config.validate()?;

        let mut store = HashMap::with_hasher(hasher);
        store
            .try_reserve(config.initial_capacity)
            .map_err(|_| Error::CapacityOverflow {
                requested: config.initial_capacity,
            })?;

        let map = Self {
            store: RwLock::new(store),
            name: config.name.as_deref().map(Box::from),
        };
        debug!(
            map = map.label(),
            capacity = config.initial_capacity,
            "created map from config"
        );
        Ok(map)
    }

    /// Return a clone of the value stored for `key`
    ///
    /// `None` means the key is absent. Never mutates.
    pub fn load<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.store.read().get(key).cloned()
    }

    /// Apply `f` to the value stored for `key` without cloning it
    ///
    /// `f` runs under the shared lock and must not call back into this map.
    pub fn load_with<Q, R, F>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        self.store.read().get(key).map(f)
    }

    /// Whether `key` is present
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.read().contains_key(key)
    }

    /// Install `value` for `key`, overwriting any previous value
    pub fn store(&self, key: K, value: V) {
        self.swap(key, value);
    }

    /// Install `value` for `key` and return the value it replaced
    pub fn swap(&self, key: K, value: V) -> Option<V> {
        self.store.write().insert(key, value)
    }

    /// Return the existing value for `key`, or install `value` if absent
    ///
    /// Returns `(actual, loaded)`. When the key was present, `actual` is the
    /// current value and `loaded` is `true`; the map is unchanged. Otherwise
    /// `value` is installed and returned with `loaded == false`.
    ///
    /// When several callers race on an absent key, the first to take the
    /// exclusive lock wins and every caller returns the winning value.
    pub fn load_or_store(&self, key: K, value: V) -> (V, bool)
    where
        V: Clone,
    {
        {
            let store = self.store.read();
            if let Some(current) = store.get(&key) {
                return (current.clone(), true);
            }
        }

        let mut store = self.store.write();
        match store.entry(key) {
            Entry::Occupied(entry) => {
                self.recheck_failed("load_or_store");
                (entry.get().clone(), true)
            }
            Entry::Vacant(entry) => (entry.insert(value).clone(), false),
        }
    }

    /// Remove `key` and return its value
    ///
    /// `None` means the key was absent and nothing changed.
    pub fn load_and_delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.store.read().contains_key(key) {
            return None;
        }

        let removed = self.store.write().remove(key);
        if removed.is_none() {
            self.recheck_failed("load_and_delete");
        }
        removed
    }

    /// Remove `key` if present
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.load_and_delete(key);
    }

    /// Replace the value for `key` with `new` if the current value matches `old`
    ///
    /// `cmp(current, old)` decides the match; values need not implement
    /// `PartialEq`. Returns `true` if the swap happened. An absent key is
    /// never swapped.
    pub fn compare_and_swap<Q, F>(&self, key: &Q, old: &V, new: V, cmp: F) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: Fn(&V, &V) -> bool,
    {
        {
            let store = self.store.read();
            match store.get(key) {
                Some(current) if cmp(current, old) => {}
                _ => return false,
            }
        }

        let mut store = self.store.write();
        match store.get_mut(key) {
            Some(current) if cmp(&*current, old) => {
                *current = new;
                true
            }
            _ => {
                self.recheck_failed("compare_and_swap");
                false
            }
        }
    }

    /// Remove `key` if its current value matches `old`
    ///
    /// Returns `true` if the entry was removed. Always `false` for an absent
    /// key, whatever `old` is.
    pub fn compare_and_delete<Q, F>(&self, key: &Q, old: &V, cmp: F) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: Fn(&V, &V) -> bool,
    {
        let matches = |store: &HashMap<K, V, S>| {
            store
                .get(key)
                .map_or(false, |current| cmp(current, old))
        };

        if !matches(&*self.store.read()) {
            return false;
        }

        let mut store = self.store.write();
        if !matches(&*store) {
            self.recheck_failed("compare_and_delete");
            return false;
        }
        store.remove(key);
        true
    }

    /// Clone every entry under a single shared lock acquisition
    pub fn snapshot(&self) -> HashMap<K, V, S>
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        self.store.read().clone()
    }
}

impl<K, V, S> Default for ConcurrentMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> FromIterator<(K, V)> for ConcurrentMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            store: RwLock::new(iter.into_iter().collect()),
            name: None,
        }
    }
}

impl<K, V, S> fmt::Debug for ConcurrentMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentMap")
            .field("name", &self.name)
            .field("store", &*self.store.read())
            .finish()
    }
}
