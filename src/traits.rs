//! # Cache Traits
//!
//! Small trait hierarchy shared by the sampled LRU core, so code can be
//! written against the cache operations rather than a concrete type.
//!
//! ```text
//!   ┌──────────────────────────────┐
//!   │     ReadOnlyCache<K, V>      │  contains / len / is_empty / capacity
//!   └──────────────┬───────────────┘   (never touch recency or the clock)
//!                  │
//!   ┌──────────────▼───────────────┐
//!   │       CoreCache<K, V>        │  insert / get / clear
//!   └──────────────┬───────────────┘
//!                  │
//!   ┌──────────────▼───────────────┐
//!   │      MutableCache<K, V>      │  remove / remove_batch
//!   └──────────────────────────────┘
//!
//!   ConcurrentCache: Send + Sync marker for lock-wrapped caches
//! ```
//!
//! | Trait             | Extends         | Purpose                          |
//! |-------------------|-----------------|----------------------------------|
//! | `ReadOnlyCache`   | -               | Side-effect free queries         |
//! | `CoreCache`       | `ReadOnlyCache` | Insert, lookup, clear            |
//! | `MutableCache`    | `CoreCache`     | Arbitrary key removal            |
//! | `ConcurrentCache` | `Send + Sync`   | Marker for thread-safe caches    |

/// Queries that never modify cache state.
///
/// For the sampled LRU this means no clock tick and no recency stamp, so
/// these are safe to call from assertions and monitoring code.
pub trait ReadOnlyCache<K, V> {
    /// Returns `true` if the key is present.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity.
    fn capacity(&self) -> usize;
}

/// Universal cache operations.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use doccache::policy::sampled_lru::SampledLruCore;
/// use doccache::traits::{CoreCache, ReadOnlyCache};
///
/// fn warm<C: CoreCache<String, Arc<Vec<u8>>>>(cache: &mut C, docs: &[(&str, &str)]) {
///     for (key, doc) in docs {
///         cache.insert(key.to_string(), Arc::new(doc.as_bytes().to_vec()));
///     }
/// }
///
/// let mut cache: SampledLruCore<String, Vec<u8>> = SampledLruCore::new(10, 0);
/// warm(&mut cache, &[("a", "one"), ("b", "two")]);
/// assert_eq!(ReadOnlyCache::len(&cache), 2);
/// ```
pub trait CoreCache<K, V>: ReadOnlyCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// May evict another entry according to the cache's policy.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key, recording the access.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Removes all entries.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a key, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes multiple keys, returning results in input order.
    ///
    /// The default implementation loops over [`remove`](Self::remove).
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Marker trait for caches that are safe to share across threads.
///
/// Implemented by lock-wrapped caches such as
/// [`ConcurrentSampledLruCache`](crate::policy::sampled_lru::ConcurrentSampledLruCache).
pub trait ConcurrentCache: Send + Sync {}
