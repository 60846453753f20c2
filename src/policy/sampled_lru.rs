//! Sampled approximate-LRU cache.
//!
//! Every entry carries the logical clock value of its last insert or lookup.
//! When an insert pushes the table one entry past capacity, the cache looks
//! at a handful of entries in the table's native (unspecified) iteration
//! order and evicts the oldest of that sample. There is no recency list, no
//! heap and no per-access reordering: an access is one counter write.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   ConcurrentSampledLruCache<K, V, S>                    │
//! │                                                                         │
//! │   ┌─────────────────────────────────────────────────────────────────┐   │
//! │   │              Arc<Mutex<SampledLruCore<K, V, S>>>                │   │
//! │   │                                                                 │   │
//! │   │   clock: u64 (next stamp)   capacity   samples                  │   │
//! │   │                                                                 │   │
//! │   │   map: HashMap<K, Entry<V>, S>                                  │   │
//! │   │   ┌──────────┬─────────┬───────────┐                            │   │
//! │   │   │   Key    │ recency │  Arc<V>   │                            │   │
//! │   │   ├──────────┼─────────┼───────────┤                            │   │
//! │   │   │  "key1"  │    4    │  doc1     │                            │   │
//! │   │   │  "key2"  │    1    │  doc2     │ ◄── oldest in sample       │   │
//! │   │   │  "key3"  │    6    │  doc3     │                            │   │
//! │   │   └──────────┴─────────┴───────────┘                            │   │
//! │   └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//! Insert Flow
//! ───────────
//!
//!   insert(key, value):
//!     1. map[key] = Entry { recency: clock, value }
//!     2. clock += 1
//!     3. new key and len == capacity + 1  ──►  trim()
//!
//! Lookup Flow
//! ───────────
//!
//!   get(key):
//!     1. stamp = clock; clock += 1     (hit or miss)
//!     2. hit  ──► entry.recency = stamp, return value
//!        miss ──► None
//!
//! Eviction Flow (trim)
//! ────────────────────
//!
//!   only when len - capacity == 1:
//!     1. walk the first `samples` entries of map iteration
//!     2. remember the smallest recency seen
//!     3. remove exactly that entry
//! ```
//!
//! ## Key Components
//!
//! | Component                        | Description                                   |
//! |----------------------------------|-----------------------------------------------|
//! | [`SampledLruCore`]               | Unsynchronized table, clock and eviction      |
//! | [`ConcurrentSampledLruCache`]    | One `parking_lot::Mutex` around the core      |
//! | [`DocumentCache`]                | `String` keys, shared `[u8]` documents        |
//!
//! ## Operations
//!
//! | Operation  | Time          | Clock tick | Notes                            |
//! |------------|---------------|------------|----------------------------------|
//! | `insert`   | O(samples)    | yes        | Evicts at most one entry         |
//! | `get`      | O(1)          | yes        | Ticks on misses too              |
//! | `peek`     | O(1)          | no         | Does not refresh recency         |
//! | `contains` | O(1)          | no         |                                  |
//! | `remove`   | O(1)          | no         | Never evicts                     |
//! | `clear`    | O(n)          | reset to 0 | Keeps the table allocation       |
//! | `len`      | O(1)          | no         |                                  |
//!
//! ## Approximation
//!
//! The victim is the oldest entry *of the sample*, not of the whole table.
//! With the default width of 5 the evicted entry is, on average, older than
//! about 83% of the table. When the sample width reaches the table size the
//! policy is exact LRU, which is why small caches (`capacity + 1 <= samples`)
//! behave deterministically.
//!
//! Sample quality depends on the hasher. The default
//! [`RandomState`] seeds each table differently, so
//! consecutive passes do not keep probing the same keys. A fixed hasher
//! (see [`SampledLruCore::with_hasher`]) gives reproducible evictions for
//! tests and simulations.
//!
//! ## Eviction Trigger
//!
//! Eviction fires only when the table is *exactly* one entry over capacity.
//! Inserts arrive one key at a time and capacity never changes, so that is
//! the only overflow a live cache can reach. A table that is somehow two or
//! more entries over capacity is not converged back down.
//!
//! ## Example Usage
//!
//! ```
//! use doccache::policy::sampled_lru::DocumentCache;
//!
//! let cache = DocumentCache::new(2, 5);
//! cache.insert_document("key", b"doc0".as_slice());
//! cache.insert_document("key1", b"doc1".as_slice());
//! cache.insert_document("key2", b"doc2".as_slice());
//!
//! // "key" was the least recently used
//! assert!(cache.get("key").is_none());
//! assert_eq!(cache.len(), 2);
//! assert_eq!(&*cache.get("key2").unwrap(), b"doc2");
//! ```
//!
//! ## Thread Safety
//!
//! - [`SampledLruCore`]: `Send` when its parts are, not `Sync`
//! - [`ConcurrentSampledLruCache`]: every method holds the single mutex for
//!   its whole duration, eviction included. `get` mutates recency, so there
//!   is no shared read path.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::Mutex;

use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::SampledLruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::SampledLruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, MetricsReset, MetricsSnapshotProvider, SampledLruMetricsReadRecorder,
    SampledLruMetricsRecorder,
};
#[cfg(feature = "concurrency")]
use crate::traits::ConcurrentCache;
use crate::traits::{CoreCache, MutableCache, ReadOnlyCache};

/// Sampling width used when the caller passes `0`.
pub const DEFAULT_SAMPLES: usize = 5;

/// Upper bound on the entries reserved up front; larger caches grow on demand.
const MAX_PREALLOC: usize = 1 << 20;

/// Resolves the stored sampling width.
///
/// `0` selects [`DEFAULT_SAMPLES`]. The result is capped at `capacity + 1`,
/// the table size at which an eviction pass runs.
#[inline]
pub fn effective_samples(capacity: usize, samples: usize) -> usize {
    let samples = if samples == 0 { DEFAULT_SAMPLES } else { samples };
    samples.min(capacity.saturating_add(1))
}

struct Entry<V: ?Sized> {
    recency: u64,
    value: Arc<V>,
}

/// Single-threaded sampled LRU cache.
///
/// Values are stored as `Arc<V>` so lookups can hand out shared handles
/// without copying; `V` may be unsized (`[u8]`, `str`).
///
/// # Type Parameters
///
/// - `K`: Key type, `Eq + Hash + Clone` (the victim key is cloned once per eviction)
/// - `V`: Value type
/// - `S`: Hasher; its iteration order drives sampling
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use doccache::policy::sampled_lru::SampledLruCore;
///
/// let mut cache: SampledLruCore<&str, str> = SampledLruCore::new(2, 0);
/// cache.insert("a", Arc::from("alpha"));
/// cache.insert("b", Arc::from("beta"));
///
/// // Touch "a" so "b" becomes the oldest
/// assert_eq!(cache.get("a").map(|v| &**v), Some("alpha"));
/// cache.insert("c", Arc::from("gamma"));
///
/// assert!(cache.contains("a"));
/// assert!(!cache.contains("b"));
/// ```
pub struct SampledLruCore<K, V: ?Sized, S = RandomState> {
    map: HashMap<K, Entry<V>, S>,
    clock: u64,
    capacity: usize,
    samples: usize,
    #[cfg(feature = "metrics")]
    metrics: SampledLruMetrics,
}

impl<K, V> SampledLruCore<K, V, RandomState>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// `samples == 0` selects [`DEFAULT_SAMPLES`]. Capacity is not validated:
    /// a zero-capacity cache evicts every entry as soon as it is inserted.
    ///
    /// # Example
    ///
    /// ```
    /// use doccache::policy::sampled_lru::SampledLruCore;
    ///
    /// let cache: SampledLruCore<String, [u8]> = SampledLruCore::new(100, 0);
    /// assert_eq!(cache.capacity(), 100);
    /// assert_eq!(cache.samples(), 5);
    /// assert!(cache.is_empty());
    /// ```
    #[inline]
    pub fn new(capacity: usize, samples: usize) -> Self {
        Self::with_hasher(capacity, samples, RandomState::new())
    }
}

impl<K, V, S> SampledLruCore<K, V, S>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
    S: BuildHasher,
{
    /// Creates a cache whose table uses `hash_builder`.
    ///
    /// The hasher decides iteration order and therefore which entries are
    /// sampled. Pass a fixed-seed hasher for reproducible eviction.
    pub fn with_hasher(capacity: usize, samples: usize, hash_builder: S) -> Self {
        let samples = effective_samples(capacity, samples);
        let prealloc = capacity.saturating_add(2).min(MAX_PREALLOC);

        #[cfg(feature = "tracing")]
        tracing::debug!(capacity, samples, "created sampled lru cache");

        Self {
            map: HashMap::with_capacity_and_hasher(prealloc, hash_builder),
            clock: 0,
            capacity,
            samples,
            #[cfg(feature = "metrics")]
            metrics: SampledLruMetrics::default(),
        }
    }

    /// Inserts or overwrites `key`, returning the previous value.
    ///
    /// The entry is stamped with the current clock, then the clock advances.
    /// Overwrites keep the table size, so only a new key can trigger the
    /// eviction pass.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use doccache::policy::sampled_lru::SampledLruCore;
    ///
    /// let mut cache = SampledLruCore::new(10, 0);
    /// assert!(cache.insert("key", Arc::new(1)).is_none());
    /// assert_eq!(cache.insert("key", Arc::new(2)).as_deref(), Some(&1));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        let recency = self.tick();
        let previous = self.map.insert(key, Entry { recency, value });

        match previous {
            Some(entry) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_update();
                Some(entry.value)
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_new();
                self.trim();
                None
            },
        }
    }

    /// Looks up `key`, refreshing its recency on a hit.
    ///
    /// The clock advances whether or not the key is present.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use doccache::policy::sampled_lru::SampledLruCore;
    ///
    /// let mut cache = SampledLruCore::new(10, 0);
    /// cache.insert("key", Arc::new(42));
    ///
    /// assert_eq!(cache.get("key").map(|v| **v), Some(42));
    /// assert_eq!(cache.get("missing"), None);
    /// assert_eq!(cache.clock(), 3);
    /// ```
    pub fn get<Q>(&mut self, key: &Q) -> Option<&Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let stamp = self.tick();
        match self.map.get_mut(key) {
            Some(entry) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();
                entry.recency = stamp;
                Some(&entry.value)
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                None
            },
        }
    }

    /// Returns the value for `key` without touching recency or the clock.
    pub fn peek<Q>(&self, key: &Q) -> Option<&Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();

        let value = self.map.get(key).map(|entry| &entry.value);

        #[cfg(feature = "metrics")]
        if value.is_some() {
            (&self.metrics).record_peek_found();
        }

        value
    }

    /// Returns `true` if `key` is present. Does not touch recency.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_contains_call();

        self.map.contains_key(key)
    }

    /// Removes `key`, returning its value if present.
    ///
    /// Leaves the clock alone and never runs an eviction pass.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let removed = self.map.remove(key).map(|entry| entry.value);

        #[cfg(feature = "metrics")]
        if removed.is_some() {
            self.metrics.record_remove_found();
        }

        removed
    }

    /// Removes every entry and resets the clock to 0.
    ///
    /// The table keeps its allocation.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        #[cfg(feature = "tracing")]
        tracing::debug!(len = self.map.len(), clock = self.clock, "flushing sampled lru cache");

        self.map.clear();
        self.clock = 0;
    }

    /// Number of entries currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Configured maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries examined per eviction pass (after defaulting and clamping).
    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Next logical timestamp the cache will hand out.
    #[inline]
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Logical timestamp of the last insert or hit on `key`.
    pub fn recency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).map(|entry| entry.recency)
    }

    /// Checks the table against the clock and the capacity bound.
    ///
    /// Verifies that:
    /// - the table holds at most `capacity` entries
    /// - the sampling width is within `1..=capacity + 1`
    /// - every recency is below the clock
    /// - no two entries share a recency
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "table holds {} entries, capacity is {}",
                self.map.len(),
                self.capacity
            )));
        }

        if self.samples == 0 || self.samples > self.capacity.saturating_add(1) {
            return Err(InvariantError::new(format!(
                "sampling width {} outside 1..={}",
                self.samples,
                self.capacity.saturating_add(1)
            )));
        }

        let mut seen = HashSet::with_capacity(self.map.len());
        for entry in self.map.values() {
            if entry.recency >= self.clock {
                return Err(InvariantError::new(format!(
                    "recency {} is not below clock {}",
                    entry.recency, self.clock
                )));
            }
            if !seen.insert(entry.recency) {
                return Err(InvariantError::new(format!(
                    "recency {} stamped on more than one entry",
                    entry.recency
                )));
            }
        }

        Ok(())
    }

    #[inline]
    fn tick(&mut self) -> u64 {
        let now = self.clock;
        self.clock = self.clock.wrapping_add(1);
        now
    }

    /// Evicts the oldest of `samples` entries when the table is exactly one
    /// over capacity.
    fn trim(&mut self) {
        if self.map.len().checked_sub(self.capacity) != Some(1) {
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let mut victim: Option<(&K, u64)> = None;
        for (key, entry) in self.map.iter().take(self.samples) {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_scan_step();

            match victim {
                Some((_, oldest)) if entry.recency >= oldest => {},
                _ => victim = Some((key, entry.recency)),
            }
        }

        let Some((key, _recency)) = victim.map(|(key, recency)| (key.clone(), recency)) else {
            return;
        };

        if self.map.remove(&key).is_some() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();

            #[cfg(feature = "tracing")]
            tracing::trace!(
                recency = _recency,
                clock = self.clock,
                len = self.map.len(),
                "evicted sampled entry"
            );
        }
    }
}

impl<K, V, S> fmt::Debug for SampledLruCore<K, V, S>
where
    V: ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampledLruCore")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .field("samples", &self.samples)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for SampledLruCore<K, V, RandomState>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
{
    /// Creates a cache with capacity 16 and the default sampling width.
    fn default() -> Self {
        Self::new(16, 0)
    }
}

impl<K, V, S> Extend<(K, Arc<V>)> for SampledLruCore<K, V, S>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, Arc<V>)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> ReadOnlyCache<K, Arc<V>> for SampledLruCore<K, V, S>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn contains(&self, key: &K) -> bool {
        SampledLruCore::contains(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V, S> CoreCache<K, Arc<V>> for SampledLruCore<K, V, S>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        SampledLruCore::insert(self, key, value)
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&Arc<V>> {
        SampledLruCore::get(self, key)
    }

    fn clear(&mut self) {
        SampledLruCore::clear(self);
    }
}

impl<K, V, S> MutableCache<K, Arc<V>> for SampledLruCore<K, V, S>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        SampledLruCore::remove(self, key)
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> SampledLruCore<K, V, S>
where
    V: ?Sized,
{
    pub fn metrics_snapshot(&self) -> SampledLruMetricsSnapshot {
        SampledLruMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            evict_scan_steps: self.metrics.evict_scan_steps,
            remove_calls: self.metrics.remove_calls,
            remove_found: self.metrics.remove_found,
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            contains_calls: self.metrics.contains_calls.get(),
            clear_calls: self.metrics.clear_calls,
            cache_len: self.map.len(),
            capacity: self.capacity,
            samples: self.samples,
            clock: self.clock,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> MetricsSnapshotProvider<SampledLruMetricsSnapshot> for SampledLruCore<K, V, S>
where
    V: ?Sized,
{
    fn snapshot(&self) -> SampledLruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> MetricsReset for SampledLruCore<K, V, S>
where
    V: ?Sized,
{
    fn reset_metrics(&mut self) {
        self.metrics.reset_metrics();
    }
}

// ---------------------------------------------------------------------------
// Concurrent wrapper
// ---------------------------------------------------------------------------

/// Thread-safe sampled LRU cache: one mutex around a [`SampledLruCore`].
///
/// Cloning is cheap and yields a handle to the same cache. Lookups return
/// `Arc<V>` clones so values outlive the lock guard.
///
/// # Example
///
/// ```
/// use std::thread;
/// use doccache::policy::sampled_lru::ConcurrentSampledLruCache;
///
/// let cache: ConcurrentSampledLruCache<u64, String> = ConcurrentSampledLruCache::new(64, 0);
///
/// let handles: Vec<_> = (0..4u64)
///     .map(|t| {
///         let cache = cache.clone();
///         thread::spawn(move || {
///             for i in 0..100u64 {
///                 cache.insert(t * 1000 + i, format!("doc-{}", i));
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(cache.len(), 64);
/// ```
#[cfg(feature = "concurrency")]
pub struct ConcurrentSampledLruCache<K, V: ?Sized, S = RandomState> {
    inner: Arc<Mutex<SampledLruCore<K, V, S>>>,
}

/// Document cache: `String` keys, shared byte-slice values.
///
/// # Example
///
/// ```
/// use doccache::policy::sampled_lru::DocumentCache;
///
/// let cache = DocumentCache::new(100, 0);
/// cache.insert_document("index.html", b"<html></html>".to_vec());
/// let doc = cache.get("index.html").unwrap();
/// assert_eq!(&*doc, b"<html></html>");
/// ```
#[cfg(feature = "concurrency")]
pub type DocumentCache = ConcurrentSampledLruCache<String, [u8]>;

#[cfg(feature = "concurrency")]
impl<K, V: ?Sized, S> Clone for ConcurrentSampledLruCache<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V: ?Sized, S> fmt::Debug for ConcurrentSampledLruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentSampledLruCache")
            .field("len", &cache.map.len())
            .field("capacity", &cache.capacity)
            .field("samples", &cache.samples)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> Default for ConcurrentSampledLruCache<K, V, RandomState>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
{
    /// Creates a cache with capacity 16 and the default sampling width.
    fn default() -> Self {
        Self::new(16, 0)
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentSampledLruCache<K, V, RandomState>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
{
    /// Creates a thread-safe cache; see [`SampledLruCore::new`].
    ///
    /// # Example
    ///
    /// ```
    /// use doccache::policy::sampled_lru::ConcurrentSampledLruCache;
    ///
    /// let cache: ConcurrentSampledLruCache<u32, String> = ConcurrentSampledLruCache::new(100, 0);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize, samples: usize) -> Self {
        Self::from_core(SampledLruCore::new(capacity, samples))
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, S> ConcurrentSampledLruCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
    S: BuildHasher,
{
    /// Creates a thread-safe cache with a caller-chosen hasher.
    pub fn with_hasher(capacity: usize, samples: usize, hash_builder: S) -> Self {
        Self::from_core(SampledLruCore::with_hasher(capacity, samples, hash_builder))
    }

    /// Wraps an existing core.
    pub fn from_core(core: SampledLruCore<K, V, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(core)),
        }
    }

    /// Inserts an already shared value.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use doccache::policy::sampled_lru::ConcurrentSampledLruCache;
    ///
    /// let cache: ConcurrentSampledLruCache<u32, str> = ConcurrentSampledLruCache::new(8, 0);
    /// let shared: Arc<str> = Arc::from("shared");
    /// cache.insert_arc(1, Arc::clone(&shared));
    ///
    /// assert!(Arc::ptr_eq(&shared, &cache.get(&1).unwrap()));
    /// ```
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let mut cache = self.inner.lock();
        cache.insert(key, value)
    }

    /// Looks up `key`, refreshing its recency. Ticks the clock on misses too.
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.inner.lock();
        cache.get(key).map(Arc::clone)
    }

    /// Reads without refreshing recency or ticking the clock.
    pub fn peek<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let cache = self.inner.lock();
        cache.peek(key).map(Arc::clone)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let cache = self.inner.lock();
        cache.contains(key)
    }

    /// Removes `key` if present.
    pub fn remove<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.inner.lock();
        cache.remove(key)
    }

    /// Flushes every entry and resets the clock.
    pub fn clear(&self) {
        let mut cache = self.inner.lock();
        cache.clear();
    }

    pub fn len(&self) -> usize {
        let cache = self.inner.lock();
        cache.len()
    }

    pub fn is_empty(&self) -> bool {
        let cache = self.inner.lock();
        cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        let cache = self.inner.lock();
        cache.capacity()
    }

    pub fn samples(&self) -> usize {
        let cache = self.inner.lock();
        cache.samples()
    }

    pub fn clock(&self) -> u64 {
        let cache = self.inner.lock();
        cache.clock()
    }

    pub fn recency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let cache = self.inner.lock();
        cache.recency(key)
    }

    /// See [`SampledLruCore::check_invariants`].
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let cache = self.inner.lock();
        cache.check_invariants()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, S> ConcurrentSampledLruCache<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Inserts a value, wrapping it in `Arc<V>` before taking the lock.
    ///
    /// # Example
    ///
    /// ```
    /// use doccache::policy::sampled_lru::ConcurrentSampledLruCache;
    ///
    /// let cache: ConcurrentSampledLruCache<u32, String> = ConcurrentSampledLruCache::new(100, 0);
    /// assert!(cache.insert(1, "first".to_string()).is_none());
    /// assert_eq!(*cache.insert(1, "updated".to_string()).unwrap(), "first");
    /// ```
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let value = Arc::new(value);
        let mut cache = self.inner.lock();
        cache.insert(key, value)
    }
}

#[cfg(feature = "concurrency")]
impl<S> ConcurrentSampledLruCache<String, [u8], S>
where
    S: BuildHasher,
{
    /// Stores a document under `key`.
    ///
    /// Accepts anything convertible into `Arc<[u8]>` (`Vec<u8>`, `&[u8]`,
    /// `Box<[u8]>`); the conversion happens before the lock is taken.
    pub fn insert_document(
        &self,
        key: impl Into<String>,
        document: impl Into<Arc<[u8]>>,
    ) -> Option<Arc<[u8]>> {
        let key = key.into();
        let document = document.into();
        let mut cache = self.inner.lock();
        cache.insert(key, document)
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, S> ConcurrentCache for ConcurrentSampledLruCache<K, V, S>
where
    K: Send,
    V: ?Sized + Send + Sync,
    S: Send,
{
}

#[cfg(all(feature = "metrics", feature = "concurrency"))]
impl<K, V, S> ConcurrentSampledLruCache<K, V, S>
where
    V: ?Sized,
{
    pub fn metrics_snapshot(&self) -> SampledLruMetricsSnapshot {
        let cache = self.inner.lock();
        cache.metrics_snapshot()
    }

    pub fn reset_metrics(&self) {
        let mut cache = self.inner.lock();
        cache.reset_metrics();
    }
}

#[cfg(all(feature = "metrics", feature = "concurrency"))]
impl<K, V, S> MetricsSnapshotProvider<SampledLruMetricsSnapshot>
    for ConcurrentSampledLruCache<K, V, S>
where
    V: ?Sized,
{
    fn snapshot(&self) -> SampledLruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(s: &str) -> Arc<[u8]> {
        Arc::from(s.as_bytes())
    }

    fn bytes(cache: &mut SampledLruCore<String, [u8]>, key: &str) -> Option<Vec<u8>> {
        cache.get(key).map(|v| v.to_vec())
    }

    // ==============================================
    // Construction
    // ==============================================

    mod construction {
        use super::*;

        #[test]
        fn zero_samples_selects_default() {
            let cache: SampledLruCore<String, [u8]> = SampledLruCore::new(100, 0);
            assert_eq!(cache.samples(), DEFAULT_SAMPLES);
            assert_eq!(cache.capacity(), 100);
            assert_eq!(cache.clock(), 0);
            assert!(cache.is_empty());
        }

        #[test]
        fn explicit_samples_are_kept() {
            let cache: SampledLruCore<u32, u32> = SampledLruCore::new(100, 12);
            assert_eq!(cache.samples(), 12);
        }

        #[test]
        fn samples_clamp_to_eviction_table_size() {
            assert_eq!(effective_samples(2, 5), 3);
            assert_eq!(effective_samples(2, 0), 3);
            assert_eq!(effective_samples(0, 0), 1);
            assert_eq!(effective_samples(4, 5), 5);
            assert_eq!(effective_samples(usize::MAX, 7), 7);
        }

        #[test]
        fn huge_capacity_does_not_preallocate_everything() {
            let cache: SampledLruCore<u64, u64> = SampledLruCore::new(usize::MAX, 0);
            assert_eq!(cache.capacity(), usize::MAX);
            assert_eq!(cache.samples(), DEFAULT_SAMPLES);
        }

        #[test]
        fn default_has_capacity_16() {
            let cache: SampledLruCore<u32, u32> = SampledLruCore::default();
            assert_eq!(cache.capacity(), 16);
            assert_eq!(cache.samples(), DEFAULT_SAMPLES);
        }

        #[test]
        fn debug_reports_shape_not_contents() {
            let mut cache: SampledLruCore<&str, str> = SampledLruCore::new(4, 0);
            cache.insert("secret", Arc::from("value"));
            let dbg = format!("{:?}", cache);
            assert!(dbg.contains("SampledLruCore"));
            assert!(dbg.contains("len: 1"));
            assert!(!dbg.contains("secret"));
        }
    }

    // ==============================================
    // Basic Operations
    // ==============================================

    mod basic_operations {
        use super::*;

        #[test]
        fn insert_then_get_returns_value() {
            let mut cache = SampledLruCore::new(2, 0);
            cache.insert("key1".to_string(), doc("hi"));

            assert_eq!(bytes(&mut cache, "key1"), Some(b"hi".to_vec()));
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn overwrite_keeps_count_and_replaces_value() {
            let mut cache = SampledLruCore::new(2, 0);
            cache.insert("key1".to_string(), doc("hi"));
            for next in ["bye", "hey", "goodbye"] {
                cache.insert("key1".to_string(), doc(next));
                assert_eq!(bytes(&mut cache, "key1"), Some(next.as_bytes().to_vec()));
                assert_eq!(cache.len(), 1);
            }
        }

        #[test]
        fn overwrite_returns_previous_value() {
            let mut cache = SampledLruCore::new(4, 0);
            assert!(cache.insert("k".to_string(), doc("v1")).is_none());
            let old = cache.insert("k".to_string(), doc("v2")).unwrap();
            assert_eq!(&*old, b"v1");
        }

        #[test]
        fn remove_makes_key_absent() {
            let mut cache = SampledLruCore::new(2, 0);
            cache.insert("key1".to_string(), doc("hi"));

            let removed = cache.remove("key1").unwrap();
            assert_eq!(&*removed, b"hi");
            assert_eq!(bytes(&mut cache, "key1"), None);
            assert_eq!(cache.len(), 0);

            // Second remove is a no-op
            assert!(cache.remove("key1").is_none());
            assert_eq!(cache.len(), 0);
        }

        #[test]
        fn remove_does_not_tick_clock() {
            let mut cache = SampledLruCore::new(4, 0);
            cache.insert("a".to_string(), doc("1"));
            let before = cache.clock();
            cache.remove("a");
            cache.remove("missing");
            assert_eq!(cache.clock(), before);
        }

        #[test]
        fn peek_and_contains_do_not_tick_clock() {
            let mut cache = SampledLruCore::new(4, 0);
            cache.insert("a".to_string(), doc("1"));
            let recency = cache.recency("a");

            assert_eq!(cache.peek("a").map(|v| v.to_vec()), Some(b"1".to_vec()));
            assert!(cache.peek("missing").is_none());
            assert!(cache.contains("a"));
            assert!(!cache.contains("missing"));

            assert_eq!(cache.clock(), 1);
            assert_eq!(cache.recency("a"), recency);
        }

        #[test]
        fn extend_inserts_in_order() {
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(2, 0);
            cache.extend((0..3u32).map(|i| (i, Arc::new(i * 10))));

            assert_eq!(cache.len(), 2);
            assert!(!cache.contains(&0));
            assert_eq!(cache.peek(&2).map(|v| **v), Some(20));
        }
    }

    // ==============================================
    // Logical Clock
    // ==============================================

    mod logical_clock {
        use super::*;

        #[test]
        fn insert_stamps_then_advances() {
            let mut cache = SampledLruCore::new(4, 0);
            cache.insert("a".to_string(), doc("1"));
            cache.insert("b".to_string(), doc("2"));

            assert_eq!(cache.recency("a"), Some(0));
            assert_eq!(cache.recency("b"), Some(1));
            assert_eq!(cache.clock(), 2);
        }

        #[test]
        fn hit_restamps_entry() {
            let mut cache = SampledLruCore::new(4, 0);
            cache.insert("a".to_string(), doc("1"));
            cache.insert("b".to_string(), doc("2"));
            cache.get("a");

            assert_eq!(cache.recency("a"), Some(2));
            assert_eq!(cache.clock(), 3);
        }

        #[test]
        fn miss_still_consumes_tick() {
            let mut cache = SampledLruCore::new(4, 0);
            cache.insert("a".to_string(), doc("1"));
            cache.insert("b".to_string(), doc("2"));

            for _ in 0..10 {
                assert!(cache.get("nope").is_none());
            }

            assert_eq!(cache.clock(), 12);
            // Relative order of the stored entries is unchanged
            assert!(cache.recency("a") < cache.recency("b"));

            cache.insert("c".to_string(), doc("3"));
            assert_eq!(cache.recency("c"), Some(12));
        }

        #[test]
        fn overwrite_restamps_entry() {
            let mut cache = SampledLruCore::new(4, 0);
            cache.insert("a".to_string(), doc("1"));
            cache.insert("b".to_string(), doc("2"));
            cache.insert("a".to_string(), doc("3"));

            assert_eq!(cache.recency("a"), Some(2));
            assert!(cache.recency("b") < cache.recency("a"));
        }

        #[test]
        fn clear_resets_clock_and_len() {
            let mut cache = SampledLruCore::new(4, 0);
            cache.insert("a".to_string(), doc("1"));
            cache.get("a");
            cache.get("zzz");

            cache.clear();
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.clock(), 0);

            cache.insert("b".to_string(), doc("2"));
            assert_eq!(cache.recency("b"), Some(0));
            assert_eq!(cache.clock(), 1);
        }
    }

    // ==============================================
    // Sampled Eviction
    // ==============================================

    mod eviction_behavior {
        use super::*;

        #[test]
        fn touched_entry_survives_small_cache() {
            let mut cache = SampledLruCore::new(2, 5);
            cache.insert("key".to_string(), doc("doc0"));
            cache.insert("key1".to_string(), doc("doc1"));
            cache.insert("key2".to_string(), doc("doc2"));

            assert_eq!(bytes(&mut cache, "key"), None);
            assert_eq!(cache.len(), 2);

            cache.insert("key3".to_string(), doc("doc3"));
            assert_eq!(bytes(&mut cache, "key1"), None);
            assert_eq!(cache.len(), 2);

            cache.get("key2");
            cache.insert("key4".to_string(), doc("doc4"));
            assert_eq!(bytes(&mut cache, "key3"), None);
            assert_eq!(cache.len(), 2);
            assert!(bytes(&mut cache, "key2").is_some());
        }

        #[test]
        fn len_tracks_min_of_inserts_and_capacity() {
            let mut cache = SampledLruCore::new(100, 0);
            for i in 0..1000usize {
                let key = i.to_string();
                cache.insert(key.clone(), doc(&format!("A{}", key)));
                assert_eq!(cache.len(), (i + 1).min(100));
            }
        }

        #[test]
        fn full_width_sample_is_exact_lru() {
            // samples >= capacity + 1 inspects the whole table on every pass
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(4, 10);
            for i in 0..4 {
                cache.insert(i, Arc::new(i));
            }
            cache.get(&0);
            cache.get(&1);

            cache.insert(4, Arc::new(4));
            assert!(!cache.contains(&2));
            cache.insert(5, Arc::new(5));
            assert!(!cache.contains(&3));
            assert!(cache.contains(&0));
            assert!(cache.contains(&1));
        }

        #[test]
        fn victim_is_oldest_within_sample() {
            // The victim is the minimum of `samples` entries, so at most
            // `len - samples` entries of the overfull table can be older.
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(8, 3);
            for i in 0..8 {
                cache.insert(i, Arc::new(i));
            }

            for key in 8..200u32 {
                let before: Vec<(u32, u64)> =
                    cache.map.iter().map(|(k, e)| (*k, e.recency)).collect();
                cache.insert(key, Arc::new(key));

                let evicted: Vec<&(u32, u64)> = before
                    .iter()
                    .filter(|(k, _)| !cache.contains(k))
                    .collect();
                assert_eq!(evicted.len(), 1);
                let victim_recency = evicted[0].1;

                let older = before.iter().filter(|(_, r)| *r < victim_recency).count();
                assert!(older <= before.len() + 1 - cache.samples());
                assert!(cache.contains(&key));
            }
        }

        #[test]
        fn overwrite_never_evicts() {
            let mut cache = SampledLruCore::new(2, 0);
            cache.insert("a".to_string(), doc("1"));
            cache.insert("b".to_string(), doc("2"));
            for _ in 0..10 {
                cache.insert("a".to_string(), doc("x"));
                cache.insert("b".to_string(), doc("y"));
            }
            assert_eq!(cache.len(), 2);
            assert!(cache.contains("a"));
            assert!(cache.contains("b"));
        }

        #[test]
        fn zero_capacity_evicts_every_insert() {
            let mut cache = SampledLruCore::new(0, 0);
            assert_eq!(cache.samples(), 1);

            cache.insert("a".to_string(), doc("1"));
            assert_eq!(cache.len(), 0);
            cache.insert("b".to_string(), doc("2"));
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.clock(), 2);
        }

        #[test]
        fn single_capacity_keeps_newest() {
            let mut cache = SampledLruCore::new(1, 0);
            cache.insert("a".to_string(), doc("1"));
            cache.insert("b".to_string(), doc("2"));

            assert_eq!(cache.len(), 1);
            assert!(cache.contains("b"));
        }

        #[test]
        fn overshoot_beyond_one_is_not_converged() {
            // A table already more than one entry over capacity is outside
            // what the single-step trigger handles: no eviction fires.
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(2, 0);
            for i in 0..4u32 {
                let recency = cache.tick();
                cache.map.insert(
                    i,
                    Entry {
                        recency,
                        value: Arc::new(i),
                    },
                );
            }
            assert_eq!(cache.len(), 4);

            cache.insert(10, Arc::new(10));
            assert_eq!(cache.len(), 5);
            assert!(cache.check_invariants().is_err());
        }
    }

    // ==============================================
    // Invariants
    // ==============================================

    mod invariants {
        use super::*;

        #[test]
        fn hold_across_mixed_operations() {
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(10, 0);
            for i in 0..200u32 {
                cache.insert(i % 37, Arc::new(i));
                cache.get(&(i % 13));
                if i % 7 == 0 {
                    cache.remove(&(i % 11));
                }
                cache.check_invariants().unwrap();
            }
            cache.clear();
            cache.check_invariants().unwrap();
        }

        #[test]
        fn detect_future_recency() {
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(10, 0);
            cache.insert(1, Arc::new(1));
            cache.map.get_mut(&1).unwrap().recency = 99;

            let err = cache.check_invariants().unwrap_err();
            assert!(err.message().contains("clock"));
        }

        #[test]
        fn detect_duplicate_recency() {
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(10, 0);
            cache.insert(1, Arc::new(1));
            cache.insert(2, Arc::new(2));
            cache.map.get_mut(&2).unwrap().recency = 0;

            let err = cache.check_invariants().unwrap_err();
            assert!(err.message().contains("more than one"));
        }
    }

    // ==============================================
    // Trait Surface
    // ==============================================

    mod trait_surface {
        use super::*;

        fn fill<C: CoreCache<u32, Arc<u32>>>(cache: &mut C, n: u32) {
            for i in 0..n {
                cache.insert(i, Arc::new(i));
            }
        }

        #[test]
        fn core_cache_bounds_len() {
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(5, 0);
            fill(&mut cache, 20);
            assert_eq!(ReadOnlyCache::len(&cache), 5);
            assert_eq!(ReadOnlyCache::capacity(&cache), 5);
        }

        #[test]
        fn mutable_cache_remove_batch() {
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(10, 0);
            fill(&mut cache, 3);
            let removed = cache.remove_batch(&[0, 7, 2]);
            assert_eq!(removed.len(), 3);
            assert!(removed[1].is_none());
            assert_eq!(cache.len(), 1);
        }
    }

    // ==============================================
    // Concurrent Wrapper
    // ==============================================

    #[cfg(feature = "concurrency")]
    mod concurrent {
        use super::*;

        #[test]
        fn clones_share_state() {
            let a: ConcurrentSampledLruCache<u32, String> = ConcurrentSampledLruCache::new(4, 0);
            let b = a.clone();
            a.insert(1, "one".to_string());
            assert_eq!(b.get(&1).as_deref().map(String::as_str), Some("one"));
            assert_eq!(b.len(), 1);
        }

        #[test]
        fn document_cache_accepts_byte_sources() {
            let cache = DocumentCache::new(4, 0);
            cache.insert_document("vec", b"from vec".to_vec());
            cache.insert_document("slice", b"from slice".as_slice());
            cache.insert_document(String::from("boxed"), b"boxed".to_vec().into_boxed_slice());

            assert_eq!(&*cache.get("vec").unwrap(), b"from vec");
            assert_eq!(&*cache.get("slice").unwrap(), b"from slice");
            assert_eq!(&*cache.get("boxed").unwrap(), b"boxed");
        }

        #[test]
        fn values_outlive_eviction() {
            let cache = DocumentCache::new(1, 0);
            cache.insert_document("a", b"alpha".to_vec());
            let held = cache.get("a").unwrap();
            cache.insert_document("b", b"beta".to_vec());

            assert!(!cache.contains("a"));
            assert_eq!(&*held, b"alpha");
        }

        #[test]
        fn clear_resets_clock() {
            let cache = DocumentCache::new(4, 0);
            cache.insert_document("a", b"1".to_vec());
            cache.get("a");
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.clock(), 0);
        }

        #[test]
        fn is_concurrent_cache() {
            fn assert_concurrent<C: ConcurrentCache>() {}
            assert_concurrent::<DocumentCache>();
            assert_concurrent::<ConcurrentSampledLruCache<u64, String>>();
        }
    }

    // ==============================================
    // Metrics
    // ==============================================

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn counters_follow_operations() {
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(2, 0);
            cache.insert(1, Arc::new(1));
            cache.insert(2, Arc::new(2));
            cache.insert(2, Arc::new(20));
            cache.insert(3, Arc::new(3));
            cache.get(&3);
            cache.get(&99);
            cache.peek(&3);
            cache.remove(&3);

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.insert_calls, 4);
            assert_eq!(snap.insert_new, 3);
            assert_eq!(snap.insert_updates, 1);
            assert_eq!(snap.evict_calls, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.evict_scan_steps, 3);
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
            assert_eq!(snap.peek_calls, 1);
            assert_eq!(snap.peek_found, 1);
            assert_eq!(snap.remove_found, 1);
            assert_eq!(snap.cache_len, 1);
            assert_eq!(snap.clock, 6);
        }

        #[test]
        fn reset_clears_counters() {
            let mut cache: SampledLruCore<u32, u32> = SampledLruCore::new(2, 0);
            cache.insert(1, Arc::new(1));
            cache.reset_metrics();
            let snap = cache.snapshot();
            assert_eq!(snap.insert_calls, 0);
            assert_eq!(snap.cache_len, 1);
        }
    }
}
