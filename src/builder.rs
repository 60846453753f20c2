//! Builder for sampled LRU caches.
//!
//! The plain constructors accept any capacity and sampling width, the way
//! the cache has always behaved. The builder adds an opt-in strict mode for
//! configuration that comes from users rather than code.
//!
//! ## Example
//!
//! ```rust
//! use doccache::builder::SampledLruBuilder;
//!
//! let cache = SampledLruBuilder::new(100)
//!     .samples(8)
//!     .build::<String, [u8]>();
//! cache.insert_document("a", b"alpha".to_vec());
//! assert_eq!(cache.samples(), 8);
//! ```

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use crate::error::ConfigError;
#[cfg(feature = "concurrency")]
use crate::policy::sampled_lru::ConcurrentSampledLruCache;
use crate::policy::sampled_lru::SampledLruCore;

/// Configures and creates [`SampledLruCore`] or
/// [`ConcurrentSampledLruCache`] instances.
#[derive(Debug, Clone)]
pub struct SampledLruBuilder<S = RandomState> {
    capacity: usize,
    samples: usize,
    strict: bool,
    hash_builder: S,
}

impl SampledLruBuilder<RandomState> {
    /// Create a new builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: 0,
            strict: false,
            hash_builder: RandomState::new(),
        }
    }
}

impl<S> SampledLruBuilder<S>
where
    S: BuildHasher,
{
    /// Entries inspected per eviction pass. `0` keeps the default.
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Reject configurations the plain constructors would silently accept.
    ///
    /// In strict mode `try_build*` fails on a zero capacity and on a sampling
    /// width wider than `capacity + 1` instead of clamping it.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Use a different hasher for the table.
    ///
    /// ```rust
    /// use doccache::builder::SampledLruBuilder;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let core = SampledLruBuilder::new(10)
    ///     .hasher(RandomState::new())
    ///     .build_core::<u64, u64>();
    /// assert_eq!(core.capacity(), 10);
    /// ```
    pub fn hasher<S2: BuildHasher>(self, hash_builder: S2) -> SampledLruBuilder<S2> {
        SampledLruBuilder {
            capacity: self.capacity,
            samples: self.samples,
            strict: self.strict,
            hash_builder,
        }
    }

    /// Build a single-threaded core. Never fails; see [`strict`](Self::strict).
    pub fn build_core<K, V>(self) -> SampledLruCore<K, V, S>
    where
        K: Eq + Hash + Clone,
        V: ?Sized,
    {
        SampledLruCore::with_hasher(self.capacity, self.samples, self.hash_builder)
    }

    /// Build a single-threaded core, validating first in strict mode.
    pub fn try_build_core<K, V>(self) -> Result<SampledLruCore<K, V, S>, ConfigError>
    where
        K: Eq + Hash + Clone,
        V: ?Sized,
    {
        self.validate()?;
        Ok(self.build_core())
    }

    /// Build a thread-safe cache.
    #[cfg(feature = "concurrency")]
    pub fn build<K, V>(self) -> ConcurrentSampledLruCache<K, V, S>
    where
        K: Eq + Hash + Clone,
        V: ?Sized,
    {
        ConcurrentSampledLruCache::from_core(self.build_core())
    }

    /// Build a thread-safe cache, validating first in strict mode.
    #[cfg(feature = "concurrency")]
    pub fn try_build<K, V>(self) -> Result<ConcurrentSampledLruCache<K, V, S>, ConfigError>
    where
        K: Eq + Hash + Clone,
        V: ?Sized,
    {
        self.validate()?;
        Ok(self.build())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.strict {
            return Ok(());
        }
        if self.capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        if self.samples > self.capacity.saturating_add(1) {
            return Err(ConfigError::new(format!(
                "samples ({}) must not exceed capacity + 1 ({})",
                self.samples,
                self.capacity.saturating_add(1)
            )));
        }
        Ok(())
    }
}
