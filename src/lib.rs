//! doccache: a bounded, thread-safe document cache with sampled
//! approximate-LRU eviction.
//!
//! The cache keeps a logical clock instead of a recency list. Inserts and
//! lookups stamp entries with the clock; when an insert overflows capacity,
//! a few entries are sampled and the oldest of them is evicted.
//!
//! ```
//! use doccache::prelude::*;
//!
//! let cache = DocumentCache::new(1024, DEFAULT_SAMPLES);
//! cache.insert_document("greeting", b"hello".to_vec());
//! assert_eq!(&*cache.get("greeting").unwrap(), b"hello");
//! ```
//!
//! See `DESIGN.md` for the module map and design decisions.

pub mod builder;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
