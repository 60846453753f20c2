pub use crate::builder::SampledLruBuilder;
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::SampledLruMetricsSnapshot;
pub use crate::policy::sampled_lru::{SampledLruCore, DEFAULT_SAMPLES};
#[cfg(feature = "concurrency")]
pub use crate::policy::sampled_lru::{ConcurrentSampledLruCache, DocumentCache};
pub use crate::traits::{ConcurrentCache, CoreCache, MutableCache, ReadOnlyCache};
