//! Eviction policies.

pub mod sampled_lru;
