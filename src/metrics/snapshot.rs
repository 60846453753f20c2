/// Point-in-time copy of a sampled LRU cache's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SampledLruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub evict_scan_steps: u64, // candidates inspected across all eviction passes

    pub remove_calls: u64,
    pub remove_found: u64,

    pub peek_calls: u64,
    pub peek_found: u64,
    pub contains_calls: u64,

    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
    pub samples: usize,
    pub clock: u64,
}

impl SampledLruMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before the first call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }

    /// Mean candidates inspected per eviction pass.
    pub fn mean_scan_width(&self) -> f64 {
        if self.evict_calls == 0 {
            0.0
        } else {
            self.evict_scan_steps as f64 / self.evict_calls as f64
        }
    }
}
