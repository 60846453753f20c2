use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{
    CoreMetricsRecorder, MetricsReset, SampledLruMetricsReadRecorder, SampledLruMetricsRecorder,
};

/// Counters owned by a single
/// [`SampledLruCore`](crate::policy::sampled_lru::SampledLruCore).
#[derive(Debug, Default)]
pub struct SampledLruMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub evict_scan_steps: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub clear_calls: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
    pub contains_calls: MetricsCell,
}

impl SampledLruMetrics {
    pub fn new() -> SampledLruMetrics {
        SampledLruMetrics::default()
    }
}

impl CoreMetricsRecorder for SampledLruMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl SampledLruMetricsRecorder for SampledLruMetrics {
    fn record_evict_scan_step(&mut self) {
        self.evict_scan_steps += 1;
    }

    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }
}

impl SampledLruMetricsReadRecorder for &SampledLruMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }

    fn record_contains_call(&self) {
        self.contains_calls.incr();
    }
}

impl MetricsReset for SampledLruMetrics {
    fn reset_metrics(&mut self) {
        *self = SampledLruMetrics::default();
    }
}
