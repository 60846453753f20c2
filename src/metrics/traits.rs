//! # Metrics Trait Hierarchy
//!
//! ```text
//!            ┌─────────────────────────────┐
//!            │     CoreMetricsRecorder     │
//!            │  get_hit/get_miss/insert    │
//!            │  evict/clear                │
//!            └──────────────┬──────────────┘
//!                           │
//!            ┌──────────────▼──────────────┐      ┌──────────────────────────────┐
//!            │  SampledLruMetricsRecorder  │      │ SampledLruMetricsReadRecorder│
//!            │  scan steps / remove        │      │ peek / contains (&self)      │
//!            └─────────────────────────────┘      └──────────────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! Recorders only write counters, providers only read them, exporters only
//! publish snapshots.

/// Common counters for any cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Counters specific to sampled eviction.
pub trait SampledLruMetricsRecorder: CoreMetricsRecorder {
    /// One candidate inspected during an eviction pass.
    fn record_evict_scan_step(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
}

/// Read-only counters for `&self` methods (uses interior mutability).
pub trait SampledLruMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
    fn record_contains_call(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
