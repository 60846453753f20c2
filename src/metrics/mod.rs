//! Per-instance cache metrics (enabled by the `metrics` feature).
//!
//! Recording, snapshotting and exporting are split into separate traits so
//! the cache only ever writes counters; readers take a
//! [`SampledLruMetricsSnapshot`](snapshot::SampledLruMetricsSnapshot) and
//! hand it to an exporter.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
