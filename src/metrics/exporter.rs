use std::io::Write;

use parking_lot::Mutex;

use crate::metrics::snapshot::SampledLruMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be served
/// from a scrape endpoint or forwarded to an OpenTelemetry collector. Write
/// errors are dropped: metrics are observational.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", suffix, value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", suffix, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<SampledLruMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &SampledLruMetricsSnapshot) {
        self.write_counter("get_calls_total", snapshot.get_calls);
        self.write_counter("get_hits_total", snapshot.get_hits);
        self.write_counter("get_misses_total", snapshot.get_misses);
        self.write_counter("insert_calls_total", snapshot.insert_calls);
        self.write_counter("insert_updates_total", snapshot.insert_updates);
        self.write_counter("insert_new_total", snapshot.insert_new);
        self.write_counter("evict_calls_total", snapshot.evict_calls);
        self.write_counter("evicted_entries_total", snapshot.evicted_entries);
        self.write_counter("evict_scan_steps_total", snapshot.evict_scan_steps);
        self.write_counter("remove_calls_total", snapshot.remove_calls);
        self.write_counter("remove_found_total", snapshot.remove_found);
        self.write_counter("peek_calls_total", snapshot.peek_calls);
        self.write_counter("peek_found_total", snapshot.peek_found);
        self.write_counter("contains_calls_total", snapshot.contains_calls);
        self.write_counter("clear_calls_total", snapshot.clear_calls);
        self.write_gauge("cache_len", snapshot.cache_len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
        self.write_gauge("samples", snapshot.samples as u64);
        self.write_gauge("clock", snapshot.clock);
    }
}

/// Exporter that emits each snapshot as one structured `tracing` event.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone)]
pub struct TracingExporter {
    cache_name: String,
}

#[cfg(feature = "tracing")]
impl TracingExporter {
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
        }
    }
}

#[cfg(feature = "tracing")]
impl MetricsExporter<SampledLruMetricsSnapshot> for TracingExporter {
    fn export(&self, snapshot: &SampledLruMetricsSnapshot) {
        tracing::info!(
            cache = %self.cache_name,
            len = snapshot.cache_len,
            capacity = snapshot.capacity,
            samples = snapshot.samples,
            clock = snapshot.clock,
            hits = snapshot.get_hits,
            misses = snapshot.get_misses,
            hit_rate = snapshot.hit_rate(),
            evictions = snapshot.evicted_entries,
            mean_scan_width = snapshot.mean_scan_width(),
            "cache metrics report"
        );
    }
}
