use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Global metrics instance.
pub static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Metrics collector for the ledger core.
#[derive(Debug, Clone)]
pub struct Metrics {
    initialized: bool,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self { initialized: true }
    }

    pub fn record_entry_recorded(&self, entry_type: &str, status: &str) {
        counter!("ledger_entries_total", "type" => entry_type.to_string(), "status" => status.to_string()).increment(1);
    }

    pub fn record_entry_failed(&self, entry_type: &str, reason: &str) {
        counter!("ledger_entries_failed_total", "type" => entry_type.to_string(), "reason" => reason.to_string()).increment(1);
    }

    pub fn record_entry_cancelled(&self, entry_type: &str) {
        counter!("ledger_entries_cancelled_total", "type" => entry_type.to_string()).increment(1);
    }

    pub fn record_reference_collision(&self) {
        counter!("ledger_reference_collisions_total").increment(1);
    }

    pub fn record_ledger_write_latency(&self, duration_ms: f64) {
        histogram!("ledger_write_duration_ms").record(duration_ms);
    }

    pub fn record_search_latency(&self, duration_ms: f64) {
        histogram!("ledger_search_duration_ms").record(duration_ms);
    }

    pub fn record_collaborator_call(&self, service: &str, success: bool) {
        counter!("ledger_collaborator_calls_total", "service" => service.to_string(), "success" => success.to_string()).increment(1);
    }
}

/// Timer for measuring operation latency.
pub struct LatencyTimer {
    start: Instant,
}

impl LatencyTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for LatencyTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Initializes the metrics system and returns the Prometheus handle.
pub fn init_metrics() -> PrometheusHandle {
    let handle = METRICS_HANDLE.get_or_init(|| {
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        describe_metrics();
        handle
    });

    METRICS.get_or_init(Metrics::new);

    handle.clone()
}

/// Describes all metrics for Prometheus.
fn describe_metrics() {
    describe_counter!("ledger_entries_total", Unit::Count, "Total number of ledger entries recorded");
    describe_counter!("ledger_entries_failed_total", Unit::Count, "Total number of entries marked failed");
    describe_counter!("ledger_entries_cancelled_total", Unit::Count, "Total number of entries cancelled");
    describe_counter!("ledger_reference_collisions_total", Unit::Count, "Total number of reference collisions during generation");

    describe_histogram!("ledger_write_duration_ms", Unit::Milliseconds, "Ledger write latency in milliseconds");
    describe_histogram!("ledger_search_duration_ms", Unit::Milliseconds, "Ledger search latency in milliseconds");

    describe_counter!("ledger_collaborator_calls_total", Unit::Count, "Total calls to collaborating services");
}

/// Returns the global metrics instance.
pub fn get_metrics() -> &'static Metrics {
    METRICS.get_or_init(Metrics::new)
}
