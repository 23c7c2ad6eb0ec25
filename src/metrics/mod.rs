// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Catalog operations by outcome, bulk import row acceptance
// - Order submissions, status transitions and failures by error kind
// - Analytics report computation latency
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Catalog Metrics
    pub catalog_operations: IntCounterVec,
    pub import_rows: IntCounterVec,

    // Order Metrics
    pub orders_submitted: IntCounterVec,
    pub status_transitions: IntCounterVec,
    pub order_failures: IntCounterVec,

    // Analytics Metrics
    pub analytics_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        // Catalog Metrics
        let catalog_operations = IntCounterVec::new(
            Opts::new("catalog_operations_total", "Menu catalog operations"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(catalog_operations.clone()))?;

        let import_rows = IntCounterVec::new(
            Opts::new("catalog_import_rows_total", "Bulk import rows by validation outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(import_rows.clone()))?;

        // Order Metrics
        let orders_submitted = IntCounterVec::new(
            Opts::new("orders_submitted_total", "Orders accepted at submission"),
            &["order_type"],
        )?;
        registry.register(Box::new(orders_submitted.clone()))?;

        let status_transitions = IntCounterVec::new(
            Opts::new("order_status_transitions_total", "Order status changes by target status"),
            &["status"],
        )?;
        registry.register(Box::new(status_transitions.clone()))?;

        let order_failures = IntCounterVec::new(
            Opts::new("order_failures_total", "Rejected or failed order operations"),
            &["operation", "kind"],
        )?;
        registry.register(Box::new(order_failures.clone()))?;

        // Analytics Metrics
        let analytics_duration = HistogramVec::new(
            HistogramOpts::new("analytics_report_duration_seconds", "Analytics report computation duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["window"],
        )?;
        registry.register(Box::new(analytics_duration.clone()))?;

        Ok(Self {
            registry,
            catalog_operations,
            import_rows,
            orders_submitted,
            status_transitions,
            order_failures,
            analytics_duration,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_catalog_operation(&self, operation: &str, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.catalog_operations.with_label_values(&[operation, outcome]).inc();
    }

    /// Helper to record how many import rows were accepted and rejected
    pub fn record_import_rows(&self, accepted: usize, rejected: usize) {
        self.import_rows.with_label_values(&["accepted"]).inc_by(accepted as u64);
        self.import_rows.with_label_values(&["rejected"]).inc_by(rejected as u64);
    }

    pub fn record_order_submitted(&self, order_type: &str) {
        self.orders_submitted.with_label_values(&[order_type]).inc();
    }

    pub fn record_status_transition(&self, status: &str) {
        self.status_transitions.with_label_values(&[status]).inc();
    }

    pub fn record_order_failure(&self, operation: &str, kind: &str) {
        self.order_failures.with_label_values(&[operation, kind]).inc();
    }

    pub fn record_analytics_report(&self, window: &str, duration_secs: f64) {
        self.analytics_duration.with_label_values(&[window]).observe(duration_secs);
    }
}
