//! Prometheus Metrics Registry - Service Observability
//!
//! Registers request, latency and catalog-attempt metrics and renders
//! them in the Prometheus text format for the `/metrics` route.

use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Centralized Prometheus metrics for the inventory service.
///
/// All metrics follow the naming convention `inventario_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Requests served, by operation and HTTP status.
    pub requests_total: IntCounterVec,
    /// Request latency in seconds, by operation.
    pub request_duration: HistogramVec,
    /// Catalog lookup attempts, by outcome (success, failure, exhausted).
    pub catalog_attempts: IntCounterVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("inventario_requests_total", "Inventory requests served"),
            &["operation", "status"],
        )?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "inventario_request_duration_seconds",
                "Inventory request latency in seconds",
            )
            .buckets(vec![0.005, 0.025, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["operation"],
        )?;

        let catalog_attempts = IntCounterVec::new(
            Opts::new(
                "inventario_catalog_attempts_total",
                "Product catalog lookup attempts",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(catalog_attempts.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
            catalog_attempts,
        })
    }

    /// Record one finished request.
    pub fn observe_request(&self, operation: &str, status: u16, elapsed: Duration) {
        let status = status.to_string();
        self.requests_total
            .with_label_values(&[operation, status.as_str()])
            .inc();
        self.request_duration
            .with_label_values(&[operation])
            .observe(elapsed.as_secs_f64());
    }

    /// Record one catalog attempt outcome.
    pub fn observe_catalog_attempt(&self, outcome: &str) {
        self.catalog_attempts.with_label_values(&[outcome]).inc();
    }

    /// Encode all metric families in the text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
