//! Prometheus metrics registry for the alerting configuration service.
//!
//! [`AppMetrics`] owns all registered metrics and the [`Registry`] they
//! belong to. Construct it once at startup, wrap in `Arc`, and share it
//! with the HTTP handlers and middleware.
//!
//! Exposed at `GET /metrics` in Prometheus text exposition format
//! (`text/plain; version=0.0.4`).

use prometheus::{Counter, CounterVec, Opts, Registry};

use crate::alerting::{Backend, ValidationError};

/// All application-level Prometheus metrics.
pub struct AppMetrics {
    /// Documents that decoded and validated, labelled by backend.
    pub documents_accepted_total: CounterVec,
    /// Documents rejected, labelled by rejection reason.
    pub documents_rejected_total: CounterVec,
    /// HTTP request count, labelled by method and status code.
    pub http_requests_total: CounterVec,
    /// Configurations removed via `DELETE`.
    pub documents_deleted_total: Counter,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AppMetrics {
    /// Create and register all metrics. Returns an error if any metric
    /// name is invalid or duplicated.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let documents_accepted_total = CounterVec::new(
            Opts::new(
                "alerting_config_documents_accepted_total",
                "Alerting configuration documents accepted",
            ),
            &["backend"],
        )?;

        let documents_rejected_total = CounterVec::new(
            Opts::new(
                "alerting_config_documents_rejected_total",
                "Alerting configuration documents rejected",
            ),
            &["reason"],
        )?;

        let http_requests_total = CounterVec::new(
            Opts::new(
                "alerting_config_http_requests_total",
                "HTTP requests by method and status",
            ),
            &["method", "status"],
        )?;

        let documents_deleted_total = Counter::with_opts(Opts::new(
            "alerting_config_documents_deleted_total",
            "Alerting configuration documents deleted",
        ))?;

        registry.register(Box::new(documents_accepted_total.clone()))?;
        registry.register(Box::new(documents_rejected_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(documents_deleted_total.clone()))?;

        Ok(Self {
            documents_accepted_total,
            documents_rejected_total,
            http_requests_total,
            documents_deleted_total,
            registry,
        })
    }

    pub fn record_accepted(&self, backend: Backend) {
        let label = match backend {
            Backend::Grafana => "grafana",
            Backend::Alertmanager => "alertmanager",
            Backend::Undetermined => "undetermined",
        };
        self.documents_accepted_total.with_label_values(&[label]).inc();
    }

    pub fn record_rejected(&self, err: &ValidationError) {
        self.documents_rejected_total
            .with_label_values(&[err.reason()])
            .inc();
    }

    /// Render all metrics as Prometheus text format (for the `/metrics` endpoint).
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}
