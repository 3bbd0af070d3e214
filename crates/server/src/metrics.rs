//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the orchestrator server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Ticket counts per status (collected dynamically)
//! - Telemetry stream totals (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

use ren_core::TicketStatus;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "ren_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ren_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "ren_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Ticket Metrics (collected dynamically)
// =============================================================================

/// Tickets by current status.
pub static TICKETS_BY_STATUS: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("ren_tickets_by_status", "Current ticket count by status"),
        &["status"],
    )
    .unwrap()
});

// =============================================================================
// Telemetry Metrics (collected dynamically)
// =============================================================================

/// Records emitted into the telemetry sink since startup.
pub static TELEMETRY_RECORDS: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "ren_telemetry_records",
            "Telemetry records emitted since startup",
        ),
        &["kind"], // "metric", "event"
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Tickets
    registry
        .register(Box::new(TICKETS_BY_STATUS.clone()))
        .unwrap();

    // Telemetry
    registry
        .register(Box::new(TELEMETRY_RECORDS.clone()))
        .unwrap();

    // Core metrics (ticket creation, executions)
    for metric in ren_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the store and telemetry sink
/// at scrape time.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(counts) = state.orchestrator().status_counts() {
        for status in TicketStatus::ALL {
            TICKETS_BY_STATUS
                .with_label_values(&[status.as_str()])
                .set(counts.get(status) as i64);
        }
    }

    let telemetry = state.telemetry();
    TELEMETRY_RECORDS
        .with_label_values(&["metric"])
        .set(telemetry.recent_metrics().count as i64);
    TELEMETRY_RECORDS
        .with_label_values(&["event"])
        .set(telemetry.recent_events().count as i64);
}

/// Route label for requests that reached no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics().unwrap();
        assert!(output.contains("ren_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        ren_core::metrics::TICKETS_CREATED
            .with_label_values(&["scan"])
            .inc();
        TICKETS_BY_STATUS.with_label_values(&["pending"]).set(0);

        let output = encode_metrics().unwrap();
        assert!(output.contains("ren_tickets_created_total"));
        assert!(output.contains("ren_tickets_by_status"));
    }
}
