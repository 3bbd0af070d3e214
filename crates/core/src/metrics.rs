//! Prometheus metrics for core components.
//!
//! These mirror the in-process telemetry stream as long-lived counters and
//! histograms so they survive the telemetry retention window.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Ticket Metrics
// =============================================================================

/// Tickets created total by command.
pub static TICKETS_CREATED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ren_tickets_created_total", "Total tickets created"),
        &["command"],
    )
    .unwrap()
});

/// Tickets cancelled total.
pub static TICKETS_CANCELLED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ren_tickets_cancelled_total", "Total tickets cancelled"),
        &["command"],
    )
    .unwrap()
});

// =============================================================================
// Execution Metrics
// =============================================================================

/// Executions total by command and result.
pub static EXECUTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ren_executions_total", "Total command executions"),
        &["command", "result"], // "success", "failed"
    )
    .unwrap()
});

/// Forced re-executions of terminal tickets.
pub static FORCED_EXECUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "ren_forced_executions_total",
            "Total forced re-executions of terminal tickets",
        ),
        &["command"],
    )
    .unwrap()
});

/// Execution duration in seconds.
pub static EXECUTION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "ren_execution_duration_seconds",
            "Duration of command executions",
        )
        .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["command", "result"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Label value for a ticket command.
///
/// Commands are free-form, so anything the executor does not know collapses
/// into `other` to keep the series count fixed.
pub fn command_label(command: &str) -> &'static str {
    match command {
        "drive" => "drive",
        "stop" => "stop",
        "scan" => "scan",
        _ => "other",
    }
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Tickets
        Box::new(TICKETS_CREATED.clone()),
        Box::new(TICKETS_CANCELLED.clone()),
        // Execution
        Box::new(EXECUTIONS_TOTAL.clone()),
        Box::new(FORCED_EXECUTIONS.clone()),
        Box::new(EXECUTION_DURATION.clone()),
    ]
}
