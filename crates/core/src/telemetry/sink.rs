use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::{Fields, RecentWindow};

/// A recorded numeric measurement.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricRecord {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub value: f64,
    pub tags: Fields,
}

/// A recorded occurrence with free-form data.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Fields,
}

/// Read-back view: total emitted plus the retained tail, newest last.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot<T> {
    pub count: u64,
    pub items: Vec<T>,
}

/// Shared, thread-safe recorder.
///
/// Emission never fails and never blocks for longer than a short mutex hold.
pub struct TelemetrySink {
    metrics: Mutex<RecentWindow<MetricRecord>>,
    events: Mutex<RecentWindow<EventRecord>>,
    log_records: bool,
}

impl TelemetrySink {
    pub fn new(retention: usize) -> Self {
        Self {
            metrics: Mutex::new(RecentWindow::new(retention)),
            events: Mutex::new(RecentWindow::new(retention)),
            log_records: true,
        }
    }

    /// Enable or disable mirroring records to the tracing log.
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_records = enabled;
        self
    }

    pub fn emit_metric(&self, name: &str, value: f64, tags: Fields) {
        if self.log_records {
            debug!(target: "ren::telemetry", metric = name, value, tags = %serde_json::Value::Object(tags.clone()));
        }

        let record = MetricRecord {
            timestamp: Utc::now(),
            name: name.to_string(),
            value,
            tags,
        };
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    pub fn emit_event(&self, event_type: &str, data: Fields) {
        if self.log_records {
            info!(target: "ren::telemetry", event = event_type, data = %serde_json::Value::Object(data.clone()));
        }

        let record = EventRecord {
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            data,
        };
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    pub fn recent_metrics(&self) -> TelemetrySnapshot<MetricRecord> {
        let window = self.metrics.lock().unwrap_or_else(PoisonError::into_inner);
        TelemetrySnapshot {
            count: window.total(),
            items: window.to_vec(),
        }
    }

    pub fn recent_events(&self) -> TelemetrySnapshot<EventRecord> {
        let window = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        TelemetrySnapshot {
            count: window.total(),
            items: window.to_vec(),
        }
    }
}

impl Default for TelemetrySink {
    fn default() -> Self {
        Self::new(100)
    }
}
