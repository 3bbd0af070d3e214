//! Append-only telemetry recorder for metrics and events.
//!
//! Every component holds a shared [`TelemetrySink`] and emits into it without
//! caring about the outcome. Readers get the most recent window of records plus
//! the total number emitted since startup.

mod sink;
mod window;

pub use sink::{EventRecord, MetricRecord, TelemetrySink, TelemetrySnapshot};
pub use window::RecentWindow;

use serde_json::{Map, Value};

/// String-keyed bag of JSON values used for tags and event data.
pub type Fields = Map<String, Value>;

/// Turn a `json!({...})` object literal into a [`Fields`] bag.
///
/// Non-object values produce an empty bag.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}
