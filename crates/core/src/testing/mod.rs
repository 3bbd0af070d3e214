//! Testing utilities and mock implementations.
//!
//! The mock executor stands in for the safety executor so orchestrator and
//! HTTP tests can script outcomes and observe in-flight executions.
//!
//! # Example
//!
//! ```rust,ignore
//! use ren_core::testing::{fixtures, MockExecutor};
//!
//! let executor = Arc::new(MockExecutor::new());
//! let orchestrator = fixtures::orchestrator_with(executor.clone());
//! ```

mod mock_executor;

pub use mock_executor::{MockExecutor, RecordedExecution};

use serde_json::json;

use crate::executor::Params;
use crate::telemetry::fields;

/// Parameters accepted by the simulated `drive` command.
pub fn drive_params(speed: f64, duration_seconds: f64, direction: f64) -> Params {
    fields(json!({
        "speed": speed,
        "duration_seconds": duration_seconds,
        "direction": direction,
    }))
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;

    use crate::executor::{CommandExecutor, SafetyExecutor};
    use crate::orchestrator::{CreateTicketRequest, TicketOrchestrator};
    use crate::telemetry::TelemetrySink;
    use crate::ticket::InMemoryTicketStore;

    pub use super::drive_params;

    /// Orchestrator over an empty in-memory store and the given executor.
    pub fn orchestrator_with(executor: Arc<dyn CommandExecutor>) -> TicketOrchestrator {
        TicketOrchestrator::new(
            Arc::new(InMemoryTicketStore::new()),
            executor,
            Arc::new(TelemetrySink::new(100).with_logging(false)),
        )
    }

    /// Orchestrator with the default safety executor.
    pub fn orchestrator() -> TicketOrchestrator {
        orchestrator_with(Arc::new(SafetyExecutor::default()))
    }

    /// A `drive` request with the given motion parameters.
    pub fn drive_request(speed: f64, duration_seconds: f64, direction: f64) -> CreateTicketRequest {
        CreateTicketRequest::new("drive").with_params(drive_params(speed, duration_seconds, direction))
    }
}
