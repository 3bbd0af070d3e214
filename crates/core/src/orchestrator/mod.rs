//! Ticket orchestrator.
//!
//! Owns the ticket lifecycle: creation, guarded execution through a
//! [`CommandExecutor`](crate::executor::CommandExecutor), cancellation and
//! listing. Every state change is applied through the store's atomic `update`,
//! and every step is reported to the shared telemetry sink.

mod service;
mod types;

pub use service::TicketOrchestrator;
pub use types::{
    CreateTicketRequest, ExecuteResponse, OrchestratorError, StatusCounts, TicketPage,
    DEFAULT_TIMEOUT_SECONDS,
};
