//! Types for the ticket orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::executor::Params;
use crate::ticket::{Ticket, TicketError, TicketPriority, TicketStatus};

/// Default declared timeout for new tickets, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u32 = 300;

/// Errors that can occur during orchestration.
///
/// Executor failures are not here: they end up on the ticket as `Failed`.
#[derive(Debug, Error, PartialEq)]
pub enum OrchestratorError {
    /// Ticket not found.
    #[error("Ticket {0} not found")]
    TicketNotFound(String),

    /// Operation not allowed in the ticket's current state.
    #[error("{0}")]
    Conflict(String),

    /// Request rejected before reaching the store.
    #[error("{0}")]
    Validation(String),

    /// Ticket store error.
    #[error("ticket store error: {0}")]
    TicketStore(TicketError),
}

impl From<TicketError> for OrchestratorError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::NotFound(id) => OrchestratorError::TicketNotFound(id),
            TicketError::InvalidState { reason, .. } => OrchestratorError::Conflict(reason),
            other => OrchestratorError::TicketStore(other),
        }
    }
}

fn default_timeout() -> u32 {
    DEFAULT_TIMEOUT_SECONDS
}

/// Request to create a new ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTicketRequest {
    pub command: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub priority: TicketPriority,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    #[serde(default)]
    pub metadata: Params,
}

impl CreateTicketRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            params: Params::new(),
            priority: TicketPriority::default(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            metadata: Params::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u32) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_metadata(mut self, metadata: Params) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.command.trim().is_empty() {
            return Err(OrchestratorError::Validation(
                "command must be a non-empty string".to_string(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(OrchestratorError::Validation(
                "timeout_seconds must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one `execute` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecuteResponse {
    pub ticket_id: String,
    pub status: TicketStatus,
    pub result: Option<Params>,
    pub error: Option<String>,
    pub execution_time_ms: f64,
    pub message: String,
}

/// One page of a filtered ticket listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketPage {
    /// Size of the filtered set before pagination.
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub tickets: Vec<Ticket>,
}

/// Ticket counts per lifecycle state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub queued: usize,
    pub executing: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TicketStatus) -> usize {
        match status {
            TicketStatus::Pending => self.pending,
            TicketStatus::Queued => self.queued,
            TicketStatus::Executing => self.executing,
            TicketStatus::Completed => self.completed,
            TicketStatus::Failed => self.failed,
            TicketStatus::Cancelled => self.cancelled,
        }
    }

    pub(crate) fn set(&mut self, status: TicketStatus, count: usize) {
        let slot = match status {
            TicketStatus::Pending => &mut self.pending,
            TicketStatus::Queued => &mut self.queued,
            TicketStatus::Executing => &mut self.executing,
            TicketStatus::Completed => &mut self.completed,
            TicketStatus::Failed => &mut self.failed,
            TicketStatus::Cancelled => &mut self.cancelled,
        };
        *slot = count;
    }
}
