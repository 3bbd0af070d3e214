//! Core ticket data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::executor::Params;

/// Execution priority levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Normal => "normal",
            TicketPriority::High => "high",
            TicketPriority::Critical => "critical",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current lifecycle state of a ticket.
///
/// State machine flow:
/// ```text
/// Pending -> Queued -> Executing -> Completed
///    |         |           |
///    |         |           +------> Failed
///    +---------+-> Cancelled
///
/// Pending can go straight to Executing.
/// Completed/Failed re-enter Executing only on forced re-execution.
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Created, waiting to be executed.
    Pending,
    /// Accepted for execution, not yet started.
    Queued,
    /// Command is running.
    Executing,
    /// Command succeeded (terminal).
    Completed,
    /// Command was refused or failed (terminal).
    Failed,
    /// Withdrawn before execution (terminal).
    Cancelled,
}

impl TicketStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [TicketStatus; 6] = [
        TicketStatus::Pending,
        TicketStatus::Queued,
        TicketStatus::Executing,
        TicketStatus::Completed,
        TicketStatus::Failed,
        TicketStatus::Cancelled,
    ];

    /// Returns true if no further automatic transition is possible.
    pub fn is_terminal(&self) -> bool {
        match self {
            TicketStatus::Completed | TicketStatus::Failed | TicketStatus::Cancelled => true,
            TicketStatus::Pending | TicketStatus::Queued | TicketStatus::Executing => false,
        }
    }

    /// Normal (non-forced) transitions of the state machine.
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        use TicketStatus::*;
        match (self, next) {
            (Pending, Queued | Executing | Cancelled) => true,
            (Queued, Executing | Cancelled) => true,
            (Executing, Completed | Failed) => true,
            (Pending, Pending | Completed | Failed)
            | (Queued, Pending | Queued | Completed | Failed)
            | (Executing, Pending | Queued | Executing | Cancelled)
            | (Completed | Failed | Cancelled, _) => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::Queued => "queued",
            TicketStatus::Executing => "executing",
            TicketStatus::Completed => "completed",
            TicketStatus::Failed => "failed",
            TicketStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown ticket status: {}", s))
    }
}

/// An execution ticket with full lifecycle tracking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    /// Unique identifier, `tick-<YYYYMMDD>-<8 hex>`.
    pub id: String,

    /// Command to execute (e.g. "drive", "scan").
    pub command: String,

    /// Command parameters.
    pub params: Params,

    pub priority: TicketPriority,

    pub status: TicketStatus,

    /// Declared maximum execution time. Stored, not enforced.
    pub timeout_seconds: u32,

    /// Free-form caller metadata.
    pub metadata: Params,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,

    /// When the latest execution started.
    pub started_at: Option<DateTime<Utc>>,

    /// When the latest execution reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,

    /// Executor output, set only on `Completed`.
    pub result: Option<Params>,

    /// Executor error, set only on `Failed`.
    pub error: Option<String>,
}

impl Ticket {
    /// Build a fresh `Pending` ticket stamped at `now`.
    pub fn new(
        id: impl Into<String>,
        command: impl Into<String>,
        params: Params,
        priority: TicketPriority,
        timeout_seconds: u32,
        metadata: Params,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            command: command.into(),
            params,
            priority,
            status: TicketStatus::Pending,
            timeout_seconds,
            metadata,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
        }
    }

    /// Generate a ticket identifier for `now`: `tick-<YYYYMMDD>-<8 hex>`.
    pub fn generate_id(now: DateTime<Utc>) -> String {
        let random = uuid::Uuid::new_v4().simple().to_string();
        format!("tick-{}-{}", now.format("%Y%m%d"), &random[..8])
    }
}
