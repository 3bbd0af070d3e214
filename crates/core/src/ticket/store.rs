//! Ticket storage trait and types.

use thiserror::Error;

use crate::ticket::{Ticket, TicketStatus};

/// Error type for ticket operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TicketError {
    /// Ticket not found.
    #[error("Ticket '{0}' not found")]
    NotFound(String),

    /// A ticket with this id is already stored.
    #[error("Ticket '{0}' already exists")]
    AlreadyExists(String),

    /// Cannot perform operation due to current state.
    #[error("Cannot {operation} ticket {ticket_id}: {reason}")]
    InvalidState {
        ticket_id: String,
        current_state: TicketStatus,
        operation: String,
        reason: String,
    },
}

/// Filter for querying tickets.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketFilter {
    /// Filter by status.
    pub status: Option<TicketStatus>,
    /// Maximum number of results.
    pub limit: usize,
    /// Offset for pagination.
    pub offset: usize,
}

impl TicketFilter {
    /// Create a new filter with defaults.
    pub fn new() -> Self {
        Self {
            status: None,
            limit: 100,
            offset: 0,
        }
    }

    /// Filter by status.
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set offset.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns true if the ticket passes the status filter.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.status.is_none_or(|status| ticket.status == status)
    }
}

impl Default for TicketFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutation applied atomically by [`TicketStore::update`].
///
/// Returning an error aborts the update and leaves the stored ticket untouched.
pub type TicketMutation<'a> = &'a mut dyn FnMut(&mut Ticket) -> Result<(), TicketError>;

/// Trait for ticket storage backends.
///
/// Implementations must make `update` atomic per ticket: the mutation observes
/// the latest stored state and no other writer can interleave with it.
pub trait TicketStore: Send + Sync {
    /// Store a new ticket.
    fn insert(&self, ticket: Ticket) -> Result<(), TicketError>;

    /// Get a ticket by ID.
    fn get(&self, id: &str) -> Result<Ticket, TicketError>;

    /// List tickets matching the filter, newest first, paginated.
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError>;

    /// Count tickets matching the status filter (pagination ignored).
    fn count(&self, filter: &TicketFilter) -> Result<usize, TicketError>;

    /// Apply `mutation` to the stored ticket and return the updated copy.
    fn update(&self, id: &str, mutation: TicketMutation<'_>) -> Result<Ticket, TicketError>;
}
