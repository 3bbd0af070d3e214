//! Ticket system for tracking command execution requests.

mod memory_store;
mod store;
mod types;

pub use memory_store::InMemoryTicketStore;
pub use store::{TicketError, TicketFilter, TicketMutation, TicketStore};
pub use types::{Ticket, TicketPriority, TicketStatus};
