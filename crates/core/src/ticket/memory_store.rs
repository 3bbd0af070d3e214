//! In-memory ticket store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Ticket, TicketError, TicketFilter, TicketMutation, TicketStore};

#[derive(Default)]
struct Inner {
    tickets: HashMap<String, Ticket>,
    /// Ids in insertion order, used to break creation-time ties.
    order: Vec<String>,
}

/// Volatile ticket store backed by a `HashMap`.
///
/// Tickets are never evicted; the map grows for the lifetime of the process.
/// A single `RwLock` serializes writers, which is what makes `update` an
/// atomic check-and-set.
#[derive(Default)]
pub struct InMemoryTicketStore {
    inner: RwLock<Inner>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TicketStore for InMemoryTicketStore {
    fn insert(&self, ticket: Ticket) -> Result<(), TicketError> {
        let mut inner = self.write();
        if inner.tickets.contains_key(&ticket.id) {
            return Err(TicketError::AlreadyExists(ticket.id));
        }
        inner.order.push(ticket.id.clone());
        inner.tickets.insert(ticket.id.clone(), ticket);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Ticket, TicketError> {
        self.read()
            .tickets
            .get(id)
            .cloned()
            .ok_or_else(|| TicketError::NotFound(id.to_string()))
    }

    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError> {
        let inner = self.read();

        // Newest insert first, then a stable sort on created_at keeps that
        // order among equal timestamps.
        let mut matching: Vec<&Ticket> = inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.tickets.get(id))
            .filter(|ticket| filter.matches(ticket))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .cloned()
            .collect())
    }

    fn count(&self, filter: &TicketFilter) -> Result<usize, TicketError> {
        Ok(self
            .read()
            .tickets
            .values()
            .filter(|ticket| filter.matches(ticket))
            .count())
    }

    fn update(&self, id: &str, mutation: TicketMutation<'_>) -> Result<Ticket, TicketError> {
        let mut inner = self.write();
        let stored = inner
            .tickets
            .get_mut(id)
            .ok_or_else(|| TicketError::NotFound(id.to_string()))?;

        let mut candidate = stored.clone();
        mutation(&mut candidate)?;
        *stored = candidate.clone();
        Ok(candidate)
    }
}
