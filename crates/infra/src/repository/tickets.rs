use std::sync::Arc;

use plategrid_core::{StorageError, TicketId};
use plategrid_kitchen::{KitchenTicket, TicketRepository, TicketStatus};

use crate::memory::MemoryCollection;

/// Ticket store keyed by ticket id. The pending view returns tickets not
/// yet ready, oldest first, so the queue reads in arrival order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTicketRepository {
    collection: Arc<MemoryCollection<TicketId, KitchenTicket>>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TicketRepository for InMemoryTicketRepository {
    fn save(&self, ticket: &KitchenTicket) -> Result<(), StorageError> {
        self.collection.put(ticket.id(), ticket.clone())
    }

    fn find_by_id(&self, id: TicketId) -> Result<Option<KitchenTicket>, StorageError> {
        self.collection.get(&id)
    }

    fn find_pending(&self) -> Result<Vec<KitchenTicket>, StorageError> {
        let mut pending: Vec<KitchenTicket> = self
            .collection
            .values()?
            .into_iter()
            .filter(|ticket| ticket.status() != TicketStatus::Ready)
            .collect();
        pending.sort_by_key(|ticket| ticket.created_at());
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use plategrid_core::OrderId;

    use super::*;

    #[test]
    fn pending_excludes_ready_tickets() {
        let repository = InMemoryTicketRepository::new();
        let queued = KitchenTicket::create(OrderId::new(), Vec::new());
        let mut finished = KitchenTicket::create(OrderId::new(), Vec::new());
        finished.start_cooking().unwrap();
        finished.mark_ready().unwrap();

        repository.save(&queued).unwrap();
        repository.save(&finished).unwrap();

        let pending = repository.find_pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id(), queued.id());
    }

    #[test]
    fn pending_reads_in_arrival_order() {
        let repository = InMemoryTicketRepository::new();
        let first = KitchenTicket::create(OrderId::new(), Vec::new());
        let second = KitchenTicket::create(OrderId::new(), Vec::new());

        repository.save(&second).unwrap();
        repository.save(&first).unwrap();

        let pending = repository.find_pending().unwrap();
        let ids: Vec<_> = pending.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }
}
