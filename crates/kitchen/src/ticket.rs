use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use plategrid_core::{OrderId, ProductId, StorageError, TicketId};

/// Ticket lifecycle: Queued → Cooking → Ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Queued,
    Cooking,
    Ready,
}

impl core::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            TicketStatus::Queued => "queued",
            TicketStatus::Cooking => "cooking",
            TicketStatus::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// One line of work for the kitchen, denormalized from the order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenItem {
    pub product_id: ProductId,
    pub name: String,
    pub ingredients: Vec<String>,
    pub quantity: u32,
    pub comment: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TicketError {
    #[error("ticket is not in queue")]
    NotQueued,

    #[error("ticket must be cooking before ready")]
    NotCooking,
}

/// Aggregate root: the kitchen's view of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenTicket {
    id: TicketId,
    order_id: OrderId,
    items: Vec<KitchenItem>,
    status: TicketStatus,
    created_at: DateTime<Utc>,
    start_cooking_at: Option<DateTime<Utc>>,
    ready_at: Option<DateTime<Utc>>,
}

impl KitchenTicket {
    /// Queue a ticket for an order.
    pub fn create(order_id: OrderId, items: Vec<KitchenItem>) -> Self {
        Self {
            id: TicketId::new(),
            order_id,
            items,
            status: TicketStatus::Queued,
            created_at: Utc::now(),
            start_cooking_at: None,
            ready_at: None,
        }
    }

    /// Queued → Cooking, stamping the start time.
    pub fn start_cooking(&mut self) -> Result<(), TicketError> {
        if self.status != TicketStatus::Queued {
            return Err(TicketError::NotQueued);
        }
        self.status = TicketStatus::Cooking;
        self.start_cooking_at = Some(Utc::now());
        Ok(())
    }

    /// Cooking → Ready, stamping the ready time.
    pub fn mark_ready(&mut self) -> Result<(), TicketError> {
        if self.status != TicketStatus::Cooking {
            return Err(TicketError::NotCooking);
        }
        self.status = TicketStatus::Ready;
        self.ready_at = Some(Utc::now());
        Ok(())
    }

    /// Elapsed time between the cooking start and ready stamps; zero until
    /// both exist. Derived, never stored.
    pub fn cooking_duration(&self) -> Duration {
        match (self.start_cooking_at, self.ready_at) {
            (Some(start), Some(ready)) => ready - start,
            _ => Duration::zero(),
        }
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn items(&self) -> &[KitchenItem] {
        &self.items
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn start_cooking_at(&self) -> Option<DateTime<Utc>> {
        self.start_cooking_at
    }

    pub fn ready_at(&self) -> Option<DateTime<Utc>> {
        self.ready_at
    }
}

/// Persistence port for tickets. `find_pending` feeds the kitchen queue
/// view with every ticket not yet ready.
pub trait TicketRepository {
    fn save(&self, ticket: &KitchenTicket) -> Result<(), StorageError>;
    fn find_by_id(&self, id: TicketId) -> Result<Option<KitchenTicket>, StorageError>;
    fn find_pending(&self) -> Result<Vec<KitchenTicket>, StorageError>;
}
