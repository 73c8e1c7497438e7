//! `plategrid-kitchen` — the KitchenTicket bounded context.

pub mod ticket;

pub use ticket::{KitchenItem, KitchenTicket, TicketError, TicketRepository, TicketStatus};
