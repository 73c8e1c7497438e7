//! Adapters behind the domain persistence ports: one in-memory store per
//! aggregate collection, shared by tests, benches and local runs.

pub mod memory;
pub mod repository;


pub use memory::MemoryCollection;
pub use repository::{
    InMemoryCourierRepository, InMemoryDeliveryRepository, InMemoryOrderRepository,
    InMemoryPaymentRepository, InMemoryTicketRepository,
};
