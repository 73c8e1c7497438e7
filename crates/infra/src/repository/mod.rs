//! In-memory adapters for the domain repository ports.

mod couriers;
mod deliveries;
mod orders;
mod payments;
mod tickets;

pub use couriers::InMemoryCourierRepository;
pub use deliveries::InMemoryDeliveryRepository;
pub use orders::InMemoryOrderRepository;
pub use payments::InMemoryPaymentRepository;
pub use tickets::InMemoryTicketRepository;
