//! `plategrid-orders` — the Order bounded context.
//!
//! Pure domain crate: the aggregate, its value objects and the
//! persistence port. No IO, no storage, no transport.

pub mod order;

pub use order::{
    DeliveryAddress, Order, OrderError, OrderItem, OrderRepository, OrderStatus, Topping,
};
