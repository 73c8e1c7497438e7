//! `plategrid-fulfillment` — saga-style orchestration over the bounded
//! contexts.
//!
//! Each service here follows the same shape: check cancellation, validate
//! input, load or create aggregates through their ports, mutate through
//! behavior methods, persist each aggregate through its own port. There
//! are no distributed transactions; multi-aggregate operations compensate
//! where a reverse transition exists and report a partial failure where
//! one does not.

pub mod delivery_service;
pub mod error;
pub mod kitchen_service;
pub mod order_service;
pub mod payment_service;

pub use delivery_service::DeliveryService;
pub use error::{FulfillmentError, FulfillmentResult};
pub use kitchen_service::KitchenService;
pub use order_service::{CreateOrderInput, OrderItemInput, OrderService};
pub use payment_service::PaymentService;
