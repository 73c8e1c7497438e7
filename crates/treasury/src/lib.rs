//! `plategrid-treasury` — the Payment bounded context.

pub mod payment;

pub use payment::{Payment, PaymentError, PaymentMethod, PaymentRepository, PaymentStatus};
