//! `plategrid-core` — shared kernel for the bounded contexts.
//!
//! Pure domain building blocks only: exact-decimal money, typed identifiers,
//! the storage error contract and the cancellation flag. Infrastructure
//! stays out of this crate.

pub mod cancel;
pub mod error;
pub mod id;
pub mod money;

pub use cancel::CancelToken;
pub use error::{IdParseError, StorageError};
pub use id::{CourierId, CustomerId, OrderId, PaymentId, ProductId, TicketId};
pub use money::Money;
