//! The error surface of the orchestration layer.

use thiserror::Error;

use plategrid_core::{CancelToken, StorageError};
use plategrid_kitchen::TicketError;
use plategrid_logistics::{CourierError, DeliveryError};
use plategrid_orders::OrderError;
use plategrid_treasury::PaymentError;

/// Result type used across the orchestration layer.
pub type FulfillmentResult<T> = Result<T, FulfillmentError>;

/// Failure of an orchestrated operation.
///
/// Aggregate rule violations pass through transparently; the variants
/// declared here describe what the orchestration itself can get wrong:
/// bad input, missing aggregates, canceled calls, storage failures, and
/// the partial states a multi-aggregate operation can strand.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FulfillmentError {
    /// Input rejected before any aggregate was touched.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: String },

    /// The caller canceled before the first write.
    #[error("operation canceled")]
    Canceled,

    /// A repository failed; `op` names the call that was under way.
    #[error("{op}: {source}")]
    Storage { op: String, source: StorageError },

    /// An earlier write landed but a later one did not, and compensation
    /// could not clean up. `detail` records what was left behind.
    #[error("partial failure in {op}: {detail}")]
    PartialFailure { op: &'static str, detail: String },

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error(transparent)]
    Courier(#[from] CourierError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl FulfillmentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            what,
            id: id.to_string(),
        }
    }

    pub fn storage(op: impl Into<String>, source: StorageError) -> Self {
        Self::Storage {
            op: op.into(),
            source,
        }
    }

    /// A stranded partial state always needs operator attention, so
    /// construction logs it at error level.
    pub(crate) fn partial_failure(op: &'static str, detail: String) -> Self {
        tracing::error!("partial failure in {}: {}", op, detail);
        Self::PartialFailure { op, detail }
    }
}

/// Guard called before an operation's first write.
pub(crate) fn ensure_active(cancel: &CancelToken) -> FulfillmentResult<()> {
    if cancel.is_cancelled() {
        return Err(FulfillmentError::Canceled);
    }
    Ok(())
}
