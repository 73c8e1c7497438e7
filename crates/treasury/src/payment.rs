use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use plategrid_core::{Money, OrderId, PaymentId, StorageError};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Online,
    Cash,
    Card,
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            PaymentMethod::Online => "online",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        };
        f.write_str(name)
    }
}

/// Payment lifecycle: Waiting → Success | Declined, Success → Refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Waiting,
    Success,
    Declined,
    Refund,
}

impl core::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            PaymentStatus::Waiting => "waiting",
            PaymentStatus::Success => "success",
            PaymentStatus::Declined => "declined",
            PaymentStatus::Refund => "refund",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Confirm and decline only act on a waiting payment.
    #[error("payment is already processed")]
    AlreadyProcessed,

    #[error("can only refund successful payments")]
    InvalidRefund,
}

/// Aggregate root: the money side of a single order.
///
/// The correlation key is the order id; one payment per order is the
/// repository's keying discipline. `updated_at` moves on every successful
/// transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    order_id: OrderId,
    amount: Money,
    method: PaymentMethod,
    status: PaymentStatus,
    transaction_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Payment {
    /// Open a payment in Waiting for the given order total.
    pub fn create(order_id: OrderId, amount: Money, method: PaymentMethod) -> Self {
        let now = Utc::now();
        Self {
            id: PaymentId::new(),
            order_id,
            amount,
            method,
            status: PaymentStatus::Waiting,
            transaction_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Waiting → Success, recording the provider's transaction id.
    pub fn confirm(&mut self, transaction_id: String) -> Result<(), PaymentError> {
        if self.status != PaymentStatus::Waiting {
            return Err(PaymentError::AlreadyProcessed);
        }
        self.transaction_id = Some(transaction_id);
        self.status = PaymentStatus::Success;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Waiting → Declined.
    pub fn decline(&mut self) -> Result<(), PaymentError> {
        if self.status != PaymentStatus::Waiting {
            return Err(PaymentError::AlreadyProcessed);
        }
        self.status = PaymentStatus::Declined;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Success → Refund.
    pub fn refund(&mut self) -> Result<(), PaymentError> {
        if self.status != PaymentStatus::Success {
            return Err(PaymentError::InvalidRefund);
        }
        self.status = PaymentStatus::Refund;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Persistence port for payments, keyed by the correlated order.
pub trait PaymentRepository {
    fn save(&self, payment: &Payment) -> Result<(), StorageError>;
    fn find_by_order_id(&self, order_id: OrderId) -> Result<Option<Payment>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_payment() -> Payment {
        Payment::create(OrderId::new(), Money::new(dec!(42.50)), PaymentMethod::Card)
    }

    #[test]
    fn new_payment_waits_without_transaction_id() {
        let payment = test_payment();
        assert_eq!(payment.status(), PaymentStatus::Waiting);
        assert_eq!(payment.transaction_id(), None);
        assert_eq!(payment.amount(), Money::new(dec!(42.50)));
    }

    #[test]
    fn confirm_records_the_transaction_id() {
        let mut payment = test_payment();
        payment.confirm("tx-123".to_string()).unwrap();

        assert_eq!(payment.status(), PaymentStatus::Success);
        assert_eq!(payment.transaction_id(), Some("tx-123"));
        assert!(payment.updated_at() >= payment.created_at());
    }

    #[test]
    fn confirm_twice_is_rejected() {
        let mut payment = test_payment();
        payment.confirm("tx-123".to_string()).unwrap();

        let err = payment.confirm("tx-456".to_string()).unwrap_err();
        assert_eq!(err, PaymentError::AlreadyProcessed);
        assert_eq!(payment.transaction_id(), Some("tx-123"));
    }

    #[test]
    fn decline_only_acts_on_waiting() {
        let mut payment = test_payment();
        payment.decline().unwrap();
        assert_eq!(payment.status(), PaymentStatus::Declined);

        assert_eq!(payment.decline(), Err(PaymentError::AlreadyProcessed));
        assert_eq!(
            payment.confirm("tx".to_string()),
            Err(PaymentError::AlreadyProcessed)
        );
    }

    #[test]
    fn refund_requires_a_successful_payment() {
        let mut payment = test_payment();
        assert_eq!(payment.refund(), Err(PaymentError::InvalidRefund));

        payment.confirm("tx-123".to_string()).unwrap();
        payment.refund().unwrap();
        assert_eq!(payment.status(), PaymentStatus::Refund);

        assert_eq!(payment.refund(), Err(PaymentError::InvalidRefund));
    }

    #[test]
    fn declined_payment_cannot_be_refunded() {
        let mut payment = test_payment();
        payment.decline().unwrap();
        assert_eq!(payment.refund(), Err(PaymentError::InvalidRefund));
        assert_eq!(payment.status(), PaymentStatus::Declined);
    }
}
