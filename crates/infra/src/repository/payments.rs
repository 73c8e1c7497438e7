use std::sync::Arc;

use plategrid_core::{OrderId, StorageError};
use plategrid_treasury::{Payment, PaymentRepository};

use crate::memory::MemoryCollection;

/// Payment store keyed by the order it settles. One payment per order,
/// matching the checkout flow.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPaymentRepository {
    collection: Arc<MemoryCollection<OrderId, Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaymentRepository for InMemoryPaymentRepository {
    fn save(&self, payment: &Payment) -> Result<(), StorageError> {
        self.collection.put(payment.order_id(), payment.clone())
    }

    fn find_by_order_id(&self, order_id: OrderId) -> Result<Option<Payment>, StorageError> {
        self.collection.get(&order_id)
    }
}
