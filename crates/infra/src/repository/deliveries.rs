use std::sync::Arc;

use plategrid_core::{OrderId, StorageError};
use plategrid_logistics::{Delivery, DeliveryRepository};

use crate::memory::MemoryCollection;

/// Delivery store keyed by the order being delivered.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDeliveryRepository {
    collection: Arc<MemoryCollection<OrderId, Delivery>>,
}

impl InMemoryDeliveryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeliveryRepository for InMemoryDeliveryRepository {
    fn save(&self, delivery: &Delivery) -> Result<(), StorageError> {
        self.collection.put(delivery.order_id(), delivery.clone())
    }

    fn find_by_order_id(&self, order_id: OrderId) -> Result<Option<Delivery>, StorageError> {
        self.collection.get(&order_id)
    }
}

#[cfg(test)]
mod tests {
    use plategrid_logistics::DeliveryStatus;

    use super::*;

    #[test]
    fn deliveries_are_looked_up_by_order() {
        let repository = InMemoryDeliveryRepository::new();
        let delivery = Delivery::create(OrderId::new());

        repository.save(&delivery).unwrap();

        let found = repository
            .find_by_order_id(delivery.order_id())
            .unwrap()
            .unwrap();
        assert_eq!(found.status(), DeliveryStatus::Pending);
        assert!(
            repository
                .find_by_order_id(OrderId::new())
                .unwrap()
                .is_none()
        );
    }
}
