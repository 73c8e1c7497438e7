use std::sync::Arc;

use plategrid_core::{OrderId, StorageError};
use plategrid_orders::{Order, OrderRepository};

use crate::memory::MemoryCollection;

/// Order store keyed by order id. Cloning the repository shares the
/// underlying collection.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    collection: Arc<MemoryCollection<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn save(&self, order: &Order) -> Result<(), StorageError> {
        self.collection.put(order.id(), order.clone())
    }

    fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        self.collection.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use plategrid_core::CustomerId;
    use plategrid_orders::DeliveryAddress;

    use super::*;

    #[test]
    fn save_then_find_round_trips_the_order() {
        let repository = InMemoryOrderRepository::new();
        let order = Order::create(CustomerId::new(), DeliveryAddress::default());

        repository.save(&order).unwrap();

        let found = repository.find_by_id(order.id()).unwrap().unwrap();
        assert_eq!(found.id(), order.id());
        assert_eq!(found.order_number(), order.order_number());
    }

    #[test]
    fn find_misses_return_none() {
        let repository = InMemoryOrderRepository::new();
        assert!(repository.find_by_id(OrderId::new()).unwrap().is_none());
    }
}
