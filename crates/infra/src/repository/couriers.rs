use std::sync::Arc;

use plategrid_core::{CourierId, StorageError};
use plategrid_logistics::{Courier, CourierRepository, CourierStatus};

use crate::memory::MemoryCollection;

/// Courier store keyed by courier id. The availability view returns free
/// couriers ordered by id, which for v7 ids is registration order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCourierRepository {
    collection: Arc<MemoryCollection<CourierId, Courier>>,
}

impl InMemoryCourierRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CourierRepository for InMemoryCourierRepository {
    fn save(&self, courier: &Courier) -> Result<(), StorageError> {
        self.collection.put(courier.id(), courier.clone())
    }

    fn find_by_id(&self, id: CourierId) -> Result<Option<Courier>, StorageError> {
        self.collection.get(&id)
    }

    fn find_available(&self) -> Result<Vec<Courier>, StorageError> {
        let mut available: Vec<Courier> = self
            .collection
            .values()?
            .into_iter()
            .filter(|courier| courier.status() == CourierStatus::Free)
            .collect();
        available.sort_by_key(|courier| *courier.id().as_uuid());
        Ok(available)
    }
}
