//! Shared in-memory collection backing the repository adapters.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use plategrid_core::StorageError;

/// Keyed collection behind a reader-writer lock. Values are cloned on the
/// way in and on the way out, so callers never hold an alias into the map.
#[derive(Debug)]
pub struct MemoryCollection<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> MemoryCollection<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for MemoryCollection<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryCollection<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn get(&self, key: &K) -> Result<Option<V>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::new("lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    pub fn put(&self, key: K, value: V) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::new("lock poisoned"))?;
        map.insert(key, value);
        Ok(())
    }

    pub fn values(&self) -> Result<Vec<V>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::new("lock poisoned"))?;
        Ok(map.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_returns_latest_value() {
        let collection = MemoryCollection::new();
        collection.put("a", 1).unwrap();
        collection.put("a", 2).unwrap();

        assert_eq!(collection.get(&"a").unwrap(), Some(2));
        assert_eq!(collection.get(&"b").unwrap(), None);
    }

    #[test]
    fn values_snapshots_every_entry() {
        let collection = MemoryCollection::new();
        collection.put("a", 1).unwrap();
        collection.put("b", 2).unwrap();

        let mut values = collection.values().unwrap();
        values.sort();
        assert_eq!(values, vec![1, 2]);
    }
}
