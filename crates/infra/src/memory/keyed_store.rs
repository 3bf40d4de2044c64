use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use facturation_billing::StorageError;

/// In-memory key/value table shared by the storage adapters.
#[derive(Debug)]
pub struct InMemoryKeyedStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryKeyedStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryKeyedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryKeyedStore<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<K, V>>, StorageError> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<K, V>>, StorageError> {
        self.inner.write().map_err(|_| poisoned())
    }

    pub fn get(&self, key: &K) -> Result<Option<V>, StorageError> {
        Ok(self.read()?.get(key).cloned())
    }

    pub fn upsert(&self, key: K, value: V) -> Result<(), StorageError> {
        self.write()?.insert(key, value);
        Ok(())
    }

    /// Insert only if `key` is absent.
    pub fn insert_new(&self, key: K, value: V) -> Result<(), StorageError> {
        let mut map = self.write()?;
        if map.contains_key(&key) {
            return Err(StorageError::Rejected("duplicate key".to_string()));
        }
        map.insert(key, value);
        Ok(())
    }

    /// Mutate one record in place under the write lock.
    pub fn update<R>(
        &self,
        key: &K,
        f: impl FnOnce(&mut V) -> Result<R, StorageError>,
    ) -> Result<R, StorageError> {
        let mut map = self.write()?;
        let value = map.get_mut(key).ok_or(StorageError::NotFound)?;
        f(value)
    }

    pub fn remove(&self, key: &K) -> Result<Option<V>, StorageError> {
        Ok(self.write()?.remove(key))
    }

    pub fn list(&self) -> Result<Vec<V>, StorageError> {
        Ok(self.read()?.values().cloned().collect())
    }

    /// Values matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&V) -> bool) -> Result<Vec<V>, StorageError> {
        Ok(self.read()?.values().filter(|v| predicate(v)).cloned().collect())
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.read()?.is_empty())
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("in-memory store lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_mutates_in_place_and_reports_missing_keys() {
        let store: InMemoryKeyedStore<u32, String> = InMemoryKeyedStore::new();
        store.upsert(1, "a".to_string()).unwrap();
        store
            .update(&1, |v| {
                v.push('b');
                Ok(())
            })
            .unwrap();
        assert_eq!(store.get(&1).unwrap().as_deref(), Some("ab"));
        assert_eq!(store.update(&2, |_| Ok(())), Err(StorageError::NotFound));
    }

    #[test]
    fn insert_new_refuses_duplicates() {
        let store: InMemoryKeyedStore<u32, u32> = InMemoryKeyedStore::new();
        store.insert_new(1, 1).unwrap();
        assert!(matches!(store.insert_new(1, 2), Err(StorageError::Rejected(_))));
        assert_eq!(store.get(&1).unwrap(), Some(1));
    }

    #[test]
    fn filter_and_remove() {
        let store: InMemoryKeyedStore<u32, u32> = InMemoryKeyedStore::new();
        for i in 0..6 {
            store.upsert(i, i * 10).unwrap();
        }
        let mut even = store.filter(|v| v % 20 == 0).unwrap();
        even.sort();
        assert_eq!(even, vec![0, 20, 40]);
        assert_eq!(store.remove(&0).unwrap(), Some(0));
        assert_eq!(store.len().unwrap(), 5);
    }
}
