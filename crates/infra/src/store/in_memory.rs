//! In-memory material store for tests and single-process deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use millstock_core::MaterialId;
use millstock_materials::MaterialRecord;

use super::{MaterialStore, StoreError};

/// RwLock-guarded map keyed by material id.
#[derive(Debug, Default)]
pub struct InMemoryMaterialStore {
    inner: RwLock<HashMap<MaterialId, MaterialRecord>>,
}

impl InMemoryMaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> StoreError {
        StoreError::Backend("store lock poisoned".to_string())
    }
}

#[async_trait]
impl MaterialStore for InMemoryMaterialStore {
    async fn list_all(&self) -> Result<Vec<MaterialRecord>, StoreError> {
        let map = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(map.values().cloned().collect())
    }

    async fn get(&self, id: MaterialId) -> Result<Option<MaterialRecord>, StoreError> {
        let map = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn insert(&self, record: MaterialRecord) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        if map.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        map.insert(record.id, record);
        Ok(())
    }

    async fn replace(&self, id: MaterialId, record: MaterialRecord) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        match map.get_mut(&id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::Missing(id)),
        }
    }

    async fn remove(&self, id: MaterialId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        match map.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::Missing(id)),
        }
    }
}
