//! Persistence boundary for material records.
//!
//! The store is a dumb record container: `list_all` / `get` / `insert` /
//! `replace` / `remove`. All business rules (validation, derived fields,
//! negative-stock rejection) live above it in the mutation service, so every
//! implementation behaves identically from the caller's point of view.
//! Last-write-wins per record; no versioning.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryMaterialStore;
pub use postgres::PostgresMaterialStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use millstock_core::MaterialId;
use millstock_materials::MaterialRecord;

/// Store operation error.
///
/// These are infrastructure failures (missing row, duplicate key, backend
/// unavailable) as opposed to domain failures (validation, invariants).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate material id: {0}")]
    Duplicate(MaterialId),

    #[error("material not found: {0}")]
    Missing(MaterialId),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Record persistence collaborator.
///
/// Implementations must make each operation atomic per record: a record is
/// fully written or untouched, never half-updated.
#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Every persisted record, in unspecified order.
    async fn list_all(&self) -> Result<Vec<MaterialRecord>, StoreError>;

    async fn get(&self, id: MaterialId) -> Result<Option<MaterialRecord>, StoreError>;

    /// Insert a new record; a duplicate id is an error.
    async fn insert(&self, record: MaterialRecord) -> Result<(), StoreError>;

    /// Replace an existing record wholesale; a missing id is an error.
    async fn replace(&self, id: MaterialId, record: MaterialRecord) -> Result<(), StoreError>;

    /// Remove a record; a missing id is an error.
    async fn remove(&self, id: MaterialId) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> MaterialStore for Arc<S>
where
    S: MaterialStore + ?Sized,
{
    async fn list_all(&self) -> Result<Vec<MaterialRecord>, StoreError> {
        (**self).list_all().await
    }

    async fn get(&self, id: MaterialId) -> Result<Option<MaterialRecord>, StoreError> {
        (**self).get(id).await
    }

    async fn insert(&self, record: MaterialRecord) -> Result<(), StoreError> {
        (**self).insert(record).await
    }

    async fn replace(&self, id: MaterialId, record: MaterialRecord) -> Result<(), StoreError> {
        (**self).replace(id, record).await
    }

    async fn remove(&self, id: MaterialId) -> Result<(), StoreError> {
        (**self).remove(id).await
    }
}
