//! Asset storage collaborator (material images).
//!
//! Asset operations are best-effort from the mutation service's point of
//! view: a failed removal during record deletion is reported and logged but
//! never rolls back the record-level write.

pub mod fs;

pub use fs::FsAssetStore;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use millstock_materials::AssetRef;

/// Asset store failure. Non-fatal by design on the delete path.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    Missing(String),

    #[error("invalid asset name: {0}")]
    InvalidName(String),

    #[error("asset io failure: {0}")]
    Io(String),
}

/// Byte-blob storage keyed by opaque [`AssetRef`]s.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store bytes under a name derived from `suggested_name`; the returned
    /// reference is the only handle to the asset.
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<AssetRef, AssetError>;

    async fn remove(&self, asset: &AssetRef) -> Result<(), AssetError>;
}

#[async_trait]
impl<S> AssetStore for Arc<S>
where
    S: AssetStore + ?Sized,
{
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<AssetRef, AssetError> {
        (**self).store(bytes, suggested_name).await
    }

    async fn remove(&self, asset: &AssetRef) -> Result<(), AssetError> {
        (**self).remove(asset).await
    }
}

/// In-memory asset store for tests and dev.
#[derive(Debug, Default)]
pub struct InMemoryAssetStore {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, asset: &AssetRef) -> bool {
        self.inner
            .read()
            .map(|map| map.contains_key(asset.as_str()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<AssetRef, AssetError> {
        let name = fs::unique_asset_name(suggested_name)?;
        let mut map = self
            .inner
            .write()
            .map_err(|_| AssetError::Io("asset lock poisoned".to_string()))?;
        map.insert(name.clone(), bytes);
        Ok(AssetRef::new(name))
    }

    async fn remove(&self, asset: &AssetRef) -> Result<(), AssetError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| AssetError::Io("asset lock poisoned".to_string()))?;
        match map.remove(asset.as_str()) {
            Some(_) => Ok(()),
            None => Err(AssetError::Missing(asset.as_str().to_string())),
        }
    }
}
