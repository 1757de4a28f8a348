//! Record mutation service: create / update / adjust-stock / delete against
//! the persistence boundary, enforcing domain invariants before acknowledging.
//!
//! Derived fields are accessors on the record, so every path that writes the
//! authoritative fields automatically keeps them consistent. Failure rules:
//! validation and not-found block the operation; store failures surface
//! verbatim with no retry; asset failures on delete are reported, not fatal.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use millstock_core::{DomainError, MaterialId};
use millstock_materials::{MaterialDraft, MaterialPatch, MaterialRecord};
use millstock_query::{self as query, MaterialFilter, Page, SortSpec};

use crate::assets::{AssetError, AssetStore};
use crate::store::{MaterialStore, StoreError};

/// Mutation service failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("persistence failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        // A vanished row is a caller-facing not-found, not a backend fault.
        match error {
            StoreError::Missing(_) => ServiceError::Domain(DomainError::NotFound),
            other => ServiceError::Store(other),
        }
    }
}

/// Outcome of a delete: the record is always gone; the asset removal may have
/// failed independently.
#[derive(Debug)]
pub struct DeleteReport {
    pub id: MaterialId,
    /// `None`: no asset existed or it was removed cleanly.
    pub asset_error: Option<AssetError>,
}

/// Create/update/adjust/delete over a [`MaterialStore`], with best-effort
/// image cleanup through an [`AssetStore`].
#[derive(Debug, Clone)]
pub struct MaterialService<S, A> {
    store: S,
    assets: A,
}

impl<S, A> MaterialService<S, A>
where
    S: MaterialStore,
    A: AssetStore,
{
    pub fn new(store: S, assets: A) -> Self {
        Self { store, assets }
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Validate a draft, assign identity and timestamps, persist.
    pub async fn create(&self, draft: MaterialDraft) -> Result<MaterialRecord, ServiceError> {
        let record = draft.build(MaterialId::new(), Utc::now())?;
        self.store.insert(record.clone()).await?;
        debug!(id = %record.id, name = %record.name, "material created");
        Ok(record)
    }

    /// Merge a patch into an existing record and persist the result.
    pub async fn update(
        &self,
        id: MaterialId,
        patch: MaterialPatch,
    ) -> Result<MaterialRecord, ServiceError> {
        let mut record = self.load(id).await?;
        record.apply_patch(patch, Utc::now())?;
        self.store.replace(id, record.clone()).await?;
        Ok(record)
    }

    /// Apply a signed stock delta; positive deltas stamp `last_restocked`.
    pub async fn adjust_stock(
        &self,
        id: MaterialId,
        delta: f64,
    ) -> Result<MaterialRecord, ServiceError> {
        let mut record = self.load(id).await?;
        record.adjust_stock(delta, Utc::now())?;
        self.store.replace(id, record.clone()).await?;
        debug!(id = %id, delta, stock = record.stock, "stock adjusted");
        Ok(record)
    }

    /// Remove the record, then best-effort remove its image asset.
    ///
    /// Asset-removal failure is reported in the [`DeleteReport`] and logged,
    /// but the record deletion stands: the record must be gone from
    /// `list_all` regardless. This asymmetry is deliberate and observable.
    pub async fn delete(&self, id: MaterialId) -> Result<DeleteReport, ServiceError> {
        let record = self.load(id).await?;
        self.store.remove(id).await?;

        let asset_error = match record.image {
            Some(image) => match self.assets.remove(&image).await {
                Ok(()) => None,
                Err(e) => {
                    warn!(id = %id, asset = %image, error = %e, "image asset removal failed");
                    Some(e)
                }
            },
            None => None,
        };

        Ok(DeleteReport { id, asset_error })
    }

    pub async fn get(&self, id: MaterialId) -> Result<MaterialRecord, ServiceError> {
        self.load(id).await
    }

    /// Run the query engine over the full collection, then paginate.
    pub async fn query(
        &self,
        filter: &MaterialFilter,
        sort: SortSpec,
        page: Option<Page>,
    ) -> Result<Vec<MaterialRecord>, ServiceError> {
        let records = self.store.list_all().await?;
        let view = query::run(&records, filter, sort);
        Ok(match page {
            Some(page) => page.apply(view),
            None => view,
        })
    }

    async fn load(&self, id: MaterialId) -> Result<MaterialRecord, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotFound))
    }
}
