//! Infrastructure wiring: store/asset selection behind one service bundle.

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use millstock_infra::{
    AssetStore, FsAssetStore, InMemoryAssetStore, InMemoryMaterialStore, MaterialService,
    MaterialStore, PostgresMaterialStore,
};

/// Service bundle injected into every handler.
pub struct AppServices {
    materials: MaterialService<Arc<dyn MaterialStore>, Arc<dyn AssetStore>>,
}

impl AppServices {
    pub fn materials(&self) -> &MaterialService<Arc<dyn MaterialStore>, Arc<dyn AssetStore>> {
        &self.materials
    }

    /// Fully in-memory bundle (tests, dev).
    pub fn in_memory() -> Self {
        Self::assemble(
            Arc::new(InMemoryMaterialStore::new()),
            Arc::new(InMemoryAssetStore::new()),
        )
    }

    /// Environment-driven bundle: Postgres when `DATABASE_URL` is set,
    /// filesystem assets when `MILLSTOCK_ASSET_DIR` is set, in-memory
    /// fallbacks otherwise.
    pub async fn from_env() -> anyhow::Result<Self> {
        let store: Arc<dyn MaterialStore> = match std::env::var("DATABASE_URL") {
            Ok(url) => {
                let pool = PgPool::connect(&url)
                    .await
                    .context("failed to connect to DATABASE_URL")?;
                let store = PostgresMaterialStore::new(pool);
                store
                    .ensure_schema()
                    .await
                    .context("failed to prepare materials schema")?;
                tracing::info!("material store: postgres");
                Arc::new(store)
            }
            Err(_) => {
                tracing::warn!("DATABASE_URL not set; material store: in-memory");
                Arc::new(InMemoryMaterialStore::new())
            }
        };

        let assets: Arc<dyn AssetStore> = match std::env::var("MILLSTOCK_ASSET_DIR") {
            Ok(dir) => {
                tracing::info!(dir = %dir, "asset store: filesystem");
                Arc::new(FsAssetStore::new(dir))
            }
            Err(_) => Arc::new(InMemoryAssetStore::new()),
        };

        Ok(Self::assemble(store, assets))
    }

    fn assemble(store: Arc<dyn MaterialStore>, assets: Arc<dyn AssetStore>) -> Self {
        Self {
            materials: MaterialService::new(store, assets),
        }
    }
}
