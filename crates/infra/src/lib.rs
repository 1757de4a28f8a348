//! Infrastructure layer: persistence and asset-storage collaborators plus the
//! record mutation service that sits on top of them.

pub mod assets;
pub mod service;
pub mod store;

pub use assets::{AssetError, AssetStore, FsAssetStore, InMemoryAssetStore};
pub use service::{DeleteReport, MaterialService, ServiceError};
pub use store::{InMemoryMaterialStore, MaterialStore, PostgresMaterialStore, StoreError};
