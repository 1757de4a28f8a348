//! Filesystem-backed asset store.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use millstock_materials::AssetRef;

use super::{AssetError, AssetStore};

/// Flat directory of asset files.
///
/// Stored names are `<uuid>-<sanitized suggested name>`, so references never
/// collide and never contain path separators. `remove` refuses any reference
/// that is not one of our flat names.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, asset: &AssetRef) -> Result<PathBuf, AssetError> {
        let name = asset.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(AssetError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    #[instrument(skip(self, bytes), fields(len = bytes.len()), err)]
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<AssetRef, AssetError> {
        let name = unique_asset_name(suggested_name)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AssetError::Io(e.to_string()))?;
        tokio::fs::write(self.root.join(&name), bytes)
            .await
            .map_err(|e| AssetError::Io(e.to_string()))?;

        Ok(AssetRef::new(name))
    }

    #[instrument(skip(self), fields(asset = %asset), err)]
    async fn remove(&self, asset: &AssetRef) -> Result<(), AssetError> {
        let path = self.resolve(asset)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::Missing(asset.as_str().to_string()))
            }
            Err(e) => Err(AssetError::Io(e.to_string())),
        }
    }
}

/// `<uuid>-<sanitized name>`: collision-proof, flat, shell-safe.
pub(crate) fn unique_asset_name(suggested: &str) -> Result<String, AssetError> {
    let sanitized: String = suggested
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(['_', '.', '-']).is_empty() {
        return Err(AssetError::InvalidName(suggested.to_string()));
    }

    Ok(format!("{}-{sanitized}", Uuid::now_v7()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_names_are_flat_and_unique() {
        let a = unique_asset_name("loom photo.png").unwrap();
        let b = unique_asset_name("loom photo.png").unwrap();
        assert_ne!(a, b);
        assert!(a.ends_with("loom_photo.png"));
        assert!(!a.contains('/'));
    }

    #[test]
    fn garbage_names_are_rejected() {
        assert!(unique_asset_name("///").is_err());
        assert!(unique_asset_name("").is_err());
    }
}
