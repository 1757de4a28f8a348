//! Postgres-backed material store.
//!
//! Records are persisted as one JSONB document per row, keyed by the material
//! id. The document is the single source of truth; derived values are never
//! stored (they are accessors on the deserialized record).
//!
//! ## Error mapping
//!
//! | SQLx error | PostgreSQL code | StoreError |
//! |---|---|---|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | any | `Backend` |
//! | PoolClosed / network / other | n/a | `Backend` |
//!
//! Missing rows on `replace`/`remove` are detected via `rows_affected` and
//! mapped to `StoreError::Missing`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use tracing::instrument;

use millstock_core::MaterialId;
use millstock_materials::MaterialRecord;

use super::{MaterialStore, StoreError};

/// Postgres document store for material records.
///
/// `Send + Sync`; the SQLx pool handles connection management, so the store
/// can be shared freely across tasks.
#[derive(Debug, Clone)]
pub struct PostgresMaterialStore {
    pool: Arc<PgPool>,
}

impl PostgresMaterialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the backing table when it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS materials (
                id UUID PRIMARY KEY,
                record JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e, None))?;
        Ok(())
    }

    fn decode(value: JsonValue) -> Result<MaterialRecord, StoreError> {
        serde_json::from_value(value)
            .map_err(|e| StoreError::Backend(format!("failed to decode material row: {e}")))
    }
}

#[async_trait]
impl MaterialStore for PostgresMaterialStore {
    #[instrument(skip(self), err)]
    async fn list_all(&self) -> Result<Vec<MaterialRecord>, StoreError> {
        let rows = sqlx::query("SELECT record FROM materials")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_all", e, None))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let value: JsonValue = row
                .try_get("record")
                .map_err(|e| map_sqlx_error("list_all", e, None))?;
            records.push(Self::decode(value)?);
        }
        Ok(records)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn get(&self, id: MaterialId) -> Result<Option<MaterialRecord>, StoreError> {
        let row = sqlx::query("SELECT record FROM materials WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e, Some(id)))?;

        match row {
            Some(row) => {
                let value: JsonValue = row
                    .try_get("record")
                    .map_err(|e| map_sqlx_error("get", e, Some(id)))?;
                Ok(Some(Self::decode(value)?))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, record), fields(id = %record.id), err)]
    async fn insert(&self, record: MaterialRecord) -> Result<(), StoreError> {
        let id = record.id;
        let value = serde_json::to_value(&record)
            .map_err(|e| StoreError::Backend(format!("failed to encode material: {e}")))?;

        sqlx::query("INSERT INTO materials (id, record) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(value)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e, Some(id)))?;
        Ok(())
    }

    #[instrument(skip(self, record), fields(id = %id), err)]
    async fn replace(&self, id: MaterialId, record: MaterialRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(&record)
            .map_err(|e| StoreError::Backend(format!("failed to encode material: {e}")))?;

        let result = sqlx::query("UPDATE materials SET record = $2, updated_at = now() WHERE id = $1")
            .bind(id.as_uuid())
            .bind(value)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("replace", e, Some(id)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn remove(&self, id: MaterialId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove", e, Some(id)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, error: sqlx::Error, id: Option<MaterialId>) -> StoreError {
    if let sqlx::Error::Database(db) = &error {
        if db.code().as_deref() == Some("23505") {
            if let Some(id) = id {
                return StoreError::Duplicate(id);
            }
        }
    }
    StoreError::Backend(format!("{operation}: {error}"))
}
