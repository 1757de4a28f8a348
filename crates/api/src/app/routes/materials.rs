use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use millstock_core::MaterialId;
use millstock_materials::{MaterialDraft, MaterialPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_materials).post(create_material))
        .route(
            "/:id",
            get(get_material).put(update_material).delete(delete_material),
        )
        .route("/:id/adjust", post(adjust_stock))
}

pub async fn list_materials(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListMaterialsQuery>,
) -> axum::response::Response {
    let filter = query.filter();
    let sort = query.sort();
    let page = query.page();

    match services.materials().query(&filter, sort, page).await {
        Ok(view) => (StatusCode::OK, Json(dto::materials_to_json(&view))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_material(
    Extension(services): Extension<Arc<AppServices>>,
    Json(draft): Json<MaterialDraft>,
) -> axum::response::Response {
    match services.materials().create(draft).await {
        Ok(record) => (StatusCode::CREATED, Json(dto::material_to_json(&record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_material(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MaterialId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid material id");
        }
    };

    match services.materials().get(id).await {
        Ok(record) => (StatusCode::OK, Json(dto::material_to_json(&record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_material(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<MaterialPatch>,
) -> axum::response::Response {
    let id: MaterialId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid material id");
        }
    };

    match services.materials().update(id, patch).await {
        Ok(record) => (StatusCode::OK, Json(dto::material_to_json(&record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    let id: MaterialId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid material id");
        }
    };

    match services.materials().adjust_stock(id, body.delta).await {
        Ok(record) => (StatusCode::OK, Json(dto::material_to_json(&record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_material(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MaterialId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid material id");
        }
    };

    match services.materials().delete(id).await {
        Ok(report) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": report.id.to_string(),
                "deleted": true,
                "asset_error": report.asset_error.map(|e| e.to_string()),
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
