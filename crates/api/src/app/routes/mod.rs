use axum::Router;

pub mod materials;
pub mod system;

pub fn router() -> Router {
    Router::new().nest("/materials", materials::router())
}
