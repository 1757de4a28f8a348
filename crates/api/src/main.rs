use std::sync::Arc;

use millstock_api::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    millstock_observability::init();

    let services = app::services::AppServices::from_env().await?;
    let router = app::build_app(Arc::new(services));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;
    Ok(())
}
