use crate::config::Config;
use crate::store::TaskStore;
use axum::{response::Json, routing::get, Router};
use shared::HealthResponse;
use std::path::Path;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod tasks;

/// Builds the `/api` routes: task CRUD and the health check.
pub fn create_api_router(store: TaskStore) -> Router {
    Router::new()
        .merge(tasks::create_task_router(store))
        .route("/health", get(health_check_handler))
}

/// Builds the full application: the API under `/api`, with every other path
/// served from the built frontend in `static_dir`.
pub fn create_router(store: TaskStore, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .nest("/api", create_api_router(store))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Opens the store, serves until Ctrl-C and closes the store again.
///
/// In test mode the store is in memory and no listener is bound.
#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let store = TaskStore::open(config.storage()).await?;
    let app = create_router(store.clone(), &config.static_dir);

    if config.is_test() {
        tracing::info!("Test mode, not listening on port {}", config.port);
    } else {
        let server_address = format!("0.0.0.0:{}", config.port);
        let listener = tokio::net::TcpListener::bind(&server_address).await?;
        tracing::info!("Server is running on http://{}", server_address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tracing::instrument]
pub async fn health_check_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
