use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers::{batch_predict, health, ping, predict, root};
use crate::app_state::AppState;
use crate::config::ServiceConfig;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ping", get(ping))
        .route("/predict", post(predict))
        .route("/batch_predict", post(batch_predict))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C.
///
/// # Errors
/// Returns `ServiceError::Io` if the listener cannot be bound or the server
/// fails while running.
pub async fn serve(config: &ServiceConfig, state: Arc<AppState>) -> crate::Result<()> {
    let pool = state.pool.clone();
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {e}"),
    }
}
