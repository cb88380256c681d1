//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::DashError;
use crate::server::handlers::{
    dashboard_handler, health_handler, refresh_handler, status_handler, task_detail_handler,
    version_detail_handler, version_handler,
};
use crate::server::state::ServerState;

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), DashError>>, DashError> {
    let app = Router::new()
        // Rendered pages
        .route("/", get(dashboard_handler))
        .route("/tasks/{task_id}", get(task_detail_handler))
        .route(
            "/apps/{app_id}/versions/{version}",
            get(version_detail_handler),
        )
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Store status and manual refresh
        .route("/status", get(status_handler))
        .route("/refresh", post(refresh_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting dashboard server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| DashError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| DashError::ServerError(e.to_string()))
    });

    Ok(handle)
}
