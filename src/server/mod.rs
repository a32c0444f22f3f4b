//! HTTP boundary.
//!
//! | Route | Method | Body |
//! |---|---|---|
//! | `/analyze` | `POST` | `multipart/form-data` with an `image` file field |
//! | `/health` | `GET` | none |
//!
//! Every origin, method and header is accepted, credentials included. Upload
//! size is not limited here. Classification runs on the blocking pool so a
//! large image never stalls the accept loop.

pub mod error;
pub mod handlers;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ServeError};

use crate::config::ServerConfig;
use crate::imaging::supported_formats;

/// Build the application router.
pub fn router() -> Router {
    Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig) -> Result<(), ServeError> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;

    let local = listener.local_addr()?;
    let formats: Vec<_> = supported_formats().collect();
    tracing::info!(addr = %local, ?formats, "Listening");

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
