//! Kirana Catalog - product catalog API service.
//!
//! # Architecture
//!
//! - Axum handlers own validation and typed filter construction
//! - MongoDB document store holds product records (soft-deleted, never
//!   removed)
//! - Product images are PUT to an S3-compatible object store and referenced
//!   by durable URL
//!
//! # Security
//!
//! The service itself carries no authentication; it is expected to sit
//! behind the gateway that terminates auth. It only reaches the catalog
//! database and the image bucket.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kirana_catalog::config::CatalogConfig;
use kirana_catalog::db::{self, MongoProductStore};
use kirana_catalog::routes;
use kirana_catalog::services::HttpBlobUploader;
use kirana_catalog::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = CatalogConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kirana_catalog=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to MongoDB
    let database = db::connect(&config.database_url, &config.database_name)
        .await
        .expect("Failed to connect to MongoDB");
    tracing::info!(database = %config.database_name, "Database client created");

    // Build application state
    let store = Arc::new(MongoProductStore::new(&database));
    let uploader = Arc::new(HttpBlobUploader::new(&config.storage));
    let state = AppState::new(config, store, uploader);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    // Start server
    let addr = state.config().socket_addr();
    tracing::info!("catalog listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies store connectivity before returning OK.
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
