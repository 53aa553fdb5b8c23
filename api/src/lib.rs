//! HTTP layer of the agricultural advisory service.
//!
//! Routes:
//! - `POST /get-advisory`: `{farmer_data, question}` → `{advisory}`
//! - `GET /health`: provider checks

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};
pub use crate::routes::{
    advisory::advisory_request::{AdvisoryRequest, AdvisoryResponse},
    health::health_route::HealthReport,
};

use crate::{
    middleware_layer::json_extractor::json_error_mapper,
    routes::{advisory::get_advisory_route::get_advisory, health::health_route::health},
};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

/// Builds the application router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get-advisory", post(get_advisory))
        .route("/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(Arc::new(state))
}

/// Serves on an already-bound listener until Ctrl+C.
///
/// # Errors
/// [`AppError::Server`] if the server loop fails.
pub async fn serve(listener: TcpListener, state: AppState) -> AppResult<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

/// Binds `API_ADDRESS` (default `0.0.0.0:8000`) and serves until Ctrl+C.
///
/// # Errors
/// [`AppError::Bind`] if the address cannot be bound, [`AppError::Server`] if
/// the server loop fails.
pub async fn start(state: AppState) -> AppResult<()> {
    let addr = env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string());

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, "listening");

    serve(listener, state).await?;
    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        // Without a signal handler, keep serving until the process is killed.
        std::future::pending::<()>().await;
    }
}
