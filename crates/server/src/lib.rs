//! CapsuleHaus server library.
//!
//! Exposes the application modules for the CLI and integration tests.
//! The binary entry point lives in `main.rs`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router, including the session layer.
///
/// The Sentry tower layers are added by the binary; tests drive this
/// router directly.
#[must_use]
pub fn app(app_state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(app_state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the data directory is writable before returning OK.
/// Returns 503 Service Unavailable if the store backend is broken.
async fn readiness(State(app_state): State<AppState>) -> StatusCode {
    match app_state.stores().products.count() {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
