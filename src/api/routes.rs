//! API route configuration.

use crate::api::handlers::{
    health_handler, redirect_handler, shorten_handler, storage_health_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `GET  /healthz`         - Liveness check
/// - `GET  /healthz/storage` - Storage readiness check
/// - `POST /shorten`         - Create a short link
/// - `GET  /{code}`          - Redirect to the original URL
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/healthz/storage", get(storage_health_handler))
        .route("/shorten", post(shorten_handler))
        .route("/{code}", get(redirect_handler))
}
