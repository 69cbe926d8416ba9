//! Handlers for health check endpoints.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, LivenessResponse};
use crate::state::AppState;

/// Reports that the process is up.
///
/// # Endpoint
///
/// `GET /healthz`
///
/// Always answers `200 {"status":"ok"}` without touching storage.
pub async fn health_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "ok".to_string(),
    })
}

/// Returns storage health status.
///
/// # Endpoint
///
/// `GET /healthz/storage`
///
/// # Response Codes
///
/// - **200 OK**: Storage reachable
/// - **503 Service Unavailable**: Storage check failed
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "checks": {
///     "storage": { "status": "ok", "backend": "postgres" }
///   }
/// }
/// ```
pub async fn storage_health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let repository = state.shortener.repository();
    let backend = repository.backend_name().to_string();
    let healthy = repository.health_check().await;

    let storage = if healthy {
        CheckStatus {
            status: "ok".to_string(),
            backend,
            message: None,
        }
    } else {
        tracing::warn!(backend = %backend, "Storage health check failed");
        CheckStatus {
            status: "error".to_string(),
            backend,
            message: Some("Storage unreachable".to_string()),
        }
    };

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks { storage },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
