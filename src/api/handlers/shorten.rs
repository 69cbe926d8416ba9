//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Allocates a short code for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// **201 Created**
///
/// ```json
/// {
///   "code": "aZ3k9Q",
///   "short_url": "http://localhost:8080/aZ3k9Q"
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: body is not JSON, or `url` is missing or not an
///   absolute http(s) URL
/// - **500 Internal Server Error**: storage or randomness failure, or no free
///   code found within the retry budget
/// - **503 Service Unavailable**: storage deadline exceeded
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Request body must be JSON like {\"url\": \"...\"}",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    let created = state.shortener.create_short_url(&payload.url).await?;

    metrics::counter!("shortlink_links_created_total").increment(1);
    tracing::info!(code = %created.code, "Short link created");

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            code: created.code,
            short_url: created.short_url,
        }),
    ))
}
