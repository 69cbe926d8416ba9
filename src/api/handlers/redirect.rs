//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Every successful resolve counts one hit against the link.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 Internal Server Error if the stored URL can't be sent as a
/// `Location` header.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.shortener.resolve_code(&code).await?;

    let location = HeaderValue::try_from(original_url).map_err(|e| {
        tracing::error!(%code, error = %e, "Stored URL is not a valid Location header");
        AppError::internal("Internal server error", json!({}))
    })?;

    metrics::counter!("shortlink_redirects_total").increment(1);
    tracing::debug!(%code, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
