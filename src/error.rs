use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::ShortenerError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Unavailable { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Unavailable { message, details } => ("unavailable", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Maps a core failure onto its HTTP shape.
///
/// Server-side failures are logged here with their full cause; the response
/// body only carries a generic message.
impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        metrics::counter!("shortlink_request_errors_total", "kind" => error_kind(&err))
            .increment(1);

        match err {
            ShortenerError::InvalidUrl(url) => AppError::bad_request(
                "url must be an absolute http or https URL",
                json!({ "url": url }),
            ),
            ShortenerError::NotFound(code) => {
                AppError::not_found("Short link not found", json!({ "code": code }))
            }
            ShortenerError::Cancelled => {
                tracing::warn!("Storage deadline exceeded");
                AppError::unavailable("Storage did not respond in time", json!({}))
            }
            ShortenerError::ExhaustedRetries { attempts } => {
                tracing::error!(attempts, "Short code space exhausted");
                AppError::internal("Could not allocate a short code", json!({}))
            }
            ShortenerError::Randomness(e) => {
                tracing::error!(error = %e, "Random source failure");
                AppError::internal("Internal server error", json!({}))
            }
            ShortenerError::Storage(e) => {
                tracing::error!(error = %e, "Storage failure");
                AppError::internal("Internal server error", json!({}))
            }
        }
    }
}

fn error_kind(err: &ShortenerError) -> &'static str {
    match err {
        ShortenerError::InvalidUrl(_) => "invalid_url",
        ShortenerError::NotFound(_) => "not_found",
        ShortenerError::Cancelled => "cancelled",
        ShortenerError::ExhaustedRetries { .. } => "exhausted_retries",
        ShortenerError::Randomness(_) => "randomness",
        ShortenerError::Storage(_) => "storage",
    }
}
