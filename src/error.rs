use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

/// Message returned to the browser for every server-side failure.
pub const GENERIC_FAILURE: &str = "Failed to process submission";

#[derive(Debug)]
pub enum SubmitError {
    /// Payload missing, malformed, or rejected by strict validation. Nothing was stored.
    Input(String),
    /// The record store append failed. No notification was attempted.
    Persistence { submission_id: Uuid, cause: String },
    /// The row was stored but the operator was not notified.
    Notification { submission_id: Uuid, cause: String },
    RateLimited { retry_after: u64 },
    PayloadTooLarge { limit: usize },
    Internal(String),
}

impl SubmitError {
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::Input(_) => "input",
            SubmitError::Persistence { .. } => "persistence",
            SubmitError::Notification { .. } => "notification",
            SubmitError::RateLimited { .. } => "rate_limited",
            SubmitError::PayloadTooLarge { .. } => "payload_too_large",
            SubmitError::Internal(_) => "internal",
        }
    }

    pub fn submission_id(&self) -> Option<Uuid> {
        match self {
            SubmitError::Persistence { submission_id, .. }
            | SubmitError::Notification { submission_id, .. } => Some(*submission_id),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Input(msg) => write!(f, "Invalid input: {msg}"),
            SubmitError::Persistence { submission_id, cause } => {
                write!(f, "Failed to record submission {submission_id}: {cause}")
            }
            SubmitError::Notification { submission_id, cause } => write!(
                f,
                "Submission {submission_id} recorded but not notified: {cause}"
            ),
            SubmitError::RateLimited { retry_after } => {
                write!(f, "Rate limited, retry after {retry_after}s")
            }
            SubmitError::PayloadTooLarge { limit } => {
                write!(f, "Body exceeds {limit} bytes")
            }
            SubmitError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        if let SubmitError::RateLimited { retry_after } = self {
            tracing::warn!(kind = self.kind(), "{self}");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.to_string())],
                axum::Json(json!({ "error": "Too many submissions" })),
            )
                .into_response();
        }

        if let SubmitError::PayloadTooLarge { .. } = self {
            tracing::warn!(kind = self.kind(), "{self}");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                axum::Json(json!({ "error": "Submission too large" })),
            )
                .into_response();
        }

        match &self {
            SubmitError::Input(_) => tracing::warn!(kind = self.kind(), "{self}"),
            // Already logged with the full row by the pipeline.
            SubmitError::Notification { .. } => tracing::debug!(
                kind = self.kind(),
                submission_id = ?self.submission_id(),
                "{self}"
            ),
            _ => tracing::error!(
                kind = self.kind(),
                submission_id = ?self.submission_id(),
                "{self}"
            ),
        }

        let body = json!({ "error": GENERIC_FAILURE });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
