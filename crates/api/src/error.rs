use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use irs_core::error::CoreError;
use irs_core::schema::FieldErrors;
use irs_db::DbError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`DbError`] for store errors,
/// and adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `irs_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store error from `irs_db`.
    #[error("Store error: {0}")]
    Database(#[from] DbError),

    /// The multipart body could not be read: malformed, truncated or over
    /// the body limit. The status comes from the extractor.
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Core(errors.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Database(err) => classify_db_error(err),

            AppError::Multipart(err) => classify_multipart_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Keep the extractor's status: 413 for an oversized body, 400 otherwise.
fn classify_multipart_error(err: &MultipartError) -> (StatusCode, &'static str, String) {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        (status, "PAYLOAD_TOO_LARGE", err.body_text())
    } else if status.is_client_error() {
        (status, "BAD_REQUEST", err.body_text())
    } else {
        tracing::error!(error = %err, "Multipart read failed");
        internal()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404.
/// - `UniqueViolation` maps to 409.
/// - `WeakPassword` maps to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_db_error(err: &DbError) -> (StatusCode, &'static str, String) {
    match err {
        DbError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        DbError::UniqueViolation(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        DbError::WeakPassword(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        other => {
            tracing::error!(error = %other, "Store error");
            internal()
        }
    }
}
