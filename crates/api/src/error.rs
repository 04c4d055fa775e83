use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sprig_core::error::CoreError;
use sprig_reminder::ReminderError;
use sprig_store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds collaborator and
/// HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{ok: false, error, code}` JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `sprig_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A document-store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A fatal reminder-run error (manual trigger).
    #[error(transparent)]
    Reminder(#[from] ReminderError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

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
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Store(err) => {
                tracing::error!(error = %err, "Document store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "An internal error occurred".to_string(),
                )
            }

            // The manual trigger surfaces the fatal reason verbatim, the
            // same way the scheduled trigger logs it.
            AppError::Reminder(err) => {
                tracing::error!(error = %err, "Reminder run failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REMINDER_FAILED",
                    err.to_string(),
                )
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "ok": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
