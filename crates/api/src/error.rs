use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hookhub_core::error::CoreError;
use hookhub_events::{DeliveryError, IngestError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`], sqlx errors, and the service errors of
/// `hookhub_events`. Implements [`IntoResponse`] to produce consistent JSON
/// error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `hookhub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An inbound webhook was rejected or could not be stored.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A poll or interest edit failed.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Ingestion ---
            AppError::Ingest(err) => match err {
                IngestError::Signature => (
                    StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    "Signature verification failed".to_string(),
                ),
                IngestError::Payload(_) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Invalid JSON payload".to_string(),
                ),
                IngestError::Storage(db_err) => {
                    tracing::error!(error = %db_err, "Failed to store webhook event");
                    internal()
                }
            },

            // --- Delivery ---
            AppError::Delivery(err) => match err {
                DeliveryError::ClientNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Client with id {id} not found"),
                ),
                DeliveryError::Storage { client_id, source } => {
                    tracing::error!(client_id, error = %source, "Delivery storage failure");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),
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

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
