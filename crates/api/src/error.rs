use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use sar_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for pipeline errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON
/// error bodies carrying the stable error code and the structured
/// diagnostic parameters.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from the rendering pipeline.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, params) = match &self {
            AppError::Core(core) => {
                let status = match core {
                    // The configuration id came from the caller.
                    CoreError::ServiceConfigurationNotFound { .. } => StatusCode::NOT_FOUND,
                    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                    // Integrity and rendering failures are internal:
                    // nothing the request originator can fix.
                    CoreError::ServiceTemplateEmpty { .. }
                    | CoreError::ServiceTemplateHashMismatch { .. }
                    | CoreError::ServiceTemplatePublishFailure { .. }
                    | CoreError::TemplateResourceNotFound { .. }
                    | CoreError::TemplateRender(_)
                    | CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!(
                        code = core.code(),
                        params = %core.params(),
                        "Render pipeline error"
                    );
                }
                (status, core.code(), core.to_string(), Some(core.params()))
            }

            AppError::Database(err) => {
                let (status, code, message) = classify_sqlx_error(err);
                (status, code, message, None)
            }

            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
        };

        let body = json!({
            "error": message,
            "code": code,
            "params": params,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates constraint {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
            )
        }
    }
}
