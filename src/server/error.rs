//! Error-to-HTTP response conversion.
//!
//! Wraps [`cinelog_core::Error`] so route handlers can return
//! `Result<T, AppError>` and get the status mapping and JSON error body
//! for free via `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Wrapper implementing `IntoResponse` for the core error type.
pub struct AppError(cinelog_core::Error);

impl From<cinelog_core::Error> for AppError {
    fn from(inner: cinelog_core::Error) -> Self {
        Self(inner)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Client errors are the caller's problem; server errors get logged.
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Server error in API handler");
        }

        let code = match &self.0 {
            cinelog_core::Error::NotFound { .. } => "not_found",
            cinelog_core::Error::Validation(_) => "validation_error",
            cinelog_core::Error::Conflict(_) => "conflict",
            cinelog_core::Error::Metadata(_) => "metadata_error",
            cinelog_core::Error::Database { .. } => "database_error",
            cinelog_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.0.to_string(),
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}
