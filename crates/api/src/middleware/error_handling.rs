//! # Error Handling Middleware
//!
//! Maps domain-specific errors to HTTP status codes and JSON error responses,
//! so every handler reports failures the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use careslot_core::errors::ClinicError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps a `ClinicError` and implements `IntoResponse`. Handlers
/// return `Result<_, AppError>` and use `?` on core and store results.
#[derive(Debug)]
pub struct AppError(pub ClinicError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClinicError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
            ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::MalformedTimestamp(_) => StatusCode::BAD_REQUEST,
            ClinicError::InvalidTransition(_) => StatusCode::CONFLICT,
            ClinicError::SlotConflict { .. } => StatusCode::CONFLICT,
            ClinicError::SlotUnavailable(_) => StatusCode::CONFLICT,
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ClinicError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Automatic conversion from ClinicError to AppError
impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError(err)
    }
}

/// Store failures surface as `ClinicError::Database`
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ClinicError::Database(err))
    }
}
