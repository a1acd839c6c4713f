//! Synchronous rejection reasons for `POST /process`.

use asynccalc_core::ValidationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors that reject a request before any task unit is created.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request")]
    BadRequest,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("server is shutting down")]
    ShuttingDown,
}

impl ProcessError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::BadRequest | Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ProcessError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
