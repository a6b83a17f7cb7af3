//! HTTP error type and its mapping onto status codes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use casebook_cases::CaseError;
use casebook_store::StoreError;

use crate::metrics::HTTP_ERRORS_TOTAL;

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session accompanied the request.
    #[error("Unauthorized")]
    Unauthorized,

    /// A case, step, or milestone does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request body or parameters were rejected.
    #[error("{0}")]
    BadRequest(String),

    /// Storage or runtime failure. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client.
    ///
    /// Internal details (SQL text, file paths) are replaced with a generic
    /// message.
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<CaseError> for ApiError {
    fn from(err: CaseError) -> Self {
        match err {
            CaseError::NotFound { .. } => Self::NotFound(err.to_string()),
            CaseError::Validation(message) => Self::BadRequest(message),
            CaseError::Database(_) | CaseError::Serialization(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Internal(detail) => error!(status = status.as_u16(), %detail, "request failed"),
            _ => warn!(status = status.as_u16(), error = %self, "request rejected"),
        }
        metrics::counter!(HTTP_ERRORS_TOTAL, "status" => status.as_u16().to_string())
            .increment(1);

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}
