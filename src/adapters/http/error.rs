//! HTTP error responses.

use crate::domain::jobs::TokenError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing id")]
    MissingId,

    #[error("Invalid id: {0}")]
    InvalidId(TokenError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingId | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(error = %self, "Request failed");
        let status = self.status_code();

        // Decoder details stay in the logs
        let body = match self {
            ApiError::MissingId => "Missing id",
            ApiError::InvalidId(_) => "Invalid id",
            ApiError::Internal(_) => "Internal error",
        };

        (status, body).into_response()
    }
}
