//! HTTP error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use recipe::RequestError;
use serde::Serialize;
use thiserror::Error;

/// A request the API refused to process.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The body was not valid JSON for the endpoint.
    #[error("invalid request body")]
    Body(#[from] JsonRejection),

    /// The body decoded but the request itself is unusable.
    #[error("invalid request: {0}")]
    Request(#[from] RequestError),
}

/// Wire shape of every error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub status: &'static str,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Body(rejection) => rejection.status(),
            Self::Request(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn body(&self) -> ErrorResponse {
        let detail = match self {
            Self::Body(rejection) => Some(rejection.body_text()),
            Self::Request(_) => None,
        };
        ErrorResponse {
            error: self.to_string(),
            detail,
            status: "error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(%status, error = %self, "rejecting request");
        (status, Json(self.body())).into_response()
    }
}
