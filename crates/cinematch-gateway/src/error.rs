use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to bind {0}: {1}")]
    Bind(String, std::io::Error),
    #[error("server error: {0}")]
    Server(String),
}

/// Errors returned to HTTP callers. Messages are fixed and never carry
/// internal detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Only POST requests are allowed.")]
    MethodNotAllowed,
    #[error("Input is required and must be a string.")]
    InvalidInput,
    #[error("Failed to process input.")]
    ProcessingFailed,
    #[error("Internal server error.")]
    InternalError,
}

impl ApiError {
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::ProcessingFailed | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        if self == Self::MethodNotAllowed {
            (self.status(), [(header::ALLOW, "POST")], body).into_response()
        } else {
            (self.status(), body).into_response()
        }
    }
}
