use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// A single violated input constraint, attributed to the field that failed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub msg: String,
    pub param: &'static str,
}

impl FieldError {
    pub fn new(param: &'static str, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param,
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(&'static str),

    /// Domain-level absence, answered 400 with a generic message.
    #[error("{0}")]
    NotFound(&'static str),

    /// Upstream lookup came back non-success.
    #[error("{0}")]
    UpstreamNotFound(&'static str),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::InvalidCredentials => {
                json!({ "errors": [{ "msg": "Invalid credentials" }] })
            }
            ApiError::Unauthorized(msg) => json!({ "msg": msg }),
            ApiError::NotFound(msg) => json!({ "msg": msg }),
            ApiError::UpstreamNotFound(msg) => json!({ "msg": msg }),
            ApiError::Internal(e) => {
                // Detail stays server-side, the caller only sees the generic message.
                error!(error = %e, "unhandled error");
                json!({ "msg": "Server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}
