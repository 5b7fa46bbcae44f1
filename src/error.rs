//! Unified error taxonomy for the HTTP surface.
//!
//! Every failure that can reach a client response is represented here so the
//! handlers stay `Result`-returning instead of building ad hoc response
//! tuples. See `gateway/types/response.rs` in the trading gateway for the
//! `ApiError` + `IntoResponse` shape this generalizes; unlike that gateway's
//! `{code, msg, data}` envelope, these variants render the literal bodies the
//! order surface requires.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String, error: Option<String> },

    #[error("{message}")]
    PayloadTooLarge { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Internal { message: String, error: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into(), error: None }
    }

    pub fn bad_request_with_detail(message: impl Into<String>, error: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into(), error: Some(error.into()) }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge { message: message.into() }
    }

    pub fn not_found() -> Self {
        ApiError::NotFound { message: "Not found".to_string() }
    }

    pub fn internal(message: impl Into<String>, error: impl Into<String>) -> Self {
        ApiError::Internal { message: message.into(), error: error.into() }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            ApiError::BadRequest { message, error: Some(error) } => {
                json!({ "message": message, "error": error })
            }
            ApiError::BadRequest { message, error: None } => json!({ "message": message }),
            ApiError::PayloadTooLarge { message } => json!({ "message": message }),
            ApiError::NotFound { message } => json!({ "message": message }),
            ApiError::Internal { message, error } => {
                json!({ "message": message, "error": error })
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), message = %self, "request rejected");
        (status, Json(self.body())).into_response()
    }
}
