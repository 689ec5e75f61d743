//! API error types and conversions
//!
//! Response bodies are always `{"error": <message>}`. The messages are fixed
//! per kind so callers cannot tell, for example, a missing token from a bad
//! signature; the detail is only logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gizi_core::{AuthError, StoreError};
use gizi_predict::PredictError;
use serde::Serialize;

/// Message for POST auth failures
pub const MSG_UNAUTHORIZED: &str = "Unauthorized";
/// Collapsed message for every GET/DELETE failure
pub const MSG_UNAUTHORIZED_OR_INVALID: &str = "Unauthorized or invalid token";
pub const MSG_PREDICTION_FAILED: &str = "Prediction API failed";
pub const MSG_PREDICTION_INVALID: &str = "Prediction result invalid";
pub const MSG_INTERNAL: &str = "Internal Server Error";

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 401 - no Authorization header or empty token
    MissingToken,
    /// 401 - signature, payload, or guest where a user is required
    InvalidToken(String),
    /// 400 - predictor unreachable, timed out, or non-2xx
    PredictorUnavailable(String),
    /// 400 - predictor answered without a recognized label
    InvalidPrediction(String),
    /// 500 - write failed (unknown owner, unusable field values, database)
    PersistenceFailure(String),
    /// 500 - anything else (e.g. malformed request body)
    Unexpected(String),
    /// 401 - any failure on the history routes, collapsed to one message
    Rejected(Box<ApiError>),
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl ApiError {
    /// Collapse any failure into the generic 401 used by GET and DELETE
    pub fn into_rejection(self) -> Self {
        match self {
            ApiError::Rejected(_) => self,
            other => ApiError::Rejected(Box::new(other)),
        }
    }

    /// Status code and public message
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingToken | ApiError::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, MSG_UNAUTHORIZED)
            }
            ApiError::PredictorUnavailable(_) => (StatusCode::BAD_REQUEST, MSG_PREDICTION_FAILED),
            ApiError::InvalidPrediction(_) => (StatusCode::BAD_REQUEST, MSG_PREDICTION_INVALID),
            ApiError::PersistenceFailure(_) | ApiError::Unexpected(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
            }
            ApiError::Rejected(_) => (StatusCode::UNAUTHORIZED, MSG_UNAUTHORIZED_OR_INVALID),
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::MissingToken => "no token provided".to_string(),
            ApiError::InvalidToken(msg)
            | ApiError::PredictorUnavailable(msg)
            | ApiError::InvalidPrediction(msg)
            | ApiError::PersistenceFailure(msg)
            | ApiError::Unexpected(msg) => msg.clone(),
            ApiError::Rejected(inner) => inner.detail(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let detail = self.detail();

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(error = message, %detail, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = message, %detail, "API client error");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::MissingToken,
            AuthError::InvalidToken(msg) => ApiError::InvalidToken(msg),
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        if err.is_unavailable() {
            ApiError::PredictorUnavailable(err.to_string())
        } else {
            ApiError::InvalidPrediction(err.to_string())
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::PersistenceFailure(err.to_string())
    }
}
