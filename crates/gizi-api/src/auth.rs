//! Bearer token extraction
//!
//! Handlers decide per route what a missing or guest token means, so the
//! extractor never rejects; it only hands over the raw header.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use gizi_core::Caller;

use crate::error::ApiError;
use crate::state::AppState;

/// Raw `Authorization` header value, if present and valid UTF-8
#[derive(Debug, Clone, Default)]
pub struct AuthHeader(pub Option<String>);

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        Ok(AuthHeader(header))
    }
}

impl AuthHeader {
    /// Resolve to a caller; guests allowed
    pub fn caller(&self, state: &AppState) -> Result<Caller, ApiError> {
        Ok(state.tokens().resolve(self.0.as_deref())?)
    }

    /// Resolve to an authenticated user id; guests rejected
    pub fn user_id(&self, state: &AppState) -> Result<i32, ApiError> {
        self.caller(state)?.user_id().ok_or_else(|| {
            tracing::debug!("Guest token used on a user-only route");
            ApiError::InvalidToken("guest token not accepted here".to_string())
        })
    }
}
