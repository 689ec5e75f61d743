//! Bearer token resolution
//!
//! Turns an `Authorization` header value into a [`Caller`]:
//! - absent or empty: [`AuthError::MissingToken`]
//! - the literal `guest`: [`Caller::Guest`], never verified
//! - anything else: an HS256 JWT whose payload must carry a numeric
//!   `userId` claim
//!
//! Resolution does not check that the user exists; that is left to the
//! store lookup that follows.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Sentinel token for anonymous callers
pub const GUEST_TOKEN: &str = "guest";

/// Fallback signing secret used when none is configured. Must be replaced
/// in any real deployment.
pub const DEFAULT_JWT_SECRET: &str = "secret";

/// Who is making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// Guest sentinel; results are returned but never stored
    Guest,
    /// Verified token naming a user id
    User(i32),
}

impl Caller {
    /// User id for authenticated callers
    pub fn user_id(&self) -> Option<i32> {
        match self {
            Caller::Guest => None,
            Caller::User(id) => Some(*id),
        }
    }
}

/// JWT payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Verifies (and, for tooling, issues) HS256 tokens with a shared secret
#[derive(Clone)]
pub struct TokenResolver {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl TokenResolver {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is checked when present, not required
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Resolve a raw `Authorization` header value.
    ///
    /// A leading `Bearer ` is stripped when present; a bare token is
    /// accepted as-is.
    pub fn resolve(&self, header: Option<&str>) -> Result<Caller, AuthError> {
        let token = header
            .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
            .unwrap_or("");

        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        if token == GUEST_TOKEN {
            return Ok(Caller::Guest);
        }

        self.verify(token).map(Caller::User)
    }

    /// Verify a signed token and extract the user id
    pub fn verify(&self, token: &str) -> Result<i32, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let user_id = data.claims.user_id;
        if user_id <= 0 {
            return Err(AuthError::InvalidToken(format!(
                "userId must be positive, got {}",
                user_id
            )));
        }

        i32::try_from(user_id)
            .map_err(|_| AuthError::InvalidToken(format!("userId out of range: {}", user_id)))
    }

    /// Sign a token for the given user
    pub fn issue(&self, user_id: i32) -> Result<String, AuthError> {
        let claims = Claims {
            user_id: user_id.into(),
            iat: Some(Utc::now().timestamp()),
            exp: None,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
