//! Common error types for token resolution and persistence

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while resolving a bearer token
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header, or an empty token
    #[error("No token provided")]
    MissingToken,

    /// Signature check failed or the payload carries no usable user id
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Errors that can occur in analysis stores
#[derive(Debug, Error)]
pub enum StoreError {
    /// Owner referenced by a new analysis does not exist
    #[error("User not found: {0}")]
    UserNotFound(i32),

    /// Analysis row does not exist (or is not visible to the caller)
    #[error("Analysis not found: {0}")]
    AnalysisNotFound(i32),

    /// Stored row could not be mapped back into a model
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// True when the error means the targeted row is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::UserNotFound(_) | StoreError::AnalysisNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(StoreError::UserNotFound(1).is_not_found());
        assert!(StoreError::AnalysisNotFound(7).is_not_found());
        assert!(!StoreError::Database("boom".into()).is_not_found());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AuthError::MissingToken.to_string(), "No token provided");
        assert_eq!(
            StoreError::AnalysisNotFound(42).to_string(),
            "Analysis not found: 42"
        );
    }
}
