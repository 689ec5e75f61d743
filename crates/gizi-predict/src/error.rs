//! Error types for predictor calls

use thiserror::Error;

/// Result type alias for predictor operations
pub type Result<T> = std::result::Result<T, PredictError>;

/// Errors that can occur while asking the predictor for a status
#[derive(Error, Debug)]
pub enum PredictError {
    /// Invalid predictor URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport failure or non-success HTTP status
    #[error("Predictor unavailable: {0}")]
    Unavailable(String),

    /// No answer within the configured timeout
    #[error("Predictor timed out")]
    Timeout,

    /// Answer lacked `status_gizi` or carried an unknown label
    #[error("Invalid prediction: {0}")]
    InvalidPrediction(String),
}

impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PredictError::Timeout
        } else {
            PredictError::Unavailable(err.to_string())
        }
    }
}

impl PredictError {
    /// True for failures reaching the predictor (as opposed to a bad answer)
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            PredictError::Unavailable(_) | PredictError::Timeout | PredictError::InvalidUrl(_)
        )
    }
}
