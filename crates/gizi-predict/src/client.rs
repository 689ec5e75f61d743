//! Predictor HTTP client implementation

use std::time::Duration;

use gizi_core::NutritionStatus;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{PredictError, Result};

/// Hosted predictor used when none is configured
pub const DEFAULT_PREDICTOR_URL: &str = "https://web-production-b0bea.up.railway.app";
/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Request body sent to `/predict`.
///
/// Values are forwarded exactly as the caller submitted them; the predictor
/// does its own validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub umur: serde_json::Value,
    pub tinggi: serde_json::Value,
    pub jenis_kelamin: serde_json::Value,
}

impl PredictionInput {
    /// Build from the form fields (age, height, gender)
    pub fn new(
        age: serde_json::Value,
        height: serde_json::Value,
        gender: serde_json::Value,
    ) -> Self {
        Self {
            umur: age,
            tinggi: height,
            jenis_kelamin: gender,
        }
    }
}

/// Response body from `/predict`; only `status_gizi` is consumed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionOutput {
    #[serde(default)]
    pub status_gizi: Option<serde_json::Value>,
}

impl PredictionOutput {
    /// Map the raw label onto a known status
    pub fn status(&self) -> Result<NutritionStatus> {
        let label = match &self.status_gizi {
            Some(serde_json::Value::String(label)) if !label.is_empty() => label,
            Some(other) => {
                return Err(PredictError::InvalidPrediction(format!(
                    "status_gizi is not a label: {}",
                    other
                )))
            }
            None => {
                return Err(PredictError::InvalidPrediction(
                    "missing status_gizi".to_string(),
                ))
            }
        };

        NutritionStatus::from_label(label)
            .ok_or_else(|| PredictError::InvalidPrediction(format!("unknown label: {}", label)))
    }
}

/// Client for the external prediction service
#[derive(Debug, Clone)]
pub struct PredictorClient {
    client: Client,
    base_url: Url,
}

impl PredictorClient {
    /// Create a new predictor client with default timeouts
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the predictor (e.g., "https://predictor.example")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new predictor client with custom timeouts
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| PredictError::Unavailable(e.to_string()))?;

        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of the prediction endpoint, below any base path
    pub fn predict_url(&self) -> Result<Url> {
        Ok(self.base_url.join("predict")?)
    }

    /// Ask the predictor to classify one child.
    ///
    /// Exactly one HTTP call, no retries.
    #[instrument(skip(self, input))]
    pub async fn predict(&self, input: &PredictionInput) -> Result<NutritionStatus> {
        let url = self.predict_url()?;
        debug!(%url, "Requesting prediction");

        let response = self.client.post(url).json(input).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Predictor returned failure status");
            return Err(PredictError::Unavailable(format!(
                "predictor responded with HTTP {}",
                status.as_u16()
            )));
        }

        let output: PredictionOutput = response
            .json()
            .await
            .map_err(|e| PredictError::InvalidPrediction(e.to_string()))?;

        let prediction = output.status()?;
        debug!(status = %prediction, "Prediction received");

        Ok(prediction)
    }
}
