//! gizi-predict - Client for the external nutrition status predictor
//!
//! The predictor is a third-party ML service exposing
//! `POST /predict` with `{umur, tinggi, jenis_kelamin}` and answering
//! `{status_gizi: string}`. This crate owns that wire contract and turns
//! the answer into a [`gizi_core::NutritionStatus`].
//!
//! # Usage
//!
//! ```ignore
//! use gizi_predict::{PredictionInput, PredictorClient};
//!
//! let client = PredictorClient::new("https://predictor.example")?;
//! let status = client.predict(&PredictionInput::new(age, height, gender)).await?;
//! ```

pub mod client;
pub mod error;

pub use client::{
    PredictionInput, PredictionOutput, PredictorClient, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_PREDICTOR_URL, DEFAULT_TIMEOUT,
};
pub use error::{PredictError, Result};
