//! Analysis handlers
//!
//! `/analyst` carries three verbs:
//! - GET: the caller's user record and stored analyses
//! - POST: classify a child through the predictor, answer with
//!   recommendations, and store the result for non-guest callers
//! - DELETE: remove one analysis, then answer like GET
//!
//! GET and DELETE report every failure as the same 401 body.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use gizi_core::{Caller, NewAnalysis, NutritionStatus, UserAnalyses};
use gizi_predict::PredictionInput;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::AuthHeader;
use crate::error::ApiError;
use crate::state::AppState;

/// POST body. Fields are kept as raw JSON and forwarded to the predictor
/// untouched; they are only typed when a row is written.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisSubmission {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub age: Value,
    #[serde(default)]
    pub gender: Value,
    #[serde(default)]
    pub height: Value,
    #[serde(default)]
    pub weight: Value,
}

impl AnalysisSubmission {
    /// Payload for the predictor: age, height and gender only
    pub fn prediction_input(&self) -> PredictionInput {
        PredictionInput::new(self.age.clone(), self.height.clone(), self.gender.clone())
    }

    /// Typed row for the store
    pub fn into_new_analysis(
        self,
        user_id: i32,
        status: NutritionStatus,
        analysis_date: DateTime<Utc>,
    ) -> Result<NewAnalysis, ApiError> {
        Ok(NewAnalysis {
            user_id,
            name: text_field(&self.name, "name")?,
            age: integer_field(&self.age, "age")?,
            gender: text_field(&self.gender, "gender")?,
            height: number_field(&self.height, "height")?,
            weight: number_field(&self.weight, "weight")?,
            status,
            analysis_date,
        })
    }
}

fn text_field(value: &Value, field: &str) -> Result<String, ApiError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| ApiError::PersistenceFailure(format!("{} must be a string", field)))
}

fn number_field(value: &Value, field: &str) -> Result<f64, ApiError> {
    value
        .as_f64()
        .ok_or_else(|| ApiError::PersistenceFailure(format!("{} must be a number", field)))
}

fn integer_field(value: &Value, field: &str) -> Result<i32, ApiError> {
    let whole = match value.as_i64() {
        Some(n) => Some(n),
        None => value.as_f64().filter(|n| n.fract() == 0.0).map(|n| n as i64),
    };

    whole
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| ApiError::PersistenceFailure(format!("{} must be an integer", field)))
}

/// POST response. Field names are part of the wire contract.
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    /// Label exactly as the predictor returned it
    pub status: &'static str,
    pub rekomendasi: &'static [&'static str],
}

impl From<NutritionStatus> for AnalysisResult {
    fn from(status: NutritionStatus) -> Self {
        Self {
            status: status.label(),
            rekomendasi: status.recommendations(),
        }
    }
}

/// DELETE body
#[derive(Debug, Deserialize)]
pub struct DeleteAnalysisRequest {
    pub id: i32,
}

/// GET /analyst
/// The caller's user record and all of their analyses
pub async fn list_analyses(
    State(state): State<AppState>,
    auth: AuthHeader,
) -> Result<Json<UserAnalyses>, ApiError> {
    let history = async {
        let user_id = auth.user_id(&state)?;
        load_history(&state, user_id).await
    };

    history.await.map_err(ApiError::into_rejection)
}

async fn load_history(state: &AppState, user_id: i32) -> Result<Json<UserAnalyses>, ApiError> {
    let history = state.store().user_with_analyses(user_id).await?;
    Ok(Json(history))
}

/// POST /analyst
/// Classify, recommend, and store for authenticated callers
pub async fn create_analysis(
    State(state): State<AppState>,
    auth: AuthHeader,
    body: Bytes,
) -> Result<Json<AnalysisResult>, ApiError> {
    let submission: AnalysisSubmission = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Unexpected(format!("malformed request body: {}", e)))?;

    let status = state
        .predictor()
        .predict(&submission.prediction_input())
        .await?;
    let result = AnalysisResult::from(status);

    let user_id = match auth.caller(&state)? {
        Caller::Guest => {
            info!(status = %status, "Guest analysis, not stored");
            return Ok(Json(result));
        }
        Caller::User(id) => id,
    };

    let analysis = submission.into_new_analysis(user_id, status, Utc::now())?;
    let stored = state.store().create_analysis(analysis).await?;
    info!(
        analysis_id = stored.id,
        user_id,
        status = stored.status.as_str(),
        "Analysis stored"
    );

    Ok(Json(result))
}

/// DELETE /analyst
/// Remove one analysis and return the refreshed history
pub async fn delete_analysis(
    State(state): State<AppState>,
    auth: AuthHeader,
    body: Bytes,
) -> Result<Json<UserAnalyses>, ApiError> {
    remove_and_reload(&state, &auth, &body)
        .await
        .map_err(ApiError::into_rejection)
}

async fn remove_and_reload(
    state: &AppState,
    auth: &AuthHeader,
    body: &[u8],
) -> Result<Json<UserAnalyses>, ApiError> {
    let request: DeleteAnalysisRequest = serde_json::from_slice(body)
        .map_err(|e| ApiError::Unexpected(format!("malformed request body: {}", e)))?;
    let user_id = auth.user_id(state)?;

    let deleted = if state.enforce_ownership() {
        state
            .store()
            .delete_owned_analysis(request.id, user_id)
            .await
    } else {
        state.store().delete_analysis(request.id).await
    };
    if let Err(err) = &deleted {
        if err.is_not_found() {
            info!(analysis_id = request.id, user_id, "No analysis to delete");
        }
    }
    deleted?;
    info!(analysis_id = request.id, user_id, "Analysis deleted");

    load_history(state, user_id).await
}
