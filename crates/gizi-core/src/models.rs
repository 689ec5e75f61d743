//! Persisted models
//!
//! Field names serialize in camelCase (`userId`, `analysisDate`) to stay
//! wire compatible with the existing form UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recommendation::NutritionStatus;

/// Account that owns analyses. Accounts are created by the registration
/// service; this service only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// One stored classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: i32,
    pub user_id: i32,
    /// Child's name
    pub name: String,
    /// Age in months
    pub age: i32,
    /// "laki-laki" or "perempuan"; not validated
    pub gender: String,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    pub status: NutritionStatus,
    pub analysis_date: DateTime<Utc>,
}

/// Analysis row to insert; the id is assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    pub user_id: i32,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub status: NutritionStatus,
    pub analysis_date: DateTime<Utc>,
}

impl NewAnalysis {
    /// Attach the store-assigned id
    pub fn into_analysis(self, id: i32) -> Analysis {
        Analysis {
            id,
            user_id: self.user_id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            status: self.status,
            analysis_date: self.analysis_date,
        }
    }
}

/// User record and its analyses, read as one consistent snapshot.
///
/// `user` is `None` when the token names an id with no row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnalyses {
    pub user: Option<User>,
    pub analyses: Vec<Analysis>,
}
