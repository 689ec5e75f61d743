//! AnalysisStore trait - the persistence seam behind the HTTP handlers

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{Analysis, NewAnalysis, UserAnalyses};

/// Storage for users and their analyses.
///
/// Implementations must serve [`AnalysisStore::user_with_analyses`] from a
/// single consistent snapshot so a concurrent write cannot produce a user
/// and analyses list from different points in time.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Read a user and all of that user's analyses in one consistency unit.
    /// Analyses come back in storage order (ascending id).
    async fn user_with_analyses(&self, user_id: i32) -> StoreResult<UserAnalyses>;

    /// Insert a new analysis. Fails with `UserNotFound` if the owner is absent.
    async fn create_analysis(&self, analysis: NewAnalysis) -> StoreResult<Analysis>;

    /// Delete an analysis by id regardless of owner.
    /// Fails with `AnalysisNotFound` if no such row exists.
    async fn delete_analysis(&self, id: i32) -> StoreResult<()>;

    /// Delete an analysis only if it belongs to `owner`.
    /// A row owned by someone else is reported as `AnalysisNotFound`.
    async fn delete_owned_analysis(&self, id: i32, owner: i32) -> StoreResult<()>;
}
