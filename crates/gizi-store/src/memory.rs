//! In-memory store
//!
//! All state sits behind one `RwLock`, so `user_with_analyses` observes a
//! single snapshot the same way the PostgreSQL transaction does.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use gizi_core::{
    Analysis, AnalysisStore, NewAnalysis, StoreError, StoreResult, User, UserAnalyses,
};
use parking_lot::RwLock;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    analyses: BTreeMap<i32, Analysis>,
    next_user_id: i32,
    next_analysis_id: i32,
}

#[derive(Default)]
pub struct MemoryAnalysisStore {
    tables: RwLock<Tables>,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user and return it with its assigned id
    pub fn insert_user(&self, name: &str, email: &str) -> User {
        let mut tables = self.tables.write();
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    /// Total number of stored analyses across all users
    pub fn analysis_count(&self) -> usize {
        self.tables.read().analyses.len()
    }

    /// Look up a single analysis
    pub fn analysis(&self, id: i32) -> Option<Analysis> {
        self.tables.read().analyses.get(&id).cloned()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn user_with_analyses(&self, user_id: i32) -> StoreResult<UserAnalyses> {
        let tables = self.tables.read();
        Ok(UserAnalyses {
            user: tables.users.get(&user_id).cloned(),
            analyses: tables
                .analyses
                .values()
                .filter(|a| a.user_id == user_id)
                .cloned()
                .collect(),
        })
    }

    async fn create_analysis(&self, analysis: NewAnalysis) -> StoreResult<Analysis> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&analysis.user_id) {
            return Err(StoreError::UserNotFound(analysis.user_id));
        }

        tables.next_analysis_id += 1;
        let stored = analysis.into_analysis(tables.next_analysis_id);
        tables.analyses.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete_analysis(&self, id: i32) -> StoreResult<()> {
        self.tables
            .write()
            .analyses
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::AnalysisNotFound(id))
    }

    async fn delete_owned_analysis(&self, id: i32, owner: i32) -> StoreResult<()> {
        let mut tables = self.tables.write();
        match tables.analyses.get(&id) {
            Some(a) if a.user_id == owner => {
                tables.analyses.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::AnalysisNotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gizi_core::NutritionStatus;

    fn new_analysis(user_id: i32, status: NutritionStatus) -> NewAnalysis {
        NewAnalysis {
            user_id,
            name: "A".to_string(),
            age: 24,
            gender: "laki-laki".to_string(),
            height: 69.3,
            weight: 8.2,
            status,
            analysis_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = MemoryAnalysisStore::new();
        let user = store.insert_user("Ibu Sari", "sari@example.com");

        let first = store
            .create_analysis(new_analysis(user.id, NutritionStatus::Normal))
            .await
            .unwrap();
        let second = store
            .create_analysis(new_analysis(user.id, NutritionStatus::Stunting))
            .await
            .unwrap();
        assert!(second.id > first.id);

        let view = store.user_with_analyses(user.id).await.unwrap();
        assert_eq!(view.user, Some(user));
        let ids: Vec<i32> = view.analyses.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_listing_is_scoped_to_user() {
        let store = MemoryAnalysisStore::new();
        let a = store.insert_user("a", "a@example.com");
        let b = store.insert_user("b", "b@example.com");
        store
            .create_analysis(new_analysis(a.id, NutritionStatus::Tinggi))
            .await
            .unwrap();

        let view = store.user_with_analyses(b.id).await.unwrap();
        assert!(view.analyses.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = MemoryAnalysisStore::new();
        let view = store.user_with_analyses(99).await.unwrap();
        assert!(view.user.is_none());

        let err = store
            .create_analysis(new_analysis(99, NutritionStatus::Normal))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound(99)));
        assert_eq!(store.analysis_count(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryAnalysisStore::new();
        let user = store.insert_user("a", "a@example.com");
        let stored = store
            .create_analysis(new_analysis(user.id, NutritionStatus::SeverelyStunting))
            .await
            .unwrap();

        store.delete_analysis(stored.id).await.unwrap();
        assert!(store.analysis(stored.id).is_none());

        let err = store.delete_analysis(stored.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_owned_delete_refuses_foreign_rows() {
        let store = MemoryAnalysisStore::new();
        let owner = store.insert_user("a", "a@example.com");
        let other = store.insert_user("b", "b@example.com");
        let stored = store
            .create_analysis(new_analysis(owner.id, NutritionStatus::Normal))
            .await
            .unwrap();

        let err = store
            .delete_owned_analysis(stored.id, other.id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AnalysisNotFound(_)));
        assert!(store.analysis(stored.id).is_some());

        store
            .delete_owned_analysis(stored.id, owner.id)
            .await
            .unwrap();
        assert_eq!(store.analysis_count(), 0);
    }
}
