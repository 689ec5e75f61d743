//! PostgreSQL store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gizi_core::{
    Analysis, AnalysisStore, NewAnalysis, NutritionStatus, StoreError, StoreResult, User,
    UserAnalyses,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

/// Open a connection pool
pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Pool<Postgres>> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(db_err)
}

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn user_from_row(r: &PgRow) -> StoreResult<User> {
    Ok(User {
        id: r.try_get("id").map_err(db_err)?,
        name: r.try_get("name").map_err(db_err)?,
        email: r.try_get("email").map_err(db_err)?,
        created_at: r
            .try_get::<DateTime<Utc>, _>("createdAt")
            .map_err(db_err)?,
    })
}

fn analysis_from_row(r: &PgRow) -> StoreResult<Analysis> {
    let status: String = r.try_get("status").map_err(db_err)?;
    let status = NutritionStatus::from_storage(&status)
        .ok_or_else(|| StoreError::InvalidRecord(format!("unknown status: {}", status)))?;

    Ok(Analysis {
        id: r.try_get("id").map_err(db_err)?,
        user_id: r.try_get("userId").map_err(db_err)?,
        name: r.try_get("name").map_err(db_err)?,
        age: r.try_get("age").map_err(db_err)?,
        gender: r.try_get("gender").map_err(db_err)?,
        height: r.try_get("height").map_err(db_err)?,
        weight: r.try_get("weight").map_err(db_err)?,
        status,
        analysis_date: r
            .try_get::<DateTime<Utc>, _>("analysisDate")
            .map_err(db_err)?,
    })
}

#[derive(Clone)]
pub struct PgAnalysisStore {
    pool: Pool<Postgres>,
}

impl PgAnalysisStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create the `User` and `Analysis` tables if they are missing
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        info!("Database schema ready");
        Ok(())
    }

    /// Insert a user row. Registration lives elsewhere; this exists for
    /// seeding and tests.
    pub async fn create_user(&self, name: &str, email: &str) -> StoreResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO "User" ("name", "email")
            VALUES ($1, $2)
            RETURNING "id", "name", "email", "createdAt"
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        user_from_row(&row)
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn user_with_analyses(&self, user_id: i32) -> StoreResult<UserAnalyses> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Both reads must see the same snapshot
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let user_row = sqlx::query(
            r#"
            SELECT "id", "name", "email", "createdAt"
            FROM "User"
            WHERE "id" = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let analysis_rows = sqlx::query(
            r#"
            SELECT "id", "userId", "name", "age", "gender", "height", "weight",
                   "status", "analysisDate"
            FROM "Analysis"
            WHERE "userId" = $1
            ORDER BY "id"
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        let user = user_row.as_ref().map(user_from_row).transpose()?;
        let analyses = analysis_rows
            .iter()
            .map(analysis_from_row)
            .collect::<StoreResult<Vec<_>>>()?;

        debug!(user_id, count = analyses.len(), "Loaded analyses");
        Ok(UserAnalyses { user, analyses })
    }

    async fn create_analysis(&self, analysis: NewAnalysis) -> StoreResult<Analysis> {
        let user_id = analysis.user_id;
        let result = sqlx::query(
            r#"
            INSERT INTO "Analysis" (
                "userId",
                "name",
                "age",
                "gender",
                "height",
                "weight",
                "status",
                "analysisDate"
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING "id"
            "#,
        )
        .bind(analysis.user_id)
        .bind(&analysis.name)
        .bind(analysis.age)
        .bind(&analysis.gender)
        .bind(analysis.height)
        .bind(analysis.weight)
        .bind(analysis.status.as_str())
        .bind(analysis.analysis_date)
        .fetch_one(&self.pool)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                return Err(StoreError::UserNotFound(user_id));
            }
            Err(e) => return Err(db_err(e)),
        };

        let id: i32 = row.try_get("id").map_err(db_err)?;
        debug!(id, user_id, status = analysis.status.as_str(), "Analysis stored");
        Ok(analysis.into_analysis(id))
    }

    async fn delete_analysis(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM "Analysis" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AnalysisNotFound(id));
        }
        debug!(id, "Analysis deleted");
        Ok(())
    }

    async fn delete_owned_analysis(&self, id: i32, owner: i32) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM "Analysis" WHERE "id" = $1 AND "userId" = $2"#)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AnalysisNotFound(id));
        }
        debug!(id, owner, "Analysis deleted");
        Ok(())
    }
}
