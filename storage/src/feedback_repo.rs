//! Feedback repository: append-only feedback log, user bookkeeping and profile persistence.
//!
//! Uses SqlitePoolManager and the models (FeedbackRecord, FeedbackQuery, FeedbackStats, UserRecord).
//! External: SQLite via sqlx; the service layer talks to it through the `FeedbackStore` and
//! `ProfileStore` traits.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use stay_core::{FeedbackEvent, FeedbackStore, PreferenceProfile, ProfileStore};
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::models::{FeedbackQuery, FeedbackRecord, FeedbackStats, UserRecord};
use crate::sqlite_pool::SqlitePoolManager;
use crate::timestamp::{format_ts, parse_ts};

const EVENT_COLUMNS: &str = "id, user_id, listing_id, polarity, price, listing_json, created_at";

#[derive(Clone)]
pub struct FeedbackRepository {
    pool_manager: SqlitePoolManager,
}

impl FeedbackRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                last_active TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS feedback_events (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                user_id TEXT NOT NULL REFERENCES users(user_id),
                listing_id TEXT NOT NULL,
                polarity TEXT NOT NULL CHECK (polarity IN ('like', 'dislike')),
                price REAL NOT NULL,
                listing_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (user_id, listing_id, polarity, created_at)
            );

            CREATE TABLE IF NOT EXISTS preference_profiles (
                user_id TEXT PRIMARY KEY REFERENCES users(user_id),
                profile_json TEXT NOT NULL,
                feedback_count INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_feedback_user_time ON feedback_events(user_id, created_at, seq);
            CREATE INDEX IF NOT EXISTS idx_feedback_polarity ON feedback_events(polarity);
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// Appends one event and touches its user row in a single transaction.
    pub async fn save_event(&self, event: &FeedbackEvent) -> Result<(), StorageError> {
        let record = FeedbackRecord::from_event(event)?;
        let now = format_ts(&Utc::now());

        let mut tx = self.pool_manager.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (user_id, created_at, last_active)
            VALUES (?1, ?2, ?2)
            ON CONFLICT(user_id) DO UPDATE SET last_active = excluded.last_active
            "#,
        )
        .bind(&record.user_id)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO feedback_events (id, user_id, listing_id, polarity, price, listing_json, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.listing_id)
        .bind(&record.polarity)
        .bind(record.price)
        .bind(&record.listing_json)
        .bind(&record.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            id = %record.id,
            user_id = %record.user_id,
            listing_id = %record.listing_id,
            polarity = %record.polarity,
            "Saved feedback event"
        );
        Ok(())
    }

    /// Returns events matching `query`, oldest first.
    pub async fn query(&self, query: &FeedbackQuery) -> Result<Vec<FeedbackEvent>, StorageError> {
        let pool = self.pool_manager.pool();
        let mut sql = format!("SELECT {} FROM feedback_events WHERE 1=1", EVENT_COLUMNS);
        let mut params: Vec<String> = Vec::new();

        if let Some(uid) = &query.user_id {
            sql.push_str(" AND user_id = ?");
            params.push(uid.clone());
        }

        if let Some(polarity) = query.polarity {
            sql.push_str(" AND polarity = ?");
            params.push(polarity.as_str().to_string());
        }

        if let Some(since) = &query.since {
            sql.push_str(" AND created_at >= ?");
            params.push(format_ts(since));
        }

        sql.push_str(" ORDER BY created_at ASC, seq ASC");

        match (query.limit, query.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset)),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        let mut query_builder = sqlx::query_as::<_, FeedbackRecord>(&sql);
        for param in &params {
            query_builder = query_builder.bind(param);
        }

        let records: Vec<FeedbackRecord> = query_builder.fetch_all(pool).await?;
        debug!("Retrieved {} feedback events", records.len());

        records.into_iter().map(FeedbackRecord::into_event).collect()
    }

    pub async fn list_events(&self, user_id: &str) -> Result<Vec<FeedbackEvent>, StorageError> {
        self.query(&FeedbackQuery::for_user(user_id)).await
    }

    pub async fn count_events(&self, user_id: &str) -> Result<u64, StorageError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM feedback_events WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count.0.max(0) as u64)
    }

    pub async fn get_stats(&self) -> Result<FeedbackStats, StorageError> {
        let pool = self.pool_manager.pool();

        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN polarity = 'like' THEN 1 ELSE 0 END), 0) AS liked,
                COALESCE(SUM(CASE WHEN polarity = 'dislike' THEN 1 ELSE 0 END), 0) AS disliked,
                COUNT(DISTINCT user_id) AS users,
                MIN(created_at) AS first_event,
                MAX(created_at) AS last_event
            FROM feedback_events
            "#,
        )
        .fetch_one(pool)
        .await?;

        let first_event: Option<String> = row.try_get("first_event")?;
        let last_event: Option<String> = row.try_get("last_event")?;

        Ok(FeedbackStats {
            total_events: row.try_get("total")?,
            liked_events: row.try_get("liked")?,
            disliked_events: row.try_get("disliked")?,
            unique_users: row.try_get("users")?,
            first_event: first_event.as_deref().map(parse_ts).transpose()?,
            last_event: last_event.as_deref().map(parse_ts).transpose()?,
        })
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query("SELECT user_id, created_at, last_active FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let created_at: String = row.try_get("created_at")?;
        let last_active: String = row.try_get("last_active")?;
        Ok(Some(UserRecord {
            user_id: row.try_get("user_id")?,
            created_at: parse_ts(&created_at)?,
            last_active: parse_ts(&last_active)?,
        }))
    }

    /// Replaces the stored profile of `user_id`. Creates the user row if it does not exist yet.
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        profile: &PreferenceProfile,
    ) -> Result<(), StorageError> {
        let profile_json = serde_json::to_string(profile)?;
        let now = format_ts(&Utc::now());

        let mut tx = self.pool_manager.pool().begin().await?;

        sqlx::query(
            "INSERT INTO users (user_id, created_at, last_active) VALUES (?1, ?2, ?2) ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO preference_profiles (user_id, profile_json, feedback_count, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                profile_json = excluded.profile_json,
                feedback_count = excluded.feedback_count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(&profile_json)
        .bind(profile.feedback_count as i64)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            user_id = %user_id,
            feedback_count = profile.feedback_count,
            "Stored preference profile"
        );
        Ok(())
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<PreferenceProfile>, StorageError> {
        let json: Option<(String,)> =
            sqlx::query_as("SELECT profile_json FROM preference_profiles WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(self.pool_manager.pool())
                .await?;

        let Some((json,)) = json else {
            return Ok(None);
        };
        // profiles are derived; an unreadable row is treated as missing and gets rebuilt
        match serde_json::from_str(&json) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Discarding unreadable stored profile");
                Ok(None)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &sqlx::SqlitePool {
        self.pool_manager.pool()
    }
}

#[async_trait]
impl FeedbackStore for FeedbackRepository {
    async fn append(&self, event: &FeedbackEvent) -> stay_core::Result<()> {
        Ok(self.save_event(event).await?)
    }

    async fn list_by_user(&self, user_id: &str) -> stay_core::Result<Vec<FeedbackEvent>> {
        Ok(self.list_events(user_id).await?)
    }

    async fn count_by_user(&self, user_id: &str) -> stay_core::Result<u64> {
        Ok(self.count_events(user_id).await?)
    }
}

#[async_trait]
impl ProfileStore for FeedbackRepository {
    async fn save_profile(&self, user_id: &str, profile: &PreferenceProfile) -> stay_core::Result<()> {
        Ok(self.upsert_profile(user_id, profile).await?)
    }

    async fn load_profile(&self, user_id: &str) -> stay_core::Result<Option<PreferenceProfile>> {
        Ok(self.get_profile(user_id).await?)
    }
}
