//! # In-Memory Feedback Store
//!
//! In-memory implementation of the `FeedbackStore` and `ProfileStore` traits from `stay-core`.
//!
//! **Advantages**:
//! - No I/O, nothing to set up
//! - Good for tests and local experiments
//!
//! **Limitations**:
//! - Data is lost on restart
//!
//! ## Example
//!
//! ```rust
//! use feedback_inmemory::InMemoryFeedbackStore;
//! use stay_core::{FeedbackEvent, FeedbackStore, ListingSnapshot, Polarity};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), stay_core::StayError> {
//!     let store = InMemoryFeedbackStore::new();
//!     let listing = ListingSnapshot::new("l1", "Loft", 120.0, "Lisbon");
//!     store.append(&FeedbackEvent::new("user123", listing, Polarity::Like)).await?;
//!     assert_eq!(store.count_by_user("user123").await?, 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Thread Safety
//!
//! Both maps sit behind `Arc<RwLock<>>`; clones share the same data.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stay_core::{FeedbackEvent, FeedbackStore, PreferenceProfile, ProfileStore, StayError};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Per-user log plus first/last activity.
#[derive(Debug, Clone)]
struct UserLog {
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    events: Vec<FeedbackEvent>,
}

/// In-memory feedback log and profile table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedbackStore {
    logs: Arc<RwLock<HashMap<String, UserLog>>>,
    profiles: Arc<RwLock<HashMap<String, PreferenceProfile>>>,
}

impl InMemoryFeedbackStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of events across users.
    pub async fn len(&self) -> usize {
        let logs = self.logs.read().await;
        logs.values().map(|l| l.events.len()).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of users that have recorded at least one event.
    pub async fn user_count(&self) -> usize {
        self.logs.read().await.len()
    }

    /// First-seen time of `user_id`, if the user exists.
    pub async fn user_created_at(&self, user_id: &str) -> Option<DateTime<Utc>> {
        self.logs.read().await.get(user_id).map(|l| l.created_at)
    }

    pub async fn user_last_active(&self, user_id: &str) -> Option<DateTime<Utc>> {
        self.logs.read().await.get(user_id).map(|l| l.last_active)
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn append(&self, event: &FeedbackEvent) -> stay_core::Result<()> {
        let now = Utc::now();
        let mut logs = self.logs.write().await;
        let log = logs.entry(event.user_id.clone()).or_insert_with(|| UserLog {
            created_at: now,
            last_active: now,
            events: Vec::new(),
        });

        if log.events.iter().any(|e| e.same_submission(event)) {
            return Err(StayError::DuplicateFeedback(format!(
                "user {} already sent {} for listing {} at {}",
                event.user_id, event.polarity, event.listing.id, event.created_at
            )));
        }

        // keep the log sorted by timestamp; equal timestamps stay in insertion order
        let pos = log.events.partition_point(|e| e.created_at <= event.created_at);
        log.events.insert(pos, event.clone());
        log.last_active = now;
        drop(logs);

        info!(
            id = %event.id,
            user_id = %event.user_id,
            listing_id = %event.listing.id,
            polarity = %event.polarity,
            "Feedback event appended to in-memory store"
        );
        Ok(())
    }

    async fn list_by_user(&self, user_id: &str) -> stay_core::Result<Vec<FeedbackEvent>> {
        let logs = self.logs.read().await;
        let events = logs
            .get(user_id)
            .map(|l| l.events.clone())
            .unwrap_or_default();
        debug!(user_id = %user_id, count = events.len(), "In-memory list_by_user returned");
        Ok(events)
    }

    async fn count_by_user(&self, user_id: &str) -> stay_core::Result<u64> {
        let logs = self.logs.read().await;
        Ok(logs.get(user_id).map(|l| l.events.len() as u64).unwrap_or(0))
    }
}

#[async_trait]
impl ProfileStore for InMemoryFeedbackStore {
    async fn save_profile(&self, user_id: &str, profile: &PreferenceProfile) -> stay_core::Result<()> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(user_id.to_string(), profile.clone());
        Ok(())
    }

    async fn load_profile(&self, user_id: &str) -> stay_core::Result<Option<PreferenceProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use stay_core::{ListingSnapshot, Polarity};

    fn create_test_event(user_id: &str, listing_id: &str, at: DateTime<Utc>) -> FeedbackEvent {
        let listing = ListingSnapshot::new(listing_id, "Test listing", 100.0, "Lisbon");
        FeedbackEvent::at(user_id, listing, Polarity::Like, at)
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_append_and_list() {
        let store = InMemoryFeedbackStore::new();
        let event = create_test_event("user123", "l1", base());

        store.append(&event).await.unwrap();

        let events = store.list_by_user("user123").await.unwrap();
        assert_eq!(events, vec![event]);
        assert_eq!(store.count_by_user("user123").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_unknown_user_is_empty() {
        let store = InMemoryFeedbackStore::new();
        assert!(store.list_by_user("ghost").await.unwrap().is_empty());
        assert_eq!(store.count_by_user("ghost").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_sorted_by_timestamp() {
        let store = InMemoryFeedbackStore::new();
        store
            .append(&create_test_event("u", "late", base() + Duration::hours(1)))
            .await
            .unwrap();
        store.append(&create_test_event("u", "early", base())).await.unwrap();
        store
            .append(&create_test_event("u", "tie", base() + Duration::hours(1)))
            .await
            .unwrap();

        let ids: Vec<String> = store
            .list_by_user("u")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.listing.id)
            .collect();
        assert_eq!(ids, vec!["early", "late", "tie"]);
    }

    #[tokio::test]
    async fn test_duplicate_rejected() {
        let store = InMemoryFeedbackStore::new();
        store.append(&create_test_event("u", "l1", base())).await.unwrap();

        let err = store
            .append(&create_test_event("u", "l1", base()))
            .await
            .unwrap_err();
        assert!(matches!(err, StayError::DuplicateFeedback(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_user_bookkeeping() {
        let store = InMemoryFeedbackStore::new();
        assert!(store.is_empty().await);
        assert!(store.user_created_at("u").await.is_none());

        store.append(&create_test_event("u", "l1", base())).await.unwrap();
        let created = store.user_created_at("u").await.unwrap();
        store
            .append(&create_test_event("u", "l2", base() + Duration::minutes(1)))
            .await
            .unwrap();

        assert_eq!(store.user_created_at("u").await, Some(created));
        assert!(store.user_last_active("u").await.unwrap() >= created);
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_profile_roundtrip() {
        let store = InMemoryFeedbackStore::new();
        assert!(store.load_profile("u").await.unwrap().is_none());

        let mut profile = PreferenceProfile::empty();
        profile.feedback_count = 3;
        store.save_profile("u", &profile).await.unwrap();

        assert_eq!(store.load_profile("u").await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let store = InMemoryFeedbackStore::new();
        let clone = store.clone();
        store.append(&create_test_event("u", "l1", base())).await.unwrap();
        assert_eq!(clone.len().await, 1);
    }
}
