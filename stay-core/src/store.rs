//! # Persistence seams
//!
//! [`FeedbackStore`] holds the append-only feedback log and [`ProfileStore`] holds the derived
//! per-user profiles. Implemented by the SQLite repository in `storage` and by
//! `feedback-inmemory`.

use async_trait::async_trait;

use crate::error::Result;
use crate::profile::PreferenceProfile;
use crate::types::FeedbackEvent;

/// Append-only log of feedback events.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Durably appends `event`. Returns `DuplicateFeedback` if the same submission
    /// (user, listing id, polarity, timestamp) is already stored.
    async fn append(&self, event: &FeedbackEvent) -> Result<()>;

    /// All events of `user_id`, oldest first; events with equal timestamps keep insertion order.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<FeedbackEvent>>;

    /// Number of events recorded for `user_id`.
    async fn count_by_user(&self, user_id: &str) -> Result<u64>;
}

/// Durable read/write of derived profiles keyed by user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn save_profile(&self, user_id: &str, profile: &PreferenceProfile) -> Result<()>;

    async fn load_profile(&self, user_id: &str) -> Result<Option<PreferenceProfile>>;
}
