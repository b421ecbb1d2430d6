//! Aggregate statistics over the whole feedback log.
//!
//! Returned by FeedbackRepository::get_stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub total_events: i64,
    pub liked_events: i64,
    pub disliked_events: i64,
    pub unique_users: i64,
    pub first_event: Option<DateTime<Utc>>,
    pub last_event: Option<DateTime<Utc>>,
}
