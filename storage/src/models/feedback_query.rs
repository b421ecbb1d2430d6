//! Query parameters for paging through the feedback log.
//!
//! Used by FeedbackRepository::query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stay_core::Polarity;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackQuery {
    pub user_id: Option<String>,
    pub polarity: Option<Polarity>,
    /// Only events at or after this instant.
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    /// Pagination offset (used with limit).
    pub offset: Option<i64>,
}

impl FeedbackQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn page(mut self, offset: i64, limit: i64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }
}
