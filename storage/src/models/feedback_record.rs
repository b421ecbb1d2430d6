//! Row model for the `feedback_events` table.
//!
//! The listing snapshot is stored as JSON; listing id and price are duplicated into columns for
//! the uniqueness constraint and ad-hoc queries.

use serde::{Deserialize, Serialize};
use stay_core::{FeedbackEvent, ListingSnapshot, Polarity};
use uuid::Uuid;

use crate::error::StorageError;
use crate::timestamp::{format_ts, parse_ts};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedbackRecord {
    pub id: String,
    pub user_id: String,
    pub listing_id: String,
    pub polarity: String,
    pub price: f64,
    pub listing_json: String,
    pub created_at: String,
}

impl FeedbackRecord {
    pub fn from_event(event: &FeedbackEvent) -> Result<Self, StorageError> {
        Ok(Self {
            id: event.id.to_string(),
            user_id: event.user_id.clone(),
            listing_id: event.listing.id.clone(),
            polarity: event.polarity.as_str().to_string(),
            price: event.listing.price,
            listing_json: serde_json::to_string(&event.listing)?,
            created_at: format_ts(&event.created_at),
        })
    }

    pub fn into_event(self) -> Result<FeedbackEvent, StorageError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StorageError::Serialization(format!("bad event id '{}': {}", self.id, e)))?;
        let polarity: Polarity = self
            .polarity
            .parse()
            .map_err(|e: stay_core::StayError| StorageError::Serialization(e.to_string()))?;
        let listing: ListingSnapshot = serde_json::from_str(&self.listing_json)?;

        Ok(FeedbackEvent {
            id,
            user_id: self.user_id,
            listing,
            polarity,
            created_at: parse_ts(&self.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_event() {
        let listing = ListingSnapshot::new("l1", "Loft", 99.5, "Lisbon")
            .with_amenities(["WiFi", "Kitchen"])
            .with_rating(4.6, 31);
        let event = FeedbackEvent::new("u1", listing, Polarity::Dislike);

        let record = FeedbackRecord::from_event(&event).unwrap();
        assert_eq!(record.listing_id, "l1");
        assert_eq!(record.polarity, "dislike");

        let back = record.into_event().unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_corrupt_polarity_is_serialization_error() {
        let event = FeedbackEvent::new(
            "u1",
            ListingSnapshot::new("l1", "Loft", 99.5, "Lisbon"),
            Polarity::Like,
        );
        let mut record = FeedbackRecord::from_event(&event).unwrap();
        record.polarity = "maybe".into();
        assert!(matches!(
            record.into_event(),
            Err(StorageError::Serialization(_))
        ));
    }
}
