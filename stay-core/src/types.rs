//! Core types: listing snapshot, room configuration, polarity and feedback event.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::amenity::canonical_amenities;
use crate::error::{Result, StayError};

/// Upper bound of the provider's star rating scale.
pub const MAX_RATING: f64 = 5.0;

/// Bedroom / bed / bathroom counts of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomConfig {
    pub bedrooms: u32,
    pub beds: u32,
    pub bathrooms: u32,
}

impl RoomConfig {
    pub fn new(bedrooms: u32, beds: u32, bathrooms: u32) -> Self {
        Self {
            bedrooms,
            beds,
            bathrooms,
        }
    }
}

/// Immutable copy of a provider listing as it was shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSnapshot {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Price per night in the provider's currency.
    pub price: f64,
    #[serde(default)]
    pub rooms: RoomConfig,
    #[serde(default)]
    pub max_guests: u32,
    /// Canonical amenity keys (see [`crate::amenity`]).
    #[serde(default, deserialize_with = "deserialize_amenities")]
    pub amenities: BTreeSet<String>,
    /// Star rating in `0..=MAX_RATING`; `None` when the listing has no reviews yet.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    pub location: String,
}

fn deserialize_amenities<'de, D>(deserializer: D) -> std::result::Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(canonical_amenities(raw))
}

impl ListingSnapshot {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: f64,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: None,
            price,
            rooms: RoomConfig::default(),
            max_guests: 0,
            amenities: BTreeSet::new(),
            rating: None,
            review_count: 0,
            location: location.into(),
        }
    }

    pub fn with_rooms(mut self, rooms: RoomConfig) -> Self {
        self.rooms = rooms;
        self
    }

    pub fn with_amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.amenities = canonical_amenities(amenities);
        self
    }

    pub fn with_rating(mut self, rating: f64, review_count: u32) -> Self {
        self.rating = Some(rating);
        self.review_count = review_count;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_max_guests(mut self, max_guests: u32) -> Self {
        self.max_guests = max_guests;
        self
    }

    /// Rejects snapshots that cannot be learned from.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(StayError::validation("listing id is empty"));
        }
        if self.title.trim().is_empty() {
            return Err(StayError::validation(format!(
                "listing {} has no title",
                self.id
            )));
        }
        if self.location.trim().is_empty() {
            return Err(StayError::validation(format!(
                "listing {} has no location",
                self.id
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(StayError::validation(format!(
                "listing {} has invalid price {}",
                self.id, self.price
            )));
        }
        if let Some(rating) = self.rating {
            if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
                return Err(StayError::validation(format!(
                    "listing {} has rating {} outside 0..={}",
                    self.id, rating, MAX_RATING
                )));
            }
        }
        Ok(())
    }
}

/// Direction of a feedback signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Like,
    Dislike,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Like => "like",
            Polarity::Dislike => "dislike",
        }
    }

    pub fn is_like(&self) -> bool {
        matches!(self, Polarity::Like)
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = StayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "like" | "👍" | "1" => Ok(Polarity::Like),
            "dislike" | "👎" | "0" => Ok(Polarity::Dislike),
            other => Err(StayError::validation(format!(
                "unrecognized polarity '{}', expected 'like' or 'dislike'",
                other
            ))),
        }
    }
}

/// One like/dislike signal. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub id: Uuid,
    pub user_id: String,
    pub listing: ListingSnapshot,
    pub polarity: Polarity,
    pub created_at: DateTime<Utc>,
}

impl FeedbackEvent {
    /// Creates an event with a generated UUID and the current timestamp.
    pub fn new(user_id: impl Into<String>, listing: ListingSnapshot, polarity: Polarity) -> Self {
        Self::at(user_id, listing, polarity, Utc::now())
    }

    /// Creates an event with an explicit timestamp.
    pub fn at(
        user_id: impl Into<String>,
        listing: ListingSnapshot,
        polarity: Polarity,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            listing,
            polarity,
            created_at,
        }
    }

    pub fn is_like(&self) -> bool {
        self.polarity.is_like()
    }

    /// Two events are the same submission when user, listing, polarity and timestamp all match.
    pub fn same_submission(&self, other: &FeedbackEvent) -> bool {
        self.user_id == other.user_id
            && self.listing.id == other.listing.id
            && self.polarity == other.polarity
            && self.created_at == other.created_at
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(StayError::validation("user id is empty"));
        }
        self.listing.validate()
    }
}
