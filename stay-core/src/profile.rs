//! Preference profile: the derived, recomputable summary of one user's feedback.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::RoomConfig;

/// Inclusive nightly price band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    /// Distance from `price` to the nearest bound; zero inside the range.
    pub fn distance(&self, price: f64) -> f64 {
        if price < self.min {
            self.min - price
        } else if price > self.max {
            price - self.max
        } else {
            0.0
        }
    }
}

/// Per-user aggregate derived from feedback. Always equal to a fresh recomputation over the
/// user's events; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    pub feedback_count: u64,
    pub liked_count: u64,
    pub disliked_count: u64,
    /// `[min, max]` of liked prices.
    pub price_range: Option<PriceRange>,
    pub mean_liked_price: Option<f64>,
    pub mean_disliked_price: Option<f64>,
    /// Most frequent configuration among liked listings.
    pub room_config: Option<RoomConfig>,
    /// Signed score per canonical amenity: +1 per like, -1 per dislike.
    pub amenity_weights: BTreeMap<String, i64>,
    /// Lowest rating among rated liked listings.
    pub rating_floor: Option<f64>,
    /// Profile maturity in percent, `0.0..=100.0`.
    pub learning_progress: f64,
}

impl PreferenceProfile {
    /// The profile of a user with no feedback. Ranking treats it as a pass-through.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.feedback_count == 0
    }

    pub fn amenity_weight(&self, amenity: &str) -> i64 {
        self.amenity_weights.get(amenity).copied().unwrap_or(0)
    }
}
