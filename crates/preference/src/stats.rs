//! Per-user statistics, as reported by the bot's `/stats` command.

use serde::{Deserialize, Serialize};
use stay_core::{FeedbackEvent, PreferenceProfile};

use crate::aggregator::mean;

/// Whether liked listings are cheaper or pricier than disliked ones on average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTendency {
    Lower,
    Higher,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub listings_rated: u64,
    pub liked: u64,
    pub disliked: u64,
    pub mean_liked_price: Option<f64>,
    pub mean_disliked_price: Option<f64>,
    /// Only set when there is at least one like and one dislike.
    pub price_tendency: Option<PriceTendency>,
    pub mean_liked_bedrooms: Option<f64>,
    pub mean_liked_bathrooms: Option<f64>,
    /// Mean over rated liked listings.
    pub mean_liked_rating: Option<f64>,
    pub learning_progress: f64,
}

impl UserStats {
    /// Builds stats from a profile and the events it was computed from.
    pub fn compute(profile: &PreferenceProfile, events: &[FeedbackEvent]) -> Self {
        let liked: Vec<&FeedbackEvent> = events.iter().filter(|e| e.is_like()).collect();

        let bedrooms: Vec<f64> = liked
            .iter()
            .map(|e| f64::from(e.listing.rooms.bedrooms))
            .collect();
        let bathrooms: Vec<f64> = liked
            .iter()
            .map(|e| f64::from(e.listing.rooms.bathrooms))
            .collect();
        let ratings: Vec<f64> = liked.iter().filter_map(|e| e.listing.rating).collect();

        let price_tendency = match (profile.mean_liked_price, profile.mean_disliked_price) {
            (Some(liked), Some(disliked)) if liked < disliked => Some(PriceTendency::Lower),
            (Some(_), Some(_)) => Some(PriceTendency::Higher),
            _ => None,
        };

        Self {
            listings_rated: profile.feedback_count,
            liked: profile.liked_count,
            disliked: profile.disliked_count,
            mean_liked_price: profile.mean_liked_price,
            mean_disliked_price: profile.mean_disliked_price,
            price_tendency,
            mean_liked_bedrooms: mean(&bedrooms),
            mean_liked_bathrooms: mean(&bathrooms),
            mean_liked_rating: mean(&ratings),
            learning_progress: profile.learning_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::compute_profile;
    use stay_core::{ListingSnapshot, Polarity, RoomConfig};

    fn event(price: f64, bedrooms: u32, rating: Option<f64>, polarity: Polarity) -> FeedbackEvent {
        let mut listing = ListingSnapshot::new("l", "Listing", price, "Lisbon")
            .with_rooms(RoomConfig::new(bedrooms, bedrooms, 1));
        listing.rating = rating;
        FeedbackEvent::new("u1", listing, polarity)
    }

    #[test]
    fn test_no_feedback() {
        let stats = UserStats::compute(&PreferenceProfile::empty(), &[]);
        assert_eq!(stats.listings_rated, 0);
        assert!(stats.price_tendency.is_none());
        assert!(stats.mean_liked_bedrooms.is_none());
        assert_eq!(stats.learning_progress, 0.0);
    }

    #[test]
    fn test_prefers_lower_prices() {
        let events = vec![
            event(80.0, 1, Some(4.0), Polarity::Like),
            event(120.0, 3, None, Polarity::Like),
            event(300.0, 2, Some(4.9), Polarity::Dislike),
        ];
        let stats = UserStats::compute(&compute_profile(&events), &events);

        assert_eq!(stats.listings_rated, 3);
        assert_eq!(stats.liked, 2);
        assert_eq!(stats.disliked, 1);
        assert_eq!(stats.price_tendency, Some(PriceTendency::Lower));
        assert_eq!(stats.mean_liked_price, Some(100.0));
        assert_eq!(stats.mean_liked_bedrooms, Some(2.0));
        assert_eq!(stats.mean_liked_bathrooms, Some(1.0));
        assert_eq!(stats.mean_liked_rating, Some(4.0));
        assert_eq!(stats.learning_progress, 30.0);
    }

    #[test]
    fn test_prefers_higher_prices() {
        let events = vec![
            event(400.0, 2, None, Polarity::Like),
            event(90.0, 1, None, Polarity::Dislike),
        ];
        let stats = UserStats::compute(&compute_profile(&events), &events);
        assert_eq!(stats.price_tendency, Some(PriceTendency::Higher));
    }

    #[test]
    fn test_no_tendency_without_dislikes() {
        let events = vec![event(400.0, 2, None, Polarity::Like)];
        let stats = UserStats::compute(&compute_profile(&events), &events);
        assert!(stats.price_tendency.is_none());
    }
}
