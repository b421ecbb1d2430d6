//! Profile aggregation: a full reduction over the ordered feedback log.

use std::collections::{BTreeMap, HashMap};

use stay_core::{FeedbackEvent, PreferenceProfile, PriceRange, RoomConfig};
use tracing::debug;

use crate::progress::{learning_progress, DEFAULT_PROGRESS_SATURATION};

/// Reduces a user's events (oldest first) to a [`PreferenceProfile`].
///
/// - price range: `[min, max]` of liked prices; dislikes only feed the disliked mean
/// - room configuration: mode among likes, ties go to the most recently liked one
/// - amenity weights: +1 per liked appearance, -1 per disliked appearance
/// - rating floor: lowest rating among rated likes
#[derive(Debug, Clone, Copy)]
pub struct PreferenceAggregator {
    progress_saturation: u32,
}

impl Default for PreferenceAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_SATURATION)
    }
}

impl PreferenceAggregator {
    pub fn new(progress_saturation: u32) -> Self {
        Self {
            progress_saturation,
        }
    }

    pub fn progress_saturation(&self) -> u32 {
        self.progress_saturation
    }

    pub fn compute(&self, events: &[FeedbackEvent]) -> PreferenceProfile {
        if events.is_empty() {
            return PreferenceProfile::empty();
        }

        let mut amenity_weights: BTreeMap<String, i64> = BTreeMap::new();
        let mut liked_prices: Vec<f64> = Vec::new();
        let mut disliked_prices: Vec<f64> = Vec::new();
        // configuration -> (like count, index of latest like)
        let mut room_counts: HashMap<RoomConfig, (u64, usize)> = HashMap::new();
        let mut rating_floor: Option<f64> = None;

        for (idx, event) in events.iter().enumerate() {
            let delta = if event.is_like() { 1 } else { -1 };
            for amenity in &event.listing.amenities {
                *amenity_weights.entry(amenity.clone()).or_insert(0) += delta;
            }

            if event.is_like() {
                liked_prices.push(event.listing.price);

                let slot = room_counts.entry(event.listing.rooms).or_insert((0, idx));
                slot.0 += 1;
                slot.1 = idx;

                if let Some(rating) = event.listing.rating {
                    rating_floor = Some(rating_floor.map_or(rating, |f: f64| f.min(rating)));
                }
            } else {
                disliked_prices.push(event.listing.price);
            }
        }

        let price_range = liked_prices
            .iter()
            .copied()
            .fold(None, |acc: Option<(f64, f64)>, p| match acc {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            })
            .map(|(lo, hi)| PriceRange::new(lo, hi));

        let room_config = room_counts
            .into_iter()
            .max_by_key(|(_, (count, last))| (*count, *last))
            .map(|(config, _)| config);

        let feedback_count = events.len() as u64;
        let liked_count = liked_prices.len() as u64;

        let profile = PreferenceProfile {
            feedback_count,
            liked_count,
            disliked_count: feedback_count - liked_count,
            price_range,
            mean_liked_price: mean(&liked_prices),
            mean_disliked_price: mean(&disliked_prices),
            room_config,
            amenity_weights,
            rating_floor,
            learning_progress: learning_progress(feedback_count, self.progress_saturation),
        };

        debug!(
            feedback_count = profile.feedback_count,
            liked = profile.liked_count,
            amenities = profile.amenity_weights.len(),
            "Computed preference profile"
        );
        profile
    }
}

/// [`PreferenceAggregator::compute`] with the default progress saturation.
pub fn compute_profile(events: &[FeedbackEvent]) -> PreferenceProfile {
    PreferenceAggregator::default().compute(events)
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
