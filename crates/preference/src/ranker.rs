//! Listing re-ranking by profile fit.

use serde::{Deserialize, Serialize};
use stay_core::{ListingSnapshot, PreferenceProfile, StayError};
use tracing::debug;

/// Multipliers for each score component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    pub price: f64,
    pub room: f64,
    pub amenity: f64,
    pub rating: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            price: 1.0,
            room: 1.0,
            amenity: 1.0,
            rating: 1.0,
        }
    }
}

/// What to do with listings rated below the profile's rating floor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingFloorPolicy {
    /// Listings at or above the floor get a bonus; nothing is removed.
    #[default]
    Bonus,
    /// Listings with a known rating below the floor are dropped before ranking.
    Exclude,
}

impl std::str::FromStr for RatingFloorPolicy {
    type Err = StayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bonus" => Ok(RatingFloorPolicy::Bonus),
            "exclude" => Ok(RatingFloorPolicy::Exclude),
            other => Err(StayError::Config(format!(
                "unknown rating floor policy '{}', expected 'bonus' or 'exclude'",
                other
            ))),
        }
    }
}

/// A listing with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredListing {
    pub listing: ListingSnapshot,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    weights: RankingWeights,
    rating_policy: RatingFloorPolicy,
}

impl Ranker {
    pub fn new(weights: RankingWeights, rating_policy: RatingFloorPolicy) -> Self {
        Self {
            weights,
            rating_policy,
        }
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Weighted sum of price closeness, room match, amenity weights and rating bonus.
    pub fn score(&self, profile: &PreferenceProfile, listing: &ListingSnapshot) -> f64 {
        let w = &self.weights;
        let mut score = 0.0;

        if let Some(range) = profile.price_range {
            // 1 inside the range, 0 once a full range-scale away from it
            let scale = range.max.max(1.0);
            let closeness = 1.0 - (range.distance(listing.price) / scale).min(1.0);
            score += w.price * closeness;
        }

        if profile.room_config == Some(listing.rooms) {
            score += w.room;
        }

        let amenity_score: i64 = listing
            .amenities
            .iter()
            .map(|a| profile.amenity_weight(a))
            .sum();
        score += w.amenity * amenity_score as f64;

        if let (Some(floor), Some(rating)) = (profile.rating_floor, listing.rating) {
            if rating >= floor {
                score += w.rating;
            }
        }

        score
    }

    fn below_floor(profile: &PreferenceProfile, listing: &ListingSnapshot) -> bool {
        matches!(
            (profile.rating_floor, listing.rating),
            (Some(floor), Some(rating)) if rating < floor
        )
    }

    /// Scores and stably sorts `listings`, best first. Equal scores keep provider order.
    /// An empty profile returns the input order with zero scores.
    pub fn rank_scored(
        &self,
        profile: &PreferenceProfile,
        listings: Vec<ListingSnapshot>,
    ) -> Vec<ScoredListing> {
        if profile.is_empty() {
            debug!(count = listings.len(), "Empty profile, passing listings through");
            return listings
                .into_iter()
                .map(|listing| ScoredListing {
                    listing,
                    score: 0.0,
                })
                .collect();
        }

        let candidates = listings.len();
        let mut scored: Vec<ScoredListing> = listings
            .into_iter()
            .filter(|l| {
                self.rating_policy == RatingFloorPolicy::Bonus || !Self::below_floor(profile, l)
            })
            .map(|listing| ScoredListing {
                score: self.score(profile, &listing),
                listing,
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            candidates,
            ranked = scored.len(),
            top_score = scored.first().map(|s| s.score),
            "Ranked listings by preference profile"
        );
        scored
    }

    /// Same order as [`Ranker::rank_scored`], without scores.
    pub fn rank(
        &self,
        profile: &PreferenceProfile,
        listings: Vec<ListingSnapshot>,
    ) -> Vec<ListingSnapshot> {
        self.rank_scored(profile, listings)
            .into_iter()
            .map(|s| s.listing)
            .collect()
    }
}

/// [`Ranker::rank`] with default weights and the `Bonus` rating policy.
pub fn rank(profile: &PreferenceProfile, listings: Vec<ListingSnapshot>) -> Vec<ListingSnapshot> {
    Ranker::default().rank(profile, listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stay_core::{PriceRange, RoomConfig};

    fn listing(id: &str, price: f64) -> ListingSnapshot {
        ListingSnapshot::new(id, "Listing", price, "Lisbon")
    }

    fn profile() -> PreferenceProfile {
        PreferenceProfile {
            feedback_count: 4,
            liked_count: 4,
            price_range: Some(PriceRange::new(100.0, 200.0)),
            room_config: Some(RoomConfig::new(2, 2, 1)),
            rating_floor: Some(4.5),
            ..PreferenceProfile::default()
        }
    }

    #[test]
    fn test_price_closeness() {
        let ranker = Ranker::default();
        let p = profile();
        assert_eq!(ranker.score(&p, &listing("in", 150.0)), 1.0);
        assert_eq!(ranker.score(&p, &listing("near", 300.0)), 0.5);
        assert_eq!(ranker.score(&p, &listing("far", 1000.0)), 0.0);
    }

    #[test]
    fn test_room_and_rating_bonus() {
        let ranker = Ranker::default();
        let p = profile();
        let l = listing("a", 150.0)
            .with_rooms(RoomConfig::new(2, 2, 1))
            .with_rating(4.8, 20);
        assert_eq!(ranker.score(&p, &l), 3.0);

        let low = listing("b", 150.0).with_rating(4.0, 20);
        assert_eq!(ranker.score(&p, &low), 1.0);
    }

    #[test]
    fn test_weights_scale_components() {
        let ranker = Ranker::new(
            RankingWeights {
                price: 2.0,
                room: 0.0,
                amenity: 1.0,
                rating: 0.5,
            },
            RatingFloorPolicy::Bonus,
        );
        let l = listing("a", 150.0)
            .with_rooms(RoomConfig::new(2, 2, 1))
            .with_rating(4.8, 20);
        assert_eq!(ranker.score(&profile(), &l), 2.5);
    }

    #[test]
    fn test_bonus_policy_keeps_all() {
        let ranked = Ranker::default().rank(
            &profile(),
            vec![listing("low", 150.0).with_rating(3.0, 5), listing("high", 150.0).with_rating(4.9, 5)],
        );
        let ids: Vec<_> = ranked.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "low"]);
    }

    #[test]
    fn test_exclude_policy_drops_below_floor() {
        let ranker = Ranker::new(RankingWeights::default(), RatingFloorPolicy::Exclude);
        let ranked = ranker.rank(
            &profile(),
            vec![
                listing("low", 150.0).with_rating(3.0, 5),
                listing("unrated", 150.0),
                listing("high", 150.0).with_rating(4.9, 5),
            ],
        );
        let ids: Vec<_> = ranked.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "unrated"]);
    }

    #[test]
    fn test_empty_profile_scores_zero() {
        let scored = Ranker::default().rank_scored(
            &PreferenceProfile::empty(),
            vec![listing("a", 10.0), listing("b", 20.0)],
        );
        assert!(scored.iter().all(|s| s.score == 0.0));
        assert_eq!(scored[0].listing.id, "a");
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("Bonus".parse::<RatingFloorPolicy>().unwrap(), RatingFloorPolicy::Bonus);
        assert_eq!("exclude".parse::<RatingFloorPolicy>().unwrap(), RatingFloorPolicy::Exclude);
        assert!("hide".parse::<RatingFloorPolicy>().is_err());
    }
}
