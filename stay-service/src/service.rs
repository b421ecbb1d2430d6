//! Preference service: the record → recompute → rank loop behind the bot's like/dislike buttons.
//!
//! Writes for one user are serialized with a per-user lock so a recompute never races ahead
//! of an in-flight append. Different users never contend.

use std::sync::Arc;

use preference::{PreferenceAggregator, Ranker, ScoredListing, UserStats};
use stay_core::{
    FeedbackEvent, FeedbackStore, ListingProvider, ListingSnapshot, Polarity, PreferenceProfile,
    ProfileStore, Result, SearchQuery, StayError,
};
use tracing::{info, instrument, warn};

use crate::config::ServiceConfig;
use crate::locks::UserLocks;

pub struct PreferenceService {
    feedback: Arc<dyn FeedbackStore>,
    profiles: Arc<dyn ProfileStore>,
    provider: Option<Arc<dyn ListingProvider>>,
    aggregator: PreferenceAggregator,
    ranker: Ranker,
    recommendation_limit: Option<usize>,
    locks: UserLocks,
}

impl PreferenceService {
    /// Service with default aggregation and ranking settings and no listing provider.
    pub fn new(feedback: Arc<dyn FeedbackStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            feedback,
            profiles,
            provider: None,
            aggregator: PreferenceAggregator::default(),
            ranker: Ranker::default(),
            recommendation_limit: None,
            locks: UserLocks::default(),
        }
    }

    /// Applies the learning and ranking settings of `config`.
    pub fn with_config(mut self, config: &ServiceConfig) -> Self {
        self.aggregator = PreferenceAggregator::new(config.learning_saturation);
        self.ranker = Ranker::new(config.ranking_weights, config.rating_floor_policy);
        self.recommendation_limit = config.recommendation_limit;
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn ListingProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_ranker(mut self, ranker: Ranker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn with_recommendation_limit(mut self, limit: Option<usize>) -> Self {
        self.recommendation_limit = limit;
        self
    }

    /// Records a like/dislike given as text (`like`, `dislike`, or an alias) and returns the
    /// recomputed profile.
    pub async fn record_feedback(
        &self,
        user_id: &str,
        listing: ListingSnapshot,
        polarity: &str,
    ) -> Result<PreferenceProfile> {
        let polarity: Polarity = polarity.parse()?;
        self.record_event(FeedbackEvent::new(user_id, listing, polarity))
            .await
    }

    /// Appends `event` and recomputes the user's profile from the full log.
    ///
    /// Once the append succeeds the call succeeds: a failed profile write is logged and the
    /// stale profile is rebuilt on the next [`PreferenceService::get_profile`].
    #[instrument(skip(self, event), fields(user_id = %event.user_id, listing_id = %event.listing.id, polarity = %event.polarity))]
    pub async fn record_event(&self, event: FeedbackEvent) -> Result<PreferenceProfile> {
        if let Err(e) = event.validate() {
            warn!(error = %e, "Rejected feedback");
            return Err(e);
        }

        let _guard = self.locks.lock(&event.user_id).await;

        self.feedback.append(&event).await?;

        let events = self.feedback.list_by_user(&event.user_id).await?;
        let profile = self.aggregator.compute(&events);
        if let Err(e) = self.profiles.save_profile(&event.user_id, &profile).await {
            warn!(error = %e, "Feedback stored but profile write failed");
        }

        info!(
            feedback_count = profile.feedback_count,
            learning_progress = profile.learning_progress,
            "Feedback recorded"
        );
        Ok(profile)
    }

    /// All feedback of `user_id`, oldest first.
    pub async fn list_feedback(&self, user_id: &str) -> Result<Vec<FeedbackEvent>> {
        self.feedback.list_by_user(user_id).await
    }

    /// Current profile of `user_id`, always equal to a fresh reduction of the log under this
    /// service's settings. A stored profile that is missing, unreadable or different (older
    /// log, other `LEARNING_SATURATION`) is rewritten. A user without feedback gets the empty
    /// profile.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &str) -> Result<PreferenceProfile> {
        let _guard = self.locks.lock(user_id).await;

        let events = self.feedback.list_by_user(user_id).await?;
        if events.is_empty() {
            return Ok(PreferenceProfile::empty());
        }
        let profile = self.aggregator.compute(&events);

        let stored = match self.profiles.load_profile(user_id).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Stored profile unreadable, rebuilding from feedback log");
                None
            }
        };
        if stored.as_ref() != Some(&profile) {
            info!(
                feedback_count = profile.feedback_count,
                stored_count = stored.as_ref().map(|p| p.feedback_count),
                "Rewriting stale profile"
            );
            if let Err(e) = self.profiles.save_profile(user_id, &profile).await {
                warn!(error = %e, "Profile rewrite failed");
            }
        }
        Ok(profile)
    }

    /// Interaction statistics for `user_id`.
    pub async fn stats(&self, user_id: &str) -> Result<UserStats> {
        let events = self.feedback.list_by_user(user_id).await?;
        let profile = self.aggregator.compute(&events);
        Ok(UserStats::compute(&profile, &events))
    }

    /// Orders `listings` by fit with the user's profile, keeping at most the configured limit
    /// once the profile has learned something.
    pub async fn rank(
        &self,
        user_id: &str,
        listings: Vec<ListingSnapshot>,
    ) -> Result<Vec<ScoredListing>> {
        let profile = self.get_profile(user_id).await?;
        let mut ranked = self.ranker.rank_scored(&profile, listings);
        // an empty profile passes every listing through
        if !profile.is_empty() {
            if let Some(limit) = self.recommendation_limit {
                ranked.truncate(limit);
            }
        }
        Ok(ranked)
    }

    /// Queries the listing provider and ranks the results. A provider failure is logged and
    /// treated as no results.
    #[instrument(skip(self, query), fields(location = %query.location))]
    pub async fn search(&self, user_id: &str, query: &SearchQuery) -> Result<Vec<ScoredListing>> {
        query.validate()?;
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| StayError::Provider("no listing provider configured".to_string()))?;

        let listings = match provider.search(query).await {
            Ok(listings) => listings,
            Err(e) => {
                warn!(error = %e, "Listing provider failed, ranking empty result");
                Vec::new()
            }
        };
        info!(candidates = listings.len(), "Provider returned listings");

        self.rank(user_id, listings).await
    }
}
