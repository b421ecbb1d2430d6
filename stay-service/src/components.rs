//! Component factory: builds stores and the service from config. Keeps assembly out of callers.

use std::sync::Arc;

use anyhow::Result;
use feedback_inmemory::InMemoryFeedbackStore;
use stay_core::{FeedbackStore, ListingProvider, ProfileStore};
use storage::FeedbackRepository;
use tracing::{error, info, instrument};

use crate::cache::CachedListingProvider;
use crate::config::{ServiceConfig, StoreType};
use crate::service::PreferenceService;

/// Creates the feedback and profile stores from config. Both handles point at the same backend.
#[instrument(skip(config), fields(store_type = ?config.store_type))]
pub async fn create_stores(
    config: &ServiceConfig,
) -> Result<(Arc<dyn FeedbackStore>, Arc<dyn ProfileStore>)> {
    match config.store_type {
        StoreType::Sqlite => {
            info!(database_url = %config.database_url, "Using SQLite feedback store");
            let repo = FeedbackRepository::new(&config.database_url)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to initialize SQLite store");
                    anyhow::anyhow!("Failed to initialize SQLite store: {}", e)
                })?;
            let repo = Arc::new(repo);
            let feedback: Arc<dyn FeedbackStore> = repo.clone();
            let profiles: Arc<dyn ProfileStore> = repo;
            Ok((feedback, profiles))
        }
        StoreType::Memory => {
            info!("Using in-memory feedback store");
            let store = Arc::new(InMemoryFeedbackStore::new());
            let feedback: Arc<dyn FeedbackStore> = store.clone();
            let profiles: Arc<dyn ProfileStore> = store;
            Ok((feedback, profiles))
        }
    }
}

/// Validates `config`, creates the stores and returns a configured [`PreferenceService`].
/// Attach a listing provider afterwards with [`PreferenceService::with_provider`].
pub async fn build_service(config: &ServiceConfig) -> Result<PreferenceService> {
    config.validate()?;
    let (feedback, profiles) = create_stores(config).await?;
    info!(
        learning_saturation = config.learning_saturation,
        rating_floor_policy = ?config.rating_floor_policy,
        recommendation_limit = ?config.recommendation_limit,
        "Preference service ready"
    );
    Ok(PreferenceService::new(feedback, profiles).with_config(config))
}

/// Wraps `provider` in the listing cache with `CACHE_TIMEOUT` as its TTL.
pub fn cached_provider<P>(provider: P, config: &ServiceConfig) -> Arc<dyn ListingProvider>
where
    P: ListingProvider + 'static,
{
    info!(ttl_secs = config.cache_timeout.as_secs(), "Caching listing provider results");
    Arc::new(CachedListingProvider::new(provider, config.cache_timeout))
}
