//! TTL cache in front of a [`ListingProvider`].
//!
//! Successful results are cached per query; errors are passed through and never cached.
//! Concurrent misses for the same query share one provider call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use stay_core::{ListingProvider, ListingSnapshot, SearchQuery, StayError};
use tracing::debug;

/// Upper bound on distinct cached queries.
const MAX_CACHED_QUERIES: u64 = 1_000;

pub struct CachedListingProvider<P> {
    inner: P,
    ttl: Duration,
    entries: Cache<SearchQuery, Vec<ListingSnapshot>>,
}

impl<P: ListingProvider> CachedListingProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(MAX_CACHED_QUERIES)
            .time_to_live(ttl)
            .build();
        Self {
            inner,
            ttl,
            entries,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drops every cached result.
    pub async fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }

    /// Number of live entries, after pending evictions are applied.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<P: ListingProvider> ListingProvider for CachedListingProvider<P> {
    async fn search(&self, query: &SearchQuery) -> stay_core::Result<Vec<ListingSnapshot>> {
        let listings = self
            .entries
            .try_get_with(query.clone(), async {
                debug!(location = %query.location, "Listing cache miss");
                self.inner.search(query).await
            })
            .await
            .map_err(unshare)?;

        debug!(location = %query.location, count = listings.len(), "Listings served");
        Ok(listings)
    }
}

/// Errors from a shared init are handed to every waiter behind one `Arc`.
fn unshare(err: Arc<StayError>) -> StayError {
    Arc::try_unwrap(err).unwrap_or_else(|shared| StayError::Provider(shared.to_string()))
}
