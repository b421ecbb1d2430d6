//! External listing provider seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::query::SearchQuery;
use crate::types::ListingSnapshot;

/// Source of listing snapshots for a search. Results are in provider order; an error or an
/// empty result both mean "no candidates" to the ranking step.
#[async_trait]
pub trait ListingProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ListingSnapshot>>;
}
