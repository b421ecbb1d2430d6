//! # Preference learning
//!
//! Pure functions over a user's feedback log:
//! - [`PreferenceAggregator`] / [`compute_profile`]: reduce events to a `PreferenceProfile`
//! - [`learning_progress`]: saturating maturity indicator
//! - [`Ranker`] / [`rank`]: stable re-ordering of candidate listings by profile fit
//! - [`UserStats`]: the numbers behind a `/stats` reply
//!
//! Nothing here touches storage; callers load events through `FeedbackStore` and pass them in.
//!
//! ## Logging
//!
//! Emits `tracing` debug logs with the profile size and ranking decisions (pass-through vs
//! scored) so ranking behavior can be inspected in production.

mod aggregator;
mod progress;
mod ranker;
mod stats;

pub use aggregator::{compute_profile, PreferenceAggregator};
pub use progress::{learning_progress, DEFAULT_PROGRESS_SATURATION};
pub use ranker::{rank, Ranker, RankingWeights, RatingFloorPolicy, ScoredListing};
pub use stats::{PriceTendency, UserStats};
