//! # stay-core
//!
//! Core types and traits for the preference-learning loop: listing snapshots, feedback events,
//! preference profiles, search queries, the [`FeedbackStore`] / [`ProfileStore`] /
//! [`ListingProvider`] seams, and tracing initialization. Transport-agnostic; used by
//! `storage`, `feedback-inmemory`, `preference` and `stay-service`.

pub mod amenity;
pub mod error;
pub mod logger;
pub mod profile;
pub mod provider;
pub mod query;
pub mod store;
pub mod types;

pub use amenity::{canonical_amenity, canonical_amenities};
pub use error::{Result, StayError};
pub use logger::init_tracing;
pub use profile::{PreferenceProfile, PriceRange};
pub use provider::ListingProvider;
pub use query::{parse_price_range, SearchQuery};
pub use store::{FeedbackStore, ProfileStore};
pub use types::{FeedbackEvent, ListingSnapshot, Polarity, RoomConfig, MAX_RATING};
