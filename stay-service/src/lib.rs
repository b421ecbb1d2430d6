//! # stay-service
//!
//! The surface a chat layer calls: [`PreferenceService`] records feedback, serves profiles and
//! statistics, and ranks listings (directly or through a [`stay_core::ListingProvider`]).
//! [`ServiceConfig`] loads settings from the environment and [`components`] assembles stores
//! from it.

pub mod cache;
pub mod components;
pub mod config;
mod locks;
pub mod service;

pub use cache::CachedListingProvider;
pub use components::{build_service, cached_provider, create_stores};
pub use config::{ServiceConfig, StoreType};
pub use service::PreferenceService;
