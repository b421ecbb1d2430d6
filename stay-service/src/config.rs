//! Service config: storage, logging, learning and ranking knobs. Loaded from env.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use preference::{RankingWeights, RatingFloorPolicy, DEFAULT_PROGRESS_SATURATION};

/// Backing store for feedback and profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    Sqlite,
    Memory,
}

impl FromStr for StoreType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StoreType::Sqlite),
            "memory" => Ok(StoreType::Memory),
            other => anyhow::bail!("STORE_TYPE must be 'sqlite' or 'memory', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// DATABASE_URL: SQLite file path or `sqlite:` URL
    pub database_url: String,
    /// STORE_TYPE
    pub store_type: StoreType,
    /// LOG_FILE
    pub log_file: String,
    /// LEARNING_SATURATION: feedback count at which learning progress reads 100 %
    pub learning_saturation: u32,
    /// RATING_FLOOR_POLICY
    pub rating_floor_policy: RatingFloorPolicy,
    /// RANK_WEIGHT_PRICE / _ROOM / _AMENITY / _RATING
    pub ranking_weights: RankingWeights,
    /// CACHE_TIMEOUT in seconds
    pub cache_timeout: Duration,
    /// RECOMMENDATION_LIMIT: keep only the top N ranked listings
    pub recommendation_limit: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_url: "./data/stay_prefs.db".to_string(),
            store_type: StoreType::Sqlite,
            log_file: "logs/stay-prefs.log".to_string(),
            learning_saturation: DEFAULT_PROGRESS_SATURATION,
            rating_floor_policy: RatingFloorPolicy::Bonus,
            ranking_weights: RankingWeights::default(),
            cache_timeout: Duration::from_secs(3600),
            recommendation_limit: None,
        }
    }
}

/// Reads `key` and parses it; unset or empty yields `None`, unparsable is an error.
fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{}={} is invalid: {}", key, raw, e)),
        _ => Ok(None),
    }
}

impl ServiceConfig {
    /// Load from environment variables, falling back to [`ServiceConfig::default`].
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let log_file = env::var("LOG_FILE").unwrap_or(defaults.log_file);
        let store_type = parse_var::<StoreType>("STORE_TYPE")?.unwrap_or(defaults.store_type);
        let learning_saturation =
            parse_var("LEARNING_SATURATION")?.unwrap_or(defaults.learning_saturation);
        let rating_floor_policy =
            parse_var("RATING_FLOOR_POLICY")?.unwrap_or(defaults.rating_floor_policy);

        let w = defaults.ranking_weights;
        let ranking_weights = RankingWeights {
            price: parse_var("RANK_WEIGHT_PRICE")?.unwrap_or(w.price),
            room: parse_var("RANK_WEIGHT_ROOM")?.unwrap_or(w.room),
            amenity: parse_var("RANK_WEIGHT_AMENITY")?.unwrap_or(w.amenity),
            rating: parse_var("RANK_WEIGHT_RATING")?.unwrap_or(w.rating),
        };

        let cache_timeout = parse_var::<u64>("CACHE_TIMEOUT")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_timeout);
        let recommendation_limit = parse_var("RECOMMENDATION_LIMIT")?;

        let config = Self {
            database_url,
            store_type,
            log_file,
            learning_saturation,
            rating_floor_policy,
            ranking_weights,
            cache_timeout,
            recommendation_limit,
        };
        config.validate().context("invalid service configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store_type == StoreType::Sqlite && self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL must be set when STORE_TYPE=sqlite");
        }
        if self.learning_saturation == 0 {
            anyhow::bail!("LEARNING_SATURATION must be at least 1");
        }
        let w = &self.ranking_weights;
        for (name, value) in [
            ("RANK_WEIGHT_PRICE", w.price),
            ("RANK_WEIGHT_ROOM", w.room),
            ("RANK_WEIGHT_AMENITY", w.amenity),
            ("RANK_WEIGHT_RATING", w.rating),
        ] {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{} must be a finite, non-negative number, got {}", name, value);
            }
        }
        if self.recommendation_limit == Some(0) {
            anyhow::bail!("RECOMMENDATION_LIMIT must be at least 1 when set");
        }
        Ok(())
    }
}
