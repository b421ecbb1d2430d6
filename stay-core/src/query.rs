//! Search query sent to the listing provider.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amenity::canonical_amenities;
use crate::error::{Result, StayError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery {
    pub location: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    /// Required amenities, canonical keys.
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub min_price: Option<u32>,
    #[serde(default)]
    pub max_price: Option<u32>,
}

impl SearchQuery {
    pub fn new(
        location: impl Into<String>,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    ) -> Self {
        Self {
            location: location.into(),
            check_in,
            check_out,
            guests,
            amenities: BTreeSet::new(),
            min_price: None,
            max_price: None,
        }
    }

    pub fn with_amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.amenities = canonical_amenities(amenities);
        self
    }

    pub fn with_price_range(mut self, min_price: u32, max_price: u32) -> Self {
        self.min_price = Some(min_price);
        self.max_price = Some(max_price);
        self
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(StayError::validation("search location is empty"));
        }
        if self.check_out <= self.check_in {
            return Err(StayError::validation(format!(
                "check-out {} must be after check-in {}",
                self.check_out, self.check_in
            )));
        }
        if self.guests == 0 {
            return Err(StayError::validation("at least one guest is required"));
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(StayError::validation(format!(
                    "minimum price {} exceeds maximum {}",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

/// Parses user price input: `"100-200"` is a range, a single number `"200"` means `0-200`.
pub fn parse_price_range(text: &str) -> Result<(u32, u32)> {
    let invalid = || {
        StayError::validation(format!(
            "invalid price range '{}', expected e.g. 100-200 or 200",
            text.trim()
        ))
    };
    let parse = |s: &str| s.trim().parse::<u32>().map_err(|_| invalid());

    let (min, max) = match text.split_once('-') {
        Some((min, max)) => (parse(min)?, parse(max)?),
        None => (0, parse(text)?),
    };
    if min > max {
        return Err(invalid());
    }
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_query_validate() {
        let q = SearchQuery::new("Porto", date(2026, 5, 1), date(2026, 5, 4), 2);
        assert!(q.validate().is_ok());
        assert_eq!(q.nights(), 3);
    }

    #[test]
    fn test_query_validate_rejects() {
        let q = SearchQuery::new(" ", date(2026, 5, 1), date(2026, 5, 4), 2);
        assert!(q.validate().is_err());

        let q = SearchQuery::new("Porto", date(2026, 5, 4), date(2026, 5, 4), 2);
        assert!(q.validate().is_err());

        let q = SearchQuery::new("Porto", date(2026, 5, 1), date(2026, 5, 4), 0);
        assert!(q.validate().is_err());

        let mut q = SearchQuery::new("Porto", date(2026, 5, 1), date(2026, 5, 4), 2);
        q.min_price = Some(300);
        q.max_price = Some(100);
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_parse_price_range() {
        assert_eq!(parse_price_range("100-200").unwrap(), (100, 200));
        assert_eq!(parse_price_range(" 100 - 200 ").unwrap(), (100, 200));
        assert_eq!(parse_price_range("200").unwrap(), (0, 200));
    }

    #[test]
    fn test_parse_price_range_invalid() {
        assert!(parse_price_range("cheap").is_err());
        assert!(parse_price_range("300-100").is_err());
        assert!(parse_price_range("100-").is_err());
    }
}
