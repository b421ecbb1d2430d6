//! Amenity name canonicalization.
//!
//! Providers spell the same amenity several ways ("Wireless Internet", "WiFi"). Snapshots store
//! canonical keys so amenity weights aggregate across spellings.

use std::collections::BTreeSet;

/// Canonical key followed by the spellings that map to it.
const AMENITY_VARIATIONS: &[(&str, &[&str])] = &[
    ("wifi", &["wifi", "wi-fi", "wireless internet", "internet"]),
    ("kitchen", &["kitchen", "full kitchen", "private kitchen"]),
    ("parking", &["parking", "free parking", "private parking", "free parking on premises"]),
    ("washer", &["washer", "washing machine", "laundry"]),
    ("dryer", &["dryer", "clothes dryer"]),
    ("ac", &["ac", "air conditioning", "air-conditioning"]),
    ("heating", &["heating", "heat"]),
    ("tv", &["tv", "television", "cable tv"]),
    ("pool", &["pool", "swimming pool", "private pool", "shared pool"]),
    ("gym", &["gym", "fitness center"]),
    ("workspace", &["workspace", "dedicated workspace", "laptop friendly"]),
];

/// Returns the canonical key for `raw`, or `None` if it is blank.
///
/// Unknown amenities are lower-cased with internal whitespace collapsed.
pub fn canonical_amenity(raw: &str) -> Option<String> {
    let normalized = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let canonical = AMENITY_VARIATIONS
        .iter()
        .find(|(_, variations)| variations.contains(&normalized.as_str()))
        .map(|(key, _)| (*key).to_string())
        .unwrap_or(normalized);
    Some(canonical)
}

/// Canonicalizes and de-duplicates a list of amenity names; blank names are dropped.
pub fn canonical_amenities<I, S>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|a| canonical_amenity(a.as_ref()))
        .collect()
}
