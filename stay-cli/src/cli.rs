//! CLI parser, config loading and listing file input.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stay_core::ListingSnapshot;
use stay_service::ServiceConfig;

#[derive(Parser, Debug)]
#[command(name = "stayctl")]
#[command(about = "Record feedback, inspect preference profiles and rank listings", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a like/dislike for the listing in a JSON file and print the updated profile.
    Record {
        #[arg(short, long)]
        user: String,
        /// JSON file holding one listing snapshot
        #[arg(short, long)]
        listing: String,
        /// like, dislike, 👍, 👎, 1 or 0
        #[arg(short, long)]
        polarity: String,
    },
    /// Print the user's preference profile.
    Profile {
        #[arg(short, long)]
        user: String,
    },
    /// Print the user's feedback statistics.
    Stats {
        #[arg(short, long)]
        user: String,
    },
    /// Print the user's feedback log, oldest first.
    History {
        #[arg(short, long)]
        user: String,
    },
    /// Rank listings from a JSON array file by the user's profile.
    Rank {
        #[arg(short, long)]
        user: String,
        /// JSON file holding an array of listing snapshots
        #[arg(short, long)]
        listings: String,
        /// Keep only the top N (overrides RECOMMENDATION_LIMIT)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

/// Load ServiceConfig from environment.
pub fn load_config() -> Result<ServiceConfig> {
    ServiceConfig::load()
}

/// Reads a single listing snapshot. Amenities are canonicalized on the way in.
pub fn read_listing(path: impl AsRef<Path>) -> Result<ListingSnapshot> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read listing file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Parse listing JSON in {}", path.display()))
}

/// Reads an array of listing snapshots, keeping file order.
pub fn read_listings(path: impl AsRef<Path>) -> Result<Vec<ListingSnapshot>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read listings file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Parse listings JSON array in {}", path.display()))
}
