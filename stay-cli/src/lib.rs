//! # stay-cli
//!
//! Operator CLI foundation: argument parsing, config loading and listing file input.

pub mod cli;

pub use cli::{load_config, read_listing, read_listings, Cli, Commands};
pub use stay_service::ServiceConfig;
