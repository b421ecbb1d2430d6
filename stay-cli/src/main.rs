//! stayctl: record feedback, print profiles, stats and history, rank listing files. Config from env.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::to_string_pretty;
use stay_cli::{load_config, read_listing, read_listings, Cli, Commands};
use stay_core::init_tracing;
use stay_service::build_service;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config()?;
    init_tracing(&config.log_file).context("Initialize logging (check LOG_FILE)")?;
    let service = build_service(&config).await?;

    match cli.command {
        Commands::Record {
            user,
            listing,
            polarity,
        } => {
            let snapshot = read_listing(&listing)?;
            let profile = service.record_feedback(&user, snapshot, &polarity).await?;
            info!(user_id = %user, feedback_count = profile.feedback_count, "Recorded from CLI");
            println!("{}", to_string_pretty(&profile)?);
        }
        Commands::Profile { user } => {
            let profile = service.get_profile(&user).await?;
            println!("{}", to_string_pretty(&profile)?);
        }
        Commands::Stats { user } => {
            let stats = service.stats(&user).await?;
            println!("{}", to_string_pretty(&stats)?);
        }
        Commands::History { user } => {
            let events = service.list_feedback(&user).await?;
            if events.is_empty() {
                println!("No feedback recorded for {}", user);
            }
            for event in events {
                println!(
                    "{}  {:<7}  {}  {}  {:.2}",
                    event.created_at.to_rfc3339(),
                    event.polarity,
                    event.listing.id,
                    event.listing.title,
                    event.listing.price
                );
            }
        }
        Commands::Rank {
            user,
            listings,
            limit,
        } => {
            let candidates = read_listings(&listings)?;
            let service = match limit {
                Some(n) => service.with_recommendation_limit(Some(n)),
                None => service,
            };
            let ranked = service.rank(&user, candidates).await?;
            println!("{}", to_string_pretty(&ranked)?);
        }
    }

    Ok(())
}
