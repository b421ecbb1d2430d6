//! Log setup for `stayctl` and any host embedding the service.
//!
//! Feedback, profile rewrites and ranking decisions are logged as structured `tracing` events;
//! this module decides where they land.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Filter used when `RUST_LOG` is unset: service events at `info`, per-statement sqlx noise off.
pub const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

/// Sends every event to stderr and appends it to `log_file_path`.
///
/// stdout stays free for the JSON that `stayctl` prints. Missing log directories are created.
/// `RUST_LOG` (for example `stay_service=debug,preference=trace`) overrides
/// [`DEFAULT_LOG_FILTER`]; call `dotenvy::dotenv()` first if it lives in `.env`.
/// Fails if a global subscriber is already installed.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(log_file_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    let file = Arc::new(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let writer = io::stderr.and(file);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}
