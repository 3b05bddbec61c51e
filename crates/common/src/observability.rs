//! Tracing setup for Iny
//!
//! Installs a global `tracing` subscriber. Output format comes from
//! `INY_LOG_FORMAT` (`json` by default, `pretty` for development, anything
//! else gives the compact text format) and the level filter from `RUST_LOG`.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable selecting the log output format
pub const LOG_FORMAT_ENV: &str = "INY_LOG_FORMAT";

/// Initialize the tracing/logging subsystem
pub fn init_tracing() -> Result<()> {
    let format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "json".to_string());

    // Use JSON format for structured logging in production
    let json_layer = (format == "json").then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });

    // Pretty format for development
    let pretty_layer = (format == "pretty").then(|| {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    let compact_layer =
        (format != "json" && format != "pretty").then(|| fmt::layer().compact().with_target(true));

    // Configure log level from environment
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .with(compact_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    info!(format = %format, "Tracing initialized");
    Ok(())
}
