//! # Cucina Engine
//!
//! Headless match runner for Cucina Clash.
//!
//! Loads `cucina.toml` (or the path given as the first argument), runs an
//! AI-vs-AI exhibition match and prints the result as JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod timing;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineConfig;

/// Main entry point.
fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the result
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("cucina=info".parse()?))
        .init();

    info!("Cucina Clash starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from(path),
        None => {
            let path = EngineConfig::config_path();
            let config = EngineConfig::load();
            if !path.exists() {
                if let Err(e) = config.save_to(&path) {
                    warn!("Failed to write default config: {e}");
                }
            }
            config
        },
    };
    config.validate();

    let summary = app::run(&config)?;
    if config.print_snapshot {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    info!("Cucina Clash shutdown complete");
    Ok(())
}
