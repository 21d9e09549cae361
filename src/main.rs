//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `makerworld_stats` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use makerworld_stats::app::{print_refresh_statistics, render_human, render_json};
use makerworld_stats::initialization::{init_client, init_logger_with};
use makerworld_stats::{Opt, RefreshStats, Refresher};

async fn run(opt: Opt) -> Result<()> {
    let json = opt.json;
    let config = opt.into_config()?;

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let client = init_client(&config).context("Failed to initialize HTTP client")?;
    let stats = Arc::new(RefreshStats::new());
    let refresher = Refresher::new(config, client, Arc::clone(&stats));

    let (snapshot, trace) = tokio::select! {
        result = refresher.refresh_with_trace() => result?,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("Interrupted before the refresh finished"),
    };

    print_refresh_statistics(&stats);

    if json {
        println!("{}", render_json(&snapshot, &trace)?);
    } else {
        print!("{}", render_human(&snapshot, &trace));
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if it exists)
    // so MAKERWORLD_COOKIE can live there instead of the shell history
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();

    if let Err(e) = run(opt).await {
        eprintln!("ERROR: {:#}", e);
        process::exit(1);
    }
}
