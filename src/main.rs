//! Exercise GIF Sync Tool
//!
//! Paginates the ExerciseDB API and bulk-upserts exercise gif URLs into a
//! hosted Postgres table

// gifsynctool/src/main.rs
mod config;
mod errors;
mod fetch;
mod sink;
mod sync;

use anyhow::{Context, Result};
use config::SyncConfig;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::process::ExitCode;

/// Main entry point: one run-to-completion sync, no CLI flags.
#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    match run_app().await {
        Ok(_) => {
            println!("✅ Sync completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Sync failed: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app() -> Result<()> {
    let app_config = SyncConfig::load_from_env()
        .context("Failed to load sync configuration from environment")?;

    println!("🚀 Starting gif sync against {}", app_config.api_base_url);

    let fetcher = fetch::ExerciseDbClient::new(&app_config)
        .context("Failed to build exercise API client")?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&app_config.database_url)
        .await
        .context("Failed to connect to target database")?;
    let sink = sink::PostgresSink::new(pool, app_config.destination_table.clone());

    sync::run_sync_flow(&fetcher, &sink, &app_config)
        .await
        .context("Sync process failed")?;
    Ok(())
}
