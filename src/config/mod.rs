// gifsynctool/src/config/mod.rs
use std::env;
use std::time::Duration;
use url::Url;

use crate::errors::{AppError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://exercisedb.p.rapidapi.com/exercises";
pub const DEFAULT_DESTINATION_TABLE: &str = "exercise_gifs";

const DEFAULT_BATCH_LIMIT: u32 = 100;
const DEFAULT_TOTAL_EXERCISES: u32 = 1300;
const DEFAULT_BATCH_DELAY_MS: u64 = 1000;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 2000;

/// Everything one sync run needs, resolved once at startup and passed
/// into the pipeline. Credentials come from the environment (or a .env
/// file loaded in main); the numeric knobs have defaults matching the
/// observed ExerciseDB configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub api_host: String,
    pub database_url: String,
    pub destination_table: String,
    /// Page size for each API request.
    pub limit: u32,
    /// Approximate total record count; drives how many pages are fetched.
    pub total_estimate: u32,
    /// Pause between consecutive batch requests.
    pub batch_delay: Duration,
    /// Total attempts per offset before the run aborts.
    pub max_retries: u32,
    /// Pause between retry attempts for the same offset.
    pub retry_delay: Duration,
}

impl SyncConfig {
    pub fn load_from_env() -> Result<Self> {
        let api_key = require_var("RAPIDAPI_KEY")?;
        let api_host = require_var("RAPIDAPI_HOST")?;
        let database_url = require_var("TARGET_DATABASE_URL")?;

        let api_base_url = env::var("EXERCISE_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Url::parse(&api_base_url)?;

        let destination_table = env::var("DESTINATION_TABLE")
            .unwrap_or_else(|_| DEFAULT_DESTINATION_TABLE.to_string());
        if destination_table.trim().is_empty() {
            return Err(AppError::Config("DESTINATION_TABLE cannot be empty".to_string()));
        }

        let limit = parse_or_default("BATCH_LIMIT", env::var("BATCH_LIMIT").ok(), DEFAULT_BATCH_LIMIT)?;
        if limit == 0 {
            return Err(AppError::Config("BATCH_LIMIT must be greater than zero".to_string()));
        }
        let total_estimate = parse_or_default(
            "TOTAL_EXERCISES",
            env::var("TOTAL_EXERCISES").ok(),
            DEFAULT_TOTAL_EXERCISES,
        )?;
        let batch_delay_ms = parse_or_default(
            "BATCH_DELAY_MS",
            env::var("BATCH_DELAY_MS").ok(),
            DEFAULT_BATCH_DELAY_MS,
        )?;
        let max_retries = parse_or_default("MAX_RETRIES", env::var("MAX_RETRIES").ok(), DEFAULT_MAX_RETRIES)?;
        if max_retries == 0 {
            return Err(AppError::Config("MAX_RETRIES must be greater than zero".to_string()));
        }
        let retry_delay_ms = parse_or_default(
            "RETRY_DELAY_MS",
            env::var("RETRY_DELAY_MS").ok(),
            DEFAULT_RETRY_DELAY_MS,
        )?;

        Ok(SyncConfig {
            api_base_url,
            api_key,
            api_host,
            database_url,
            destination_table,
            limit,
            total_estimate,
            batch_delay: Duration::from_millis(batch_delay_ms),
            max_retries,
            retry_delay: Duration::from_millis(retry_delay_ms),
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| AppError::Config(format!("{} must be set", name)))
}

/// Parses an optional environment value, falling back to `default` only
/// when the variable is absent. A present-but-malformed value is an error
/// rather than a silent fallback.
fn parse_or_default<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse::<T>().map_err(|e| {
            AppError::Config(format!(
                "{} must be a non-negative integer, got '{}': {}",
                name, value, e
            ))
        }),
        None => Ok(default),
    }
}
