use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A single page request failed. Consumed by the retry loop; only
    /// escalates as `FetchExhausted` once the attempt budget is spent.
    #[error("HTTP request error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to fetch batch at offset {offset} after {attempts} attempts")]
    FetchExhausted { offset: u32, attempts: u32 },

    #[error("Upsert failed: {0}")]
    Sink(sqlx::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
