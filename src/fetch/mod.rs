// gifsynctool/src/fetch/mod.rs
use async_trait::async_trait;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::SyncConfig;
use crate::errors::{AppError, Result};

/// One exercise as returned by the API. The response carries many more
/// fields (name, target muscle, equipment, ...); only the two synced
/// columns are deserialized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Exercise {
    pub id: String,
    #[serde(rename = "gifUrl")]
    pub gif_url: String,
}

/// Source of one page of exercises. The sequencer only sees this trait,
/// so tests can drive it with scripted pages.
#[async_trait]
pub trait BatchFetcher {
    /// Fetches the page starting at `offset`. May return fewer than
    /// `limit` records on the last page.
    async fn fetch_batch(&self, offset: u32) -> Result<Vec<Exercise>>;
}

/// What to do after attempt `attempt` (1-based) has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

pub fn next_retry(attempt: u32, max_retries: u32, delay: Duration) -> RetryDecision {
    if attempt < max_retries {
        RetryDecision::RetryAfter(delay)
    } else {
        RetryDecision::GiveUp
    }
}

/// Runs `op` for the same offset until it succeeds or `max_retries`
/// attempts are spent, sleeping `retry_delay` between attempts. Exhaustion
/// is fatal to the whole run; the caller does not retry above this.
pub async fn fetch_with_retry<F, Fut>(
    offset: u32,
    max_retries: u32,
    retry_delay: Duration,
    mut op: F,
) -> Result<Vec<Exercise>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<Exercise>>>,
{
    let mut attempt = 1;
    loop {
        println!("🔎 Fetching batch offset={}, attempt {}/{}", offset, attempt, max_retries);
        match op().await {
            Ok(page) => return Ok(page),
            Err(e) => {
                eprintln!("⚠️ Fetch failed at offset {} (attempt {}): {}", offset, attempt, e);
                match next_retry(attempt, max_retries, retry_delay) {
                    RetryDecision::RetryAfter(delay) => {
                        sleep(delay).await;
                        attempt += 1;
                    }
                    RetryDecision::GiveUp => {
                        return Err(AppError::FetchExhausted { offset, attempts: attempt });
                    }
                }
            }
        }
    }
}

/// reqwest-backed fetcher for the ExerciseDB API on RapidAPI.
pub struct ExerciseDbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_host: String,
    limit: u32,
    max_retries: u32,
    retry_delay: Duration,
}

impl ExerciseDbClient {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        Ok(ExerciseDbClient {
            http: reqwest::Client::builder().build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
            limit: config.limit,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    async fn request_page(&self, offset: u32) -> Result<Vec<Exercise>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("limit", self.limit), ("offset", offset)])
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<Vec<Exercise>>().await?)
    }
}

#[async_trait]
impl BatchFetcher for ExerciseDbClient {
    async fn fetch_batch(&self, offset: u32) -> Result<Vec<Exercise>> {
        fetch_with_retry(offset, self.max_retries, self.retry_delay, || {
            self.request_page(offset)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn exercise(id: &str) -> Exercise {
        Exercise {
            id: id.to_string(),
            gif_url: format!("https://v2.exercisedb.io/image/{}.gif", id),
        }
    }

    fn synthetic_failure() -> AppError {
        AppError::Config("synthetic fetch failure".to_string())
    }

    #[test]
    fn test_next_retry_below_cap_waits() {
        let delay = Duration::from_millis(2000);
        assert_eq!(next_retry(1, 3, delay), RetryDecision::RetryAfter(delay));
        assert_eq!(next_retry(2, 3, delay), RetryDecision::RetryAfter(delay));
    }

    #[test]
    fn test_next_retry_at_cap_gives_up() {
        let delay = Duration::from_millis(2000);
        assert_eq!(next_retry(3, 3, delay), RetryDecision::GiveUp);
        assert_eq!(next_retry(1, 1, delay), RetryDecision::GiveUp);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_with_retry_recovers_on_third_attempt() -> anyhow::Result<()> {
        let calls = Cell::new(0u32);
        let retry_delay = Duration::from_millis(2000);
        let started = tokio::time::Instant::now();

        let page = fetch_with_retry(0, 3, retry_delay, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(synthetic_failure())
                } else {
                    Ok(vec![exercise("0001"), exercise("0002")])
                }
            }
        })
        .await?;

        assert_eq!(calls.get(), 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, "0001");
        // Two failed attempts, so exactly two inter-retry delays elapsed.
        assert_eq!(started.elapsed(), retry_delay * 2);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_with_retry_exhaustion_is_fatal() {
        let calls = Cell::new(0u32);

        let result = fetch_with_retry(200, 3, Duration::from_millis(2000), || {
            calls.set(calls.get() + 1);
            async { Err(synthetic_failure()) }
        })
        .await;

        assert_eq!(calls.get(), 3);
        match result {
            Err(AppError::FetchExhausted { offset, attempts }) => {
                assert_eq!(offset, 200);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected FetchExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_exercise_deserializes_from_api_payload() -> anyhow::Result<()> {
        // Representative ExerciseDB response entry; extra fields are ignored.
        let payload = serde_json::json!({
            "bodyPart": "waist",
            "equipment": "body weight",
            "gifUrl": "https://v2.exercisedb.io/image/0001.gif",
            "id": "0001",
            "name": "3/4 sit-up",
            "target": "abs",
            "secondaryMuscles": ["hip flexors", "lower back"]
        });

        let exercise: Exercise = serde_json::from_value(payload)?;
        assert_eq!(exercise.id, "0001");
        assert_eq!(exercise.gif_url, "https://v2.exercisedb.io/image/0001.gif");
        Ok(())
    }
}
