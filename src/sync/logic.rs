// gifsynctool/src/sync/logic.rs
use chrono::Utc;
use tokio::time::sleep;

use crate::config::SyncConfig;
use crate::errors::Result;
use crate::fetch::BatchFetcher;
use crate::sink::UpsertSink;
use crate::sync::transform::{to_gif_record, GifRecord};

/// Number of pages needed to cover `total_estimate` records. The total is
/// a configured estimate, not queried from the API, so trailing pages may
/// come back short or empty.
pub fn batch_count(total_estimate: u32, limit: u32) -> u32 {
    total_estimate.div_ceil(limit)
}

/// Fetches and transforms every batch in order, folding each page into one
/// accumulator. Strictly sequential: batch `i + 1` is not requested until
/// batch `i` has been fetched, transformed and appended. Aborts on the
/// first batch whose retries are exhausted.
pub async fn collect_gif_records<F>(fetcher: &F, config: &SyncConfig) -> Result<Vec<GifRecord>>
where
    F: BatchFetcher,
{
    let batches = batch_count(config.total_estimate, config.limit);
    let mut accumulated: Vec<GifRecord> = Vec::with_capacity(config.total_estimate as usize);

    for i in 0..batches {
        let offset = i * config.limit;
        let page = fetcher.fetch_batch(offset).await?;
        println!("📦 Fetched {} exercises for batch {}/{}", page.len(), i + 1, batches);

        let stamped_at = Utc::now();
        accumulated.extend(page.into_iter().map(|e| to_gif_record(e, stamped_at)));

        // Stay under the API rate limit; no pause after the last batch.
        if i + 1 < batches {
            sleep(config.batch_delay).await;
        }
    }

    Ok(accumulated)
}

/// Orchestrates one full sync run: collect everything, then write once.
/// A fetch failure means the sink is never touched and nothing is written;
/// a sink failure is logged and surfaces as the run's failed state.
pub async fn perform_gif_sync<F, S>(fetcher: &F, sink: &S, config: &SyncConfig) -> Result<()>
where
    F: BatchFetcher,
    S: UpsertSink,
{
    println!(
        "⚙️ Starting gif sync: ~{} records from {} in batches of {}",
        config.total_estimate, config.api_base_url, config.limit
    );

    let records = collect_gif_records(fetcher, config).await?;

    println!(
        "⬆️ Upserting {} gif URLs into {}...",
        records.len(),
        config.destination_table
    );
    match sink.upsert_all(&records).await {
        Ok(affected) => {
            println!("✓ Upserted {} records.", affected);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Error upserting gifs: {}", e);
            Err(e)
        }
    }
}
