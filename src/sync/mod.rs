// gifsynctool/src/sync/mod.rs
pub(crate) mod logic;
pub mod transform;

use crate::config::SyncConfig;
use crate::errors::Result;
use crate::fetch::BatchFetcher;
use crate::sink::UpsertSink;

/// Public entry point for the sync process: fetch every batch, then write
/// the accumulated records once.
pub async fn run_sync_flow<F, S>(fetcher: &F, sink: &S, config: &SyncConfig) -> Result<()>
where
    F: BatchFetcher,
    S: UpsertSink,
{
    logic::perform_gif_sync(fetcher, sink, config).await
}
