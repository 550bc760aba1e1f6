// gifsynctool/src/sink/mod.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;

use crate::errors::{AppError, Result};
use crate::sync::transform::GifRecord;

/// Destination for one run's accumulated records.
#[async_trait]
pub trait UpsertSink {
    /// Writes the whole sequence in a single statement keyed on `id`.
    /// Returns the number of rows affected.
    async fn upsert_all(&self, records: &[GifRecord]) -> Result<u64>;
}

/// Collapses duplicated ids so the last occurrence wins, keeping
/// first-seen order. Postgres rejects a multi-row `ON CONFLICT DO UPDATE`
/// that touches the same row twice, and last-write-wins is the sync
/// contract for a given id anyway.
pub fn collapse_duplicates(records: &[GifRecord]) -> Vec<GifRecord> {
    let mut slot_by_id: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    let mut collapsed: Vec<GifRecord> = Vec::with_capacity(records.len());

    for record in records {
        match slot_by_id.get(record.id.as_str()) {
            Some(&slot) => collapsed[slot] = record.clone(),
            None => {
                slot_by_id.insert(record.id.as_str(), collapsed.len());
                collapsed.push(record.clone());
            }
        }
    }

    collapsed
}

/// sqlx-backed sink upserting into the hosted Postgres table
/// (columns `id`, `"gifUrl"`, `updated_at`).
pub struct PostgresSink {
    pool: PgPool,
    table: String,
}

impl PostgresSink {
    pub fn new(pool: PgPool, table: String) -> Self {
        PostgresSink { pool, table }
    }
}

#[async_trait]
impl UpsertSink for PostgresSink {
    async fn upsert_all(&self, records: &[GifRecord]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let collapsed = collapse_duplicates(records);
        let mut ids: Vec<String> = Vec::with_capacity(collapsed.len());
        let mut gif_urls: Vec<String> = Vec::with_capacity(collapsed.len());
        let mut updated_ats: Vec<DateTime<Utc>> = Vec::with_capacity(collapsed.len());
        for record in collapsed {
            ids.push(record.id);
            gif_urls.push(record.gif_url);
            updated_ats.push(record.updated_at);
        }

        let sql = format!(
            r#"
            WITH input AS (
                SELECT UNNEST($1::text[])        AS id,
                       UNNEST($2::text[])        AS gif_url,
                       UNNEST($3::timestamptz[]) AS updated_at
            )
            INSERT INTO "{table}" (id, "gifUrl", updated_at)
            SELECT id, gif_url, updated_at FROM input
            ON CONFLICT (id) DO UPDATE
            SET "gifUrl" = EXCLUDED."gifUrl",
                updated_at = EXCLUDED.updated_at
            "#,
            table = self.table.replace('"', "\"\"")
        );

        let outcome = sqlx::query(&sql)
            .bind(&ids)
            .bind(&gif_urls)
            .bind(&updated_ats)
            .execute(&self.pool)
            .await
            .map_err(AppError::Sink)?;

        Ok(outcome.rows_affected())
    }
}
