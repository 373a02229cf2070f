use crate::models::{ClickRecord, ClickStats, NewClick};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;

#[async_trait]
pub trait ClickStore: Send + Sync {
    /// Initialize the store (create the schema, apply pending migrations).
    /// Idempotent; safe to run against an already-initialized database.
    async fn init(&self) -> Result<()>;

    /// Find the record for `ip` whose timestamp falls on `day` (UTC).
    async fn find_for_day(&self, ip: &str, day: NaiveDate) -> Result<Option<ClickRecord>>;

    /// Increment `click_count` for an existing row. The row's timestamp
    /// keeps its creation value.
    async fn increment_count(&self, id: i64) -> Result<()>;

    /// Insert a new record with `click_count = 1`, returning its id.
    async fn insert(&self, click: NewClick) -> Result<i64>;

    /// Most recent records, newest first, bounded by `limit`.
    async fn list_recent(&self, limit: i64) -> Result<Vec<ClickRecord>>;

    /// Aggregate statistics over the whole table.
    async fn stats(&self) -> Result<ClickStats>;

    /// Write a consistent snapshot of the database to `path`.
    async fn backup_to(&self, path: &Path) -> Result<()>;

    /// Release the underlying connections. Called once at shutdown.
    async fn close(&self);
}
