use crate::models::{ClickRecord, ClickStats, NewClick};
use crate::storage::ClickStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Ordered, additive-only migrations. `PRAGMA user_version` records how many
/// have been applied, so `init` only runs the suffix a deployment is missing.
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS clicks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ip_address TEXT NOT NULL,
        user_agent TEXT NOT NULL DEFAULT 'unknown',
        referer TEXT NOT NULL DEFAULT 'direct',
        country TEXT NOT NULL DEFAULT 'Unknown',
        click_count INTEGER NOT NULL DEFAULT 1,
        timestamp INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_clicks_ip_timestamp ON clicks(ip_address, timestamp)",
];

pub struct SqliteClickStore {
    pool: SqlitePool,
}

impl SqliteClickStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .with_context(|| format!("failed to open database at {database_url}"))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ClickStore for SqliteClickStore {
    async fn init(&self) -> Result<()> {
        let applied: i64 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&self.pool)
            .await?;

        for (index, migration) in MIGRATIONS.iter().enumerate().skip(applied as usize) {
            sqlx::query(migration)
                .execute(&self.pool)
                .await
                .with_context(|| format!("migration {} failed", index + 1))?;
            sqlx::query(&format!("PRAGMA user_version = {}", index + 1))
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    async fn find_for_day(&self, ip: &str, day: NaiveDate) -> Result<Option<ClickRecord>> {
        let record = sqlx::query_as::<_, ClickRecord>(
            r#"
            SELECT id, ip_address, user_agent, referer, country, click_count, timestamp
            FROM clicks
            WHERE ip_address = ? AND DATE(timestamp, 'unixepoch') = ?
            "#,
        )
        .bind(ip)
        .bind(day.format("%Y-%m-%d").to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn increment_count(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE clicks SET click_count = click_count + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert(&self, click: NewClick) -> Result<i64> {
        let timestamp = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO clicks (ip_address, user_agent, referer, country, click_count, timestamp)
            VALUES (?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(&click.ip_address)
        .bind(&click.user_agent)
        .bind(&click.referer)
        .bind(&click.country)
        .bind(timestamp)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ClickRecord>> {
        let records = sqlx::query_as::<_, ClickRecord>(
            r#"
            SELECT id, ip_address, user_agent, referer, country, click_count, timestamp
            FROM clicks
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn stats(&self) -> Result<ClickStats> {
        let (total_clicks, unique_ips, repeated_clicks, unique_countries) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(DISTINCT ip_address),
                    COALESCE(SUM(click_count), 0) - COUNT(*),
                    COUNT(DISTINCT country)
                FROM clicks
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let countries =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT country FROM clicks ORDER BY country")
                .fetch_all(&self.pool)
                .await?;

        Ok(ClickStats {
            total_clicks,
            unique_ips,
            repeated_clicks,
            countries,
            unique_countries,
        })
    }

    async fn backup_to(&self, path: &Path) -> Result<()> {
        let target = path
            .to_str()
            .context("backup path is not valid UTF-8")?;

        // VACUUM INTO snapshots without taking a long write lock.
        sqlx::query("VACUUM INTO ?")
            .bind(target)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to back up database to {target}"))?;

        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
