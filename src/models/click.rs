use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One persisted visit, deduplicated per (ip_address, calendar day).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClickRecord {
    pub id: i64,
    pub ip_address: String,
    pub user_agent: String,
    pub referer: String,
    pub country: String,
    pub click_count: i64,
    /// Unix seconds at row creation; not touched by later increments.
    pub timestamp: i64,
}

/// Payload for a first-time hit. `click_count` starts at 1 and the
/// timestamp comes from the store's own clock.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub ip_address: String,
    pub user_agent: String,
    pub referer: String,
    pub country: String,
}

/// Aggregate over the full clicks table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickStats {
    pub total_clicks: i64,
    pub unique_ips: i64,
    /// SUM(click_count) - COUNT(*): hits absorbed by same-day dedup.
    pub repeated_clicks: i64,
    pub countries: Vec<String>,
    pub unique_countries: i64,
}
