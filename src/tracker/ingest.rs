use anyhow::Result;
use chrono::Utc;

use crate::geo::CountryResolver;
use crate::models::NewClick;
use crate::storage::ClickStore;

/// One incoming hit, already normalized by the HTTP layer.
#[derive(Debug, Clone)]
pub struct Hit {
    pub ip_address: String,
    pub user_agent: String,
    pub referer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// First hit from this IP today; a new row was inserted.
    New { id: i64 },
    /// Repeat hit; the existing row's counter was bumped.
    Repeat { id: i64 },
}

/// Record one hit: resolve the country, then either bump today's row for
/// this IP or insert a fresh one.
///
/// Dedup is find-then-write, not a uniqueness constraint, so two racing
/// first hits from one IP can still produce two rows. Accepted: the loser
/// of the race costs one duplicate row, never a failed redirect.
pub async fn record_click(
    store: &dyn ClickStore,
    resolver: &dyn CountryResolver,
    hit: Hit,
) -> Result<ClickOutcome> {
    let country = resolver.resolve(&hit.ip_address).await;
    let today = Utc::now().date_naive();

    match store.find_for_day(&hit.ip_address, today).await? {
        Some(existing) => {
            store.increment_count(existing.id).await?;
            Ok(ClickOutcome::Repeat { id: existing.id })
        }
        None => {
            let id = store
                .insert(NewClick {
                    ip_address: hit.ip_address,
                    user_agent: hit.user_agent,
                    referer: hit.referer,
                    country,
                })
                .await?;
            Ok(ClickOutcome::New { id })
        }
    }
}
