//! Periodic database backups.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::storage::ClickStore;

/// Spawn the backup loop: every `interval_secs`, snapshot the store into a
/// timestamped file under `dir`. Failures are logged and the loop keeps
/// going; the task never takes the serving process down.
pub fn spawn_backup_task(
    store: Arc<dyn ClickStore>,
    dir: PathBuf,
    interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

        // Skip the first tick which fires immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let stamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S");
            let path = dir.join(format!("clicks_auto_{stamp}.db"));

            match store.backup_to(&path).await {
                Ok(()) => info!(path = %path.display(), "database backup written"),
                Err(err) => warn!(error = %err, "database backup failed"),
            }
        }
    })
}
