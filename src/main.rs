use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use linktrace::backup;
use linktrace::config::Config;
use linktrace::geo::HttpCountryResolver;
use linktrace::storage::{ClickStore, SqliteClickStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    info!("Using SQLite storage: {}", config.database.url);
    let store: Arc<dyn ClickStore> = Arc::new(
        SqliteClickStore::new(&config.database.url, config.database.max_connections).await?,
    );
    store.init().await?;
    info!("Database initialized successfully");

    // Geolocation resolver
    let resolver = Arc::new(HttpCountryResolver::new(
        &config.geoip.api_url,
        Duration::from_secs(config.geoip.timeout_secs),
    )?);

    // Daily backup task
    tokio::fs::create_dir_all(&config.backup.dir).await?;
    let backup_task = backup::spawn_backup_task(
        Arc::clone(&store),
        PathBuf::from(&config.backup.dir),
        config.backup.interval_secs,
    );

    let app = linktrace::api::create_router(Arc::clone(&store), resolver, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);
    info!("   - Tracking link at http://{}/", addr);
    info!("   - Admin panel at http://{}/admin", addr);
    info!("   - Click API at http://{}/api/clicks", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    backup_task.abort();
    store.close().await;
    info!("Server stopped, database closed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight requests");
}
