/**
 * Peramore Admin Entry Point
 *
 * Runs a headless dashboard session against the configured script: the
 * cache is loaded, the catalog and inbox are refreshed on the configured
 * interval and every refresh is logged, until Ctrl-C.
 */
use peramore_admin::admin::{AdminSession, Config, HttpRemoteStore, LocalCache};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("peramore_admin=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::load()?;
    let cache_path = config.cache_path();
    tracing::info!(
        "Using script {} (refresh every {:?}, cache at {})",
        config.script_url(),
        config.refresh_interval(),
        cache_path.display()
    );

    let remote = Arc::new(HttpRemoteStore::new(config.clone())?);
    let cache = LocalCache::open(&cache_path).await?;

    let mut session = AdminSession::start(config, remote, cache).await;
    let seeded = session.snapshot().await;
    tracing::info!(
        "Cached snapshot: {} products, {} messages, {} unread",
        seeded.products.len(),
        seeded.messages.len(),
        seeded.unread()
    );

    tokio::signal::ctrl_c().await?;

    let status = session.status().await;
    tracing::info!(
        "Shutting down after {} refreshes ({} failed)",
        status.refresh_count,
        status.failed_count
    );
    session.shutdown();
    Ok(())
}
