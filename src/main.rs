//! Redis Ledger demo
//!
//! Stores a few values, reads them back, prints the recorded call history
//! and optionally fetches a page through the TTL cache.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_ledger::cache::STORE_IDENTITY;
use redis_ledger::{
    spawn_expiry_task, Cache, Config, FetchCache, HttpFetcher, KeyValueStore, MemoryStore,
    RedisStore, ReplayReporter,
};

/// Entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to Redis, or create the in-memory store and its expiry sweep
/// 4. Run the demo, or stop early on Ctrl+C
/// 5. Flush the store and abort the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_ledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: fetch_cache_ttl={}s, fetch_timeout={}s, cleanup_interval={}s",
        config.fetch_cache_ttl, config.fetch_timeout, config.cleanup_interval
    );

    match &config.redis_url {
        Some(url) => {
            let store = RedisStore::connect(url)
                .await
                .with_context(|| format!("connecting to {}", url))?;
            serve(Arc::new(store), &config).await
        }
        None => {
            let store = MemoryStore::new();
            let sweeper = spawn_expiry_task(store.clone(), config.cleanup_interval);
            let outcome = serve(Arc::new(store), &config).await;
            sweeper.abort();
            warn!("Expiry sweep aborted");
            outcome
        }
    }
}

/// Runs the demo until it finishes or a shutdown signal arrives, then
/// flushes the store.
async fn serve<S: KeyValueStore + 'static>(store: Arc<S>, config: &Config) -> anyhow::Result<()> {
    let outcome = tokio::select! {
        outcome = run(Arc::clone(&store), config) => outcome,
        _ = shutdown_signal() => Ok(()),
    };

    store.flush().await.context("flushing store on shutdown")?;
    info!("Shutdown complete");

    outcome
}

async fn run<S: KeyValueStore + 'static>(store: Arc<S>, config: &Config) -> anyhow::Result<()> {
    let cache = Cache::new_flushed(Arc::clone(&store)).await?;

    let text_key = cache.store("hello").await?;
    let int_key = cache.store(456).await?;
    let raw_key = cache.store(b"foo").await?;
    println!("{} -> {:?}", text_key, cache.retrieve_str(&text_key).await?);
    println!("{} -> {:?}", int_key, cache.retrieve_int(&int_key).await?);
    println!("{} -> {:?}", raw_key, cache.retrieve_raw(&raw_key).await?);

    let history = ReplayReporter::new(Arc::clone(&store))
        .replay(STORE_IDENTITY)
        .await?;
    println!("{}", history);

    if let Some(url) = &config.fetch_url {
        let fetcher = HttpFetcher::new(config.fetch_timeout)?;
        let pages = FetchCache::with_ttl(Arc::clone(&store), fetcher, config.fetch_cache_ttl)?;
        for _ in 0..3 {
            let page = pages
                .get(url)
                .await
                .with_context(|| format!("fetching {}", url))?;
            println!("{}: {} bytes", url, page.len());
        }
        println!("{} accessed {} times", url, pages.access_count(url).await?);
    }

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
