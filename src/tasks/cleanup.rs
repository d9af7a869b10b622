//! Expiry Sweep Task
//!
//! Background task that periodically removes expired keys from a
//! [`MemoryStore`].

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns a background task that periodically purges expired keys.
///
/// Reads already hide expired keys; the sweep only reclaims memory for keys
/// nobody reads again.
///
/// # Arguments
/// * `store` - Handle to the store to sweep
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during shutdown.
pub fn spawn_expiry_task(store: MemoryStore, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;
            if removed > 0 {
                info!("Expiry sweep: removed {} expired keys", removed);
            } else {
                debug!("Expiry sweep: no expired keys found");
            }
        }
    })
}
