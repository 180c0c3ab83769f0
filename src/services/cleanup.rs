// src/services/cleanup.rs
// DOCUMENTATION: Expiry cleanup job for the place cache
// PURPOSE: Physically delete entries past the TTL, on a timer or on demand

use crate::db::PlaceCacheStore;
use crate::models::{expiry_cutoff, CleanupReport};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Deletes every entry whose `cached_at` is older than the TTL
/// Leaves fresh entries and the analytics counters untouched
#[derive(Clone)]
pub struct ExpiryCleanup {
    store: Arc<dyn PlaceCacheStore>,
}

impl ExpiryCleanup {
    pub fn new(store: Arc<dyn PlaceCacheStore>) -> Self {
        Self { store }
    }

    pub async fn run(&self) -> CleanupReport {
        let cutoff = expiry_cutoff(Utc::now());

        match self.store.delete_older_than(cutoff).await {
            Ok(deleted_count) => {
                if deleted_count > 0 {
                    log::info!(
                        "Cache cleanup: removed {} entries cached before {}",
                        deleted_count,
                        cutoff.to_rfc3339()
                    );
                } else {
                    log::debug!("Cache cleanup: nothing expired");
                }
                CleanupReport {
                    success: true,
                    deleted_count,
                    error: None,
                }
            }
            Err(e) => {
                log::error!("Cache cleanup failed: {}", e);
                CleanupReport {
                    success: false,
                    deleted_count: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries; first run happens immediately
pub fn start_cleanup_task(job: ExpiryCleanup, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            job.run().await;
        }
    });
}
