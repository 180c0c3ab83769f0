// src/services/admin.rs
// DOCUMENTATION: Operations behind the cache admin dashboard
// PURPOSE: List, delete, force-refresh and purge cached places

use crate::db::PlaceCacheStore;
use crate::errors::CacheError;
use crate::models::{
    CacheDashboard, CacheEntryView, CleanupReport, DEFAULT_SUMMARY_DAYS, FORCE_REFRESH_AGE_DAYS,
};
use crate::services::{CacheAnalytics, ExpiryCleanup};
use chrono::{Duration, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct CacheAdminService {
    store: Arc<dyn PlaceCacheStore>,
    analytics: CacheAnalytics,
    cleanup: ExpiryCleanup,
}

impl CacheAdminService {
    pub fn new(store: Arc<dyn PlaceCacheStore>, analytics: CacheAnalytics) -> Self {
        Self {
            cleanup: ExpiryCleanup::new(store.clone()),
            store,
            analytics,
        }
    }

    /// Every entry, newest first, with the default analytics window
    pub async fn dashboard(&self) -> Result<CacheDashboard, CacheError> {
        let now = Utc::now();
        let entries: Vec<CacheEntryView> = self
            .store
            .list()
            .await?
            .iter()
            .map(|entry| entry.to_view(now))
            .collect();
        let expired_count = entries.iter().filter(|e| e.is_expired).count();
        let analytics = self.analytics.summary(DEFAULT_SUMMARY_DAYS).await?;

        Ok(CacheDashboard {
            total: entries.len(),
            expired_count,
            entries,
            analytics,
        })
    }

    pub async fn delete(&self, place_id: &str) -> Result<(), CacheError> {
        if !self.store.delete(place_id).await? {
            return Err(CacheError::NotFound(place_id.to_string()));
        }
        log::info!("Admin deleted cache entry {}", place_id);
        Ok(())
    }

    /// Backdate an entry past the TTL so the next lookup refetches it
    /// DOCUMENTATION: Media and tier are left as they are
    pub async fn force_refresh(&self, place_id: &str) -> Result<(), CacheError> {
        let backdated = Utc::now() - Duration::days(FORCE_REFRESH_AGE_DAYS);
        if !self.store.set_cached_at(place_id, backdated).await? {
            return Err(CacheError::NotFound(place_id.to_string()));
        }
        log::info!("Admin forced refresh of {}", place_id);
        Ok(())
    }

    pub async fn purge_expired(&self) -> CleanupReport {
        self.cleanup.run().await
    }
}
