// src/services/analytics.rs
// DOCUMENTATION: Cache hit/miss accounting
// PURPOSE: Daily counters for the admin dashboard; never allowed to fail a lookup

use crate::db::CacheAnalyticsStore;
use crate::errors::CacheError;
use crate::models::{AnalyticsDelta, CacheAnalyticsSummary};
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Counts hits and misses per UTC day
/// A hit is a provider call that did not happen, so savings are credited on hits
#[derive(Clone)]
pub struct CacheAnalytics {
    store: Arc<dyn CacheAnalyticsStore>,
}

impl CacheAnalytics {
    pub fn new(store: Arc<dyn CacheAnalyticsStore>) -> Self {
        Self { store }
    }

    pub async fn record_hit(&self) {
        self.record(AnalyticsDelta {
            hits: 1,
            misses: 0,
            api_calls_saved: 1,
        })
        .await;
    }

    pub async fn record_miss(&self) {
        self.record(AnalyticsDelta {
            hits: 0,
            misses: 1,
            api_calls_saved: 0,
        })
        .await;
    }

    async fn record(&self, delta: AnalyticsDelta) {
        let today = Utc::now().date_naive();
        if let Err(e) = self.store.increment(today, delta).await {
            log::warn!("Cache analytics not recorded: {}", e);
        }
    }

    /// Totals over the last `days` days, today included
    pub async fn summary(&self, days: u32) -> Result<CacheAnalyticsSummary, CacheError> {
        let days = days.max(1);
        let since = Utc::now().date_naive() - Duration::days(i64::from(days) - 1);
        let rows = self.store.since(since).await?;
        Ok(CacheAnalyticsSummary::from_rows(days, &rows))
    }
}
