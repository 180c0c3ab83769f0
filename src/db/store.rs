// src/db/store.rs
// DOCUMENTATION: Persistence ports used by the cache services
// PURPOSE: Let the orchestrator run against Postgres in production and in-memory stores in tests

use crate::errors::CacheError;
use crate::models::{AnalyticsDelta, CacheAnalyticsDaily, PlaceCacheEntry, PlaceCacheUpsert};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Keyed store of cached place media, one record per place id
#[async_trait]
pub trait PlaceCacheStore: Send + Sync {
    /// Fetch the entry for a place, expired or not
    async fn get(&self, place_id: &str) -> Result<Option<PlaceCacheEntry>, CacheError>;

    /// Insert or merge an entry, stamping `cached_at` with the current time.
    /// The stored tier never drops below what is already there.
    async fn upsert(&self, entry: &PlaceCacheUpsert) -> Result<(), CacheError>;

    /// Total number of cached places
    async fn count(&self) -> Result<i64, CacheError>;

    /// All entries, most recently cached first
    async fn list(&self) -> Result<Vec<PlaceCacheEntry>, CacheError>;

    /// Hard delete; returns whether a row existed
    async fn delete(&self, place_id: &str) -> Result<bool, CacheError>;

    /// Overwrite `cached_at` only; returns whether a row existed
    async fn set_cached_at(
        &self,
        place_id: &str,
        cached_at: DateTime<Utc>,
    ) -> Result<bool, CacheError>;

    /// Delete every entry cached before `cutoff`
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, CacheError>;
}

/// Daily hit/miss counters
#[async_trait]
pub trait CacheAnalyticsStore: Send + Sync {
    /// Add `delta` to the row for `day`, creating it if needed
    async fn increment(&self, day: NaiveDate, delta: AnalyticsDelta) -> Result<(), CacheError>;

    /// Rows dated on or after `day`, oldest first
    async fn since(&self, day: NaiveDate) -> Result<Vec<CacheAnalyticsDaily>, CacheError>;
}
