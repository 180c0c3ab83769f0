// src/db/analytics_repository.rs
// DOCUMENTATION: Postgres implementation of the daily cache counters

use crate::db::CacheAnalyticsStore;
use crate::errors::CacheError;
use crate::models::{AnalyticsDelta, CacheAnalyticsDaily};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheAnalyticsStore for AnalyticsRepository {
    /// Atomic per-day increment; concurrent requests never lose counts
    async fn increment(&self, day: NaiveDate, delta: AnalyticsDelta) -> Result<(), CacheError> {
        sqlx::query(
            r#"
            INSERT INTO cache_analytics_daily (date, cache_hits, cache_misses, api_calls_saved)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (date) DO UPDATE
            SET cache_hits = cache_analytics_daily.cache_hits + EXCLUDED.cache_hits,
                cache_misses = cache_analytics_daily.cache_misses + EXCLUDED.cache_misses,
                api_calls_saved = cache_analytics_daily.api_calls_saved + EXCLUDED.api_calls_saved
            "#,
        )
        .bind(day)
        .bind(delta.hits)
        .bind(delta.misses)
        .bind(delta.api_calls_saved)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to increment cache analytics for {}: {}", day, e);
            CacheError::DatabaseError(format!("Increment analytics failed: {}", e))
        })?;

        Ok(())
    }

    async fn since(&self, day: NaiveDate) -> Result<Vec<CacheAnalyticsDaily>, CacheError> {
        sqlx::query_as::<_, CacheAnalyticsDaily>(
            r#"
            SELECT date, cache_hits, cache_misses, api_calls_saved
            FROM cache_analytics_daily
            WHERE date >= $1
            ORDER BY date ASC
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to read cache analytics since {}: {}", day, e);
            CacheError::DatabaseError(format!("Read analytics failed: {}", e))
        })
    }
}
