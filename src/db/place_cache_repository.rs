// src/db/place_cache_repository.rs
// DOCUMENTATION: Postgres implementation of the place cache store
// PURPOSE: All SQL for the place_cache table; reads/writes go through the
// get_cached_place / upsert_place_cache stored procedures

use crate::db::PlaceCacheStore;
use crate::errors::CacheError;
use crate::models::{CachedReview, PlaceCacheEntry, PlaceCacheUpsert, UserTier};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

/// Internal struct for mapping place_cache rows
/// DOCUMENTATION: Tier is stored as text, reviews as JSONB
#[derive(Debug, FromRow)]
struct PlaceCacheRow {
    pub place_id: String,
    pub photo_uris: Vec<String>,
    pub reviews: Json<Vec<CachedReview>>,
    pub attributions: Option<String>,
    pub cached_tier: String,
    pub cached_at: DateTime<Utc>,
}

impl PlaceCacheRow {
    fn to_entry(self) -> PlaceCacheEntry {
        let cached_tier = self.cached_tier.parse().unwrap_or_else(|e| {
            log::warn!("Place {} has unknown cached_tier: {}", self.place_id, e);
            UserTier::Free
        });

        PlaceCacheEntry {
            place_id: self.place_id,
            photo_uris: self.photo_uris,
            reviews: self.reviews.0,
            attributions: self.attributions,
            cached_tier,
            cached_at: self.cached_at,
        }
    }
}

/// PlaceCacheRepository: place_cache table access
pub struct PlaceCacheRepository {
    pool: PgPool,
}

impl PlaceCacheRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceCacheStore for PlaceCacheRepository {
    async fn get(&self, place_id: &str) -> Result<Option<PlaceCacheEntry>, CacheError> {
        let row = sqlx::query_as::<_, PlaceCacheRow>(
            r#"
            SELECT place_id, photo_uris, reviews, attributions, cached_tier, cached_at
            FROM get_cached_place($1)
            "#,
        )
        .bind(place_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to read cache entry {}: {}", place_id, e);
            CacheError::DatabaseError(format!("Read cache entry failed: {}", e))
        })?;

        Ok(row.map(PlaceCacheRow::to_entry))
    }

    async fn upsert(&self, entry: &PlaceCacheUpsert) -> Result<(), CacheError> {
        sqlx::query("SELECT upsert_place_cache($1, $2, $3, $4, $5)")
            .bind(&entry.place_id)
            .bind(&entry.photo_uris)
            .bind(Json(&entry.reviews))
            .bind(&entry.attributions)
            .bind(entry.tier.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to upsert cache entry {}: {}", entry.place_id, e);
                CacheError::DatabaseError(format!("Upsert cache entry failed: {}", e))
            })?;

        Ok(())
    }

    async fn count(&self) -> Result<i64, CacheError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM place_cache")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to count cache entries: {}", e);
                CacheError::DatabaseError(format!("Count cache entries failed: {}", e))
            })?;

        Ok(total.0)
    }

    async fn list(&self) -> Result<Vec<PlaceCacheEntry>, CacheError> {
        let rows = sqlx::query_as::<_, PlaceCacheRow>(
            r#"
            SELECT place_id, photo_uris, reviews, attributions, cached_tier, cached_at
            FROM place_cache
            ORDER BY cached_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list cache entries: {}", e);
            CacheError::DatabaseError(format!("List cache entries failed: {}", e))
        })?;

        Ok(rows.into_iter().map(PlaceCacheRow::to_entry).collect())
    }

    async fn delete(&self, place_id: &str) -> Result<bool, CacheError> {
        let result = sqlx::query("DELETE FROM place_cache WHERE place_id = $1")
            .bind(place_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete cache entry {}: {}", place_id, e);
                CacheError::DatabaseError(format!("Delete cache entry failed: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_cached_at(
        &self,
        place_id: &str,
        cached_at: DateTime<Utc>,
    ) -> Result<bool, CacheError> {
        let result = sqlx::query("UPDATE place_cache SET cached_at = $2 WHERE place_id = $1")
            .bind(place_id)
            .bind(cached_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to update cached_at for {}: {}", place_id, e);
                CacheError::DatabaseError(format!("Update cached_at failed: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, CacheError> {
        let result = sqlx::query("DELETE FROM place_cache WHERE cached_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete expired cache entries: {}", e);
                CacheError::DatabaseError(format!("Delete expired entries failed: {}", e))
            })?;

        Ok(result.rows_affected())
    }
}
