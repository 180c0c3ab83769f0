// src/models/place_cache.rs
// DOCUMENTATION: Cached Google Places media and the DTOs around it
// PURPOSE: Defines cache records, orchestrator request/response and admin views

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{CacheAnalyticsSummary, UserTier};

/// Entries older than this are expired (still stored until cleanup runs)
pub const CACHE_TTL_DAYS: i64 = 30;

/// How far into the past a force-refresh pushes `cached_at`
pub const FORCE_REFRESH_AGE_DAYS: i64 = CACHE_TTL_DAYS + 1;

/// Earliest `cached_at` that is still fresh at `now`
pub fn expiry_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(CACHE_TTL_DAYS)
}

/// An entry is expired once it is strictly older than the TTL
pub fn is_expired(cached_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    cached_at < expiry_cutoff(now)
}

/// Review snippet as returned by the provider and stored in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedReview {
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    /// 1-5 stars
    pub rating: u8,
    #[serde(default)]
    pub relative_time_description: String,
    #[serde(default)]
    pub text: String,
    /// Unix seconds
    pub time: i64,
}

/// One cached place, keyed by the provider's place id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCacheEntry {
    pub place_id: String,
    pub photo_uris: Vec<String>,
    pub reviews: Vec<CachedReview>,
    pub attributions: Option<String>,
    pub cached_tier: UserTier,
    pub cached_at: DateTime<Utc>,
}

impl PlaceCacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.cached_at, now)
    }

    /// Convert into the admin dashboard row
    pub fn to_view(&self, now: DateTime<Utc>) -> CacheEntryView {
        CacheEntryView {
            place_id: self.place_id.clone(),
            photo_uris: self.photo_uris.clone(),
            photo_count: self.photo_uris.len(),
            review_count: self.reviews.len(),
            attributions: self.attributions.clone(),
            cached_tier: self.cached_tier,
            cached_at: self.cached_at,
            is_expired: self.is_expired(now),
        }
    }
}

/// Data written by a populate; `cached_at` is set by the store
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCacheUpsert {
    pub place_id: String,
    pub photo_uris: Vec<String>,
    pub reviews: Vec<CachedReview>,
    pub attributions: Option<String>,
    pub tier: UserTier,
}

/// POST /place-cache body
/// Tier and action arrive as raw strings so bad values become a 400 with our own message
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PlaceCacheRequest {
    #[validate(length(max = 512))]
    pub place_id: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 255))]
    pub property_name: Option<String>,

    #[validate(length(max = 255))]
    pub city: Option<String>,

    #[serde(default)]
    pub user_tier: String,

    #[serde(default)]
    pub action: String,
}

/// Cache bookkeeping attached to every successful lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatsInfo {
    pub total_cached_places: i64,
    pub cache_hit: bool,
}

/// POST /place-cache response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCacheResponse {
    pub success: bool,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub photos: Vec<String>,
    pub reviews: Vec<CachedReview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributions: Option<String>,
    /// Uncapped count of cached photos, used for "10+ photos" prompts
    pub photo_count: usize,
    pub review_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_stats: Option<CacheStatsInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlaceCacheResponse {
    /// Successful lookup with nothing to show
    pub fn empty(place_id: Option<String>) -> Self {
        Self {
            success: true,
            cached: false,
            place_id,
            photos: Vec::new(),
            reviews: Vec::new(),
            attributions: None,
            photo_count: 0,
            review_count: 0,
            cache_stats: None,
            error: None,
        }
    }
}

/// Admin dashboard row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntryView {
    pub place_id: String,
    pub photo_uris: Vec<String>,
    pub photo_count: usize,
    pub review_count: usize,
    pub attributions: Option<String>,
    pub cached_tier: UserTier,
    pub cached_at: DateTime<Utc>,
    pub is_expired: bool,
}

/// GET /admin/cache response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheDashboard {
    pub total: usize,
    pub expired_count: usize,
    pub entries: Vec<CacheEntryView>,
    pub analytics: CacheAnalyticsSummary,
}

/// Output of the expiry cleanup job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub success: bool,
    pub deleted_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
