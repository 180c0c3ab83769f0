// src/services/place_cache.rs
// DOCUMENTATION: Tiered place media cache in front of the Google Places API
// PURPOSE: Resolve a place, decide hit / delta fetch / fetch, persist, and
// return a slice sized for the caller's tier and display action

use crate::db::PlaceCacheStore;
use crate::errors::CacheError;
use crate::models::{
    CacheStatsInfo, DisplayAction, PlaceCacheEntry, PlaceCacheRequest, PlaceCacheResponse,
    PlaceCacheUpsert, UserTier,
};
use crate::services::{CacheAnalytics, PlacesProvider};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use validator::Validate;

pub const PROVIDER_NOT_CONFIGURED: &str = "Google Places API key not configured";

/// Photos a free-tier listing entry must hold before it counts as a hit
const FREE_LISTING_MIN_PHOTOS: usize = 3;

/// Validated orchestrator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub place_id: Option<String>,
    /// Non-empty parts of property name, address and city, joined
    pub search: Option<String>,
    pub tier: UserTier,
    pub action: DisplayAction,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl LookupQuery {
    /// Parse and validate a request body
    /// DOCUMENTATION: Bad tier/action or no usable identifier is a 400;
    /// city alone is not enough to search on
    pub fn from_request(req: &PlaceCacheRequest) -> Result<Self, CacheError> {
        let tier: UserTier = req.user_tier.parse().map_err(CacheError::InvalidInput)?;
        let action: DisplayAction = req.action.parse().map_err(CacheError::InvalidInput)?;

        req.validate()
            .map_err(|e| CacheError::ValidationError(e.to_string()))?;

        let place_id = non_blank(&req.place_id).map(str::to_string);

        if place_id.is_none()
            && non_blank(&req.address).is_none()
            && non_blank(&req.property_name).is_none()
        {
            return Err(CacheError::InvalidInput(
                "place_id, address or property_name is required".to_string(),
            ));
        }

        let parts: Vec<&str> = [&req.property_name, &req.address, &req.city]
            .into_iter()
            .filter_map(non_blank)
            .collect();
        let search = if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        };

        Ok(Self {
            place_id,
            search,
            tier,
            action,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    Missing,
    Expired,
    Insufficient,
}

/// Outcome of inspecting the cache for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    /// Serve the stored entry as is
    Hit,
    /// Fresh free entry, pro listing caller: refetch at pro limits
    DeltaFetch,
    Fetch(FetchReason),
}

/// Decide whether the stored entry can serve this caller
pub fn decide(
    entry: Option<&PlaceCacheEntry>,
    tier: UserTier,
    action: DisplayAction,
    now: DateTime<Utc>,
) -> CacheDecision {
    let entry = match entry {
        Some(entry) => entry,
        None => return CacheDecision::Fetch(FetchReason::Missing),
    };

    if entry.is_expired(now) {
        return CacheDecision::Fetch(FetchReason::Expired);
    }

    if entry.cached_tier == UserTier::Pro {
        return CacheDecision::Hit;
    }

    let photos = entry.photo_uris.len();
    match (action, tier) {
        (DisplayAction::Listing, UserTier::Pro) => CacheDecision::DeltaFetch,
        (DisplayAction::Listing, UserTier::Free) if photos >= FREE_LISTING_MIN_PHOTOS => {
            CacheDecision::Hit
        }
        (DisplayAction::Browse, _) if photos >= 1 => CacheDecision::Hit,
        _ => CacheDecision::Fetch(FetchReason::Insufficient),
    }
}

/// Cache orchestrator
/// DOCUMENTATION: Stateless; every dependency is injected so instances can be
/// cloned into each worker. `provider` is None when no API key is configured.
#[derive(Clone)]
pub struct PlaceCacheService {
    store: Arc<dyn PlaceCacheStore>,
    provider: Option<Arc<dyn PlacesProvider>>,
    analytics: CacheAnalytics,
}

impl PlaceCacheService {
    pub fn new(
        store: Arc<dyn PlaceCacheStore>,
        provider: Option<Arc<dyn PlacesProvider>>,
        analytics: CacheAnalytics,
    ) -> Self {
        Self {
            store,
            provider,
            analytics,
        }
    }

    /// Serve photos/reviews for one place
    /// DOCUMENTATION: Provider and store failures degrade to stale or empty
    /// results; only configuration problems are returned as errors
    pub async fn lookup(&self, query: &LookupQuery) -> Result<PlaceCacheResponse, CacheError> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            log::error!("Place cache lookup rejected: {}", PROVIDER_NOT_CONFIGURED);
            CacheError::Configuration(PROVIDER_NOT_CONFIGURED.to_string())
        })?;

        let place_id = match self.resolve_place_id(provider.as_ref(), query).await {
            Some(place_id) => place_id,
            None => return Ok(PlaceCacheResponse::empty(None)),
        };

        let existing = match self.store.get(&place_id).await {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Cache read failed for {}, treating as miss: {}", place_id, e);
                None
            }
        };

        let decision = decide(existing.as_ref(), query.tier, query.action, Utc::now());
        log::debug!(
            "Cache decision for {} ({} {}): {:?}",
            place_id,
            query.tier,
            query.action,
            decision
        );

        let fetch_tier = match (decision, existing.as_ref()) {
            (CacheDecision::Hit, Some(entry)) => {
                self.analytics.record_hit().await;
                return Ok(self.respond(entry, query, true, true).await);
            }
            (CacheDecision::DeltaFetch, _) => UserTier::Pro,
            // Never fetch below what is already stored
            (_, Some(entry)) => query.tier.max(entry.cached_tier),
            (_, None) => query.tier,
        };

        self.analytics.record_miss().await;
        let limits = fetch_tier.storage_limits();

        let media = match provider.fetch_media(&place_id, limits).await {
            Ok(media) => media.truncated(limits),
            Err(e) => {
                return Ok(match existing {
                    Some(stale) => {
                        log::warn!("Provider fetch failed for {}, serving stale cache: {}", place_id, e);
                        self.respond(&stale, query, true, false).await
                    }
                    None => {
                        log::warn!("Provider fetch failed for {}, nothing cached: {}", place_id, e);
                        PlaceCacheResponse::empty(Some(place_id))
                    }
                });
            }
        };

        let update = PlaceCacheUpsert {
            place_id: place_id.clone(),
            photo_uris: media.photo_uris,
            reviews: media.reviews,
            attributions: media.attributions,
            tier: fetch_tier,
        };

        if let Err(e) = self.store.upsert(&update).await {
            log::error!("Could not cache place {}, returning uncached data: {}", place_id, e);
        } else {
            log::info!(
                "Cached {} photos / {} reviews for {} at {} tier",
                update.photo_uris.len(),
                update.reviews.len(),
                place_id,
                fetch_tier
            );
        }

        let fresh = PlaceCacheEntry {
            place_id: update.place_id,
            photo_uris: update.photo_uris,
            reviews: update.reviews,
            attributions: update.attributions,
            cached_tier: update.tier,
            cached_at: Utc::now(),
        };

        Ok(self.respond(&fresh, query, false, false).await)
    }

    async fn resolve_place_id(
        &self,
        provider: &dyn PlacesProvider,
        query: &LookupQuery,
    ) -> Option<String> {
        if let Some(place_id) = &query.place_id {
            return Some(place_id.clone());
        }

        let search = query.search.as_deref()?;
        match provider.find_place_id(search).await {
            Ok(Some(place_id)) => {
                log::debug!("Resolved '{}' to {}", search, place_id);
                Some(place_id)
            }
            Ok(None) => {
                log::info!("No place found for '{}'", search);
                None
            }
            Err(e) => {
                log::warn!("Place search failed for '{}': {}", search, e);
                None
            }
        }
    }

    /// Slice an entry down to what this caller may see
    async fn respond(
        &self,
        entry: &PlaceCacheEntry,
        query: &LookupQuery,
        cached: bool,
        cache_hit: bool,
    ) -> PlaceCacheResponse {
        let limits = query.action.display_limits(query.tier);

        let cache_stats = match self.store.count().await {
            Ok(total_cached_places) => Some(CacheStatsInfo {
                total_cached_places,
                cache_hit,
            }),
            Err(e) => {
                log::warn!("Could not count cached places: {}", e);
                None
            }
        };

        PlaceCacheResponse {
            success: true,
            cached,
            place_id: Some(entry.place_id.clone()),
            photos: entry.photo_uris.iter().take(limits.photos).cloned().collect(),
            reviews: entry.reviews.iter().take(limits.reviews).cloned().collect(),
            attributions: entry.attributions.clone(),
            photo_count: entry.photo_uris.len(),
            review_count: entry.reviews.len(),
            cache_stats,
            error: None,
        }
    }
}
