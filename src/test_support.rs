// src/test_support.rs
// DOCUMENTATION: In-memory stores and a scripted provider for unit tests

use crate::config::Config;
use crate::db::{CacheAnalyticsStore, PlaceCacheStore};
use crate::errors::CacheError;
use crate::models::{
    AnalyticsDelta, CacheAnalyticsDaily, CachedReview, PlaceCacheEntry, PlaceCacheUpsert,
    TierLimits, UserTier,
};
use crate::services::{PlaceMedia, PlacesProvider};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub const ADMIN_TOKEN: &str = "secret";

pub fn config() -> Config {
    Config {
        database_url: "postgresql://localhost/test".to_string(),
        server_address: "127.0.0.1".to_string(),
        server_port: 8003,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        google_places_api_key: String::new(),
        admin_token: ADMIN_TOKEN.to_string(),
        db_max_connections: 5,
        db_connection_timeout: 5,
        cleanup_interval_secs: 0,
        provider_timeout_secs: 5,
        provider_max_rps: 10,
    }
}

pub fn review(n: usize) -> CachedReview {
    CachedReview {
        author_name: format!("Student {}", n),
        author_url: None,
        profile_photo_url: None,
        rating: 4,
        relative_time_description: "a week ago".to_string(),
        text: format!("Review number {}", n),
        time: 1_700_000_000 + n as i64,
    }
}

pub fn media(photos: usize, reviews: usize) -> PlaceMedia {
    PlaceMedia {
        photo_uris: (1..=photos)
            .map(|n| format!("https://photos.test/{}.jpg", n))
            .collect(),
        reviews: (1..=reviews).map(review).collect(),
        attributions: Some("Google".to_string()),
    }
}

pub fn entry(
    place_id: &str,
    photos: usize,
    reviews: usize,
    tier: UserTier,
    cached_at: DateTime<Utc>,
) -> PlaceCacheEntry {
    let media = media(photos, reviews);
    PlaceCacheEntry {
        place_id: place_id.to_string(),
        photo_uris: media.photo_uris,
        reviews: media.reviews,
        attributions: media.attributions,
        cached_tier: tier,
        cached_at,
    }
}

/// HashMap-backed place cache with the same merge rules as upsert_place_cache
#[derive(Default)]
pub struct InMemoryPlaceCacheStore {
    entries: Mutex<HashMap<String, PlaceCacheEntry>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    upserts: AtomicUsize,
}

impl InMemoryPlaceCacheStore {
    pub fn seed(&self, entry: PlaceCacheEntry) {
        self.entries
            .lock()
            .unwrap()
            .insert(entry.place_id.clone(), entry);
    }

    pub fn entry(&self, place_id: &str) -> Option<PlaceCacheEntry> {
        self.entries.lock().unwrap().get(place_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), CacheError> {
        if flag.load(Ordering::SeqCst) {
            return Err(CacheError::DatabaseError("simulated failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PlaceCacheStore for InMemoryPlaceCacheStore {
    async fn get(&self, place_id: &str) -> Result<Option<PlaceCacheEntry>, CacheError> {
        self.check(&self.fail_reads)?;
        Ok(self.entry(place_id))
    }

    async fn upsert(&self, update: &PlaceCacheUpsert) -> Result<(), CacheError> {
        self.check(&self.fail_writes)?;
        self.upserts.fetch_add(1, Ordering::SeqCst);

        let mut entries = self.entries.lock().unwrap();
        let now = Utc::now();
        match entries.get_mut(&update.place_id) {
            Some(existing) => {
                let keep_richer =
                    existing.cached_tier == UserTier::Pro && update.tier == UserTier::Free;
                if !keep_richer {
                    existing.photo_uris = update.photo_uris.clone();
                    existing.reviews = update.reviews.clone();
                    if update.attributions.is_some() {
                        existing.attributions = update.attributions.clone();
                    }
                }
                existing.cached_tier = existing.cached_tier.max(update.tier);
                existing.cached_at = now;
            }
            None => {
                entries.insert(
                    update.place_id.clone(),
                    PlaceCacheEntry {
                        place_id: update.place_id.clone(),
                        photo_uris: update.photo_uris.clone(),
                        reviews: update.reviews.clone(),
                        attributions: update.attributions.clone(),
                        cached_tier: update.tier,
                        cached_at: now,
                    },
                );
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, CacheError> {
        self.check(&self.fail_reads)?;
        Ok(self.len() as i64)
    }

    async fn list(&self) -> Result<Vec<PlaceCacheEntry>, CacheError> {
        self.check(&self.fail_reads)?;
        let mut all: Vec<PlaceCacheEntry> = self.entries.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));
        Ok(all)
    }

    async fn delete(&self, place_id: &str) -> Result<bool, CacheError> {
        self.check(&self.fail_writes)?;
        Ok(self.entries.lock().unwrap().remove(place_id).is_some())
    }

    async fn set_cached_at(
        &self,
        place_id: &str,
        cached_at: DateTime<Utc>,
    ) -> Result<bool, CacheError> {
        self.check(&self.fail_writes)?;
        match self.entries.lock().unwrap().get_mut(place_id) {
            Some(existing) => {
                existing.cached_at = cached_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, CacheError> {
        self.check(&self.fail_writes)?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, e| e.cached_at >= cutoff);
        Ok((before - entries.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryAnalyticsStore {
    rows: Mutex<BTreeMap<NaiveDate, CacheAnalyticsDaily>>,
    fail_writes: AtomicBool,
}

impl InMemoryAnalyticsStore {
    pub fn seed(&self, row: CacheAnalyticsDaily) {
        self.rows.lock().unwrap().insert(row.date, row);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn today(&self) -> CacheAnalyticsDaily {
        let today = Utc::now().date_naive();
        self.rows
            .lock()
            .unwrap()
            .get(&today)
            .cloned()
            .unwrap_or(CacheAnalyticsDaily {
                date: today,
                cache_hits: 0,
                cache_misses: 0,
                api_calls_saved: 0,
            })
    }
}

#[async_trait]
impl CacheAnalyticsStore for InMemoryAnalyticsStore {
    async fn increment(&self, day: NaiveDate, delta: AnalyticsDelta) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::DatabaseError("simulated failure".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows.entry(day).or_insert(CacheAnalyticsDaily {
            date: day,
            cache_hits: 0,
            cache_misses: 0,
            api_calls_saved: 0,
        });
        row.cache_hits += delta.hits;
        row.cache_misses += delta.misses;
        row.api_calls_saved += delta.api_calls_saved;
        Ok(())
    }

    async fn since(&self, day: NaiveDate) -> Result<Vec<CacheAnalyticsDaily>, CacheError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .range(day..)
            .map(|(_, row)| row.clone())
            .collect())
    }
}

/// Provider returning a fixed media set, truncated to whatever limits are asked for
pub struct FakeProvider {
    resolves_to: Option<String>,
    media: PlaceMedia,
    failing: AtomicBool,
    pub find_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
    pub fetch_limits: Mutex<Vec<TierLimits>>,
}

impl FakeProvider {
    pub fn new(resolves_to: Option<&str>, media: PlaceMedia) -> Self {
        Self {
            resolves_to: resolves_to.map(str::to_string),
            media,
            failing: AtomicBool::new(false),
            find_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            fetch_limits: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::ExternalApiError("API error 503".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PlacesProvider for FakeProvider {
    async fn find_place_id(&self, query: &str) -> Result<Option<String>, CacheError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.check()?;
        Ok(self.resolves_to.clone())
    }

    async fn fetch_media(
        &self,
        _place_id: &str,
        limits: TierLimits,
    ) -> Result<PlaceMedia, CacheError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_limits.lock().unwrap().push(limits);
        self.check()?;
        Ok(self.media.clone().truncated(limits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tokio_test::assert_ok;

    fn upsert(place_id: &str, photos: usize, reviews: usize, tier: UserTier) -> PlaceCacheUpsert {
        let media = media(photos, reviews);
        PlaceCacheUpsert {
            place_id: place_id.to_string(),
            photo_uris: media.photo_uris,
            reviews: media.reviews,
            attributions: media.attributions,
            tier,
        }
    }

    #[tokio::test]
    async fn test_late_free_write_keeps_pro_entry() {
        let store = InMemoryPlaceCacheStore::default();
        let before = Utc::now() - Duration::days(2);
        let mut pro = entry("ChIJ1", 10, 5, UserTier::Pro, before);
        pro.attributions = Some("Pro photographer".to_string());
        store.seed(pro);

        let mut late = upsert("ChIJ1", 1, 0, UserTier::Free);
        late.attributions = Some("Someone else".to_string());
        assert_ok!(store.upsert(&late).await);

        let after = store.entry("ChIJ1").unwrap();
        assert_eq!(after.cached_tier, UserTier::Pro);
        assert_eq!(after.photo_uris.len(), 10);
        assert_eq!(after.reviews.len(), 5);
        assert_eq!(after.attributions.as_deref(), Some("Pro photographer"));
        assert!(after.cached_at > before);
    }

    #[tokio::test]
    async fn test_pro_write_upgrades_free_entry() {
        let store = InMemoryPlaceCacheStore::default();
        store.seed(entry("ChIJ1", 3, 1, UserTier::Free, Utc::now() - Duration::days(1)));

        let mut upgrade = upsert("ChIJ1", 10, 5, UserTier::Pro);
        upgrade.attributions = None;
        assert_ok!(store.upsert(&upgrade).await);

        let after = store.entry("ChIJ1").unwrap();
        assert_eq!(after.cached_tier, UserTier::Pro);
        assert_eq!(after.photo_uris.len(), 10);
        assert_eq!(after.attributions.as_deref(), Some("Google"));
    }
}
