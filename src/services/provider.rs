// src/services/provider.rs
// DOCUMENTATION: Port for the external place-data provider
// PURPOSE: The orchestrator only knows this trait; Google is one implementation

use crate::errors::CacheError;
use crate::models::{CachedReview, TierLimits};
use async_trait::async_trait;

/// Photos, reviews and attributions fetched for one place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceMedia {
    pub photo_uris: Vec<String>,
    pub reviews: Vec<CachedReview>,
    pub attributions: Option<String>,
}

impl PlaceMedia {
    /// Keep at most `limits` photos/reviews, in provider order
    pub fn truncated(mut self, limits: TierLimits) -> Self {
        self.photo_uris.truncate(limits.photos);
        self.reviews.truncate(limits.reviews);
        self
    }
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Resolve free text to the single best matching place id
    async fn find_place_id(&self, query: &str) -> Result<Option<String>, CacheError>;

    /// Fetch photo URLs and reviews for a place, capped at `limits`
    async fn fetch_media(&self, place_id: &str, limits: TierLimits)
        -> Result<PlaceMedia, CacheError>;
}
