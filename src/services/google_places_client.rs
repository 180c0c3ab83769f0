// src/services/google_places_client.rs
// DOCUMENTATION: Google Places API client
// PURPOSE: Resolve place ids from free text and fetch photos/reviews for the cache

use crate::errors::CacheError;
use crate::models::{CachedReview, TierLimits};
use crate::services::{PlaceMedia, PlacesProvider};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

/// Max width requested for cached photo URLs
const PHOTO_MAX_WIDTH: i32 = 800;

/// Google Places API client
/// DOCUMENTATION: Handles authentication, outbound throttling and API calls
pub struct GooglePlacesClient {
    /// HTTP client for making requests
    client: Client,
    /// Google Places API key
    api_key: String,
    /// Base URL for Google Places API
    base_url: String,
    /// Outbound request budget shared by every lookup
    limiter: DefaultDirectRateLimiter,
}

/// Response from Find Place From Text
#[derive(Debug, Deserialize, Serialize)]
pub struct FindPlaceResponse {
    #[serde(default)]
    pub candidates: Vec<FindPlaceCandidate>,
    pub status: String,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FindPlaceCandidate {
    pub place_id: String,
}

/// Response from Place Details restricted to photos and reviews
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaceDetailsResponse {
    pub result: Option<GooglePlaceMedia>,
    pub status: String,
    pub error_message: Option<String>,
    /// Attributions Google requires to be displayed with the result
    #[serde(default)]
    pub html_attributions: Vec<String>,
}

/// Media section of a Place Details result
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GooglePlaceMedia {
    pub photos: Option<Vec<GooglePhoto>>,
    pub reviews: Option<Vec<GoogleReview>>,
}

/// Review from Google Places
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleReview {
    pub author_name: Option<String>,
    pub author_url: Option<String>,
    pub profile_photo_url: Option<String>,
    /// Rating (1-5)
    pub rating: Option<i32>,
    pub relative_time_description: Option<String>,
    pub text: Option<String>,
    /// Time of review (Unix timestamp)
    pub time: Option<i64>,
}

/// Photo from Google Places
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GooglePhoto {
    /// Photo reference (used to fetch actual photo)
    pub photo_reference: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// HTML attributions (required by Google)
    pub html_attributions: Option<Vec<String>>,
}

impl GooglePlacesClient {
    /// Create new Google Places API client
    /// DOCUMENTATION: `timeout` bounds each HTTP call, `max_rps` the outbound rate
    pub fn new(api_key: String, timeout: Duration, max_rps: NonZeroU32) -> Result<Self, CacheError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            CacheError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            limiter: RateLimiter::direct(Quota::per_second(max_rps)),
        })
    }

    /// Get photo URL from photo reference
    /// DOCUMENTATION: Converts Google photo_reference to a URL usable in img tags;
    /// query values are percent-encoded
    pub fn get_photo_url(
        &self,
        photo_reference: &str,
        max_width: Option<i32>,
    ) -> Result<String, CacheError> {
        let width = max_width.unwrap_or(PHOTO_MAX_WIDTH).to_string();
        Url::parse_with_params(
            &format!("{}/photo", self.base_url),
            &[
                ("maxwidth", width.as_str()),
                ("photoreference", photo_reference),
                ("key", self.api_key.as_str()),
            ],
        )
        .map(String::from)
        .map_err(|e| CacheError::ExternalApiError(format!("Invalid photo URL: {}", e)))
    }

    /// Issue a GET against `{base_url}/{endpoint}` and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CacheError> {
        if self.limiter.check().is_err() {
            log::warn!("Google Places outbound rate limit reached ({})", endpoint);
            return Err(CacheError::RateLimitExceeded);
        }

        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                log::error!("Google Places {} request failed: {}", endpoint, e);
                CacheError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Google Places API error {}: {}", status, body);
            return Err(CacheError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        response.json::<T>().await.map_err(|e| {
            log::error!("Failed to parse Google Places {} response: {}", endpoint, e);
            CacheError::ExternalApiError(format!("Parse error: {}", e))
        })
    }

    /// Map a non-OK API status to an error
    fn status_error(status: &str, error_message: Option<String>) -> CacheError {
        match status {
            "OVER_QUERY_LIMIT" => {
                log::error!("Google Places API quota exceeded");
                CacheError::RateLimitExceeded
            }
            other => {
                let msg = error_message.unwrap_or_else(|| format!("Unknown status: {}", other));
                log::error!("Google Places API returned {}: {}", other, msg);
                CacheError::ExternalApiError(msg)
            }
        }
    }

    /// Convert a details result into cached media
    /// DOCUMENTATION: Resolves photo references, drops reviews without a rating,
    /// and merges response-level and photo-level attributions
    pub fn to_place_media(
        &self,
        media: GooglePlaceMedia,
        html_attributions: Vec<String>,
        limits: TierLimits,
    ) -> PlaceMedia {
        let photos: Vec<GooglePhoto> = media
            .photos
            .unwrap_or_default()
            .into_iter()
            .take(limits.photos)
            .collect();

        let mut attributions: Vec<String> = Vec::new();
        let photo_attributions = photos
            .iter()
            .flat_map(|p| p.html_attributions.clone().unwrap_or_default());
        for attribution in html_attributions.into_iter().chain(photo_attributions) {
            if !attribution.is_empty() && !attributions.contains(&attribution) {
                attributions.push(attribution);
            }
        }

        let photo_uris = photos
            .iter()
            .filter_map(|p| match self.get_photo_url(&p.photo_reference, None) {
                Ok(url) => Some(url),
                Err(e) => {
                    log::warn!("Skipping photo {}: {}", p.photo_reference, e);
                    None
                }
            })
            .collect();

        let reviews = media
            .reviews
            .unwrap_or_default()
            .into_iter()
            .filter_map(Self::to_cached_review)
            .take(limits.reviews)
            .collect();

        PlaceMedia {
            photo_uris,
            reviews,
            attributions: if attributions.is_empty() {
                None
            } else {
                Some(attributions.join(" | "))
            },
        }
    }

    fn to_cached_review(review: GoogleReview) -> Option<CachedReview> {
        let rating = review.rating?.clamp(1, 5) as u8;

        Some(CachedReview {
            author_name: review
                .author_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Google user".to_string()),
            author_url: review.author_url,
            profile_photo_url: review.profile_photo_url,
            rating,
            relative_time_description: review.relative_time_description.unwrap_or_default(),
            text: review.text.unwrap_or_default(),
            time: review.time.unwrap_or(0),
        })
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    /// Find Place From Text, single best candidate
    async fn find_place_id(&self, query: &str) -> Result<Option<String>, CacheError> {
        log::debug!("Google Places find place: {}", query);

        let response: FindPlaceResponse = self
            .get_json(
                "findplacefromtext/json",
                &[
                    ("input", query),
                    ("inputtype", "textquery"),
                    ("fields", "place_id"),
                ],
            )
            .await?;

        match response.status.as_str() {
            "OK" => Ok(response.candidates.into_iter().next().map(|c| c.place_id)),
            "ZERO_RESULTS" => Ok(None),
            other => Err(Self::status_error(other, response.error_message)),
        }
    }

    async fn fetch_media(
        &self,
        place_id: &str,
        limits: TierLimits,
    ) -> Result<PlaceMedia, CacheError> {
        log::debug!(
            "Google Places details lookup: place_id={} (photos={}, reviews={})",
            place_id,
            limits.photos,
            limits.reviews
        );

        let response: PlaceDetailsResponse = self
            .get_json(
                "details/json",
                &[("place_id", place_id), ("fields", "photos,reviews")],
            )
            .await?;

        if response.status != "OK" {
            return Err(Self::status_error(&response.status, response.error_message));
        }

        let media = response.result.unwrap_or_default();
        let place_media = self.to_place_media(media, response.html_attributions, limits);

        log::info!(
            "Fetched {} photos and {} reviews for {}",
            place_media.photo_uris.len(),
            place_media.reviews.len(),
            place_id
        );

        Ok(place_media)
    }
}
