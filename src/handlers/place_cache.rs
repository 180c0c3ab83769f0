// src/handlers/place_cache.rs
// DOCUMENTATION: HTTP handler for place media lookups
// PURPOSE: Parse the request, run the cache orchestrator, return its response

use crate::errors::CacheError;
use crate::models::PlaceCacheRequest;
use crate::services::{LookupQuery, PlaceCacheService};
use actix_web::{web, HttpResponse, Responder};

/// POST /place-cache
/// Photos and reviews for one place, sized for the caller's tier and action
///
/// DOCUMENTATION: 400 for a malformed request, 500 when no provider is configured;
/// provider and store trouble still return 200 with whatever could be served
pub async fn lookup_place(
    service: web::Data<PlaceCacheService>,
    body: web::Json<PlaceCacheRequest>,
) -> Result<impl Responder, CacheError> {
    let query = LookupQuery::from_request(&body)?;
    let response = service.lookup(&query).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Configuration for place cache routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/place-cache", web::post().to(lookup_place));
}
