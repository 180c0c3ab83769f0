// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for the place cache dashboard
// PURPOSE: Expose cache listing, analytics and maintenance via REST endpoints

use crate::config::Config;
use crate::errors::CacheError;
use crate::models::DEFAULT_SUMMARY_DAYS;
use crate::services::{CacheAdminService, CacheAnalytics};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

/// Longest analytics window the dashboard may ask for
const MAX_SUMMARY_DAYS: u32 = 90;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<u32>,
}

/// GET /admin/cache
/// Every cached place plus the 7-day analytics summary
pub async fn list_cache(
    admin: web::Data<CacheAdminService>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, CacheError> {
    verify_admin_token(&req, &config)?;

    let dashboard = admin.dashboard().await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

/// GET /admin/cache/analytics
/// Hit/miss totals, `?days=` between 1 and 90
pub async fn cache_analytics(
    analytics: web::Data<CacheAnalytics>,
    config: web::Data<Config>,
    req: HttpRequest,
    query: web::Query<AnalyticsQuery>,
) -> Result<impl Responder, CacheError> {
    verify_admin_token(&req, &config)?;

    let days = query.days.unwrap_or(DEFAULT_SUMMARY_DAYS);
    if !(1..=MAX_SUMMARY_DAYS).contains(&days) {
        return Err(CacheError::InvalidInput(format!(
            "days must be between 1 and {}",
            MAX_SUMMARY_DAYS
        )));
    }

    let summary = analytics.summary(days).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// DELETE /admin/cache/expired
/// Remove every expired entry now instead of waiting for the job
pub async fn purge_expired(
    admin: web::Data<CacheAdminService>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, CacheError> {
    verify_admin_token(&req, &config)?;

    let report = admin.purge_expired().await;
    if report.success {
        Ok(HttpResponse::Ok().json(report))
    } else {
        Ok(HttpResponse::InternalServerError().json(report))
    }
}

/// DELETE /admin/cache/{place_id}
pub async fn delete_entry(
    admin: web::Data<CacheAdminService>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, CacheError> {
    verify_admin_token(&req, &config)?;

    let place_id = path.into_inner();
    admin.delete(&place_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "place_id": place_id,
    })))
}

/// POST /admin/cache/{place_id}/refresh
/// Mark an entry expired so the next lookup refetches it
pub async fn refresh_entry(
    admin: web::Data<CacheAdminService>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, CacheError> {
    verify_admin_token(&req, &config)?;

    let place_id = path.into_inner();
    admin.force_refresh(&place_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "place_id": place_id,
        "message": "Entry marked expired; the next lookup will refetch it",
    })))
}

/// Helper function to verify admin authentication
/// DOCUMENTATION: Checks X-Admin-Token header against configured admin token
pub(crate) fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), CacheError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token: {}", req.path());
            CacheError::Unauthorized
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token: {}", req.path());
        return Err(CacheError::Forbidden);
    }

    Ok(())
}

/// Configuration for admin routes
/// `/cache/expired` is registered before `/cache/{place_id}` so it is not taken as an id
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/cache", web::get().to(list_cache))
            .route("/cache/analytics", web::get().to(cache_analytics))
            .route("/cache/expired", web::delete().to(purge_expired))
            .route("/cache/{place_id}", web::delete().to(delete_entry))
            .route("/cache/{place_id}/refresh", web::post().to(refresh_entry)),
    );
}
