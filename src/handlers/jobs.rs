// src/handlers/jobs.rs
// DOCUMENTATION: Trigger endpoints for scheduled jobs
// PURPOSE: Let an external scheduler run the expiry cleanup

use crate::config::Config;
use crate::errors::CacheError;
use crate::handlers::admin::verify_admin_token;
use crate::services::ExpiryCleanup;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

/// POST /jobs/cleanup-expired
/// 200 with the report on success, 500 with the report when the delete failed
pub async fn cleanup_expired(
    job: web::Data<ExpiryCleanup>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, CacheError> {
    verify_admin_token(&req, &config)?;

    let report = job.run().await;
    if report.success {
        Ok(HttpResponse::Ok().json(report))
    } else {
        Ok(HttpResponse::InternalServerError().json(report))
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/jobs").route("/cleanup-expired", web::post().to(cleanup_expired)));
}
