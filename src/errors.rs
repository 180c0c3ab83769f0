// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the place cache service

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every failure the service can surface
/// Each variant maps to an HTTP status code and a `success: false` body
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache entry not found for place: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl CacheError {
    fn code(&self) -> &'static str {
        match self {
            CacheError::NotFound(_) => "NOT_FOUND",
            CacheError::DatabaseError(_) => "DATABASE_ERROR",
            CacheError::InvalidInput(_) => "INVALID_INPUT",
            CacheError::ValidationError(_) => "VALIDATION_ERROR",
            CacheError::Configuration(_) => "CONFIGURATION_ERROR",
            CacheError::Unauthorized => "UNAUTHORIZED",
            CacheError::Forbidden => "FORBIDDEN",
            CacheError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            CacheError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

/// Convert CacheError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for CacheError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "success": false,
            "error": self.to_string(),
            "code": self.code(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CacheError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CacheError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Unauthorized => StatusCode::UNAUTHORIZED,
            CacheError::Forbidden => StatusCode::FORBIDDEN,
            CacheError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            CacheError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}
