// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, cache services and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use db::{AnalyticsRepository, CacheAnalyticsStore, PlaceCacheRepository, PlaceCacheStore};
use dotenv::dotenv;
use services::{
    start_cleanup_task, CacheAdminService, CacheAnalytics, ExpiryCleanup, GooglePlacesClient,
    PlaceCacheService, PlacesProvider,
};
use std::io;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging before validation so its warnings are visible
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }
    for warning in config.warnings() {
        log::warn!("{}", warning);
    }

    log::info!("Starting rebooked-place-cache service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let store: Arc<dyn PlaceCacheStore> = Arc::new(PlaceCacheRepository::new(pool.clone()));
    let analytics_store: Arc<dyn CacheAnalyticsStore> = Arc::new(AnalyticsRepository::new(pool));

    // 5. Google Places provider; lookups answer 500 until a key is configured
    let provider: Option<Arc<dyn PlacesProvider>> = if config.has_provider() {
        let max_rps = NonZeroU32::new(config.provider_max_rps).unwrap_or(NonZeroU32::MIN);
        match GooglePlacesClient::new(
            config.google_places_api_key.clone(),
            Duration::from_secs(config.provider_timeout_secs),
            max_rps,
        ) {
            Ok(client) => {
                log::info!("Google Places provider ready ({} req/s)", max_rps);
                Some(Arc::new(client) as Arc<dyn PlacesProvider>)
            }
            Err(e) => {
                log::error!("Failed to build Google Places client: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    // 6. Services
    let analytics = CacheAnalytics::new(analytics_store);
    let place_cache = PlaceCacheService::new(store.clone(), provider, analytics.clone());
    let admin = CacheAdminService::new(store.clone(), analytics.clone());
    let cleanup = ExpiryCleanup::new(store);

    if config.cleanup_interval_secs > 0 {
        start_cleanup_task(cleanup.clone(), config.cleanup_interval_secs);
        log::info!(
            "Started cache cleanup task (interval: {}s)",
            config.cleanup_interval_secs
        );
    } else {
        log::info!("In-process cache cleanup disabled; use POST /jobs/cleanup-expired");
    }

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(place_cache.clone()))
            .app_data(web::Data::new(admin.clone()))
            .app_data(web::Data::new(analytics.clone()))
            .app_data(web::Data::new(cleanup.clone()))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::place_cache_config)
            .configure(handlers::admin_config)
            .configure(handlers::jobs_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
