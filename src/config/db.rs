// src/config/db.rs
// DOCUMENTATION: Database connection pool initialization
// PURPOSE: Setup and manage PostgreSQL connection pool

use crate::config::Config;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Initialize PostgreSQL connection pool
/// DOCUMENTATION: Called once during startup in main.rs; the pool backs both
/// the place cache store and the analytics counters
pub async fn init_db_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!("Initializing database pool (max {} connections)", config.db_max_connections);

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        // Connection idle timeout (5 minutes)
        .idle_timeout(Duration::from_secs(300))
        // Connection lifetime (30 minutes before recycle)
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    // The cache relies on these stored procedures; fail fast if the migration is missing
    let procedures: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM pg_proc WHERE proname IN ('get_cached_place', 'upsert_place_cache')",
    )
    .fetch_one(&pool)
    .await?;

    if procedures.0 < 2 {
        log::warn!("Place cache stored procedures not found - run migrations/0001_place_cache.sql");
    }

    log::info!("Database pool initialized successfully");
    Ok(pool)
}
