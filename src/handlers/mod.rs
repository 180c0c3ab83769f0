// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod admin;
pub mod health;
pub mod jobs;
pub mod place_cache;

pub use admin::config as admin_config;
pub use health::config as health_config;
pub use jobs::config as jobs_config;
pub use place_cache::config as place_cache_config;
