// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Store ports and their Postgres implementations

pub mod analytics_repository;
pub mod place_cache_repository;
pub mod store;

pub use analytics_repository::*;
pub use place_cache_repository::*;
pub use store::*;
