// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod admin;
pub mod analytics;
pub mod cleanup;
pub mod google_places_client;
pub mod place_cache;
pub mod provider;

pub use admin::*;
pub use analytics::*;
pub use cleanup::*;
pub use google_places_client::*;
pub use place_cache::*;
pub use provider::*;
