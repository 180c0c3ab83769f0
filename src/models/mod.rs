// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod analytics;
pub mod place_cache;
pub mod tier;

pub use analytics::*;
pub use place_cache::*;
pub use tier::*;
