// src/models/tier.rs
// DOCUMENTATION: Caller tiers, display actions and the photo/review limits they imply
// PURPOSE: Single source of truth for how much data is stored and shown

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tier of the caller, and the richness level of a cache entry
/// `Free < Pro`; a pro entry satisfies every caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserTier {
    Free,
    Pro,
}

impl UserTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserTier::Free => "free",
            UserTier::Pro => "pro",
        }
    }

    /// How many photos/reviews are fetched and stored for this tier
    pub fn storage_limits(&self) -> TierLimits {
        match self {
            UserTier::Free => TierLimits { photos: 3, reviews: 1 },
            UserTier::Pro => TierLimits { photos: 10, reviews: 5 },
        }
    }
}

impl fmt::Display for UserTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(UserTier::Free),
            "pro" => Ok(UserTier::Pro),
            other => Err(format!("user_tier must be \"free\" or \"pro\", got \"{}\"", other)),
        }
    }
}

/// Context the caller renders the data in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayAction {
    /// Card preview in search results
    Browse,
    /// Full listing page
    Listing,
}

impl DisplayAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayAction::Browse => "browse",
            DisplayAction::Listing => "listing",
        }
    }

    /// How many photos/reviews a caller may see for this action
    /// Applied on every response, including cache hits holding more data
    pub fn display_limits(&self, tier: UserTier) -> TierLimits {
        match (self, tier) {
            (DisplayAction::Browse, _) => TierLimits { photos: 1, reviews: 0 },
            (DisplayAction::Listing, tier) => tier.storage_limits(),
        }
    }
}

impl fmt::Display for DisplayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "browse" => Ok(DisplayAction::Browse),
            "listing" => Ok(DisplayAction::Listing),
            other => Err(format!("action must be \"browse\" or \"listing\", got \"{}\"", other)),
        }
    }
}

/// Photo and review caps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierLimits {
    pub photos: usize,
    pub reviews: usize,
}
