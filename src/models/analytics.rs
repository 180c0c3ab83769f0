// src/models/analytics.rs
// DOCUMENTATION: Daily cache hit/miss counters and the dashboard summary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Window the dashboard reports on
pub const DEFAULT_SUMMARY_DAYS: u32 = 7;

/// One row per calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CacheAnalyticsDaily {
    pub date: NaiveDate,
    pub cache_hits: i64,
    pub cache_misses: i64,
    pub api_calls_saved: i64,
}

/// Counter increments applied to a single day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsDelta {
    pub hits: i64,
    pub misses: i64,
    pub api_calls_saved: i64,
}

/// Rolling totals over the last `days` days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheAnalyticsSummary {
    pub days: u32,
    pub cache_hits: i64,
    pub cache_misses: i64,
    pub api_calls_saved: i64,
    /// Percentage, one decimal place; 0 when there was no traffic
    pub hit_rate: f64,
}

impl CacheAnalyticsSummary {
    pub fn from_rows(days: u32, rows: &[CacheAnalyticsDaily]) -> Self {
        let cache_hits: i64 = rows.iter().map(|r| r.cache_hits).sum();
        let cache_misses: i64 = rows.iter().map(|r| r.cache_misses).sum();
        let api_calls_saved: i64 = rows.iter().map(|r| r.api_calls_saved).sum();

        let total = cache_hits + cache_misses;
        let hit_rate = if total > 0 {
            ((cache_hits as f64 / total as f64) * 1000.0).round() / 10.0
        } else {
            0.0
        };

        Self {
            days,
            cache_hits,
            cache_misses,
            api_calls_saved,
            hit_rate,
        }
    }
}
