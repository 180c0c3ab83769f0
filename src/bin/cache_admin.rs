// src/bin/cache_admin.rs
// DOCUMENTATION: Terminal dashboard for the place cache
// PURPOSE: List, inspect and maintain cached places through the admin API
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

// --- ANSI colours ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

// --- Response shapes of the admin API ---

#[derive(Deserialize, Debug)]
struct Dashboard {
    total: usize,
    expired_count: usize,
    entries: Vec<EntryRow>,
    analytics: Summary,
}

#[derive(Deserialize, Debug)]
struct EntryRow {
    place_id: String,
    photo_count: usize,
    review_count: usize,
    cached_tier: String,
    cached_at: String,
    is_expired: bool,
}

#[derive(Deserialize, Debug)]
struct Summary {
    days: u32,
    cache_hits: i64,
    cache_misses: i64,
    api_calls_saved: i64,
    hit_rate: f64,
}

#[derive(Deserialize, Debug)]
struct CleanupReport {
    success: bool,
    deleted_count: u64,
    #[serde(default)]
    error: Option<String>,
}

struct CacheAdminClient {
    base_url: String,
    admin_token: String,
    client: Client,
}

impl CacheAdminClient {
    fn new(base_url: String, admin_token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_token,
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-Admin-Token", &self.admin_token)
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T> {
        let response = self
            .request(method, path)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", path))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .with_context(|| format!("Failed to parse response from {}", path));
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(anyhow!("HTTP {} - {}", status, body))
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn list(&self) -> Result<()> {
        let dashboard: Dashboard = self.send(Method::GET, "/admin/cache").await?;

        print_header("Place Cache");
        println!(
            "{}📦 {} cached places, {}{} expired{}\n",
            BOLD, dashboard.total, YELLOW, dashboard.expired_count, RESET
        );

        println!("{}", "─".repeat(96));
        println!(
            "{:<40} {:>7} {:>8} {:<6} {:<26} {:<7}",
            "Place ID", "Photos", "Reviews", "Tier", "Cached at", "Status"
        );
        println!("{}", "─".repeat(96));

        for row in &dashboard.entries {
            let status = if row.is_expired {
                format!("{}expired{}", RED, RESET)
            } else {
                format!("{}fresh{}", GREEN, RESET)
            };
            println!(
                "{:<40} {:>7} {:>8} {:<6} {:<26} {}",
                truncate(&row.place_id, 40),
                row.photo_count,
                row.review_count,
                row.cached_tier,
                row.cached_at,
                status
            );
        }

        println!("{}", "─".repeat(96));
        print_summary(&dashboard.analytics);
        Ok(())
    }

    async fn stats(&self, days: u32) -> Result<()> {
        let summary: Summary = self
            .send(Method::GET, &format!("/admin/cache/analytics?days={}", days))
            .await?;

        print_header("Cache Analytics");
        print_summary(&summary);
        Ok(())
    }

    async fn delete(&self, place_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .send(Method::DELETE, &format!("/admin/cache/{}", place_id))
            .await?;
        println!("{}🗑️  Deleted {}{}", GREEN, place_id, RESET);
        Ok(())
    }

    async fn refresh(&self, place_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .send(Method::POST, &format!("/admin/cache/{}/refresh", place_id))
            .await?;
        println!(
            "{}🔄 {} marked expired; the next lookup refetches it{}",
            GREEN, place_id, RESET
        );
        Ok(())
    }

    async fn cleanup(&self) -> Result<()> {
        let report: CleanupReport = self.send(Method::DELETE, "/admin/cache/expired").await?;
        if !report.success {
            bail!(
                "Cleanup failed: {}",
                report.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        println!(
            "{}🧹 Removed {} expired entries{}",
            GREEN, report.deleted_count, RESET
        );
        Ok(())
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let cut: String = value.chars().take(width - 1).collect();
        format!("{}…", cut)
    }
}

fn print_header(title: &str) {
    println!("{}╔══════════════════════════════════════════════════════════════╗{}", CYAN, RESET);
    println!("{}║   🏠 ReBooked Living - {:<38}║{}", CYAN, title, RESET);
    println!("{}╚══════════════════════════════════════════════════════════════╝{}", CYAN, RESET);
}

fn print_summary(summary: &Summary) {
    println!("\n{}📊 Last {} days:{}", BOLD, summary.days, RESET);
    println!("  • Cache hits: {}{}{}", GREEN, summary.cache_hits, RESET);
    println!("  • Cache misses: {}{}{}", YELLOW, summary.cache_misses, RESET);
    println!("  • API calls saved: {}{}{}", BLUE, summary.api_calls_saved, RESET);
    println!("  • Hit rate: {}{:.1}%{}", BOLD, summary.hit_rate, RESET);
}

/// Place cache admin dashboard
#[derive(Debug, Parser)]
#[command(name = "cache_admin", version, about)]
struct Cli {
    /// Base URL of the place cache service
    #[arg(long, env = "PLACE_CACHE_URL", default_value = "http://localhost:8003")]
    url: String,

    /// Shared admin token sent as X-Admin-Token
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    admin_token: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// List every cached place with the 7-day analytics summary (default)
    List,

    /// Show hit/miss analytics
    Stats {
        /// Days to cover, 1 to 90
        #[arg(default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=90))]
        days: u32,
    },

    /// Delete one cached place
    Delete { place_id: String },

    /// Mark one cached place expired so the next lookup refetches it
    Refresh { place_id: String },

    /// Remove every expired entry
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before parsing so clap sees values from .env
    dotenv().ok();
    let cli = Cli::parse();

    let admin = CacheAdminClient::new(cli.url.clone(), cli.admin_token)?;

    if !admin.check_service_health().await {
        println!("{}❌ Place cache service unavailable at {}{}", RED, cli.url, RESET);
        return Err(anyhow!("service unavailable"));
    }

    match cli.command.unwrap_or(Command::List) {
        Command::List => admin.list().await,
        Command::Stats { days } => admin.stats(days).await,
        Command::Delete { place_id } => admin.delete(&place_id).await,
        Command::Refresh { place_id } => admin.refresh(&place_id).await,
        Command::Cleanup => admin.cleanup().await,
    }
}
