use anyhow::{Context, Result};
use common::GamePeriod;
use compute::advance::Scoring;
use compute::ledger::RefundPolicy;
use compute::GameRules;
use config::{Config, Environment, File};
use moka::future::Cache;
use rust_decimal::Decimal;
use sea_orm::Database;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Application configuration.
///
/// Values come from built-in defaults, then an optional `encore.toml` file, then
/// `ENCORE_*` environment variables (e.g. `ENCORE_STARTING_BUDGET=1500`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub request_timeout_secs: u64,
    pub cache_capacity: u64,
    pub cache_ttl_secs: u64,
    pub starting_budget: Decimal,
    /// `latest_known_price` or `purchase_price`
    pub refund_policy: String,
    pub points_per_popularity: Decimal,
    pub budget_per_price: Decimal,
    pub initial_month: u32,
    pub initial_year: i32,
}

impl AppConfig {
    /// Loads the configuration from all sources.
    pub fn load() -> Result<Self> {
        Self::from_builder(Config::builder().add_source(File::with_name("encore").required(false)))
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings = builder
            .set_default("database_url", "sqlite://encore.db?mode=rwc")?
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("request_timeout_secs", 30)?
            .set_default("cache_capacity", 1000)?
            .set_default("cache_ttl_secs", 300)?
            .set_default("starting_budget", "2000")?
            .set_default("refund_policy", "latest_known_price")?
            .set_default("points_per_popularity", "0.1")?
            .set_default("budget_per_price", "0.05")?
            .set_default("initial_month", 1)?
            .set_default("initial_year", 2024)?
            .add_source(Environment::with_prefix("ENCORE"))
            .build()
            .context("Failed to read configuration")?;

        let config: Self = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Game rules described by this configuration.
    pub fn rules(&self) -> Result<GameRules> {
        let refund_policy: RefundPolicy = self.refund_policy.parse()?;
        let initial_period = GamePeriod::new(self.initial_month, self.initial_year)
            .with_context(|| format!("Invalid initial month {}", self.initial_month))?;
        if self.starting_budget.is_sign_negative() {
            anyhow::bail!("Starting budget must not be negative");
        }

        Ok(GameRules {
            starting_budget: self.starting_budget,
            refund_policy,
            scoring: Scoring {
                points_per_popularity: self.points_per_popularity,
                budget_per_price: self.budget_per_price,
            },
            initial_period,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Initialize application state connected to `database_url`
pub async fn initialize_app_state_with_url(config: &AppConfig, database_url: &str) -> Result<AppState> {
    let rules = config.rules()?;

    // Connect to database
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // Initialize cache
    let cache = Cache::builder()
        .max_capacity(config.cache_capacity)
        .time_to_live(Duration::from_secs(config.cache_ttl_secs))
        .build();

    Ok(AppState {
        db,
        cache,
        rules: Arc::new(rules),
    })
}
