use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod error;
mod handlers;
mod router;
mod schemas;

#[cfg(test)]
mod test_utils;

use cli::Cli;

/// Main entry point for the Encore application.
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore=debug,compute=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Encore {} starting", env!("CARGO_PKG_VERSION"));
    Cli::parse().run().await
}
