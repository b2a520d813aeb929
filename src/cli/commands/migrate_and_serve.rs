use anyhow::Result;
use tracing::{debug, error, info, trace};

use super::init_database;
use super::serve::run_server;
use crate::config::{initialize_app_state_with_url, AppConfig};

pub async fn migrate_and_serve(config: &AppConfig, database_url: &str, bind_address: &str) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");

    // Apply migrations
    init_database(database_url).await?;

    // Initialize application state
    trace!("Initializing application state");
    let state = match initialize_app_state_with_url(config, database_url).await {
        Ok(state) => {
            debug!("Application state initialized successfully");
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    run_server(state, config, bind_address).await
}
