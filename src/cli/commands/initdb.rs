use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use tracing::{debug, error, info, trace};

/// Connects to `database_url` and applies every pending migration.
pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    ensure_sqlite_parent_dir(database_url)?;

    let db: DatabaseConnection = match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    let pending = Migrator::get_pending_migrations(&db).await?.len();
    info!("Running {} pending database migrations", pending);
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run database migrations: {}", e);
        return Err(e.into());
    }

    info!("Database initialization completed successfully");
    Ok(())
}

/// Creates the directory of a file-backed SQLite database if it is missing.
fn ensure_sqlite_parent_dir(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_file_path(database_url) else {
        return Ok(());
    };
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!("Creating database directory {}", parent.display());
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

/// File path of a `sqlite://` URL, without query parameters. `None` for other
/// backends and in-memory databases.
fn sqlite_file_path(database_url: &str) -> Option<&str> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(path)
    }
}
