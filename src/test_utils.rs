use crate::router::create_router;
use crate::schemas::AppState;
use axum::Router;
use axum_test::TestServer;
use compute::GameRules;
use migration::{Migrator, MigratorTrait};
use moka::future::Cache;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    // Run migrations
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create AppState for testing with the default game rules
pub async fn setup_test_app_state() -> AppState {
    let db = setup_test_db().await;
    let cache = Cache::new(100);

    AppState {
        db,
        cache,
        rules: Arc::new(GameRules::default()),
    }
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is determined by the RUST_LOG environment variable,
/// defaulting to WARN if not set.
fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| match level.to_uppercase().as_str() {
            "ERROR" => Some(Level::ERROR),
            "WARN" => Some(Level::WARN),
            "INFO" => Some(Level::INFO),
            "DEBUG" => Some(Level::DEBUG),
            "TRACE" => Some(Level::TRACE),
            _ => None,
        })
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Create axum app for testing
pub fn test_app(state: AppState) -> Router {
    let _guard = init_test_tracing();
    create_router(state, Duration::from_secs(30))
}

/// Test server over a fresh database, returned with the state so tests can seed data.
pub async fn setup_test_server() -> (TestServer, AppState) {
    let state = setup_test_app_state().await;
    let server = TestServer::new(test_app(state.clone())).expect("Failed to start test server");
    (server, state)
}

/// Registers a player through the API and returns its id.
pub async fn register(server: &TestServer, name: &str) -> i64 {
    let response = server
        .post("/api/v1/players")
        .json(&json!({
            "name": name,
            "username": name.to_lowercase(),
            "password": format!("{}-secret", name.to_lowercase()),
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["id"].as_i64().expect("player id")
}

/// Inserts an artist with stats for each `(month, year, price, popularity)` entry.
pub async fn seed_artist(db: &DatabaseConnection, name: &str, stats: &[(u32, i32, i64, i32)]) -> i32 {
    use common::{CatalogArtist, CatalogStats};
    use rust_decimal::Decimal;

    let catalog = vec![CatalogArtist {
        name: name.to_string(),
        stats: stats
            .iter()
            .map(|&(month, year, price, popularity)| CatalogStats {
                month,
                year,
                price: Decimal::from(price),
                listeners: 1_000,
                followers: 100,
                popularity,
            })
            .collect(),
    }];
    compute::catalog::import_catalog(db, &catalog)
        .await
        .expect("Failed to import artist");

    use model::entities::artist;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    artist::Entity::find()
        .filter(artist::Column::Name.eq(name))
        .one(db)
        .await
        .expect("Failed to load artist")
        .expect("artist exists")
        .id
}
