use crate::handlers::{
    artists::search_artists,
    game::{advance_month, get_current_date},
    health::health_check,
    leagues::{create_league, get_leagues, get_standings, join_league, leave_league},
    players::{change_password, delete_player, get_players, login, register_player},
    rosters::{add_artist, delete_roster, get_roster_artists, get_rosters, remove_artist},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Player routes
        .route("/api/v1/players", post(register_player).get(get_players))
        .route("/api/v1/players/:player_id", delete(delete_player))
        .route("/api/v1/players/:player_id/password", put(change_password))
        .route("/api/v1/login", post(login))
        // League routes
        .route("/api/v1/leagues", get(get_leagues).post(create_league))
        .route("/api/v1/leagues/:league_id/join", post(join_league))
        .route("/api/v1/leagues/:league_id/leave", post(leave_league))
        .route("/api/v1/leagues/:league_id/standings", get(get_standings))
        // Roster routes
        .route("/api/v1/rosters", get(get_rosters))
        .route("/api/v1/rosters/:roster_id", delete(delete_roster))
        .route(
            "/api/v1/rosters/:roster_id/artists",
            get(get_roster_artists).post(add_artist),
        )
        .route(
            "/api/v1/rosters/:roster_id/artists/:artist_id",
            delete(remove_artist),
        )
        // Artist catalog
        .route("/api/v1/artists/search", get(search_artists))
        // Game clock
        .route("/api/v1/game/current-date", get(get_current_date))
        .route("/api/v1/game/advance-month", post(advance_month))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
