use common::{
    AdvanceDto, ArtistSnapshotDto, BudgetChangeDto, CurrentDateDto, LeagueDto, LeagueMemberDto,
    PlayerDto, RosterDto, StandingDto,
};
use compute::GameRules;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

pub use common::ApiResponse;

use crate::handlers::{
    leagues::{CreateLeagueRequest, PlayerRequest},
    players::{ChangePasswordRequest, LoginRequest, RegisterPlayerRequest},
    rosters::AddArtistRequest,
};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for artist search results
    pub cache: Cache<String, CachedData>,
    /// Rules every game operation is played with
    pub rules: Arc<GameRules>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    ArtistSearch(Vec<ArtistSnapshotDto>),
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::players::register_player,
        crate::handlers::players::get_players,
        crate::handlers::players::login,
        crate::handlers::players::change_password,
        crate::handlers::players::delete_player,
        crate::handlers::leagues::get_leagues,
        crate::handlers::leagues::create_league,
        crate::handlers::leagues::join_league,
        crate::handlers::leagues::leave_league,
        crate::handlers::leagues::get_standings,
        crate::handlers::rosters::get_rosters,
        crate::handlers::rosters::delete_roster,
        crate::handlers::rosters::get_roster_artists,
        crate::handlers::rosters::add_artist,
        crate::handlers::rosters::remove_artist,
        crate::handlers::artists::search_artists,
        crate::handlers::game::get_current_date,
        crate::handlers::game::advance_month,
    ),
    components(
        schemas(
            ApiResponse<PlayerDto>,
            ApiResponse<Vec<PlayerDto>>,
            ApiResponse<Vec<LeagueDto>>,
            ApiResponse<Vec<StandingDto>>,
            ApiResponse<Vec<RosterDto>>,
            ApiResponse<Vec<ArtistSnapshotDto>>,
            ApiResponse<BudgetChangeDto>,
            ApiResponse<CurrentDateDto>,
            ApiResponse<AdvanceDto>,
            ErrorResponse,
            HealthResponse,
            PlayerDto,
            LeagueDto,
            LeagueMemberDto,
            StandingDto,
            RosterDto,
            BudgetChangeDto,
            ArtistSnapshotDto,
            CurrentDateDto,
            AdvanceDto,
            RegisterPlayerRequest,
            LoginRequest,
            ChangePasswordRequest,
            CreateLeagueRequest,
            PlayerRequest,
            AddArtistRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "players", description = "Player accounts"),
        (name = "leagues", description = "League membership and standings"),
        (name = "rosters", description = "Rosters and their artists"),
        (name = "artists", description = "Artist catalog"),
        (name = "game", description = "Game clock"),
    ),
    info(
        title = "Encore API",
        description = "Music fantasy league backend - build rosters of artists and score points as the months go by",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
