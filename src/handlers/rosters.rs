use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{ArtistSnapshotDto, BudgetChangeDto, LeagueDto, RosterDto};
use compute::{catalog, clock, ledger, membership, standings};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::leagues::leave_response;
use crate::schemas::{ApiResponse, AppState};

/// Query parameters for listing rosters
#[derive(Debug, Deserialize, IntoParams)]
pub struct RosterQuery {
    /// Player whose rosters are listed
    pub player_id: Option<i32>,
}

/// Request body for adding an artist to a roster
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct AddArtistRequest {
    pub artist_id: i32,
}

/// Get the rosters of a player
#[utoipa::path(
    get,
    path = "/api/v1/rosters",
    tag = "rosters",
    params(RosterQuery),
    responses(
        (status = 200, description = "Rosters retrieved successfully", body = ApiResponse<Vec<RosterDto>>),
        (status = 400, description = "Missing player_id", body = ErrorResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_rosters(
    Query(query): Query<RosterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RosterDto>>>, ApiError> {
    let player_id = query
        .player_id
        .ok_or_else(|| ApiError::BadRequest("player_id query parameter is required".to_string()))?;
    let rosters = standings::player_rosters(&state.db, player_id).await?;
    debug!("Player {} has {} rosters", player_id, rosters.len());
    Ok(Json(ApiResponse::ok(rosters, "Rosters retrieved successfully")))
}

/// Delete a roster, which makes its player leave the league
#[utoipa::path(
    delete,
    path = "/api/v1/rosters/{roster_id}",
    tag = "rosters",
    params(
        ("roster_id" = i32, Path, description = "Roster ID"),
    ),
    responses(
        (status = 200, description = "Roster deleted", body = ApiResponse<Option<LeagueDto>>),
        (status = 404, description = "Roster not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_roster(
    Path(roster_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Option<LeagueDto>>>, ApiError> {
    let roster = standings::get_roster(&state.db, roster_id).await?;
    let outcome = membership::delete_roster(&state.db, roster_id).await?;
    let mut response = leave_response(&state, roster.league_id, outcome).await?;
    response.message = format!("Roster deleted. {}", response.message);
    Ok(Json(response))
}

/// Get the artists on a roster with their current stats
#[utoipa::path(
    get,
    path = "/api/v1/rosters/{roster_id}/artists",
    tag = "rosters",
    params(
        ("roster_id" = i32, Path, description = "Roster ID"),
    ),
    responses(
        (status = 200, description = "Artists retrieved successfully", body = ApiResponse<Vec<ArtistSnapshotDto>>),
        (status = 404, description = "Roster not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_roster_artists(
    Path(roster_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ArtistSnapshotDto>>>, ApiError> {
    let period = clock::current_period(&state.db, state.rules.initial_period).await?;
    let artists = catalog::roster_artists(&state.db, period, roster_id).await?;
    Ok(Json(ApiResponse::ok(artists, "Artists retrieved successfully")))
}

/// Add an artist to a roster, paying its current price
#[utoipa::path(
    post,
    path = "/api/v1/rosters/{roster_id}/artists",
    tag = "rosters",
    params(
        ("roster_id" = i32, Path, description = "Roster ID"),
    ),
    request_body = AddArtistRequest,
    responses(
        (status = 201, description = "Artist added", body = ApiResponse<BudgetChangeDto>),
        (status = 404, description = "Roster, artist or current price not found", body = ErrorResponse),
        (status = 409, description = "Artist already on roster", body = ErrorResponse),
        (status = 422, description = "Insufficient budget", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn add_artist(
    Path(roster_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<AddArtistRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<BudgetChangeDto>>), ApiError> {
    let change = ledger::add_artist(&state.db, &state.rules, roster_id, request.artist_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(change.into(), "Artist added to roster")),
    ))
}

/// Remove an artist from a roster and refund the roster
#[utoipa::path(
    delete,
    path = "/api/v1/rosters/{roster_id}/artists/{artist_id}",
    tag = "rosters",
    params(
        ("roster_id" = i32, Path, description = "Roster ID"),
        ("artist_id" = i32, Path, description = "Artist ID"),
    ),
    responses(
        (status = 200, description = "Artist removed, refund returned", body = ApiResponse<BudgetChangeDto>),
        (status = 404, description = "Artist not on roster", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_artist(
    Path((roster_id, artist_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BudgetChangeDto>>, ApiError> {
    let change = ledger::remove_artist(&state.db, &state.rules, roster_id, artist_id).await?;
    Ok(Json(ApiResponse::ok(change.into(), "Artist removed from roster")))
}
