use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{LeagueDto, RosterDto, StandingDto};
use compute::membership::{self, LeaveOutcome};
use compute::standings;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a league
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateLeagueRequest {
    /// League name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Player who owns the league and gets its first roster
    pub owner_id: i32,
}

/// Request body naming the player joining or leaving a league
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct PlayerRequest {
    pub player_id: i32,
}

/// Get all leagues
#[utoipa::path(
    get,
    path = "/api/v1/leagues",
    tag = "leagues",
    responses(
        (status = 200, description = "Leagues retrieved successfully", body = ApiResponse<Vec<LeagueDto>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leagues(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<LeagueDto>>>, ApiError> {
    let leagues = standings::list_leagues(&state.db).await?;
    debug!("Retrieved {} leagues", leagues.len());
    Ok(Json(ApiResponse::ok(leagues, "Leagues retrieved successfully")))
}

/// Create a league with the owner's roster
#[utoipa::path(
    post,
    path = "/api/v1/leagues",
    tag = "leagues",
    request_body = CreateLeagueRequest,
    responses(
        (status = 201, description = "League created successfully", body = ApiResponse<LeagueDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_league(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateLeagueRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LeagueDto>>), ApiError> {
    let league =
        membership::create_league(&state.db, &state.rules, &request.name, request.owner_id).await?;
    let dto = standings::get_league(&state.db, league.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(dto, "League created successfully")),
    ))
}

/// Join a league
#[utoipa::path(
    post,
    path = "/api/v1/leagues/{league_id}/join",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    request_body = PlayerRequest,
    responses(
        (status = 201, description = "Joined league, new roster returned", body = ApiResponse<RosterDto>),
        (status = 404, description = "League or player not found", body = ErrorResponse),
        (status = 409, description = "Player already in league", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn join_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<PlayerRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<RosterDto>>), ApiError> {
    let roster = membership::join_league(&state.db, &state.rules, league_id, request.player_id).await?;
    let dto = standings::get_roster(&state.db, roster.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(dto, "Joined league successfully")),
    ))
}

/// Leave a league
///
/// Returns the league as it is afterwards, or `null` when the last player left
/// and the league was deleted.
#[utoipa::path(
    post,
    path = "/api/v1/leagues/{league_id}/leave",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    request_body = PlayerRequest,
    responses(
        (status = 200, description = "Left league", body = ApiResponse<Option<LeagueDto>>),
        (status = 404, description = "Player has no roster in the league", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn leave_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<PlayerRequest>>,
) -> Result<Json<ApiResponse<Option<LeagueDto>>>, ApiError> {
    let outcome = membership::leave_league(&state.db, league_id, request.player_id).await?;
    let response = leave_response(&state, league_id, outcome).await?;
    Ok(Json(response))
}

/// Builds the response for a leave or roster deletion.
pub(crate) async fn leave_response(
    state: &AppState,
    league_id: i32,
    outcome: LeaveOutcome,
) -> Result<ApiResponse<Option<LeagueDto>>, ApiError> {
    let response = match outcome {
        LeaveOutcome::LeagueDeleted => ApiResponse::ok(None, "Left league, league deleted"),
        LeaveOutcome::Left => ApiResponse::ok(
            Some(standings::get_league(&state.db, league_id).await?),
            "Left league successfully",
        ),
        LeaveOutcome::OwnershipTransferred { new_owner_id } => {
            info!("League {} now owned by player {}", league_id, new_owner_id);
            ApiResponse::ok(
                Some(standings::get_league(&state.db, league_id).await?),
                "Left league, ownership transferred",
            )
        }
    };
    Ok(response)
}

/// League table ordered by points
#[utoipa::path(
    get,
    path = "/api/v1/leagues/{league_id}/standings",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "Standings retrieved successfully", body = ApiResponse<Vec<StandingDto>>),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_standings(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StandingDto>>>, ApiError> {
    let table = standings::league_standings(&state.db, league_id).await?;
    Ok(Json(ApiResponse::ok(table, "Standings retrieved successfully")))
}
