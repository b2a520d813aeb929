use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::PlayerDto;
use compute::{membership, players};
use model::entities::player;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for registering a player
#[derive(Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterPlayerRequest {
    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Login name (must be unique)
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request body for logging in
#[derive(Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request body for changing a password
#[derive(Deserialize, Serialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub password: String,
}

pub(crate) fn player_dto(model: player::Model) -> PlayerDto {
    PlayerDto {
        id: model.id,
        name: model.name,
        username: model.username,
    }
}

/// Register a new player
#[utoipa::path(
    post,
    path = "/api/v1/players",
    tag = "players",
    request_body = RegisterPlayerRequest,
    responses(
        (status = 201, description = "Player registered successfully", body = ApiResponse<PlayerDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register_player(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterPlayerRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PlayerDto>>), ApiError> {
    let player =
        players::register_player(&state.db, &request.name, &request.username, &request.password)
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(player_dto(player), "Player registered successfully")),
    ))
}

/// Get all players
#[utoipa::path(
    get,
    path = "/api/v1/players",
    tag = "players",
    responses(
        (status = 200, description = "Players retrieved successfully", body = ApiResponse<Vec<PlayerDto>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_players(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<PlayerDto>>>, ApiError> {
    let players: Vec<PlayerDto> = players::list_players(&state.db)
        .await?
        .into_iter()
        .map(player_dto)
        .collect();
    debug!("Retrieved {} players", players.len());
    Ok(Json(ApiResponse::ok(players, "Players retrieved successfully")))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "players",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<PlayerDto>),
        (status = 404, description = "Invalid username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> Result<Json<ApiResponse<PlayerDto>>, ApiError> {
    let player = players::authenticate(&state.db, &request.username, &request.password).await?;
    Ok(Json(ApiResponse::ok(player_dto(player), "Logged in successfully")))
}

/// Change a player's password
#[utoipa::path(
    put,
    path = "/api/v1/players/{player_id}/password",
    tag = "players",
    params(
        ("player_id" = i32, Path, description = "Player ID"),
    ),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<String>),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn change_password(
    Path(player_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ChangePasswordRequest>>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    players::change_password(&state.db, player_id, &request.password).await?;
    Ok(Json(ApiResponse::ok(
        format!("Password of player {} changed", player_id),
        "Password changed successfully",
    )))
}

/// Delete a player together with their rosters
#[utoipa::path(
    delete,
    path = "/api/v1/players/{player_id}",
    tag = "players",
    params(
        ("player_id" = i32, Path, description = "Player ID"),
    ),
    responses(
        (status = 200, description = "Player deleted", body = ApiResponse<String>),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_player(
    Path(player_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    membership::delete_player(&state.db, player_id).await?;
    info!("Player {} deleted", player_id);
    Ok(Json(ApiResponse::ok(
        format!("Player {} deleted", player_id),
        "Player deleted successfully",
    )))
}
