use axum::{extract::State, response::Json};
use common::{AdvanceDto, CurrentDateDto};
use compute::{advance, clock};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Current game month
#[utoipa::path(
    get,
    path = "/api/v1/game/current-date",
    tag = "game",
    responses(
        (status = 200, description = "Current game date", body = ApiResponse<CurrentDateDto>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_current_date(State(state): State<AppState>) -> Result<Json<ApiResponse<CurrentDateDto>>, ApiError> {
    let period = clock::current_period(&state.db, state.rules.initial_period).await?;
    Ok(Json(ApiResponse::ok(period.into(), "Current date retrieved successfully")))
}

/// Close the current month and move the game clock forward
#[utoipa::path(
    post,
    path = "/api/v1/game/advance-month",
    tag = "game",
    responses(
        (status = 200, description = "Game advanced", body = ApiResponse<AdvanceDto>),
        (status = 500, description = "Internal server error, nothing was changed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn advance_month(State(state): State<AppState>) -> Result<Json<ApiResponse<AdvanceDto>>, ApiError> {
    let outcome = advance::advance(&state.db, &state.rules).await?;
    info!(
        "Game advanced to {}, {} rosters credited",
        outcome.period, outcome.rosters_updated
    );
    Ok(Json(ApiResponse::ok(outcome.into(), "Advanced to next month")))
}
