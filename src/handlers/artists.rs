use axum::{
    extract::{Query, State},
    response::Json,
};
use axum_valid::Valid;
use common::ArtistSnapshotDto;
use compute::{catalog, clock};
use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::IntoParams;
use validator::Validate;

use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, CachedData};

/// Query parameters for artist search
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct SearchQuery {
    /// Part of the artist name, at least two characters
    #[validate(length(min = 2, max = 100))]
    pub term: String,
}

/// Search artists by name
///
/// Matches are case-insensitive and limited to artists priced for the current
/// game month.
#[utoipa::path(
    get,
    path = "/api/v1/artists/search",
    tag = "artists",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results", body = ApiResponse<Vec<ArtistSnapshotDto>>),
        (status = 400, description = "Search term too short", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn search_artists(
    Valid(Query(query)): Valid<Query<SearchQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ArtistSnapshotDto>>>, ApiError> {
    let period = clock::current_period(&state.db, state.rules.initial_period).await?;
    let term = query.term.trim().to_lowercase();

    // Results only change when the clock moves or a catalog is imported
    let cache_key = format!("search:{}:{}-{:02}", term, period.year, period.month);
    if let Some(CachedData::ArtistSearch(results)) = state.cache.get(&cache_key).await {
        debug!("Cache hit for {}", cache_key);
        return Ok(Json(ApiResponse::ok(results, "Artists retrieved from cache")));
    }

    let results = catalog::search_artists(&state.db, period, &term).await?;
    state
        .cache
        .insert(cache_key, CachedData::ArtistSearch(results.clone()))
        .await;
    Ok(Json(ApiResponse::ok(results, "Artists retrieved successfully")))
}
