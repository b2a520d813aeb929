//! HTTP mapping of domain errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use compute::error::LeagueError;
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Error returned by every handler.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejection or failure from a game operation
    #[error(transparent)]
    League(#[from] LeagueError),
    /// Request that is well formed but cannot be served
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::League(err) => match err {
                LeagueError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                LeagueError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                LeagueError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
                LeagueError::InsufficientBudget { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_BUDGET")
                }
                LeagueError::Transaction(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
                LeagueError::PasswordHash(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Storage details stay in the log
        let message = if matches!(&self, Self::League(err) if !err.is_domain()) {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            warn!("Request rejected: {}", self);
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}
