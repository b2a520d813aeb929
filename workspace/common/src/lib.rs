//! Common transport-layer types shared across the workspace.
//! The server handlers serialize these shapes; clients can deserialize API
//! responses with them without duplicating definitions.

mod period;

pub use period::GamePeriod;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// Wraps `data` in a successful response.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

// ===================== Players =====================

/// Public view of a player. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PlayerDto {
    pub id: i32,
    pub name: String,
    pub username: String,
}

// ===================== Leagues =====================

/// A player holding a roster in a league.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LeagueMemberDto {
    pub player_id: i32,
    pub player_name: String,
    pub roster_id: i32,
}

/// League with its owner and members.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LeagueDto {
    pub id: i32,
    pub name: String,
    pub player_count: i32,
    pub owner_id: Option<i32>,
    pub owner_name: Option<String>,
    pub members: Vec<LeagueMemberDto>,
}

/// One line of a league table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StandingDto {
    pub rank: usize,
    pub player_id: i32,
    pub player_name: String,
    pub roster_id: i32,
    pub roster_name: String,
    pub points: Decimal,
}

// ===================== Rosters =====================

/// A roster as seen by its owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RosterDto {
    pub id: i32,
    pub name: String,
    pub player_id: i32,
    pub league_id: i32,
    pub league_name: String,
    pub budget: Decimal,
    pub points: Decimal,
}

/// Result of a budget-changing roster operation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BudgetChangeDto {
    pub roster_id: i32,
    pub artist_id: i32,
    /// Price paid on add, amount refunded on removal
    pub amount: Decimal,
    /// Roster budget after the operation
    pub budget: Decimal,
}

// ===================== Artists =====================

/// An artist together with its statistics for one game period.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ArtistSnapshotDto {
    pub artist_id: i32,
    pub artist_name: String,
    pub price: Decimal,
    pub listeners: i64,
    pub followers: i64,
    pub popularity: i32,
    pub month: u32,
    pub year: i32,
}

// ===================== Game clock =====================

/// The current game date.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CurrentDateDto {
    pub month: u32,
    pub year: i32,
    pub month_name: String,
}

impl From<GamePeriod> for CurrentDateDto {
    fn from(period: GamePeriod) -> Self {
        Self {
            month: period.month,
            year: period.year,
            month_name: period.month_name().to_string(),
        }
    }
}

/// Outcome of advancing the game clock.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AdvanceDto {
    pub month: u32,
    pub year: i32,
    pub month_name: String,
    /// Number of rosters credited with points and budget
    pub rosters_updated: usize,
}

// ===================== Catalog import =====================

/// One month of statistics in an artist catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogStats {
    pub month: u32,
    pub year: i32,
    pub price: Decimal,
    #[serde(default)]
    pub listeners: i64,
    #[serde(default)]
    pub followers: i64,
    pub popularity: i32,
}

/// An artist entry in a catalog file, matched to existing artists by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogArtist {
    pub name: String,
    #[serde(default)]
    pub stats: Vec<CatalogStats>,
}
