use rust_decimal::Decimal;
use thiserror::Error;

/// Error types for league, roster and game clock operations
#[derive(Error, Debug)]
pub enum LeagueError {
    /// A referenced player, league, roster, artist or membership does not exist
    #[error("{0}")]
    NotFound(String),

    /// Duplicate membership, username or roster
    #[error("{0}")]
    Conflict(String),

    /// A required field is missing or malformed
    #[error("{0}")]
    InvalidInput(String),

    /// The roster cannot pay for the artist
    #[error("Insufficient budget: roster has {budget}, artist costs {price}")]
    InsufficientBudget { budget: Decimal, price: Decimal },

    /// Error from the database while running a multi-step operation.
    /// The surrounding transaction is rolled back before this is returned.
    #[error("Database error: {0}")]
    Transaction(#[from] sea_orm::DbErr),

    /// Error from password hashing or hash parsing
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl LeagueError {
    /// Convenience constructor for [`LeagueError::NotFound`]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Convenience constructor for [`LeagueError::Conflict`]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Convenience constructor for [`LeagueError::InvalidInput`]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether this error is a domain rejection rather than a storage failure.
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Transaction(_) | Self::PasswordHash(_))
    }
}

/// Type alias for Result with LeagueError
pub type Result<T> = std::result::Result<T, LeagueError>;
