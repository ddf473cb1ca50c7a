//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input, caught before any mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity absent or not owned by the organization.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation (duplicate transaction number or cuadre date).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Movement would drive a stock balance negative.
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    /// Mutation attempted on a closed cuadre.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidState(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) | Self::InsufficientStock(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error discriminator for API responses.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
