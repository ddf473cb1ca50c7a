//! Error types for cuadre operations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while validating cuadre operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CuadreError {
    /// The cuadre is closed; no further updates or deletion.
    #[error("Cuadre is closed and can no longer be modified")]
    AlreadyClosed,

    /// A counted total was reported without its denomination breakdown.
    #[error("A denomination breakdown is required when reporting a counted total")]
    MissingBreakdown,

    /// Client-reported counted total disagrees with the server computation.
    #[error("Counted total mismatch: reported {reported}, computed {computed}")]
    CountMismatch {
        /// Total the client reported.
        reported: Decimal,
        /// Total computed from the denomination breakdown.
        computed: Decimal,
    },

    /// Opening balance must not be negative.
    #[error("Opening balance must not be negative")]
    NegativeOpeningBalance,

    /// Channel amounts must not be negative.
    #[error("Channel amounts must not be negative")]
    NegativeChannelAmount,
}
