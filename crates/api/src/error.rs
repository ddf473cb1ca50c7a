//! Error-to-response mapping.
//!
//! Repository and domain errors converge on [`AppError`]; this module turns
//! them into the wire shape `{ "kind": <stable code>, "message": <text> }`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use bodega_core::cuadre::CuadreError;
use bodega_core::inventory::InventoryError;
use bodega_db::repositories::cuadre::CuadreRepoError;
use bodega_db::repositories::inventory::MovementError;
use bodega_shared::AppError;

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable discriminator.
    pub kind: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// API-level error that knows how to render itself as a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        let body = ErrorBody {
            kind: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        let app = match err {
            InventoryError::InsufficientStock { .. } => {
                AppError::InsufficientStock(err.to_string())
            }
            _ => AppError::Validation(err.to_string()),
        };
        Self(app)
    }
}

impl From<CuadreError> for ApiError {
    fn from(err: CuadreError) -> Self {
        let app = match err {
            CuadreError::AlreadyClosed => AppError::InvalidState(err.to_string()),
            CuadreError::MissingBreakdown
            | CuadreError::CountMismatch { .. }
            | CuadreError::NegativeOpeningBalance
            | CuadreError::NegativeChannelAmount => AppError::Validation(err.to_string()),
        };
        Self(app)
    }
}

impl From<MovementError> for ApiError {
    fn from(err: MovementError) -> Self {
        let app = match err {
            MovementError::ProductNotFound(_)
            | MovementError::LocationNotFound(_)
            | MovementError::TransactionTypeNotFound(_)
            | MovementError::MissingCategoryType(_) => AppError::NotFound(err.to_string()),
            MovementError::UnknownCategory(_) => AppError::Internal(err.to_string()),
            MovementError::Invalid(inner) => return inner.into(),
            MovementError::NumberConflict => AppError::Conflict(err.to_string()),
            MovementError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<CuadreRepoError> for ApiError {
    fn from(err: CuadreRepoError) -> Self {
        let app = match err {
            CuadreRepoError::NotFound(_) => AppError::NotFound(err.to_string()),
            CuadreRepoError::DuplicateDate(_) => AppError::Conflict(err.to_string()),
            CuadreRepoError::Invalid(inner) => return inner.into(),
            CuadreRepoError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_insufficient_stock_is_conflict() {
        let err = ApiError::from(InventoryError::InsufficientStock {
            available: dec!(5),
            requested: dec!(10),
        });
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[rstest::rstest]
    #[case(ApiError::from(InventoryError::ZeroQuantity))]
    #[case(ApiError::from(InventoryError::NegativeQuantity))]
    #[case(ApiError::from(InventoryError::NegativeUnitCost))]
    #[case(ApiError::from(CuadreError::NegativeChannelAmount))]
    #[case(ApiError::from(CuadreError::NegativeOpeningBalance))]
    #[case(ApiError::from(CuadreError::MissingBreakdown))]
    fn test_validation_errors_are_bad_request(#[case] err: ApiError) {
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_closed_cuadre_is_invalid_state() {
        let err = ApiError::from(CuadreError::AlreadyClosed);
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_duplicate_date_is_conflict() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let err = ApiError::from(CuadreRepoError::DuplicateDate(date));
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_missing_reference_is_not_found() {
        let err = ApiError::from(MovementError::ProductNotFound(Uuid::new_v4()));
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_nested_inventory_error_unwraps() {
        let err = ApiError::from(MovementError::Invalid(InventoryError::InsufficientStock {
            available: dec!(1),
            requested: dec!(2),
        }));
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }
}
