//! Cuadre routes: daily cash reconciliation.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::OrganizationId;
use crate::AppState;
use bodega_core::cuadre::{ChannelTotals, DenominationCounts};
use bodega_db::CuadreRepository;
use bodega_db::entities::cuadres;
use bodega_db::repositories::cuadre::{
    CreateCuadreInput, CuadreWithDerived, UpdateCuadreInput,
};
use bodega_shared::AppError;

const DEFAULT_HISTORY_LIMIT: u64 = 30;

/// Creates the cuadres router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cuadres", axum::routing::post(create_cuadre))
        .route("/cuadres/opening-balance", get(opening_balance))
        .route("/cuadres/history", get(history))
        .route("/cuadres/validate-date", get(validate_date))
        .route("/cuadres/day-stats", get(day_stats))
        .route(
            "/cuadres/{key}",
            get(get_by_date).put(update_cuadre).delete(delete_cuadre),
        )
}

/// A cuadre with its derived figures, as returned by every read surface.
#[derive(Debug, Serialize)]
pub struct CuadreResponse {
    /// The stored record.
    #[serde(flatten)]
    pub cuadre: cuadres::Model,
    /// Opening plus income minus expenses, derived at read time.
    pub calculated_balance: Decimal,
    /// Physical minus calculated, when a count exists.
    pub difference: Option<Decimal>,
}

impl From<CuadreWithDerived> for CuadreResponse {
    fn from(value: CuadreWithDerived) -> Self {
        Self {
            cuadre: value.cuadre,
            calculated_balance: value.calculated_balance,
            difference: value.difference,
        }
    }
}

/// Request body for creating a cuadre.
#[derive(Debug, Deserialize)]
pub struct CreateCuadreRequest {
    /// Calendar date being reconciled.
    pub date: NaiveDate,
    /// Cash on hand at the start of the day.
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Income per payment channel.
    #[serde(default)]
    pub income: ChannelTotals,
    /// Expenses per payment channel.
    #[serde(default)]
    pub expense: ChannelTotals,
    /// Denomination breakdown of the physical count.
    pub denominations: Option<DenominationCounts>,
    /// Client-reported counted total, cross-checked server-side.
    pub physical_balance: Option<Decimal>,
    /// Free-form observations.
    pub observations: Option<String>,
    /// Acting user.
    pub created_by: Option<Uuid>,
}

/// Request body for updating an open cuadre.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateCuadreRequest {
    /// New opening balance.
    pub opening_balance: Option<Decimal>,
    /// New income totals.
    pub income: Option<ChannelTotals>,
    /// New expense totals.
    pub expense: Option<ChannelTotals>,
    /// New denomination breakdown.
    pub denominations: Option<DenominationCounts>,
    /// Client-reported counted total for the new breakdown.
    pub physical_balance: Option<Decimal>,
    /// Observations: absent leaves them untouched, `null` clears them.
    #[serde(default, deserialize_with = "double_option")]
    pub observations: Option<Option<String>>,
    /// When true, closes the cuadre.
    #[serde(default)]
    pub close: bool,
    /// Acting user.
    pub actor: Option<Uuid>,
}

/// Distinguishes an absent field (outer `None`) from an explicit `null`
/// (`Some(None)`): this only runs when the field is present in the JSON.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Response for a created cuadre: the record plus the denomination echo.
#[derive(Debug, Serialize)]
pub struct CreateCuadreResponse {
    /// The created record with derived figures.
    #[serde(flatten)]
    pub record: CuadreResponse,
    /// The denomination breakdown as counted, echoed back.
    pub denominations: Option<DenominationCounts>,
}

#[derive(Debug, Serialize)]
struct OpeningBalanceResponse {
    opening_balance: Decimal,
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ValidateDateResponse {
    date: NaiveDate,
    available: bool,
}

#[derive(Debug, Serialize)]
struct DayStatsResponse {
    date: NaiveDate,
    income_total: Decimal,
    expense_total: Decimal,
    net: Decimal,
    has_cuadre: bool,
}

/// GET `/cuadres/opening-balance` - Suggested opening balance for the next cuadre.
async fn opening_balance(
    State(state): State<AppState>,
    org: OrganizationId,
) -> Result<Json<OpeningBalanceResponse>, ApiError> {
    let repo = CuadreRepository::new((*state.db).clone());
    let opening_balance = repo.opening_balance(org.get()).await?;
    Ok(Json(OpeningBalanceResponse { opening_balance }))
}

/// GET `/cuadres/history` - Most recent cuadres, newest date first.
async fn history(
    State(state): State<AppState>,
    org: OrganizationId,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<CuadreResponse>>, ApiError> {
    let repo = CuadreRepository::new((*state.db).clone());
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let records = repo.history(org.get(), limit).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// GET `/cuadres/validate-date` - Whether a cuadre may be created for the date.
async fn validate_date(
    State(state): State<AppState>,
    org: OrganizationId,
    Query(query): Query<DateQuery>,
) -> Result<Json<ValidateDateResponse>, ApiError> {
    let repo = CuadreRepository::new((*state.db).clone());
    let available = repo.validate_date(org.get(), query.date).await?;
    Ok(Json(ValidateDateResponse {
        date: query.date,
        available,
    }))
}

/// GET `/cuadres/day-stats` - Income and expense totals for a date.
async fn day_stats(
    State(state): State<AppState>,
    org: OrganizationId,
    Query(query): Query<DateQuery>,
) -> Result<Json<DayStatsResponse>, ApiError> {
    let repo = CuadreRepository::new((*state.db).clone());
    let stats = repo.day_stats(org.get(), query.date).await?;
    Ok(Json(DayStatsResponse {
        date: stats.date,
        income_total: stats.income_total,
        expense_total: stats.expense_total,
        net: stats.net,
        has_cuadre: stats.has_cuadre,
    }))
}

/// GET `/cuadres/{date}` - The cuadre for a calendar date.
async fn get_by_date(
    State(state): State<AppState>,
    org: OrganizationId,
    Path(date): Path<NaiveDate>,
) -> Result<Json<CuadreResponse>, ApiError> {
    let repo = CuadreRepository::new((*state.db).clone());
    let record = repo
        .find_by_date(org.get(), date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No cuadre for {date}")))?;
    Ok(Json(record.into()))
}

/// POST `/cuadres` - Create and close the day's cuadre.
async fn create_cuadre(
    State(state): State<AppState>,
    org: OrganizationId,
    Json(payload): Json<CreateCuadreRequest>,
) -> Result<(StatusCode, Json<CreateCuadreResponse>), ApiError> {
    let repo = CuadreRepository::new((*state.db).clone());
    let denominations = payload.denominations;
    let record = repo
        .create(CreateCuadreInput {
            organization_id: org.get(),
            date: payload.date,
            opening_balance: payload.opening_balance,
            income: payload.income,
            expense: payload.expense,
            denomination_counts: denominations,
            reported_physical: payload.physical_balance,
            observations: payload.observations,
            created_by: payload.created_by,
        })
        .await?;

    info!(
        organization_id = %org.get(),
        date = %payload.date,
        "Cuadre created"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreateCuadreResponse {
            record: record.into(),
            denominations,
        }),
    ))
}

/// PUT `/cuadres/{id}` - Update an open cuadre.
async fn update_cuadre(
    State(state): State<AppState>,
    org: OrganizationId,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCuadreRequest>,
) -> Result<Json<CuadreResponse>, ApiError> {
    let repo = CuadreRepository::new((*state.db).clone());
    let record = repo
        .update(
            org.get(),
            id,
            UpdateCuadreInput {
                opening_balance: payload.opening_balance,
                income: payload.income,
                expense: payload.expense,
                denomination_counts: payload.denominations,
                reported_physical: payload.physical_balance,
                observations: payload.observations,
                close: payload.close,
                actor: payload.actor,
            },
        )
        .await?;
    Ok(Json(record.into()))
}

/// DELETE `/cuadres/{id}` - Delete an open cuadre.
async fn delete_cuadre(
    State(state): State<AppState>,
    org: OrganizationId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = CuadreRepository::new((*state.db).clone());
    repo.delete(org.get(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
