//! Inventory routes: stock positions, the movement ledger, and transfers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::OrganizationId;
use crate::AppState;
use bodega_core::inventory::MovementCategory;
use bodega_db::InventoryRepository;
use bodega_db::entities::{inventory_movements, inventory_stock, transaction_types};
use bodega_db::repositories::inventory::{
    CreateMovementInput, MovementFilter, StockFilter, TransferInput,
};

/// Creates the inventory router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory/stock", get(list_stock))
        .route("/inventory/movements", get(list_movements))
        .route("/inventory/movements", post(create_movement))
        .route("/inventory/transfers", post(create_transfer))
        .route("/inventory/transaction-types", get(list_transaction_types))
        .route("/inventory/summary", get(summary))
        .route("/inventory/valuation", get(valuation))
        .route("/inventory/low-stock", get(low_stock))
}

/// Query parameters for the stock listing.
#[derive(Debug, Deserialize)]
pub struct StockQuery {
    /// Filter by product.
    pub product_id: Option<Uuid>,
    /// Filter by location.
    pub location_id: Option<Uuid>,
    /// True for only empty positions, false for only stocked ones.
    pub zero_stock: Option<bool>,
}

/// Query parameters for the movement listing.
#[derive(Debug, Deserialize)]
pub struct MovementQuery {
    /// Filter by product.
    pub product_id: Option<Uuid>,
    /// Filter by location.
    pub location_id: Option<Uuid>,
    /// Filter by transaction type.
    pub transaction_type_id: Option<Uuid>,
    /// Filter by movement category.
    pub category: Option<MovementCategory>,
    /// Inclusive start date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive end date.
    pub date_to: Option<NaiveDate>,
}

/// Request body for recording a movement.
#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    /// Product being moved.
    pub product_id: Uuid,
    /// Location affected.
    pub location_id: Uuid,
    /// Transaction type determining category and costing.
    pub transaction_type_id: Uuid,
    /// Positive magnitude; the category supplies the sign.
    pub quantity: Decimal,
    /// Unit cost of the moved goods.
    #[serde(default)]
    pub unit_cost: Decimal,
    /// Optional related document kind.
    pub reference_type: Option<String>,
    /// Optional related document id.
    pub reference_id: Option<Uuid>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Acting user.
    pub created_by: Option<Uuid>,
}

/// Request body for a stock transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Product being transferred.
    pub product_id: Uuid,
    /// Source location.
    pub from_location_id: Uuid,
    /// Destination location.
    pub to_location_id: Uuid,
    /// Positive magnitude moved between the locations.
    pub quantity: Decimal,
    /// Free-form notes, shared by both legs.
    pub notes: Option<String>,
    /// Acting user.
    pub created_by: Option<Uuid>,
}

/// Response for a completed transfer: both ledger legs.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Shared reference id linking the legs.
    pub reference_id: Uuid,
    /// Outbound movement at the source.
    pub outbound: inventory_movements::Model,
    /// Inbound movement at the destination.
    pub inbound: inventory_movements::Model,
}

/// Inventory summary response.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Active products in the organization.
    pub total_products: u64,
    /// Active locations in the organization.
    pub total_locations: u64,
    /// Sum of quantity times average cost across all positions.
    pub total_stock_value: Decimal,
}

/// One valuation report line: a position priced at its average cost.
#[derive(Debug, Serialize)]
pub struct ValuationResponse {
    /// The stock position.
    #[serde(flatten)]
    pub stock: inventory_stock::Model,
    /// Quantity times average cost.
    pub total_value: Decimal,
}

/// One low-stock report line.
#[derive(Debug, Serialize)]
pub struct LowStockResponse {
    /// The stock position.
    #[serde(flatten)]
    pub stock: inventory_stock::Model,
    /// The product's reorder threshold.
    pub min_stock: Decimal,
}

/// GET `/inventory/stock` - List stock positions.
async fn list_stock(
    State(state): State<AppState>,
    org: OrganizationId,
    Query(query): Query<StockQuery>,
) -> Result<Json<Vec<inventory_stock::Model>>, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let positions = repo
        .list_stock(
            org.get(),
            StockFilter {
                product_id: query.product_id,
                location_id: query.location_id,
                zero_stock: query.zero_stock,
            },
        )
        .await?;
    Ok(Json(positions))
}

/// GET `/inventory/movements` - List ledger entries, newest first.
async fn list_movements(
    State(state): State<AppState>,
    org: OrganizationId,
    Query(query): Query<MovementQuery>,
) -> Result<Json<Vec<inventory_movements::Model>>, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let movements = repo
        .list_movements(
            org.get(),
            MovementFilter {
                product_id: query.product_id,
                location_id: query.location_id,
                transaction_type_id: query.transaction_type_id,
                category: query.category,
                date_from: query.date_from,
                date_to: query.date_to,
            },
        )
        .await?;
    Ok(Json(movements))
}

/// POST `/inventory/movements` - Record a stock movement.
async fn create_movement(
    State(state): State<AppState>,
    org: OrganizationId,
    Json(payload): Json<CreateMovementRequest>,
) -> Result<(StatusCode, Json<inventory_movements::Model>), ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let movement = repo
        .apply_movement(CreateMovementInput {
            organization_id: org.get(),
            product_id: payload.product_id,
            location_id: payload.location_id,
            transaction_type_id: payload.transaction_type_id,
            quantity: payload.quantity,
            unit_cost: payload.unit_cost,
            reference_type: payload.reference_type,
            reference_id: payload.reference_id,
            notes: payload.notes,
            created_by: payload.created_by,
        })
        .await?;

    info!(
        organization_id = %org.get(),
        transaction_number = %movement.transaction_number,
        product_id = %movement.product_id,
        "Movement recorded"
    );
    Ok((StatusCode::CREATED, Json(movement)))
}

/// POST `/inventory/transfers` - Move stock between locations.
async fn create_transfer(
    State(state): State<AppState>,
    org: OrganizationId,
    Json(payload): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>), ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let result = repo
        .transfer_stock(TransferInput {
            organization_id: org.get(),
            product_id: payload.product_id,
            from_location_id: payload.from_location_id,
            to_location_id: payload.to_location_id,
            quantity: payload.quantity,
            notes: payload.notes,
            created_by: payload.created_by,
        })
        .await?;

    info!(
        organization_id = %org.get(),
        reference_id = %result.reference_id,
        "Transfer completed"
    );
    Ok((
        StatusCode::CREATED,
        Json(TransferResponse {
            reference_id: result.reference_id,
            outbound: result.outbound,
            inbound: result.inbound,
        }),
    ))
}

/// GET `/inventory/transaction-types` - List usable transaction types.
async fn list_transaction_types(
    State(state): State<AppState>,
    org: OrganizationId,
) -> Result<Json<Vec<transaction_types::Model>>, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let types = repo.list_transaction_types(org.get()).await?;
    Ok(Json(types))
}

/// GET `/inventory/summary` - Aggregate inventory figures.
async fn summary(
    State(state): State<AppState>,
    org: OrganizationId,
) -> Result<Json<SummaryResponse>, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let summary = repo.summary(org.get()).await?;
    Ok(Json(SummaryResponse {
        total_products: summary.total_products,
        total_locations: summary.total_locations,
        total_stock_value: summary.total_stock_value,
    }))
}

/// GET `/inventory/valuation` - Held positions priced at average cost,
/// most valuable first.
async fn valuation(
    State(state): State<AppState>,
    org: OrganizationId,
) -> Result<Json<Vec<ValuationResponse>>, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let rows = repo.valuation(org.get()).await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| ValuationResponse {
                stock: row.stock,
                total_value: row.total_value,
            })
            .collect(),
    ))
}

/// GET `/inventory/low-stock` - Positions at or below their product's
/// reorder threshold, lowest quantity first.
async fn low_stock(
    State(state): State<AppState>,
    org: OrganizationId,
) -> Result<Json<Vec<LowStockResponse>>, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let rows = repo.low_stock(org.get()).await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| LowStockResponse {
                stock: row.stock,
                min_stock: row.min_stock,
            })
            .collect(),
    ))
}
