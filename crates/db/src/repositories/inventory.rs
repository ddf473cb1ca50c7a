//! Inventory repository for stock ledger database operations.
//!
//! All mutations of a stock position happen inside a single database
//! transaction holding a `FOR UPDATE` lock on the position row, so the
//! non-negative balance check never races a concurrent decrement.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use bodega_core::inventory::{
    InventoryError, MAX_NUMBER_ATTEMPTS, MovementCategory, MovementService, StockSnapshot,
    TransactionTypeInfo, format_transaction_number,
};

use crate::entities::{inventory_movements, inventory_stock, locations, products, transaction_types};

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum MovementError {
    /// Product not found or not owned by the organization.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Location not found or not owned by the organization.
    #[error("Location not found: {0}")]
    LocationNotFound(Uuid),

    /// Transaction type not found (or not visible to the organization).
    #[error("Transaction type not found: {0}")]
    TransactionTypeNotFound(Uuid),

    /// No transaction type configured for the given category.
    #[error("No transaction type configured for category {0}")]
    MissingCategoryType(&'static str),

    /// Transaction type carries a category string the ledger cannot map.
    #[error("Unknown movement category: {0}")]
    UnknownCategory(String),

    /// Movement rejected by ledger validation.
    #[error(transparent)]
    Invalid(#[from] InventoryError),

    /// Transaction number collided on every attempt.
    #[error("Could not allocate a transaction number, please retry")]
    NumberConflict,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a stock movement.
#[derive(Debug, Clone)]
pub struct CreateMovementInput {
    /// Organization the movement belongs to.
    pub organization_id: Uuid,
    /// Product being moved.
    pub product_id: Uuid,
    /// Location affected.
    pub location_id: Uuid,
    /// Transaction type determining category and costing.
    pub transaction_type_id: Uuid,
    /// Positive magnitude; the category supplies the sign.
    pub quantity: Decimal,
    /// Unit cost of the moved goods.
    pub unit_cost: Decimal,
    /// Optional related document kind (purchase order, sale, ...).
    pub reference_type: Option<String>,
    /// Optional related document id.
    pub reference_id: Option<Uuid>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Acting user.
    pub created_by: Option<Uuid>,
}

/// Input for transferring stock between locations.
#[derive(Debug, Clone)]
pub struct TransferInput {
    /// Organization the transfer belongs to.
    pub organization_id: Uuid,
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

/// Result of a stock transfer: the two linked ledger entries.
#[derive(Debug, Clone)]
pub struct TransferResult {
    /// Shared reference id linking the two legs.
    pub reference_id: Uuid,
    /// Outbound movement at the source location.
    pub outbound: inventory_movements::Model,
    /// Inbound movement at the destination location.
    pub inbound: inventory_movements::Model,
}

/// Filter options for listing stock positions.
#[derive(Debug, Clone, Default)]
pub struct StockFilter {
    /// Filter by product.
    pub product_id: Option<Uuid>,
    /// Filter by location.
    pub location_id: Option<Uuid>,
    /// When true only zero-quantity positions; when false only non-zero.
    pub zero_stock: Option<bool>,
}

/// Filter options for listing movements.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Filter by product.
    pub product_id: Option<Uuid>,
    /// Filter by location.
    pub location_id: Option<Uuid>,
    /// Filter by transaction type.
    pub transaction_type_id: Option<Uuid>,
    /// Filter by movement category, resolved through the type table.
    pub category: Option<MovementCategory>,
    /// Filter by date range start (inclusive, UTC day).
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end (inclusive, UTC day).
    pub date_to: Option<NaiveDate>,
}

/// One stock position priced at its average cost.
#[derive(Debug, Clone)]
pub struct ValuationRow {
    /// The stock position.
    pub stock: inventory_stock::Model,
    /// Quantity times average cost.
    pub total_value: Decimal,
}

/// A stock position at or below its product's reorder threshold.
#[derive(Debug, Clone)]
pub struct LowStockRow {
    /// The stock position.
    pub stock: inventory_stock::Model,
    /// The product's reorder threshold.
    pub min_stock: Decimal,
}

/// Aggregate figures for the inventory summary endpoint.
#[derive(Debug, Clone)]
pub struct InventorySummary {
    /// Active products in the organization.
    pub total_products: u64,
    /// Active locations in the organization.
    pub total_locations: u64,
    /// Sum of quantity times average cost across all positions.
    pub total_stock_value: Decimal,
}

/// Inventory repository for ledger operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a stock movement as one all-or-nothing transaction.
    ///
    /// The generated transaction number is a count-then-format pattern; the
    /// unique constraint on (organization, transaction_number) is the safety
    /// net. On a collision the whole movement is retried with a fresh count,
    /// bounded by [`MAX_NUMBER_ATTEMPTS`].
    ///
    /// # Errors
    ///
    /// Returns an error if the product, location, or transaction type is
    /// missing or cross-tenant, if the movement would drive the balance
    /// negative, or if every numbering attempt collided.
    pub async fn apply_movement(
        &self,
        input: CreateMovementInput,
    ) -> Result<inventory_movements::Model, MovementError> {
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            match self.try_apply_movement(&input).await {
                Err(MovementError::Database(e)) if is_unique_violation(&e) => {
                    warn!(
                        organization_id = %input.organization_id,
                        attempt,
                        "transaction number collision, retrying"
                    );
                }
                other => return other,
            }
        }
        Err(MovementError::NumberConflict)
    }

    async fn try_apply_movement(
        &self,
        input: &CreateMovementInput,
    ) -> Result<inventory_movements::Model, MovementError> {
        let txn = self.db.begin().await?;

        let type_info =
            find_transaction_type(&txn, input.organization_id, input.transaction_type_id).await?;
        verify_product(&txn, input.organization_id, input.product_id).await?;
        verify_location(&txn, input.organization_id, input.location_id).await?;

        let stock = lock_or_create_stock(
            &txn,
            input.organization_id,
            input.product_id,
            input.location_id,
        )
        .await?;
        let snapshot = StockSnapshot {
            quantity: stock.quantity,
            average_cost: stock.average_cost,
        };

        let prepared =
            MovementService::prepare(&type_info, &snapshot, input.quantity, input.unit_cost)?;

        let movement = insert_movement(
            &txn,
            input.organization_id,
            InsertMovement {
                transaction_type_id: Some(input.transaction_type_id),
                product_id: input.product_id,
                location_id: input.location_id,
                prepared,
                reference_type: input.reference_type.clone(),
                reference_id: input.reference_id,
                notes: input.notes.clone(),
                created_by: input.created_by,
            },
        )
        .await?;

        update_stock(&txn, stock, &prepared).await?;

        txn.commit().await?;
        Ok(movement)
    }

    /// Transfers stock between two locations as one atomic paired movement.
    ///
    /// Emits an outbound leg at the source and an inbound leg at the
    /// destination, linked by a shared reference id. The inbound leg is
    /// costed at the source position's average cost. Both stock rows are
    /// locked in deterministic order so two crossing transfers cannot
    /// deadlock. Either both legs commit or neither does.
    ///
    /// # Errors
    ///
    /// Returns an error on validation failure, missing reference data,
    /// insufficient stock at the source, or numbering exhaustion.
    pub async fn transfer_stock(
        &self,
        input: TransferInput,
    ) -> Result<TransferResult, MovementError> {
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            match self.try_transfer_stock(&input).await {
                Err(MovementError::Database(e)) if is_unique_violation(&e) => {
                    warn!(
                        organization_id = %input.organization_id,
                        attempt,
                        "transaction number collision, retrying transfer"
                    );
                }
                other => return other,
            }
        }
        Err(MovementError::NumberConflict)
    }

    async fn try_transfer_stock(
        &self,
        input: &TransferInput,
    ) -> Result<TransferResult, MovementError> {
        MovementService::validate_transfer(
            input.from_location_id,
            input.to_location_id,
            input.quantity,
        )?;

        let txn = self.db.begin().await?;

        verify_product(&txn, input.organization_id, input.product_id).await?;
        verify_location(&txn, input.organization_id, input.from_location_id).await?;
        verify_location(&txn, input.organization_id, input.to_location_id).await?;

        let out_type =
            find_type_by_category(&txn, input.organization_id, MovementCategory::TransferOut)
                .await?;
        let in_type =
            find_type_by_category(&txn, input.organization_id, MovementCategory::TransferIn)
                .await?;
        // The destination always absorbs the source's average cost into its
        // own, whatever the type's costing flag says.
        let in_type = TransactionTypeInfo {
            affects_cost: true,
            ..in_type
        };

        // Lock both positions in a deterministic order to avoid deadlocks
        // between crossing transfers.
        let mut lock_order = [input.from_location_id, input.to_location_id];
        lock_order.sort();
        let first =
            lock_or_create_stock(&txn, input.organization_id, input.product_id, lock_order[0])
                .await?;
        let second =
            lock_or_create_stock(&txn, input.organization_id, input.product_id, lock_order[1])
                .await?;
        let (source, destination) = if lock_order[0] == input.from_location_id {
            (first, second)
        } else {
            (second, first)
        };

        let unit_cost = source.average_cost;
        let out_prepared = MovementService::prepare(
            &out_type,
            &StockSnapshot {
                quantity: source.quantity,
                average_cost: source.average_cost,
            },
            input.quantity,
            unit_cost,
        )?;
        let in_prepared = MovementService::prepare(
            &in_type,
            &StockSnapshot {
                quantity: destination.quantity,
                average_cost: destination.average_cost,
            },
            input.quantity,
            unit_cost,
        )?;

        let reference_id = Uuid::new_v4();

        let outbound = insert_movement(
            &txn,
            input.organization_id,
            InsertMovement {
                transaction_type_id: Some(out_type.id),
                product_id: input.product_id,
                location_id: input.from_location_id,
                prepared: out_prepared,
                reference_type: Some("transfer".to_string()),
                reference_id: Some(reference_id),
                notes: input.notes.clone(),
                created_by: input.created_by,
            },
        )
        .await?;
        let inbound = insert_movement(
            &txn,
            input.organization_id,
            InsertMovement {
                transaction_type_id: Some(in_type.id),
                product_id: input.product_id,
                location_id: input.to_location_id,
                prepared: in_prepared,
                reference_type: Some("transfer".to_string()),
                reference_id: Some(reference_id),
                notes: input.notes.clone(),
                created_by: input.created_by,
            },
        )
        .await?;

        update_stock(&txn, source, &out_prepared).await?;
        update_stock(&txn, destination, &in_prepared).await?;

        txn.commit().await?;
        Ok(TransferResult {
            reference_id,
            outbound,
            inbound,
        })
    }

    /// Lists stock positions with optional filters, most recently moved first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_stock(
        &self,
        organization_id: Uuid,
        filter: StockFilter,
    ) -> Result<Vec<inventory_stock::Model>, MovementError> {
        let mut query = inventory_stock::Entity::find()
            .filter(inventory_stock::Column::OrganizationId.eq(organization_id));

        if let Some(product_id) = filter.product_id {
            query = query.filter(inventory_stock::Column::ProductId.eq(product_id));
        }
        if let Some(location_id) = filter.location_id {
            query = query.filter(inventory_stock::Column::LocationId.eq(location_id));
        }
        if let Some(zero) = filter.zero_stock {
            query = if zero {
                query.filter(inventory_stock::Column::Quantity.eq(Decimal::ZERO))
            } else {
                query.filter(inventory_stock::Column::Quantity.gt(Decimal::ZERO))
            };
        }

        let positions = query
            .order_by_desc(inventory_stock::Column::UpdatedAt)
            .all(&self.db)
            .await?;
        Ok(positions)
    }

    /// Lists movements with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_movements(
        &self,
        organization_id: Uuid,
        filter: MovementFilter,
    ) -> Result<Vec<inventory_movements::Model>, MovementError> {
        let mut query = inventory_movements::Entity::find()
            .filter(inventory_movements::Column::OrganizationId.eq(organization_id));

        if let Some(product_id) = filter.product_id {
            query = query.filter(inventory_movements::Column::ProductId.eq(product_id));
        }
        if let Some(location_id) = filter.location_id {
            query = query.filter(inventory_movements::Column::LocationId.eq(location_id));
        }
        if let Some(type_id) = filter.transaction_type_id {
            query = query.filter(inventory_movements::Column::TransactionTypeId.eq(type_id));
        }
        if let Some(category) = filter.category {
            let type_ids: Vec<Uuid> = transaction_types::Entity::find()
                .filter(transaction_types::Column::Category.eq(category.as_str()))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect();
            query = query.filter(inventory_movements::Column::TransactionTypeId.is_in(type_ids));
        }
        if let Some(from) = filter.date_from {
            let (start, _) = day_bounds(from);
            query = query.filter(inventory_movements::Column::CreatedAt.gte(start));
        }
        if let Some(to) = filter.date_to {
            let (_, end) = day_bounds(to);
            query = query.filter(inventory_movements::Column::CreatedAt.lt(end));
        }

        let movements = query
            .order_by_desc(inventory_movements::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(movements)
    }

    /// Lists active transaction types visible to the organization
    /// (organization-owned plus system types), ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transaction_types(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<transaction_types::Model>, MovementError> {
        let types = transaction_types::Entity::find()
            .filter(
                Condition::any()
                    .add(transaction_types::Column::OrganizationId.eq(organization_id))
                    .add(transaction_types::Column::IsSystem.eq(true)),
            )
            .filter(transaction_types::Column::IsActive.eq(true))
            .order_by_asc(transaction_types::Column::Name)
            .all(&self.db)
            .await?;
        Ok(types)
    }

    /// Computes the inventory summary for the organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database queries fail.
    pub async fn summary(&self, organization_id: Uuid) -> Result<InventorySummary, MovementError> {
        let total_products = products::Entity::find()
            .filter(products::Column::OrganizationId.eq(organization_id))
            .filter(products::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;

        let total_locations = locations::Entity::find()
            .filter(locations::Column::OrganizationId.eq(organization_id))
            .filter(locations::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;

        let positions = inventory_stock::Entity::find()
            .filter(inventory_stock::Column::OrganizationId.eq(organization_id))
            .all(&self.db)
            .await?;
        let total_stock_value = positions
            .iter()
            .map(|p| p.quantity * p.average_cost)
            .sum();

        Ok(InventorySummary {
            total_products,
            total_locations,
            total_stock_value,
        })
    }

    /// Lists held positions priced at their average cost, most valuable
    /// first. Zero-quantity positions carry no value and are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn valuation(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<ValuationRow>, MovementError> {
        let positions = inventory_stock::Entity::find()
            .filter(inventory_stock::Column::OrganizationId.eq(organization_id))
            .filter(inventory_stock::Column::Quantity.gt(Decimal::ZERO))
            .all(&self.db)
            .await?;
        Ok(valuation_rows(positions))
    }

    /// Lists positions at or below their product's reorder threshold,
    /// lowest quantity first. Products without an active row are excluded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database queries fail.
    pub async fn low_stock(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<LowStockRow>, MovementError> {
        let min_stock_by_product: HashMap<Uuid, Decimal> = products::Entity::find()
            .filter(products::Column::OrganizationId.eq(organization_id))
            .filter(products::Column::IsActive.eq(true))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.min_stock))
            .collect();

        let positions = inventory_stock::Entity::find()
            .filter(inventory_stock::Column::OrganizationId.eq(organization_id))
            .all(&self.db)
            .await?;
        Ok(low_stock_rows(positions, &min_stock_by_product))
    }
}

// ============================================================================
// Transaction-scoped helpers
// ============================================================================

struct InsertMovement {
    transaction_type_id: Option<Uuid>,
    product_id: Uuid,
    location_id: Uuid,
    prepared: bodega_core::inventory::PreparedMovement,
    reference_type: Option<String>,
    reference_id: Option<Uuid>,
    notes: Option<String>,
    created_by: Option<Uuid>,
}

async fn verify_product(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    product_id: Uuid,
) -> Result<products::Model, MovementError> {
    products::Entity::find_by_id(product_id)
        .filter(products::Column::OrganizationId.eq(organization_id))
        .one(txn)
        .await?
        .ok_or(MovementError::ProductNotFound(product_id))
}

async fn verify_location(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    location_id: Uuid,
) -> Result<locations::Model, MovementError> {
    locations::Entity::find_by_id(location_id)
        .filter(locations::Column::OrganizationId.eq(organization_id))
        .one(txn)
        .await?
        .ok_or(MovementError::LocationNotFound(location_id))
}

async fn find_transaction_type(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    type_id: Uuid,
) -> Result<TransactionTypeInfo, MovementError> {
    let row = transaction_types::Entity::find_by_id(type_id)
        .filter(
            Condition::any()
                .add(transaction_types::Column::OrganizationId.eq(organization_id))
                .add(transaction_types::Column::IsSystem.eq(true)),
        )
        .one(txn)
        .await?
        .ok_or(MovementError::TransactionTypeNotFound(type_id))?;

    type_info_from_row(&row)
}

async fn find_type_by_category(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    category: MovementCategory,
) -> Result<TransactionTypeInfo, MovementError> {
    let row = transaction_types::Entity::find()
        .filter(transaction_types::Column::Category.eq(category.as_str()))
        .filter(transaction_types::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(transaction_types::Column::OrganizationId.eq(organization_id))
                .add(transaction_types::Column::IsSystem.eq(true)),
        )
        .one(txn)
        .await?
        .ok_or(MovementError::MissingCategoryType(category.as_str()))?;

    type_info_from_row(&row)
}

fn type_info_from_row(
    row: &transaction_types::Model,
) -> Result<TransactionTypeInfo, MovementError> {
    let category = MovementCategory::parse(&row.category)
        .ok_or_else(|| MovementError::UnknownCategory(row.category.clone()))?;
    Ok(TransactionTypeInfo {
        id: row.id,
        category,
        affects_cost: row.affects_cost,
        is_active: row.is_active,
    })
}

/// Fetches the stock position with a `FOR UPDATE` lock, creating a zeroed
/// row on first movement for the (product, location) pair.
async fn lock_or_create_stock(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    product_id: Uuid,
    location_id: Uuid,
) -> Result<inventory_stock::Model, MovementError> {
    let existing = inventory_stock::Entity::find()
        .filter(inventory_stock::Column::OrganizationId.eq(organization_id))
        .filter(inventory_stock::Column::ProductId.eq(product_id))
        .filter(inventory_stock::Column::LocationId.eq(location_id))
        .lock_exclusive()
        .one(txn)
        .await?;

    if let Some(stock) = existing {
        return Ok(stock);
    }

    let now = Utc::now().into();
    let stock = inventory_stock::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        product_id: Set(product_id),
        location_id: Set(location_id),
        quantity: Set(Decimal::ZERO),
        reserved_quantity: Set(Decimal::ZERO),
        average_cost: Set(Decimal::ZERO),
        last_movement_at: Set(None),
        updated_at: Set(now),
    };
    let inserted = stock.insert(txn).await?;
    Ok(inserted)
}

async fn insert_movement(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    insert: InsertMovement,
) -> Result<inventory_movements::Model, MovementError> {
    let now = Utc::now();
    let today = now.date_naive();

    let (day_start, day_end) = day_bounds(today);
    let count = inventory_movements::Entity::find()
        .filter(inventory_movements::Column::OrganizationId.eq(organization_id))
        .filter(inventory_movements::Column::CreatedAt.gte(day_start))
        .filter(inventory_movements::Column::CreatedAt.lt(day_end))
        .count(txn)
        .await?;
    let transaction_number = format_transaction_number(today, count + 1);

    let movement = inventory_movements::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        transaction_number: Set(transaction_number),
        transaction_type_id: Set(insert.transaction_type_id),
        reference_type: Set(insert.reference_type),
        reference_id: Set(insert.reference_id),
        product_id: Set(insert.product_id),
        location_id: Set(insert.location_id),
        quantity: Set(insert.prepared.signed_quantity),
        unit_cost: Set(insert.prepared.unit_cost),
        balance_before: Set(insert.prepared.balance_before),
        balance_after: Set(insert.prepared.balance_after),
        notes: Set(insert.notes),
        created_by: Set(insert.created_by),
        created_at: Set(now.into()),
    };

    let inserted = movement.insert(txn).await?;
    Ok(inserted)
}

async fn update_stock(
    txn: &DatabaseTransaction,
    stock: inventory_stock::Model,
    prepared: &bodega_core::inventory::PreparedMovement,
) -> Result<(), MovementError> {
    let now = Utc::now().into();
    let mut active: inventory_stock::ActiveModel = stock.into();
    active.quantity = Set(prepared.balance_after);
    active.average_cost = Set(prepared.new_average_cost);
    active.last_movement_at = Set(Some(now));
    active.updated_at = Set(now);
    active.update(txn).await?;
    Ok(())
}

/// Prices each held position at its average cost, most valuable first.
pub(crate) fn valuation_rows(positions: Vec<inventory_stock::Model>) -> Vec<ValuationRow> {
    let mut rows: Vec<ValuationRow> = positions
        .into_iter()
        .filter(|p| p.quantity > Decimal::ZERO)
        .map(|stock| ValuationRow {
            total_value: stock.quantity * stock.average_cost,
            stock,
        })
        .collect();
    rows.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    rows
}

/// Keeps the positions at or below their product's threshold, lowest
/// quantity first. Positions whose product is missing from the map are
/// dropped (inactive products are not worth restocking).
pub(crate) fn low_stock_rows(
    positions: Vec<inventory_stock::Model>,
    min_stock_by_product: &HashMap<Uuid, Decimal>,
) -> Vec<LowStockRow> {
    let mut rows: Vec<LowStockRow> = positions
        .into_iter()
        .filter_map(|stock| {
            let min_stock = *min_stock_by_product.get(&stock.product_id)?;
            (stock.quantity <= min_stock).then(|| LowStockRow { stock, min_stock })
        })
        .collect();
    rows.sort_by(|a, b| a.stock.quantity.cmp(&b.stock.quantity));
    rows
}

/// UTC day window `[start, end)` for a calendar date.
pub(crate) fn day_bounds(
    date: NaiveDate,
) -> (
    chrono::DateTime<chrono::Utc>,
    chrono::DateTime<chrono::Utc>,
) {
    let start = date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    let end = start + chrono::Duration::days(1);
    (start, end)
}

/// Returns true when the error is a unique-constraint violation, the signal
/// that a generated transaction number collided under concurrency.
fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(product_id: Uuid, quantity: Decimal, average_cost: Decimal) -> inventory_stock::Model {
        let now = Utc::now().into();
        inventory_stock::Model {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            product_id,
            location_id: Uuid::new_v4(),
            quantity,
            reserved_quantity: Decimal::ZERO,
            average_cost,
            last_movement_at: Some(now),
            updated_at: now,
        }
    }

    #[test]
    fn test_valuation_prices_and_orders_by_value() {
        let product = Uuid::new_v4();
        let rows = valuation_rows(vec![
            position(product, dec!(10), dec!(2.50)),
            position(product, dec!(3), dec!(100)),
            position(product, dec!(0), dec!(999)),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].total_value, dec!(300));
        assert_eq!(rows[1].total_value, dec!(25));
    }

    #[test]
    fn test_valuation_skips_empty_positions() {
        let rows = valuation_rows(vec![position(Uuid::new_v4(), dec!(0), dec!(5))]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_low_stock_keeps_positions_at_or_below_threshold() {
        let scarce = Uuid::new_v4();
        let boundary = Uuid::new_v4();
        let plenty = Uuid::new_v4();
        let thresholds = HashMap::from([
            (scarce, dec!(10)),
            (boundary, dec!(10)),
            (plenty, dec!(10)),
        ]);

        let rows = low_stock_rows(
            vec![
                position(boundary, dec!(10), dec!(1)),
                position(plenty, dec!(50), dec!(1)),
                position(scarce, dec!(2), dec!(1)),
            ],
            &thresholds,
        );

        assert_eq!(rows.len(), 2);
        // Lowest quantity first.
        assert_eq!(rows[0].stock.product_id, scarce);
        assert_eq!(rows[1].stock.product_id, boundary);
        assert_eq!(rows[1].min_stock, dec!(10));
    }

    #[test]
    fn test_low_stock_drops_products_without_threshold() {
        let rows = low_stock_rows(
            vec![position(Uuid::new_v4(), dec!(0), dec!(1))],
            &HashMap::new(),
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn test_day_bounds_cover_exactly_one_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start.to_rfc3339(), "2024-03-15T00:00:00+00:00");
        assert_eq!(end - start, chrono::Duration::days(1));
    }

    #[test]
    fn test_day_bounds_cross_month() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start.date_naive(), date);
        assert_eq!(
            end.date_naive(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }
}
