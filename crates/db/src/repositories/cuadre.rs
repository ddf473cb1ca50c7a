//! Cuadre repository for cash reconciliation database operations.
//!
//! One record per (organization, date), enforced both by a pre-check and by
//! the unique index. Derived figures (calculated balance, difference) are
//! computed from the stored columns at read time.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use bodega_core::cuadre::{
    ChannelTotals, ClosedBalances, CuadreError, CuadreService, DenominationCounts,
};

use crate::entities::cuadres;

/// Error types for cuadre operations.
#[derive(Debug, thiserror::Error)]
pub enum CuadreRepoError {
    /// Cuadre not found or not owned by the organization.
    #[error("Cuadre not found: {0}")]
    NotFound(Uuid),

    /// A cuadre already exists for the date.
    #[error("A cuadre already exists for {0}")]
    DuplicateDate(NaiveDate),

    /// Rejected by reconciliation rules.
    #[error(transparent)]
    Invalid(#[from] CuadreError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating (and closing) a day's cuadre.
#[derive(Debug, Clone)]
pub struct CreateCuadreInput {
    /// Organization the cuadre belongs to.
    pub organization_id: Uuid,
    /// Calendar date being reconciled.
    pub date: NaiveDate,
    /// Cash on hand at the start of the day.
    pub opening_balance: Decimal,
    /// Income per payment channel.
    pub income: ChannelTotals,
    /// Expenses per payment channel.
    pub expense: ChannelTotals,
    /// Denomination breakdown of the physical count, when one was done.
    pub denomination_counts: Option<DenominationCounts>,
    /// Client-reported counted total, cross-checked against the breakdown.
    pub reported_physical: Option<Decimal>,
    /// Free-form observations.
    pub observations: Option<String>,
    /// Acting user.
    pub created_by: Option<Uuid>,
}

/// Partial update of an open cuadre. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCuadreInput {
    /// New opening balance.
    pub opening_balance: Option<Decimal>,
    /// New income totals.
    pub income: Option<ChannelTotals>,
    /// New expense totals.
    pub expense: Option<ChannelTotals>,
    /// New denomination breakdown; re-verified against `reported_physical`.
    pub denomination_counts: Option<DenominationCounts>,
    /// Client-reported counted total for the new breakdown.
    pub reported_physical: Option<Decimal>,
    /// Observations: `None` leaves them untouched, `Some(None)` clears them,
    /// `Some(Some(text))` replaces them.
    pub observations: Option<Option<String>>,
    /// When true, closes the cuadre; closing is terminal.
    pub close: bool,
    /// Acting user, stamped as closer when `close` is set.
    pub actor: Option<Uuid>,
}

/// A cuadre together with its derived figures.
#[derive(Debug, Clone)]
pub struct CuadreWithDerived {
    /// The stored record.
    pub cuadre: cuadres::Model,
    /// Opening plus income minus expenses.
    pub calculated_balance: Decimal,
    /// Physical minus calculated, when a count exists.
    pub difference: Option<Decimal>,
}

/// Income and expense totals of a date's cuadre. Zeros when no cuadre
/// exists for the date.
#[derive(Debug, Clone)]
pub struct DayStats {
    /// The date queried.
    pub date: NaiveDate,
    /// Total income across all channels.
    pub income_total: Decimal,
    /// Total expenses across all channels.
    pub expense_total: Decimal,
    /// Income minus expenses.
    pub net: Decimal,
    /// Whether a cuadre exists for that date.
    pub has_cuadre: bool,
}

/// Cuadre repository for reconciliation records.
#[derive(Debug, Clone)]
pub struct CuadreRepository {
    db: DatabaseConnection,
}

impl CuadreRepository {
    /// Creates a new cuadre repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Suggested opening balance for the next cuadre: the most recent
    /// closed record's physical count, falling back to its calculated
    /// balance, or zero when no history exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn opening_balance(&self, organization_id: Uuid) -> Result<Decimal, CuadreRepoError> {
        let last_closed = cuadres::Entity::find()
            .filter(cuadres::Column::OrganizationId.eq(organization_id))
            .filter(cuadres::Column::Closed.eq(true))
            .order_by_desc(cuadres::Column::Date)
            .one(&self.db)
            .await?;

        let balances = last_closed.map(|c| ClosedBalances {
            physical: c.physical_balance,
            calculated: calculated_balance(&c),
        });
        Ok(CuadreService::opening_balance(balances))
    }

    /// Creates a cuadre for the date and closes it in the same statement.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDate` if the organization already has a cuadre for
    /// the date, or a validation error on negative amounts or a counted
    /// total that disagrees with its denomination breakdown.
    pub async fn create(
        &self,
        input: CreateCuadreInput,
    ) -> Result<CuadreWithDerived, CuadreRepoError> {
        CuadreService::validate_amounts(input.opening_balance, &input.income, &input.expense)?;

        let physical = resolve_physical(
            input.denomination_counts.as_ref(),
            input.reported_physical,
        )?;

        let existing = cuadres::Entity::find()
            .filter(cuadres::Column::OrganizationId.eq(input.organization_id))
            .filter(cuadres::Column::Date.eq(input.date))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CuadreRepoError::DuplicateDate(input.date));
        }

        let now = Utc::now();
        let model = cuadres::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(input.organization_id),
            date: Set(input.date),
            opening_balance: Set(input.opening_balance),
            income_cash: Set(input.income.cash),
            income_transfer: Set(input.income.transfer),
            income_card: Set(input.income.card),
            expense_cash: Set(input.expense.cash),
            expense_transfer: Set(input.expense.transfer),
            expense_card: Set(input.expense.card),
            physical_balance: Set(physical),
            observations: Set(input.observations),
            closed: Set(true),
            created_by: Set(input.created_by),
            closed_by: Set(input.created_by),
            closed_at: Set(Some(now.into())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        // The unique index backstops the pre-check under concurrency.
        let inserted = match model.insert(&self.db).await {
            Ok(inserted) => inserted,
            Err(e) if is_unique_violation(&e) => {
                return Err(CuadreRepoError::DuplicateDate(input.date));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(with_derived(inserted))
    }

    /// Finds a cuadre by id, scoped to the organization.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such cuadre exists in the organization.
    pub async fn find_by_id(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<CuadreWithDerived, CuadreRepoError> {
        let cuadre = cuadres::Entity::find_by_id(id)
            .filter(cuadres::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(CuadreRepoError::NotFound(id))?;
        Ok(with_derived(cuadre))
    }

    /// Finds the cuadre for a date, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_date(
        &self,
        organization_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<CuadreWithDerived>, CuadreRepoError> {
        let cuadre = cuadres::Entity::find()
            .filter(cuadres::Column::OrganizationId.eq(organization_id))
            .filter(cuadres::Column::Date.eq(date))
            .one(&self.db)
            .await?;
        Ok(cuadre.map(with_derived))
    }

    /// Lists the most recent cuadres, newest date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(
        &self,
        organization_id: Uuid,
        limit: u64,
    ) -> Result<Vec<CuadreWithDerived>, CuadreRepoError> {
        let records = cuadres::Entity::find()
            .filter(cuadres::Column::OrganizationId.eq(organization_id))
            .order_by_desc(cuadres::Column::Date)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(records.into_iter().map(with_derived).collect())
    }

    /// Updates an open cuadre. Closed records are immutable.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing or cross-tenant id, `AlreadyClosed`
    /// for a closed record, or a validation error on bad amounts.
    pub async fn update(
        &self,
        organization_id: Uuid,
        id: Uuid,
        input: UpdateCuadreInput,
    ) -> Result<CuadreWithDerived, CuadreRepoError> {
        let cuadre = cuadres::Entity::find_by_id(id)
            .filter(cuadres::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(CuadreRepoError::NotFound(id))?;

        CuadreService::validate_can_modify(cuadre.closed)?;

        let opening = input.opening_balance.unwrap_or(cuadre.opening_balance);
        let income = input.income.unwrap_or_else(|| channel_income(&cuadre));
        let expense = input.expense.unwrap_or_else(|| channel_expense(&cuadre));
        CuadreService::validate_amounts(opening, &income, &expense)?;

        let physical = match (&input.denomination_counts, input.reported_physical) {
            (None, None) => cuadre.physical_balance,
            (counts, reported) => resolve_physical(counts.as_ref(), reported)?,
        };

        let now = Utc::now();
        let mut active: cuadres::ActiveModel = cuadre.into();
        active.opening_balance = Set(opening);
        active.income_cash = Set(income.cash);
        active.income_transfer = Set(income.transfer);
        active.income_card = Set(income.card);
        active.expense_cash = Set(expense.cash);
        active.expense_transfer = Set(expense.transfer);
        active.expense_card = Set(expense.card);
        active.physical_balance = Set(physical);
        if let Some(observations) = input.observations {
            active.observations = Set(observations);
        }
        if input.close {
            active.closed = Set(true);
            active.closed_by = Set(input.actor);
            active.closed_at = Set(Some(now.into()));
        }
        active.updated_at = Set(now.into());

        let updated = active.update(&self.db).await?;
        Ok(with_derived(updated))
    }

    /// Deletes an open cuadre. Closed records cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing or cross-tenant id, or
    /// `AlreadyClosed` for a closed record.
    pub async fn delete(&self, organization_id: Uuid, id: Uuid) -> Result<(), CuadreRepoError> {
        let cuadre = cuadres::Entity::find_by_id(id)
            .filter(cuadres::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(CuadreRepoError::NotFound(id))?;

        CuadreService::validate_can_delete(cuadre.closed)?;

        cuadres::Entity::delete_by_id(cuadre.id).exec(&self.db).await?;
        Ok(())
    }

    /// Returns true when the date has no cuadre yet and one may be created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn validate_date(
        &self,
        organization_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, CuadreRepoError> {
        let existing = cuadres::Entity::find()
            .filter(cuadres::Column::OrganizationId.eq(organization_id))
            .filter(cuadres::Column::Date.eq(date))
            .count(&self.db)
            .await?;
        Ok(existing == 0)
    }

    /// Income and expense totals for a date's cuadre, zeros when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn day_stats(
        &self,
        organization_id: Uuid,
        date: NaiveDate,
    ) -> Result<DayStats, CuadreRepoError> {
        let cuadre = cuadres::Entity::find()
            .filter(cuadres::Column::OrganizationId.eq(organization_id))
            .filter(cuadres::Column::Date.eq(date))
            .one(&self.db)
            .await?;

        Ok(cuadre.map_or(
            DayStats {
                date,
                income_total: Decimal::ZERO,
                expense_total: Decimal::ZERO,
                net: Decimal::ZERO,
                has_cuadre: false,
            },
            |c| {
                let income_total = channel_income(&c).sum();
                let expense_total = channel_expense(&c).sum();
                DayStats {
                    date,
                    income_total,
                    expense_total,
                    net: income_total - expense_total,
                    has_cuadre: true,
                }
            },
        ))
    }
}

// ============================================================================
// Derivation helpers
// ============================================================================

/// Income channel totals from a stored record.
#[must_use]
pub fn channel_income(cuadre: &cuadres::Model) -> ChannelTotals {
    ChannelTotals {
        cash: cuadre.income_cash,
        transfer: cuadre.income_transfer,
        card: cuadre.income_card,
    }
}

/// Expense channel totals from a stored record.
#[must_use]
pub fn channel_expense(cuadre: &cuadres::Model) -> ChannelTotals {
    ChannelTotals {
        cash: cuadre.expense_cash,
        transfer: cuadre.expense_transfer,
        card: cuadre.expense_card,
    }
}

/// Expected balance derived from the stored columns.
#[must_use]
pub fn calculated_balance(cuadre: &cuadres::Model) -> Decimal {
    CuadreService::calculated_balance(
        cuadre.opening_balance,
        &channel_income(cuadre),
        &channel_expense(cuadre),
    )
}

fn with_derived(cuadre: cuadres::Model) -> CuadreWithDerived {
    let calculated = calculated_balance(&cuadre);
    let difference = CuadreService::difference(cuadre.physical_balance, calculated);
    CuadreWithDerived {
        cuadre,
        calculated_balance: calculated,
        difference,
    }
}

/// Resolves the physical balance from the client's breakdown and reported
/// total. A breakdown without a reported total is taken at its computed
/// value; a reported total without a breakdown is rejected outright.
fn resolve_physical(
    counts: Option<&DenominationCounts>,
    reported: Option<Decimal>,
) -> Result<Option<Decimal>, CuadreError> {
    match (counts, reported) {
        (None, None) => Ok(None),
        (Some(counts), None) => Ok(Some(CuadreService::physical_balance(counts))),
        (Some(counts), Some(reported)) => {
            Ok(Some(CuadreService::verify_reported_total(counts, reported)?))
        }
        (None, Some(_)) => Err(CuadreError::MissingBreakdown),
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_core::cuadre::{BillCounts, CoinCounts};
    use rust_decimal_macros::dec;

    fn sample_model() -> cuadres::Model {
        let now = Utc::now().into();
        cuadres::Model {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            opening_balance: dec!(1000),
            income_cash: dec!(500),
            income_transfer: dec!(200),
            income_card: dec!(100),
            expense_cash: dec!(150),
            expense_transfer: dec!(50),
            expense_card: dec!(0),
            physical_balance: Some(dec!(1595.50)),
            observations: None,
            closed: false,
            created_by: None,
            closed_by: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_calculated_balance_from_model() {
        let model = sample_model();
        assert_eq!(calculated_balance(&model), dec!(1600));
    }

    #[test]
    fn test_derived_difference() {
        let derived = with_derived(sample_model());
        assert_eq!(derived.calculated_balance, dec!(1600));
        assert_eq!(derived.difference, Some(dec!(-4.50)));
    }

    #[test]
    fn test_derived_difference_absent_without_count() {
        let mut model = sample_model();
        model.physical_balance = None;
        let derived = with_derived(model);
        assert_eq!(derived.difference, None);
    }

    #[test]
    fn test_resolve_physical_from_breakdown_alone() {
        let counts = DenominationCounts {
            bills: BillCounts {
                twenties: 10,
                ..BillCounts::default()
            },
            coins: CoinCounts::default(),
        };
        assert_eq!(resolve_physical(Some(&counts), None), Ok(Some(dec!(200))));
    }

    #[test]
    fn test_resolve_physical_rejects_mismatched_report() {
        let counts = DenominationCounts {
            bills: BillCounts {
                twenties: 10,
                ..BillCounts::default()
            },
            coins: CoinCounts::default(),
        };
        assert!(resolve_physical(Some(&counts), Some(dec!(199))).is_err());
        assert_eq!(
            resolve_physical(Some(&counts), Some(dec!(200))),
            Ok(Some(dec!(200)))
        );
    }

    #[test]
    fn test_resolve_physical_report_without_breakdown() {
        assert_eq!(
            resolve_physical(None, Some(dec!(0))),
            Err(CuadreError::MissingBreakdown)
        );
        assert_eq!(
            resolve_physical(None, Some(dec!(50))),
            Err(CuadreError::MissingBreakdown)
        );
        assert_eq!(resolve_physical(None, None), Ok(None));
    }
}
