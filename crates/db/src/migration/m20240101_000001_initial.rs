//! Initial database migration.
//!
//! Creates the reference tables, the stock ledger, and the cuadre table
//! with the uniqueness constraints the repositories rely on.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: TENANT + REFERENCE DATA
        // ============================================================
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(LOCATIONS_SQL).await?;
        db.execute_unprepared(TRANSACTION_TYPES_SQL).await?;

        // ============================================================
        // PART 2: STOCK LEDGER
        // ============================================================
        db.execute_unprepared(INVENTORY_STOCK_SQL).await?;
        db.execute_unprepared(INVENTORY_MOVEMENTS_SQL).await?;

        // ============================================================
        // PART 3: CASH RECONCILIATION
        // ============================================================
        db.execute_unprepared(CUADRES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP TABLE IF EXISTS cuadres CASCADE").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS inventory_movements CASCADE")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS inventory_stock CASCADE")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS transaction_types CASCADE")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS locations CASCADE").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS products CASCADE").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS organizations CASCADE")
            .await?;

        Ok(())
    }
}

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    sku VARCHAR(100) NOT NULL,
    name VARCHAR(255) NOT NULL,
    min_stock NUMERIC(15, 4) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (organization_id, sku)
);

CREATE INDEX idx_products_organization ON products(organization_id);
";

const LOCATIONS_SQL: &str = r"
CREATE TABLE locations (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    code VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (organization_id, code)
);

CREATE INDEX idx_locations_organization ON locations(organization_id);
";

const TRANSACTION_TYPES_SQL: &str = r"
CREATE TABLE transaction_types (
    id UUID PRIMARY KEY,
    organization_id UUID REFERENCES organizations(id) ON DELETE CASCADE,
    code VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    category VARCHAR(50) NOT NULL,
    affects_cost BOOLEAN NOT NULL DEFAULT TRUE,
    is_system BOOLEAN NOT NULL DEFAULT FALSE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    UNIQUE (organization_id, code)
);
";

const INVENTORY_STOCK_SQL: &str = r"
CREATE TABLE inventory_stock (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    location_id UUID NOT NULL REFERENCES locations(id) ON DELETE RESTRICT,
    quantity NUMERIC(15, 4) NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    reserved_quantity NUMERIC(15, 4) NOT NULL DEFAULT 0,
    average_cost NUMERIC(15, 4) NOT NULL DEFAULT 0,
    last_movement_at TIMESTAMPTZ,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (organization_id, product_id, location_id)
);
";

const INVENTORY_MOVEMENTS_SQL: &str = r"
CREATE TABLE inventory_movements (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    transaction_number VARCHAR(100) NOT NULL,
    transaction_type_id UUID REFERENCES transaction_types(id),
    reference_type VARCHAR(50),
    reference_id UUID,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    location_id UUID NOT NULL REFERENCES locations(id) ON DELETE RESTRICT,
    quantity NUMERIC(15, 4) NOT NULL,
    unit_cost NUMERIC(15, 4) NOT NULL DEFAULT 0,
    balance_before NUMERIC(15, 4) NOT NULL DEFAULT 0,
    balance_after NUMERIC(15, 4) NOT NULL DEFAULT 0,
    notes TEXT,
    created_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (organization_id, transaction_number)
);

CREATE INDEX idx_inventory_movements_org_created
    ON inventory_movements(organization_id, created_at);
CREATE INDEX idx_inventory_movements_org_product
    ON inventory_movements(organization_id, product_id);
CREATE INDEX idx_inventory_movements_reference
    ON inventory_movements(reference_type, reference_id);
";

const CUADRES_SQL: &str = r"
CREATE TABLE cuadres (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    date DATE NOT NULL,
    opening_balance NUMERIC(15, 4) NOT NULL DEFAULT 0,
    income_cash NUMERIC(15, 4) NOT NULL DEFAULT 0,
    income_transfer NUMERIC(15, 4) NOT NULL DEFAULT 0,
    income_card NUMERIC(15, 4) NOT NULL DEFAULT 0,
    expense_cash NUMERIC(15, 4) NOT NULL DEFAULT 0,
    expense_transfer NUMERIC(15, 4) NOT NULL DEFAULT 0,
    expense_card NUMERIC(15, 4) NOT NULL DEFAULT 0,
    physical_balance NUMERIC(15, 4),
    observations TEXT,
    closed BOOLEAN NOT NULL DEFAULT FALSE,
    created_by UUID,
    closed_by UUID,
    closed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (organization_id, date)
);

CREATE INDEX idx_cuadres_org_closed ON cuadres(organization_id, closed);
";
