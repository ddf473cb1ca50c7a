//! Database seeder for Bodega development and testing.
//!
//! Seeds a demo organization, a product, two locations, and one system
//! transaction type per movement category.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use bodega_core::inventory::MovementCategory;
use bodega_db::entities::{locations, organizations, products, transaction_types};

/// Demo organization ID (consistent for all seeds)
const DEMO_ORG_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo product ID
const DEMO_PRODUCT_ID: &str = "00000000-0000-0000-0000-000000000010";
/// Demo location IDs
const DEMO_MAIN_LOCATION_ID: &str = "00000000-0000-0000-0000-000000000020";
const DEMO_BACKROOM_LOCATION_ID: &str = "00000000-0000-0000-0000-000000000021";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = bodega_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding demo organization...");
    seed_organization(&db).await?;

    println!("Seeding demo product...");
    seed_product(&db).await?;

    println!("Seeding demo locations...");
    seed_locations(&db).await?;

    println!("Seeding system transaction types...");
    seed_transaction_types(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

fn demo_org_id() -> anyhow::Result<Uuid> {
    Uuid::parse_str(DEMO_ORG_ID).context("bad demo org id")
}

async fn seed_organization(db: &DatabaseConnection) -> anyhow::Result<()> {
    let id = demo_org_id()?;
    if organizations::Entity::find_by_id(id).one(db).await?.is_some() {
        println!("  Demo organization already exists, skipping...");
        return Ok(());
    }

    let now = Utc::now().into();
    let org = organizations::ActiveModel {
        id: Set(id),
        name: Set("Demo Bodega".to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    org.insert(db).await?;
    println!("  Created demo organization: Demo Bodega");
    Ok(())
}

async fn seed_product(db: &DatabaseConnection) -> anyhow::Result<()> {
    let id = Uuid::parse_str(DEMO_PRODUCT_ID)?;
    if products::Entity::find_by_id(id).one(db).await?.is_some() {
        println!("  Demo product already exists, skipping...");
        return Ok(());
    }

    let now = Utc::now().into();
    let product = products::ActiveModel {
        id: Set(id),
        organization_id: Set(demo_org_id()?),
        sku: Set("DEMO-001".to_string()),
        name: Set("Demo Product".to_string()),
        min_stock: Set(Decimal::from(10u32)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    product.insert(db).await?;
    println!("  Created demo product: DEMO-001");
    Ok(())
}

async fn seed_locations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let org_id = demo_org_id()?;
    let specs = [
        (DEMO_MAIN_LOCATION_ID, "MAIN", "Main Store"),
        (DEMO_BACKROOM_LOCATION_ID, "BACK", "Backroom"),
    ];

    for (raw_id, code, name) in specs {
        let id = Uuid::parse_str(raw_id)?;
        if locations::Entity::find_by_id(id).one(db).await?.is_some() {
            println!("  Location {code} already exists, skipping...");
            continue;
        }

        let now = Utc::now().into();
        let location = locations::ActiveModel {
            id: Set(id),
            organization_id: Set(org_id),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        location.insert(db).await?;
        println!("  Created location: {code}");
    }
    Ok(())
}

/// One system type per category so movements and transfers work out of
/// the box. System types are visible to every organization.
async fn seed_transaction_types(db: &DatabaseConnection) -> anyhow::Result<()> {
    let specs = [
        (MovementCategory::In, "PURCHASE", "Purchase Receipt", true),
        (MovementCategory::Out, "SALE", "Sale", false),
        (
            MovementCategory::AdjustmentIn,
            "ADJ-IN",
            "Adjustment In",
            false,
        ),
        (
            MovementCategory::AdjustmentOut,
            "ADJ-OUT",
            "Adjustment Out",
            false,
        ),
        (
            MovementCategory::TransferIn,
            "TRF-IN",
            "Transfer In",
            true,
        ),
        (
            MovementCategory::TransferOut,
            "TRF-OUT",
            "Transfer Out",
            false,
        ),
    ];

    for (category, code, name, affects_cost) in specs {
        let existing = transaction_types::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .any(|t| t.is_system && t.code == code);
        if existing {
            println!("  System type {code} already exists, skipping...");
            continue;
        }

        let tt = transaction_types::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(None),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            category: Set(category.as_str().to_string()),
            affects_cost: Set(affects_cost),
            is_system: Set(true),
            is_active: Set(true),
        };
        tt.insert(db).await?;
        println!("  Created system type: {code}");
    }
    Ok(())
}
