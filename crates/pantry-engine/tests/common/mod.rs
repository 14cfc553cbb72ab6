//! Shared test fixtures: an isolated in-memory database per test, plus
//! seed helpers for products and locations.

#![allow(dead_code)]

use pantry_core::{AdjustmentRequest, MovementType, Quantity, DEFAULT_LOCATION_ID};
use pantry_db::{Database, DbConfig, NewProduct};
use pantry_engine::{EngineConfig, InventoryEngine};

/// Engine over a fresh in-memory database with default policy.
pub async fn engine() -> InventoryEngine {
    engine_with(EngineConfig::default()).await
}

/// Engine over a fresh in-memory database with the given policy.
pub async fn engine_with(config: EngineConfig) -> InventoryEngine {
    let db = Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database");
    InventoryEngine::new(db, config)
}

/// Seeds one product, returning its id. Reorder level is in whole units.
pub async fn seed_product(engine: &InventoryEngine, name: &str, reorder_units: i64) -> i64 {
    engine
        .db()
        .products()
        .insert(&NewProduct {
            name: name.to_string(),
            unit: "pcs".to_string(),
            default_reorder_level: units(reorder_units),
        })
        .await
        .expect("seed product")
        .id
}

/// Seeds one location, returning its id. Location 1 ("Main Store") is
/// created by the migrations.
pub async fn seed_location(engine: &InventoryEngine, name: &str) -> i64 {
    engine
        .db()
        .locations()
        .insert(name)
        .await
        .expect("seed location")
}

/// Applies one adjustment and returns nothing; panics on failure. Used to
/// get a product to a known on-hand level.
pub async fn stock_up(engine: &InventoryEngine, product_id: i64, quantity_units: i64) {
    engine
        .adjust_stock(&AdjustmentRequest {
            product_id,
            location_id: None,
            movement_type: MovementType::Adjustment,
            quantity: units(quantity_units),
            reason: Some("seed".to_string()),
            user_id: 1,
            expiry_date: None,
        })
        .await
        .expect("seed adjustment");
}

/// Whole units as a Quantity.
pub fn units(n: i64) -> Quantity {
    Quantity::from_units(n)
}

/// The migration-seeded default location.
pub const MAIN_STORE: i64 = DEFAULT_LOCATION_ID;
