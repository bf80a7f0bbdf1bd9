//! Shared fixtures for the pricing engine integration tests.
//!
//! Every suite runs against a fresh in-memory SQLite database with the
//! real migrations applied - no mock layer between the engine and the
//! rows it mutates.

#![allow(dead_code)]

use chrono::Utc;
use uuid::Uuid;

use forge_core::{Accessory, LineItem, Order};
use forge_db::{Database, DbConfig};

/// Standard system defaults used across the suites:
/// product 80%, shipping 5%, sample 80%, accessory 100%, clothing fee $5.00.
pub const DEFAULT_PRODUCT_BPS: u32 = 8000;
pub const DEFAULT_SHIPPING_BPS: u32 = 500;
pub const DEFAULT_SAMPLE_BPS: u32 = 8000;
pub const DEFAULT_ACCESSORY_BPS: u32 = 10_000;
pub const DEFAULT_CLOTHING_FEE_CENTS: i64 = 500;

/// Opens a fresh in-memory database with migrations applied.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Seeds the standard system defaults row.
pub async fn seed_defaults(db: &Database) {
    db.pricing_defaults()
        .upsert(
            DEFAULT_PRODUCT_BPS,
            DEFAULT_SHIPPING_BPS,
            DEFAULT_SAMPLE_BPS,
            DEFAULT_ACCESSORY_BPS,
            DEFAULT_CLOTHING_FEE_CENTS,
        )
        .await
        .expect("seed defaults");
}

/// Creates and inserts an order.
pub async fn create_order(
    db: &Database,
    client_id: &str,
    manufacturer_id: Option<&str>,
) -> Order {
    let order = Order {
        id: Uuid::new_v4().to_string(),
        client_id: client_id.to_string(),
        manufacturer_id: manufacturer_id.map(str::to_string),
        reference: format!("FO-{}", &Uuid::new_v4().to_string()[..8]),
        created_at: Utc::now(),
    };
    db.orders().insert(&order).await.expect("insert order");
    order
}

/// Builds a line item with every pricing field zeroed. Tests mutate the
/// fields they care about before inserting.
pub fn new_item(order_id: &str, name: &str) -> LineItem {
    let now = Utc::now();
    LineItem {
        id: Uuid::new_v4().to_string(),
        order_id: order_id.to_string(),
        name: name.to_string(),
        is_clothing: false,
        cost_cents: 0,
        shipping_air_cost_cents: 0,
        shipping_boat_cost_cents: 0,
        sample_cost_cents: 0,
        product_margin_bps_override: None,
        shipping_margin_bps_override: None,
        clothing_fee_cents_override: None,
        client_product_price_cents: 0,
        client_shipping_air_price_cents: 0,
        client_shipping_boat_price_cents: 0,
        client_sample_fee_cents: 0,
        shipping_linked_item_ids: Vec::new(),
        shipping_link_note: None,
        created_at: now,
        updated_at: now,
    }
}

/// Inserts a line item.
pub async fn insert_item(db: &Database, item: &LineItem) {
    db.line_items().insert(item).await.expect("insert line item");
}

/// Re-reads a line item by id.
pub async fn fetch_item(db: &Database, id: &str) -> LineItem {
    db.line_items()
        .get_by_id(id)
        .await
        .expect("fetch line item")
        .expect("line item exists")
}

/// Builds an accessory with the given unit cost.
pub fn new_accessory(client_id: &str, name: &str, unit_cost_cents: i64) -> Accessory {
    let now = Utc::now();
    Accessory {
        id: Uuid::new_v4().to_string(),
        client_id: client_id.to_string(),
        manufacturer_id: None,
        name: name.to_string(),
        manufacturer_unit_cost_cents: unit_cost_cents,
        client_unit_cost_cents: 0,
        created_at: now,
        updated_at: now,
    }
}

/// Inserts an accessory.
pub async fn insert_accessory(db: &Database, accessory: &Accessory) {
    db.accessories()
        .insert(accessory)
        .await
        .expect("insert accessory");
}

/// Installs a SQLite trigger that aborts any UPDATE of the given line
/// item - a real failing write for partial-failure tests, with no mock
/// layer.
pub async fn install_update_failure(db: &Database, item_id: &str) {
    let sql = format!(
        "CREATE TRIGGER fail_update_{name} BEFORE UPDATE ON line_items \
         WHEN NEW.id = '{id}' \
         BEGIN SELECT RAISE(ABORT, 'injected write failure'); END;",
        name = item_id.replace('-', "_"),
        id = item_id
    );
    sqlx::query(&sql)
        .execute(db.pool())
        .await
        .expect("install failure trigger");
}
