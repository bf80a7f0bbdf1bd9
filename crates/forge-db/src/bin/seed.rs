//! # Seed Data Generator
//!
//! Populates the database with development data: pricing defaults, a
//! client override, orders with line items, and accessory inventory.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults
//! cargo run -p forge-db --bin seed
//!
//! # Generate a custom number of orders
//! cargo run -p forge-db --bin seed -- --orders 20
//!
//! # Specify database path
//! cargo run -p forge-db --bin seed -- --db ./data/forge.db
//! ```
//!
//! ## Generated Data
//! - The system pricing defaults row (80/5/80/100%, $5.00 clothing fee)
//! - One client ("client-acme") with a 60% product margin override
//! - One client ("client-borealis") with no override row at all
//! - Orders alternating between the two clients, each with a mix of
//!   regular, clothing, sampled, and shipped line items
//! - A small accessory inventory per client

use chrono::Utc;
use std::env;
use uuid::Uuid;

use forge_core::{Accessory, LineItem, Order};
use forge_db::{Database, DbConfig};

/// Item name pool for generated line items.
const ITEM_NAMES: &[(&str, bool)] = &[
    ("Enamel Mug", false),
    ("Canvas Tote", false),
    ("Embroidered Hoodie", true),
    ("Logo T-Shirt", true),
    ("Steel Water Bottle", false),
    ("Snapback Cap", true),
    ("Sticker Sheet", false),
    ("Desk Mat", false),
];

/// Accessory name pool.
const ACCESSORY_NAMES: &[&str] = &[
    "Hang Tag",
    "Poly Bag",
    "Woven Label",
    "Gift Box",
    "Tissue Paper",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut order_count: usize = 6;
    let mut db_path = String::from("./forge_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--orders" | "-o" => {
                if i + 1 < args.len() {
                    order_count = args[i + 1].parse().unwrap_or(6);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Forge Orders Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --orders <N>   Number of orders to generate (default: 6)");
                println!("  -d, --db <PATH>    Database file path (default: ./forge_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Forge Orders Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Orders:   {}", order_count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");

    let (total, applied) = forge_db::migrations::migration_status(db.pool()).await?;
    println!("✓ Migrations applied ({}/{})", applied, total);

    // Skip if already seeded
    if db.pricing_defaults().get().await?.is_some() {
        println!("⚠ Database already has pricing defaults");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // System defaults: 80% product, 5% shipping, 80% sample,
    // 100% accessory, $5.00 clothing fee
    db.pricing_defaults()
        .upsert(8000, 500, 8000, 10_000, 500)
        .await?;
    println!("✓ Pricing defaults");

    // One client with a product margin override, one without any row
    let clients = ["client-acme", "client-borealis"];
    db.client_overrides()
        .upsert("client-acme", Some(6000), None, None)
        .await?;
    println!("✓ Client override for client-acme (product 60%)");

    // Orders with line items
    let mut generated_items = 0;
    for n in 0..order_count {
        let client_id = clients[n % clients.len()];
        let order = generate_order(client_id, n);

        db.orders().insert(&order).await?;

        for (k, (name, is_clothing)) in ITEM_NAMES.iter().enumerate().take(4) {
            let item = generate_line_item(&order.id, name, *is_clothing, n * 10 + k);

            if let Err(e) = db.line_items().insert(&item).await {
                eprintln!("Failed to insert {}: {}", item.name, e);
                continue;
            }

            generated_items += 1;
        }
    }
    println!("✓ Generated {} orders, {} line items", order_count, generated_items);

    // Accessory inventory per client
    let mut generated_accessories = 0;
    for (c, client_id) in clients.iter().enumerate() {
        for (k, name) in ACCESSORY_NAMES.iter().enumerate() {
            let accessory = generate_accessory(client_id, name, c * 10 + k);

            if let Err(e) = db.accessories().insert(&accessory).await {
                eprintln!("Failed to insert {}: {}", accessory.name, e);
                continue;
            }

            generated_accessories += 1;
        }
    }
    println!("✓ Generated {} accessories", generated_accessories);

    println!();
    println!("✓ Seed complete!");

    db.close().await;

    Ok(())
}

/// Generates a single order.
fn generate_order(client_id: &str, seq: usize) -> Order {
    Order {
        id: Uuid::new_v4().to_string(),
        client_id: client_id.to_string(),
        manufacturer_id: if seq % 2 == 0 {
            Some("mfr-shenzhen-textiles".to_string())
        } else {
            None
        },
        reference: format!("FO-{:04}", 1000 + seq),
        created_at: Utc::now(),
    }
}

/// Generates a single line item with deterministic pseudo-varied costs.
fn generate_line_item(order_id: &str, name: &str, is_clothing: bool, seed: usize) -> LineItem {
    let now = Utc::now();

    // Cost: $4.00 - $36.00, varied by seed
    let cost_cents = 400 + ((seed * 37) % 3200) as i64;

    // Roughly half the items carry shipping costs, a third carry samples
    let shipping_air = if seed % 2 == 0 { 200 + (seed % 5) as i64 * 50 } else { 0 };
    let shipping_boat = if seed % 2 == 0 { 80 + (seed % 5) as i64 * 20 } else { 0 };
    let sample_cost = if seed % 3 == 0 { 300 } else { 0 };

    LineItem {
        id: Uuid::new_v4().to_string(),
        order_id: order_id.to_string(),
        name: name.to_string(),
        is_clothing,
        cost_cents,
        shipping_air_cost_cents: shipping_air,
        shipping_boat_cost_cents: shipping_boat,
        sample_cost_cents: sample_cost,
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

/// Generates a single accessory.
fn generate_accessory(client_id: &str, name: &str, seed: usize) -> Accessory {
    let now = Utc::now();

    // Unit cost: $0.20 - $2.20
    let unit_cost = 20 + ((seed * 13) % 200) as i64;

    Accessory {
        id: Uuid::new_v4().to_string(),
        client_id: client_id.to_string(),
        manufacturer_id: if seed % 2 == 0 {
            Some("mfr-shenzhen-textiles".to_string())
        } else {
            None
        },
        name: name.to_string(),
        manufacturer_unit_cost_cents: unit_cost,
        client_unit_cost_cents: 0,
        created_at: now,
        updated_at: now,
    }
}
