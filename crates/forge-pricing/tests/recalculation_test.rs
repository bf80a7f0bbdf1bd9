//! Bulk recalculation: category scoping, override write/clear semantics,
//! custom-value fallback, and partial-failure tolerance.

mod common;

use common::*;
use forge_pricing::{CategorySelection, RecalculationEngine, RecalculationRequest};

/// Regular products recalculate at the system default; zero-cost items
/// are skipped without error.
#[tokio::test]
async fn regular_products_at_system_default() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let mut a = new_item(&order.id, "Mug");
    a.cost_cents = 1000; // $10.00
    insert_item(&db, &a).await;

    let mut b = new_item(&order.id, "Tote");
    b.cost_cents = 2000; // $20.00
    insert_item(&db, &b).await;

    let c = new_item(&order.id, "No cost yet"); // cost 0
    insert_item(&db, &c).await;

    let engine = RecalculationEngine::new(db.clone());
    let request = RecalculationRequest {
        regular_products: Some(CategorySelection::use_default()),
        ..Default::default()
    };
    let summary = engine.recalculate(&order.id, &request).await.unwrap();

    assert_eq!(summary.updated, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);

    let a = fetch_item(&db, &a.id).await;
    assert_eq!(a.client_product_price_cents, 1800); // $10.00 × 1.80
    assert_eq!(a.product_margin_bps_override, None); // at default → inherited

    let b = fetch_item(&db, &b.id).await;
    assert_eq!(b.client_product_price_cents, 3600);

    let c = fetch_item(&db, &c.id).await;
    assert_eq!(c.client_product_price_cents, 0); // untouched
}

/// A custom rate that diverges from the system default is persisted as
/// the item-level override.
#[tokio::test]
async fn custom_rate_writes_override() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let mut item = new_item(&order.id, "Mug");
    item.cost_cents = 1000;
    insert_item(&db, &item).await;

    let engine = RecalculationEngine::new(db.clone());
    let request = RecalculationRequest {
        regular_products: Some(CategorySelection::with_custom("90")),
        ..Default::default()
    };
    engine.recalculate(&order.id, &request).await.unwrap();

    let item = fetch_item(&db, &item.id).await;
    assert_eq!(item.client_product_price_cents, 1900); // $10.00 × 1.90
    assert_eq!(item.product_margin_bps_override, Some(9000));
}

/// Recalculating at exactly the system default clears a previously
/// persisted override back to NULL ("inherited").
#[tokio::test]
async fn recalc_at_default_clears_override() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let mut item = new_item(&order.id, "Mug");
    item.cost_cents = 1000;
    item.product_margin_bps_override = Some(9000);
    item.client_product_price_cents = 1900;
    insert_item(&db, &item).await;

    let engine = RecalculationEngine::new(db.clone());
    let request = RecalculationRequest {
        regular_products: Some(CategorySelection::with_custom("80")),
        ..Default::default()
    };
    engine.recalculate(&order.id, &request).await.unwrap();

    let item = fetch_item(&db, &item.id).await;
    assert_eq!(item.client_product_price_cents, 1800);
    assert_eq!(item.product_margin_bps_override, None);
}

/// Custom text of "0" or garbage falls back to the system default -
/// never to a zero rate.
#[tokio::test]
async fn custom_zero_or_garbage_falls_back_to_default() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let mut item = new_item(&order.id, "Mug");
    item.cost_cents = 1000;
    insert_item(&db, &item).await;

    let engine = RecalculationEngine::new(db.clone());

    for bad_text in ["0", "abc", "  ", "-10", "9999"] {
        let request = RecalculationRequest {
            regular_products: Some(CategorySelection::with_custom(bad_text)),
            ..Default::default()
        };
        engine.recalculate(&order.id, &request).await.unwrap();

        let fetched = fetch_item(&db, &item.id).await;
        assert_eq!(
            fetched.client_product_price_cents, 1800,
            "custom text {:?} must fall back to the 80% default",
            bad_text
        );
        assert_eq!(fetched.product_margin_bps_override, None);
    }
}

/// The clothing pass prices additively and tracks its own override.
#[tokio::test]
async fn clothing_pass_is_additive() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let mut hoodie = new_item(&order.id, "Hoodie");
    hoodie.is_clothing = true;
    hoodie.cost_cents = 1500; // $15.00
    insert_item(&db, &hoodie).await;

    let mut mug = new_item(&order.id, "Mug");
    mug.cost_cents = 1000;
    insert_item(&db, &mug).await;

    let engine = RecalculationEngine::new(db.clone());

    // Default fee: $15.00 + $5.00 = $20.00, no override persisted
    let request = RecalculationRequest {
        clothing_products: Some(CategorySelection::use_default()),
        ..Default::default()
    };
    let summary = engine.recalculate(&order.id, &request).await.unwrap();
    assert_eq!(summary.updated, 1); // the mug is not clothing

    let fetched = fetch_item(&db, &hoodie.id).await;
    assert_eq!(fetched.client_product_price_cents, 2000);
    assert_eq!(fetched.clothing_fee_cents_override, None);

    // Custom fee: $15.00 + $7.50 = $22.50, override persisted
    let request = RecalculationRequest {
        clothing_products: Some(CategorySelection::with_custom("7.50")),
        ..Default::default()
    };
    engine.recalculate(&order.id, &request).await.unwrap();

    let fetched = fetch_item(&db, &hoodie.id).await;
    assert_eq!(fetched.client_product_price_cents, 2250);
    assert_eq!(fetched.clothing_fee_cents_override, Some(750));

    // The regular item was never touched by clothing passes
    let mug = fetch_item(&db, &mug.id).await;
    assert_eq!(mug.client_product_price_cents, 0);
}

/// The samples pass resolves client → system (no item/order layer) and
/// persists no override column.
#[tokio::test]
async fn samples_pass_uses_client_layer() {
    let db = test_db().await;
    seed_defaults(&db).await;
    db.client_overrides()
        .upsert("client-acme", None, None, Some(7000))
        .await
        .unwrap();
    let order = create_order(&db, "client-acme", None).await;

    let mut item = new_item(&order.id, "Mug");
    item.sample_cost_cents = 300; // $3.00
    insert_item(&db, &item).await;

    let no_sample = new_item(&order.id, "Tote");
    insert_item(&db, &no_sample).await;

    let engine = RecalculationEngine::new(db.clone());
    let request = RecalculationRequest {
        samples: Some(CategorySelection::use_default()),
        ..Default::default()
    };
    let summary = engine.recalculate(&order.id, &request).await.unwrap();

    assert_eq!(summary.updated, 1);

    let item = fetch_item(&db, &item.id).await;
    // $3.00 at the client's 70% sample margin
    assert_eq!(item.client_sample_fee_cents, 510);
}

/// Selecting only shipping must never mutate product prices or clothing
/// overrides on any item.
#[tokio::test]
async fn shipping_only_touches_shipping_fields() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let mut hoodie = new_item(&order.id, "Hoodie");
    hoodie.is_clothing = true;
    hoodie.cost_cents = 1500;
    hoodie.client_product_price_cents = 2000;
    hoodie.clothing_fee_cents_override = Some(700);
    hoodie.shipping_air_cost_cents = 5000; // $50.00
    hoodie.shipping_boat_cost_cents = 1000; // $10.00
    insert_item(&db, &hoodie).await;

    let engine = RecalculationEngine::new(db.clone());
    let request = RecalculationRequest {
        shipping: Some(CategorySelection::use_default()),
        ..Default::default()
    };
    let summary = engine.recalculate(&order.id, &request).await.unwrap();
    assert_eq!(summary.updated, 1);

    let fetched = fetch_item(&db, &hoodie.id).await;
    // Shipping recomputed at 5%
    assert_eq!(fetched.client_shipping_air_price_cents, 5250);
    assert_eq!(fetched.client_shipping_boat_price_cents, 1050);
    assert_eq!(fetched.shipping_margin_bps_override, None);
    // Product-side fields untouched
    assert_eq!(fetched.client_product_price_cents, 2000);
    assert_eq!(fetched.clothing_fee_cents_override, Some(700));
}

/// One failing write out of N leaves the other N-1 updated and reports
/// N-1 - never an exception that discards all progress.
#[tokio::test]
async fn partial_failure_updates_the_rest() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let mut a = new_item(&order.id, "Mug");
    a.cost_cents = 1000;
    insert_item(&db, &a).await;

    let mut b = new_item(&order.id, "Tote");
    b.cost_cents = 2000;
    insert_item(&db, &b).await;

    let mut c = new_item(&order.id, "Bottle");
    c.cost_cents = 3000;
    insert_item(&db, &c).await;

    // Any UPDATE of item b now aborts at the SQLite level.
    install_update_failure(&db, &b.id).await;

    let engine = RecalculationEngine::new(db.clone());
    let request = RecalculationRequest {
        regular_products: Some(CategorySelection::use_default()),
        ..Default::default()
    };
    let summary = engine.recalculate(&order.id, &request).await.unwrap();

    assert_eq!(summary.updated, 2);
    assert_eq!(summary.failed, 1);

    assert_eq!(fetch_item(&db, &a.id).await.client_product_price_cents, 1800);
    assert_eq!(fetch_item(&db, &b.id).await.client_product_price_cents, 0); // failed write
    assert_eq!(fetch_item(&db, &c.id).await.client_product_price_cents, 5400);
}

/// Accessories recalculate against a different entity type, scoped to
/// the order's client and manufacturer.
#[tokio::test]
async fn accessories_scope_to_client_and_manufacturer() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-acme", Some("mfr-east")).await;

    let mut matching = new_accessory("client-acme", "Hang Tag", 200); // $2.00
    matching.manufacturer_id = Some("mfr-east".to_string());
    insert_accessory(&db, &matching).await;

    let mut other_mfr = new_accessory("client-acme", "Poly Bag", 100);
    other_mfr.manufacturer_id = Some("mfr-west".to_string());
    insert_accessory(&db, &other_mfr).await;

    let other_client = new_accessory("client-borealis", "Gift Box", 300);
    insert_accessory(&db, &other_client).await;

    let engine = RecalculationEngine::new(db.clone());
    let request = RecalculationRequest {
        accessories: Some(CategorySelection::use_default()),
        ..Default::default()
    };
    let summary = engine.recalculate(&order.id, &request).await.unwrap();

    assert_eq!(summary.updated, 1);

    // $2.00 at 100% accessory margin = $4.00
    let matching = db.accessories().get_by_id(&matching.id).await.unwrap().unwrap();
    assert_eq!(matching.client_unit_cost_cents, 400);

    // Out-of-scope records untouched
    let other_mfr = db.accessories().get_by_id(&other_mfr.id).await.unwrap().unwrap();
    assert_eq!(other_mfr.client_unit_cost_cents, 0);
    let other_client = db
        .accessories()
        .get_by_id(&other_client.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(other_client.client_unit_cost_cents, 0);
}

/// An unknown order is rejected up front.
#[tokio::test]
async fn unknown_order_is_rejected() {
    let db = test_db().await;
    seed_defaults(&db).await;

    let engine = RecalculationEngine::new(db.clone());
    let request = RecalculationRequest {
        regular_products: Some(CategorySelection::use_default()),
        ..Default::default()
    };
    let result = engine.recalculate("no-such-order", &request).await;

    assert!(matches!(
        result,
        Err(forge_pricing::PricingError::OrderNotFound { .. })
    ));
}
