//! Shipping links: zero-the-covered semantics, idempotency, one-way
//! unlink, and the up-front conflict rejections.

mod common;

use common::*;
use forge_pricing::{PricingError, ShippingAllocator};

/// Linking zeroes the covered items' shipping figures and leaves the
/// primary untouched; re-running the same link is idempotent.
#[tokio::test]
async fn link_zeroes_covered_and_leaves_primary() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let mut a = new_item(&order.id, "Pallet A");
    a.shipping_air_cost_cents = 5000;
    a.shipping_boat_cost_cents = 2000;
    a.client_shipping_air_price_cents = 5250;
    a.client_shipping_boat_price_cents = 2100;
    insert_item(&db, &a).await;

    let mut b = new_item(&order.id, "Box B");
    b.shipping_air_cost_cents = 800;
    b.shipping_boat_cost_cents = 300;
    b.client_shipping_air_price_cents = 840;
    b.client_shipping_boat_price_cents = 315;
    insert_item(&db, &b).await;

    let mut c = new_item(&order.id, "Box C");
    c.shipping_air_cost_cents = 600;
    c.client_shipping_air_price_cents = 630;
    insert_item(&db, &c).await;

    let allocator = ShippingAllocator::new(db.clone());
    let covered = vec![b.id.clone(), c.id.clone()];
    let report = allocator.link(&a.id, &covered).await.unwrap();

    // The report snapshots the figures as they were before zeroing.
    assert_eq!(report.covered.len(), 2);
    assert_eq!(report.covered[0].shipping_air_cost_cents, 800);
    assert_eq!(report.covered[0].client_shipping_air_price_cents, 840);
    assert!(report.released_item_ids.is_empty());

    // Covered items: costs and prices zeroed, note names the primary.
    let b_after = fetch_item(&db, &b.id).await;
    assert_eq!(b_after.shipping_air_cost_cents, 0);
    assert_eq!(b_after.shipping_boat_cost_cents, 0);
    assert_eq!(b_after.client_shipping_air_price_cents, 0);
    assert_eq!(b_after.client_shipping_boat_price_cents, 0);
    let note = b_after.shipping_link_note.clone().unwrap();
    assert!(note.contains(&a.id));

    // Primary: untouched shipping figures, carries the linked ids.
    let a_after = fetch_item(&db, &a.id).await;
    assert_eq!(a_after.shipping_air_cost_cents, 5000);
    assert_eq!(a_after.client_shipping_air_price_cents, 5250);
    assert_eq!(a_after.shipping_linked_item_ids, covered);
    assert!(a_after.shipping_link_note.is_some());

    // Idempotent: same call, same end state.
    allocator.link(&a.id, &covered).await.unwrap();

    let b_again = fetch_item(&db, &b.id).await;
    assert_eq!(b_again.client_shipping_air_price_cents, 0);
    let a_again = fetch_item(&db, &a.id).await;
    assert_eq!(a_again.shipping_air_cost_cents, 5000);
    assert_eq!(a_again.shipping_linked_item_ids, covered);
}

/// Un-linking clears the primary but does NOT restore the covered items'
/// zeroed figures - the known one-way operation, surfaced in the report.
#[tokio::test]
async fn unlink_is_one_way() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let mut a = new_item(&order.id, "Pallet A");
    a.shipping_air_cost_cents = 5000;
    insert_item(&db, &a).await;

    let mut b = new_item(&order.id, "Box B");
    b.shipping_air_cost_cents = 800;
    b.client_shipping_air_price_cents = 840;
    insert_item(&db, &b).await;

    let allocator = ShippingAllocator::new(db.clone());
    allocator.link(&a.id, &[b.id.clone()]).await.unwrap();

    let report = allocator.link(&a.id, &[]).await.unwrap();
    assert_eq!(report.released_item_ids, vec![b.id.clone()]);
    assert!(report.covered.is_empty());

    // Primary cleared.
    let a_after = fetch_item(&db, &a.id).await;
    assert!(a_after.shipping_linked_item_ids.is_empty());
    assert!(a_after.shipping_link_note.is_none());

    // Covered item stays zeroed; its costs must be re-entered by hand.
    let b_after = fetch_item(&db, &b.id).await;
    assert_eq!(b_after.shipping_air_cost_cents, 0);
    assert_eq!(b_after.client_shipping_air_price_cents, 0);
}

/// Narrowing a link releases the dropped items without restoring them.
#[tokio::test]
async fn relink_subset_releases_the_rest() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let a = new_item(&order.id, "Pallet A");
    insert_item(&db, &a).await;

    let mut b = new_item(&order.id, "Box B");
    b.shipping_air_cost_cents = 800;
    insert_item(&db, &b).await;

    let mut c = new_item(&order.id, "Box C");
    c.shipping_air_cost_cents = 600;
    insert_item(&db, &c).await;

    let allocator = ShippingAllocator::new(db.clone());
    allocator
        .link(&a.id, &[b.id.clone(), c.id.clone()])
        .await
        .unwrap();

    let report = allocator.link(&a.id, &[b.id.clone()]).await.unwrap();
    assert_eq!(report.released_item_ids, vec![c.id.clone()]);

    let a_after = fetch_item(&db, &a.id).await;
    assert_eq!(a_after.shipping_linked_item_ids, vec![b.id.clone()]);

    // C released but still zeroed.
    let c_after = fetch_item(&db, &c.id).await;
    assert_eq!(c_after.shipping_air_cost_cents, 0);
}

/// A primary cannot cover itself.
#[tokio::test]
async fn self_link_is_rejected() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let mut a = new_item(&order.id, "Pallet A");
    a.shipping_air_cost_cents = 5000;
    insert_item(&db, &a).await;

    let allocator = ShippingAllocator::new(db.clone());
    let result = allocator.link(&a.id, &[a.id.clone()]).await;
    assert!(matches!(result, Err(PricingError::SelfLink { .. })));

    // Nothing was written.
    let a_after = fetch_item(&db, &a.id).await;
    assert!(a_after.shipping_linked_item_ids.is_empty());
    assert_eq!(a_after.shipping_air_cost_cents, 5000);
}

/// At most one covering primary per item.
#[tokio::test]
async fn double_cover_is_rejected() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let a = new_item(&order.id, "Pallet A");
    insert_item(&db, &a).await;
    let mut b = new_item(&order.id, "Box B");
    b.shipping_air_cost_cents = 800;
    insert_item(&db, &b).await;
    let d = new_item(&order.id, "Pallet D");
    insert_item(&db, &d).await;

    let allocator = ShippingAllocator::new(db.clone());
    allocator.link(&a.id, &[b.id.clone()]).await.unwrap();

    let result = allocator.link(&d.id, &[b.id.clone()]).await;
    assert!(matches!(result, Err(PricingError::AlreadyCovered { .. })));
}

/// A covering primary cannot itself be covered.
#[tokio::test]
async fn nested_link_is_rejected() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;

    let a = new_item(&order.id, "Pallet A");
    insert_item(&db, &a).await;
    let mut b = new_item(&order.id, "Box B");
    b.shipping_air_cost_cents = 800;
    insert_item(&db, &b).await;
    let d = new_item(&order.id, "Pallet D");
    insert_item(&db, &d).await;

    let allocator = ShippingAllocator::new(db.clone());
    allocator.link(&a.id, &[b.id.clone()]).await.unwrap();

    let result = allocator.link(&d.id, &[a.id.clone()]).await;
    assert!(matches!(result, Err(PricingError::NestedLink { .. })));
}

/// Covered items must belong to the primary's order, and must exist.
#[tokio::test]
async fn cross_order_and_unknown_ids_are_rejected() {
    let db = test_db().await;
    seed_defaults(&db).await;
    let order = create_order(&db, "client-borealis", None).await;
    let other_order = create_order(&db, "client-borealis", None).await;

    let a = new_item(&order.id, "Pallet A");
    insert_item(&db, &a).await;
    let stranger = new_item(&other_order.id, "Stranger");
    insert_item(&db, &stranger).await;

    let allocator = ShippingAllocator::new(db.clone());

    let result = allocator.link(&a.id, &[stranger.id.clone()]).await;
    assert!(matches!(result, Err(PricingError::CrossOrderLink { .. })));

    let result = allocator.link(&a.id, &["no-such-item".to_string()]).await;
    assert!(matches!(result, Err(PricingError::LineItemNotFound { .. })));

    let result = allocator.link("no-such-primary", &[]).await;
    assert!(matches!(result, Err(PricingError::LineItemNotFound { .. })));
}
