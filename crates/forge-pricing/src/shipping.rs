//! # Shipping Allocator
//!
//! Marks a set of sibling line items as "covered" by one primary item's
//! shipping cost.
//!
//! ## Link Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      link(A, [B, C])                                    │
//! │                                                                         │
//! │  Item A (primary)              Items B, C (covered)                    │
//! │  ──────────────────            ─────────────────────                   │
//! │  shipping costs UNTOUCHED      manufacturer shipping costs → 0         │
//! │  linked ids = [B, C]           client shipping prices → 0              │
//! │  note: "covers B, C"           note: "covered by A"                    │
//! │                                                                         │
//! │  A's own shipping figures must already include whatever the            │
//! │  manufacturer charges to ship B and C alongside - the allocator        │
//! │  never adds B/C's former costs onto A.                                 │
//! │                                                                         │
//! │                      link(A, [])  (un-link)                            │
//! │                                                                         │
//! │  A's list and note are cleared. B and C STAY ZEROED: their original   │
//! │  costs were overwritten at link time and restoring them requires      │
//! │  re-entering the figures by hand. The report and a warn! event name   │
//! │  the items left behind - the irreversibility is data, not a silent    │
//! │  surprise.                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rejected Up Front (before any write)
//! - primary covering itself
//! - covered item in a different order
//! - covered item already covered by a different primary
//! - covered item that is itself a covering primary

use serde::Serialize;
use tracing::{info, warn};

use forge_core::LineItem;
use forge_db::Database;

use crate::error::{PricingError, PricingResult};

// =============================================================================
// Report Types
// =============================================================================

/// Pre-zero snapshot of one covered item, captured before its shipping
/// figures are overwritten. This is the only record of what the figures
/// were - the link operation itself is one-way.
#[derive(Debug, Clone, Serialize)]
pub struct CoveredItemSnapshot {
    pub item_id: String,
    pub shipping_air_cost_cents: i64,
    pub shipping_boat_cost_cents: i64,
    pub client_shipping_air_price_cents: i64,
    pub client_shipping_boat_price_cents: i64,
}

impl CoveredItemSnapshot {
    fn of(item: &LineItem) -> Self {
        CoveredItemSnapshot {
            item_id: item.id.clone(),
            shipping_air_cost_cents: item.shipping_air_cost_cents,
            shipping_boat_cost_cents: item.shipping_boat_cost_cents,
            client_shipping_air_price_cents: item.client_shipping_air_price_cents,
            client_shipping_boat_price_cents: item.client_shipping_boat_price_cents,
        }
    }
}

/// Outcome of a link operation.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingLinkReport {
    /// The covering primary.
    pub primary_id: String,

    /// Snapshots of the items zeroed by THIS call, in argument order.
    pub covered: Vec<CoveredItemSnapshot>,

    /// Items that were on the primary's previous list but not the new
    /// one. They remain zeroed - un-linking does not restore shipping
    /// figures.
    pub released_item_ids: Vec<String>,
}

// =============================================================================
// Shipping Allocator
// =============================================================================

/// Links one line item's shipping cost to cover sibling line items.
pub struct ShippingAllocator {
    db: Database,
}

impl ShippingAllocator {
    /// Creates a new ShippingAllocator.
    pub fn new(db: Database) -> Self {
        ShippingAllocator { db }
    }

    /// Links `covered_ids` under `primary_id`'s shipping cost.
    ///
    /// Re-running with identical arguments is idempotent. An empty
    /// `covered_ids` un-links the primary - covered items stay zeroed
    /// (see the module docs for why).
    ///
    /// ## Returns
    /// A [`ShippingLinkReport`] carrying the pre-zero snapshots of every
    /// item zeroed by this call and the ids released (but not restored)
    /// from the previous link.
    pub async fn link(
        &self,
        primary_id: &str,
        covered_ids: &[String],
    ) -> PricingResult<ShippingLinkReport> {
        let items = self.db.line_items();

        let primary = items
            .get_by_id(primary_id)
            .await?
            .ok_or_else(|| PricingError::LineItemNotFound {
                id: primary_id.to_string(),
            })?;

        // Dedupe while preserving argument order; a repeated id is staff
        // double-clicking, not a distinct request.
        let mut requested: Vec<String> = Vec::with_capacity(covered_ids.len());
        for id in covered_ids {
            if !requested.contains(id) {
                requested.push(id.clone());
            }
        }

        // ---- Validation: all of it before any write ----

        if requested.iter().any(|id| id == primary_id) {
            return Err(PricingError::SelfLink {
                id: primary_id.to_string(),
            });
        }

        let siblings = items.list_by_order(&primary.order_id).await?;

        let mut covered_items: Vec<LineItem> = Vec::with_capacity(requested.len());
        for id in &requested {
            match siblings.iter().find(|item| &item.id == id) {
                Some(item) => covered_items.push(item.clone()),
                None => {
                    // Distinguish "wrong order" from "does not exist".
                    return match items.get_by_id(id).await? {
                        Some(_) => Err(PricingError::CrossOrderLink {
                            primary_id: primary_id.to_string(),
                            covered_id: id.clone(),
                        }),
                        None => Err(PricingError::LineItemNotFound { id: id.clone() }),
                    };
                }
            }
        }

        // At most one covering primary per item: reject any requested id
        // already on a DIFFERENT primary's list.
        for sibling in siblings.iter().filter(|s| s.id != primary.id) {
            for id in &requested {
                if sibling.shipping_linked_item_ids.contains(id) {
                    return Err(PricingError::AlreadyCovered {
                        covered_id: id.clone(),
                        primary_id: sibling.id.clone(),
                    });
                }
            }
        }

        // A covered item cannot itself cover others.
        for item in &covered_items {
            if item.is_shipping_primary() {
                return Err(PricingError::NestedLink {
                    covered_id: item.id.clone(),
                });
            }
        }

        // ---- Writes: primary first, then each covered item ----

        let released_item_ids: Vec<String> = primary
            .shipping_linked_item_ids
            .iter()
            .filter(|prev| !requested.contains(prev))
            .cloned()
            .collect();

        let snapshots: Vec<CoveredItemSnapshot> =
            covered_items.iter().map(CoveredItemSnapshot::of).collect();

        let primary_note = if requested.is_empty() {
            None
        } else {
            let names: Vec<&str> = covered_items.iter().map(|i| i.name.as_str()).collect();
            Some(format!("Shipping covers: {}", names.join(", ")))
        };

        items
            .set_shipping_link(&primary.id, &requested, primary_note.as_deref())
            .await?;

        let covered_note = format!("Shipping covered by item {}", primary.id);
        for item in &covered_items {
            items.zero_covered_shipping(&item.id, &covered_note).await?;
        }

        if !released_item_ids.is_empty() {
            // One-way effect: these items keep their zeroed shipping
            // figures until someone re-enters the costs by hand.
            warn!(
                primary_id = %primary.id,
                released = ?released_item_ids,
                "Shipping link released items; their zeroed costs are NOT restored"
            );
        }

        info!(
            primary_id = %primary.id,
            covered = requested.len(),
            released = released_item_ids.len(),
            "Shipping link updated"
        );

        Ok(ShippingLinkReport {
            primary_id: primary.id,
            covered: snapshots,
            released_item_ids,
        })
    }
}
