//! # Recalculation Engine
//!
//! Bulk reapplication of resolution + calculation across a user-chosen
//! subset of an order's line items, grouped by category.
//!
//! ## Per-Category Behavior
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Category          Eligible records          Override column written   │
//! │  ─────────────     ──────────────────────    ───────────────────────   │
//! │  regular products  non-clothing, cost > 0    product_margin_bps_…      │
//! │  clothing          clothing, cost > 0        clothing_fee_cents_…      │
//! │  samples           sample cost > 0           (none exists)             │
//! │  shipping          air or boat cost > 0      shipping_margin_bps_…     │
//! │  accessories       client's accessories,     (none exists)             │
//! │                    unit cost > 0                                       │
//! │                                                                         │
//! │  OVERRIDE RULE: the override column is written with the rate/fee used  │
//! │  only when it differs from the SYSTEM default - otherwise it is        │
//! │  cleared to NULL ("inherited"). Running a recalculation at the         │
//! │  default rate is how staff un-customize a whole order.                 │
//! │                                                                         │
//! │  CUSTOM VALUES: each enabled category may carry custom text typed by   │
//! │  staff for this ONE run. Blank / invalid / zero / out-of-range text    │
//! │  falls back to the resolved default - never to zero.                   │
//! │                                                                         │
//! │  FAILURE MODEL: one write per record, sequential, no transaction.      │
//! │  A failing write is logged and skipped; the loop continues and the     │
//! │  summary reports updated / skipped / failed counts. Partial failure    │
//! │  is never an abort.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{info, warn};

use forge_core::calc::compute_client_price;
use forge_core::input::{parse_custom_fee, parse_custom_percent};
use forge_core::resolver::resolve_rate;
use forge_core::{Accessory, LineItem, PriceCategory, RateOrFee};
use forge_db::Database;

use crate::context::PricingContext;
use crate::error::PricingResult;

// =============================================================================
// Request / Summary Types
// =============================================================================

/// One enabled category in a recalculation request, with the custom
/// rate/fee text staff may have typed for this run.
#[derive(Debug, Clone, Default)]
pub struct CategorySelection {
    /// Raw text from the custom value box. Parsed forgivingly: anything
    /// unusable falls back to the resolved default.
    pub custom_text: Option<String>,
}

impl CategorySelection {
    /// Recalculate at the resolved/system default.
    pub fn use_default() -> Self {
        CategorySelection { custom_text: None }
    }

    /// Recalculate at a custom rate/fee typed for this one run.
    pub fn with_custom(text: impl Into<String>) -> Self {
        CategorySelection {
            custom_text: Some(text.into()),
        }
    }
}

/// Which categories to recalculate. `None` = leave that category's
/// records completely untouched.
#[derive(Debug, Clone, Default)]
pub struct RecalculationRequest {
    pub regular_products: Option<CategorySelection>,
    pub clothing_products: Option<CategorySelection>,
    pub samples: Option<CategorySelection>,
    pub shipping: Option<CategorySelection>,
    pub accessories: Option<CategorySelection>,
}

/// Outcome counts for a recalculation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecalculationSummary {
    /// Records successfully written.
    pub updated: u32,
    /// Eligible-category records skipped for a zero cost basis.
    pub skipped: u32,
    /// Records whose write failed (logged; loop continued).
    pub failed: u32,
}

impl RecalculationSummary {
    fn absorb(&mut self, other: RecalculationSummary) {
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

// =============================================================================
// Recalculation Engine
// =============================================================================

/// Applies fresh resolution + calculation across a chosen subset of an
/// order's line items (and the client's accessories).
pub struct RecalculationEngine {
    db: Database,
}

impl RecalculationEngine {
    /// Creates a new RecalculationEngine.
    pub fn new(db: Database) -> Self {
        RecalculationEngine { db }
    }

    /// Runs a bulk recalculation over `order_id`.
    ///
    /// Fails up front only when the order does not exist; per-record
    /// write failures are absorbed into the summary.
    pub async fn recalculate(
        &self,
        order_id: &str,
        request: &RecalculationRequest,
    ) -> PricingResult<RecalculationSummary> {
        let ctx = PricingContext::load(&self.db, order_id).await?;
        let items = self.db.line_items().list_by_order(order_id).await?;

        info!(
            order_id = %order_id,
            items = items.len(),
            "Starting bulk recalculation"
        );

        let mut summary = RecalculationSummary::default();

        if let Some(selection) = &request.regular_products {
            summary.absorb(self.run_regular_products(&ctx, &items, selection).await);
        }
        if let Some(selection) = &request.clothing_products {
            summary.absorb(self.run_clothing_products(&ctx, &items, selection).await);
        }
        if let Some(selection) = &request.samples {
            summary.absorb(self.run_samples(&ctx, &items, selection).await);
        }
        if let Some(selection) = &request.shipping {
            summary.absorb(self.run_shipping(&ctx, &items, selection).await);
        }
        if let Some(selection) = &request.accessories {
            summary.absorb(self.run_accessories(&ctx, selection).await?);
        }

        info!(
            order_id = %order_id,
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "Bulk recalculation finished"
        );

        Ok(summary)
    }

    /// Regular products: every non-clothing item with a cost gets
    /// `price = cost × (1 + rate)`; the override column carries the rate
    /// only when it diverges from the system default.
    async fn run_regular_products(
        &self,
        ctx: &PricingContext,
        items: &[LineItem],
        selection: &CategorySelection,
    ) -> RecalculationSummary {
        let mut summary = RecalculationSummary::default();

        let system_rate = ctx.system_product_margin();
        let rate = selection
            .custom_text
            .as_deref()
            .and_then(parse_custom_percent)
            .unwrap_or_else(|| {
                resolve_rate(
                    PriceCategory::Product,
                    None,
                    ctx.order_margin.as_ref(),
                    ctx.client.as_ref(),
                    ctx.defaults.as_ref(),
                )
                .as_margin()
                .unwrap_or(system_rate)
            });
        let override_bps = (rate != system_rate).then(|| rate.bps());

        for item in items.iter().filter(|i| !i.is_clothing) {
            if item.cost_cents == 0 {
                summary.skipped += 1;
                continue;
            }

            let price = match compute_client_price(
                item.cost(),
                &RateOrFee::Margin(rate),
                PriceCategory::Product,
            ) {
                Ok(price) => price,
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Product price computation failed; skipping");
                    summary.failed += 1;
                    continue;
                }
            };

            match self
                .db
                .line_items()
                .update_product_pricing(&item.id, price.cents(), override_bps)
                .await
            {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Product price write failed; continuing");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Clothing products: every clothing item with a cost gets
    /// `price = cost + fee` (additive). Override rule as above, against
    /// the system clothing fee.
    async fn run_clothing_products(
        &self,
        ctx: &PricingContext,
        items: &[LineItem],
        selection: &CategorySelection,
    ) -> RecalculationSummary {
        let mut summary = RecalculationSummary::default();

        let system_fee = ctx.system_clothing_fee();
        let fee = selection
            .custom_text
            .as_deref()
            .and_then(parse_custom_fee)
            .unwrap_or(system_fee);
        let override_fee = (fee != system_fee).then(|| fee.cents());

        for item in items.iter().filter(|i| i.is_clothing) {
            if item.cost_cents == 0 {
                summary.skipped += 1;
                continue;
            }

            let price = match compute_client_price(
                item.cost(),
                &RateOrFee::Fee(fee),
                PriceCategory::Clothing,
            ) {
                Ok(price) => price,
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Clothing price computation failed; skipping");
                    summary.failed += 1;
                    continue;
                }
            };

            match self
                .db
                .line_items()
                .update_clothing_pricing(&item.id, price.cents(), override_fee)
                .await
            {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Clothing price write failed; continuing");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Samples: every item with a sample cost gets its client sample fee
    /// recomputed. No override column exists at the item/order layer for
    /// sample margin, so only the fee is written.
    async fn run_samples(
        &self,
        ctx: &PricingContext,
        items: &[LineItem],
        selection: &CategorySelection,
    ) -> RecalculationSummary {
        let mut summary = RecalculationSummary::default();

        let rate = selection
            .custom_text
            .as_deref()
            .and_then(parse_custom_percent)
            .unwrap_or_else(|| {
                resolve_rate(
                    PriceCategory::Sample,
                    None,
                    None,
                    ctx.client.as_ref(),
                    ctx.defaults.as_ref(),
                )
                .as_margin()
                .unwrap_or_else(|| ctx.system_sample_margin())
            });

        for item in items {
            if item.sample_cost_cents == 0 {
                continue;
            }

            let fee = match compute_client_price(
                item.sample_cost(),
                &RateOrFee::Margin(rate),
                PriceCategory::Sample,
            ) {
                Ok(fee) => fee,
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Sample fee computation failed; skipping");
                    summary.failed += 1;
                    continue;
                }
            };

            match self
                .db
                .line_items()
                .update_sample_fee(&item.id, fee.cents())
                .await
            {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Sample fee write failed; continuing");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Shipping: every item with an air or boat cost gets both client
    /// shipping prices recomputed. Override rule as for product margin.
    ///
    /// Items covered by a shipping link have zeroed costs, so they fall
    /// out of eligibility naturally.
    async fn run_shipping(
        &self,
        ctx: &PricingContext,
        items: &[LineItem],
        selection: &CategorySelection,
    ) -> RecalculationSummary {
        let mut summary = RecalculationSummary::default();

        let system_rate = ctx.system_shipping_margin();
        let rate = selection
            .custom_text
            .as_deref()
            .and_then(parse_custom_percent)
            .unwrap_or_else(|| {
                resolve_rate(
                    PriceCategory::Shipping,
                    None,
                    ctx.order_margin.as_ref(),
                    ctx.client.as_ref(),
                    ctx.defaults.as_ref(),
                )
                .as_margin()
                .unwrap_or(system_rate)
            });
        let override_bps = (rate != system_rate).then(|| rate.bps());

        for item in items {
            if !item.has_shipping_cost() {
                continue;
            }

            let air = compute_client_price(
                item.shipping_air_cost(),
                &RateOrFee::Margin(rate),
                PriceCategory::Shipping,
            );
            let boat = compute_client_price(
                item.shipping_boat_cost(),
                &RateOrFee::Margin(rate),
                PriceCategory::Shipping,
            );

            let (air, boat) = match (air, boat) {
                (Ok(air), Ok(boat)) => (air, boat),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(item_id = %item.id, error = %e, "Shipping price computation failed; skipping");
                    summary.failed += 1;
                    continue;
                }
            };

            match self
                .db
                .line_items()
                .update_shipping_pricing(&item.id, air.cents(), boat.cents(), override_bps)
                .await
            {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Shipping price write failed; continuing");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Accessories: the one category that mutates a different entity
    /// type. Every accessory in the order's client inventory (narrowed to
    /// the order's manufacturer when set) gets its client unit cost
    /// re-derived from the manufacturer unit cost.
    async fn run_accessories(
        &self,
        ctx: &PricingContext,
        selection: &CategorySelection,
    ) -> PricingResult<RecalculationSummary> {
        let mut summary = RecalculationSummary::default();

        let rate = selection
            .custom_text
            .as_deref()
            .and_then(parse_custom_percent)
            .unwrap_or_else(|| {
                // Accessory has no item/order/client layers; the chain is
                // system (or safety) only.
                resolve_rate(PriceCategory::Accessory, None, None, None, ctx.defaults.as_ref())
                    .as_margin()
                    .unwrap_or_else(|| ctx.system_accessory_margin())
            });

        let accessories: Vec<Accessory> = self
            .db
            .accessories()
            .list_for_client(&ctx.order.client_id, ctx.order.manufacturer_id.as_deref())
            .await?;

        for accessory in &accessories {
            if accessory.manufacturer_unit_cost_cents == 0 {
                summary.skipped += 1;
                continue;
            }

            let price = match compute_client_price(
                accessory.manufacturer_unit_cost(),
                &RateOrFee::Margin(rate),
                PriceCategory::Accessory,
            ) {
                Ok(price) => price,
                Err(e) => {
                    warn!(accessory_id = %accessory.id, error = %e, "Accessory price computation failed; skipping");
                    summary.failed += 1;
                    continue;
                }
            };

            match self
                .db
                .accessories()
                .update_client_unit_cost(&accessory.id, price.cents())
                .await
            {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    warn!(accessory_id = %accessory.id, error = %e, "Accessory write failed; continuing");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
