//! # Price Propagator
//!
//! The three non-bulk write paths of the pricing lifecycle. All of them
//! price through the same resolver + calculator pair the bulk engine
//! uses - there is exactly one margin routine in this system.
//!
//! ## The Three Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. MANUFACTURER SUBMITS COSTS          apply_manufacturer_costs        │
//! │     cost figures land ──► every client price recomputed from the       │
//! │     CURRENT resolution. Overrides are read, never written.             │
//! │                                                                         │
//! │  2. STAFF EDITS ORDER MARGINS           apply_order_margin              │
//! │     order_margins row upserted (created lazily on first edit) ──►      │
//! │     every line item recomputed EXCEPT items carrying an item-level     │
//! │     override for that category - customized prices stay put.          │
//! │                                                                         │
//! │  3. STAFF EDITS ONE ITEM'S OVERRIDE     apply_item_override             │
//! │     one item-level override set or cleared ──► only that item's        │
//! │     affected category recomputed; its other categories keep their      │
//! │     current rates and prices. Clearing (None) re-resolves through      │
//! │     the remaining layers.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A category whose cost basis is zero is left untouched on every path:
//! no compute, no error, the stored price stays as it was.

use tracing::{info, warn};

use forge_core::calc::compute_client_price;
use forge_core::resolver::resolve_rate;
use forge_core::validation::{validate_cost_cents, validate_fee_cents, validate_margin_bps};
use forge_core::{LineItem, PriceCategory};
use forge_db::Database;

use crate::context::PricingContext;
use crate::error::{PricingError, PricingResult};

// =============================================================================
// Input Types
// =============================================================================

/// The cost figures a manufacturer submits for one line item.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManufacturerCosts {
    pub cost_cents: i64,
    pub shipping_air_cost_cents: i64,
    pub shipping_boat_cost_cents: i64,
    pub sample_cost_cents: i64,
}

/// One item-level override edit: `Some` sets a value that diverges from
/// inherited defaults, `None` clears back to "inherited".
#[derive(Debug, Clone, Copy)]
pub enum ItemOverride {
    /// Product margin override in bps (non-clothing items only).
    ProductMargin(Option<u32>),
    /// Shipping margin override in bps.
    ShippingMargin(Option<u32>),
    /// Clothing fee override in cents (clothing items only).
    ClothingFee(Option<i64>),
}

// =============================================================================
// Price Propagator
// =============================================================================

/// Propagates cost and margin edits into computed client prices.
pub struct PricePropagator {
    db: Database,
}

impl PricePropagator {
    /// Creates a new PricePropagator.
    pub fn new(db: Database) -> Self {
        PricePropagator { db }
    }

    /// Manufacturer cost submission: writes the cost figures, then
    /// recomputes every client price from the current resolution.
    ///
    /// Returns the refreshed line item.
    pub async fn apply_manufacturer_costs(
        &self,
        item_id: &str,
        costs: ManufacturerCosts,
    ) -> PricingResult<LineItem> {
        validate_cost_cents(costs.cost_cents)?;
        validate_cost_cents(costs.shipping_air_cost_cents)?;
        validate_cost_cents(costs.shipping_boat_cost_cents)?;
        validate_cost_cents(costs.sample_cost_cents)?;

        let item = self.fetch_item(item_id).await?;
        let ctx = PricingContext::load(&self.db, &item.order_id).await?;

        self.db
            .line_items()
            .set_manufacturer_costs(
                item_id,
                costs.cost_cents,
                costs.shipping_air_cost_cents,
                costs.shipping_boat_cost_cents,
                costs.sample_cost_cents,
            )
            .await?;

        // Recompute on the post-write figures.
        let mut updated = item;
        updated.cost_cents = costs.cost_cents;
        updated.shipping_air_cost_cents = costs.shipping_air_cost_cents;
        updated.shipping_boat_cost_cents = costs.shipping_boat_cost_cents;
        updated.sample_cost_cents = costs.sample_cost_cents;

        let product_price = if updated.cost_cents != 0 {
            let category = if updated.is_clothing {
                PriceCategory::Clothing
            } else {
                PriceCategory::Product
            };
            let resolution = resolve_rate(
                category,
                Some(&updated),
                ctx.order_margin.as_ref(),
                ctx.client.as_ref(),
                ctx.defaults.as_ref(),
            );
            compute_client_price(updated.cost(), &resolution.value, category)?.cents()
        } else {
            updated.client_product_price_cents
        };

        let (air_price, boat_price) = if updated.has_shipping_cost() {
            let resolution = resolve_rate(
                PriceCategory::Shipping,
                Some(&updated),
                ctx.order_margin.as_ref(),
                ctx.client.as_ref(),
                ctx.defaults.as_ref(),
            );
            let air = compute_client_price(
                updated.shipping_air_cost(),
                &resolution.value,
                PriceCategory::Shipping,
            )?;
            let boat = compute_client_price(
                updated.shipping_boat_cost(),
                &resolution.value,
                PriceCategory::Shipping,
            )?;
            (air.cents(), boat.cents())
        } else {
            (
                updated.client_shipping_air_price_cents,
                updated.client_shipping_boat_price_cents,
            )
        };

        let sample_fee = if updated.sample_cost_cents != 0 {
            let resolution = resolve_rate(
                PriceCategory::Sample,
                Some(&updated),
                ctx.order_margin.as_ref(),
                ctx.client.as_ref(),
                ctx.defaults.as_ref(),
            );
            compute_client_price(
                updated.sample_cost(),
                &resolution.value,
                PriceCategory::Sample,
            )?
            .cents()
        } else {
            updated.client_sample_fee_cents
        };

        self.db
            .line_items()
            .update_computed_prices(item_id, product_price, air_price, boat_price, sample_fee)
            .await?;

        info!(item_id = %item_id, "Manufacturer costs applied and prices recomputed");

        self.fetch_item(item_id).await
    }

    /// Order-level margin edit: upserts the order's margin row (created
    /// lazily on the first edit), then recomputes both affected
    /// categories on every line item EXCEPT items carrying their own
    /// item-level override for that category.
    ///
    /// `None` clears an order-level override: affected items re-resolve
    /// through client/system.
    ///
    /// Returns the number of line item price updates performed. Failing
    /// writes are logged and skipped, matching the bulk engine's model.
    pub async fn apply_order_margin(
        &self,
        order_id: &str,
        product_margin_bps: Option<u32>,
        shipping_margin_bps: Option<u32>,
    ) -> PricingResult<u32> {
        if let Some(bps) = product_margin_bps {
            validate_margin_bps(bps)?;
        }
        if let Some(bps) = shipping_margin_bps {
            validate_margin_bps(bps)?;
        }

        let mut ctx = PricingContext::load(&self.db, order_id).await?;

        let margin = self
            .db
            .order_margins()
            .upsert(order_id, product_margin_bps, shipping_margin_bps)
            .await?;
        ctx.order_margin = Some(margin);

        let items = self.db.line_items().list_by_order(order_id).await?;
        let mut recomputed = 0u32;

        // Product margins: non-clothing items not customized at item level.
        for item in items
            .iter()
            .filter(|i| !i.is_clothing && i.product_margin_bps_override.is_none())
        {
            if item.cost_cents == 0 {
                continue;
            }

            let resolution = resolve_rate(
                PriceCategory::Product,
                Some(item),
                ctx.order_margin.as_ref(),
                ctx.client.as_ref(),
                ctx.defaults.as_ref(),
            );
            let price = match compute_client_price(item.cost(), &resolution.value, PriceCategory::Product)
            {
                Ok(price) => price,
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Product recompute failed; continuing");
                    continue;
                }
            };

            match self
                .db
                .line_items()
                .update_product_pricing(&item.id, price.cents(), None)
                .await
            {
                Ok(()) => recomputed += 1,
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Product recompute write failed; continuing")
                }
            }
        }

        // Shipping margins: items not customized at item level.
        for item in items
            .iter()
            .filter(|i| i.shipping_margin_bps_override.is_none())
        {
            if !item.has_shipping_cost() {
                continue;
            }

            let resolution = resolve_rate(
                PriceCategory::Shipping,
                Some(item),
                ctx.order_margin.as_ref(),
                ctx.client.as_ref(),
                ctx.defaults.as_ref(),
            );
            let air = compute_client_price(
                item.shipping_air_cost(),
                &resolution.value,
                PriceCategory::Shipping,
            );
            let boat = compute_client_price(
                item.shipping_boat_cost(),
                &resolution.value,
                PriceCategory::Shipping,
            );
            let (air, boat) = match (air, boat) {
                (Ok(air), Ok(boat)) => (air, boat),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(item_id = %item.id, error = %e, "Shipping recompute failed; continuing");
                    continue;
                }
            };

            match self
                .db
                .line_items()
                .update_shipping_pricing(&item.id, air.cents(), boat.cents(), None)
                .await
            {
                Ok(()) => recomputed += 1,
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Shipping recompute write failed; continuing")
                }
            }
        }

        info!(
            order_id = %order_id,
            recomputed,
            "Order margin edit propagated"
        );

        Ok(recomputed)
    }

    /// Item-level override edit: sets or clears ONE override on ONE item
    /// and recomputes only that item's affected category. The item's
    /// other categories keep their current rates and prices.
    ///
    /// Returns the refreshed line item.
    pub async fn apply_item_override(
        &self,
        item_id: &str,
        item_override: ItemOverride,
    ) -> PricingResult<LineItem> {
        let item = self.fetch_item(item_id).await?;
        let ctx = PricingContext::load(&self.db, &item.order_id).await?;

        match item_override {
            ItemOverride::ProductMargin(bps) => {
                if item.is_clothing {
                    return Err(PricingError::OverrideNotApplicable {
                        item_id: item_id.to_string(),
                        category: PriceCategory::Product.to_string(),
                    });
                }
                if let Some(bps) = bps {
                    validate_margin_bps(bps)?;
                }

                let mut updated = item;
                updated.product_margin_bps_override = bps;

                let price = if updated.cost_cents != 0 {
                    let resolution = resolve_rate(
                        PriceCategory::Product,
                        Some(&updated),
                        ctx.order_margin.as_ref(),
                        ctx.client.as_ref(),
                        ctx.defaults.as_ref(),
                    );
                    compute_client_price(updated.cost(), &resolution.value, PriceCategory::Product)?
                        .cents()
                } else {
                    updated.client_product_price_cents
                };

                self.db
                    .line_items()
                    .update_product_pricing(item_id, price, bps)
                    .await?;
            }

            ItemOverride::ShippingMargin(bps) => {
                if let Some(bps) = bps {
                    validate_margin_bps(bps)?;
                }

                let mut updated = item;
                updated.shipping_margin_bps_override = bps;

                let (air, boat) = if updated.has_shipping_cost() {
                    let resolution = resolve_rate(
                        PriceCategory::Shipping,
                        Some(&updated),
                        ctx.order_margin.as_ref(),
                        ctx.client.as_ref(),
                        ctx.defaults.as_ref(),
                    );
                    let air = compute_client_price(
                        updated.shipping_air_cost(),
                        &resolution.value,
                        PriceCategory::Shipping,
                    )?;
                    let boat = compute_client_price(
                        updated.shipping_boat_cost(),
                        &resolution.value,
                        PriceCategory::Shipping,
                    )?;
                    (air.cents(), boat.cents())
                } else {
                    (
                        updated.client_shipping_air_price_cents,
                        updated.client_shipping_boat_price_cents,
                    )
                };

                self.db
                    .line_items()
                    .update_shipping_pricing(item_id, air, boat, bps)
                    .await?;
            }

            ItemOverride::ClothingFee(fee_cents) => {
                if !item.is_clothing {
                    return Err(PricingError::OverrideNotApplicable {
                        item_id: item_id.to_string(),
                        category: PriceCategory::Clothing.to_string(),
                    });
                }
                if let Some(cents) = fee_cents {
                    validate_fee_cents(cents)?;
                }

                let mut updated = item;
                updated.clothing_fee_cents_override = fee_cents;

                let price = if updated.cost_cents != 0 {
                    let resolution = resolve_rate(
                        PriceCategory::Clothing,
                        Some(&updated),
                        ctx.order_margin.as_ref(),
                        ctx.client.as_ref(),
                        ctx.defaults.as_ref(),
                    );
                    compute_client_price(updated.cost(), &resolution.value, PriceCategory::Clothing)?
                        .cents()
                } else {
                    updated.client_product_price_cents
                };

                self.db
                    .line_items()
                    .update_clothing_pricing(item_id, price, fee_cents)
                    .await?;
            }
        }

        info!(item_id = %item_id, "Item override applied");

        self.fetch_item(item_id).await
    }

    /// Fetches an item or reports it missing.
    async fn fetch_item(&self, item_id: &str) -> PricingResult<LineItem> {
        self.db
            .line_items()
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| PricingError::LineItemNotFound {
                id: item_id.to_string(),
            })
    }
}
