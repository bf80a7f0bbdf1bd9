//! # Pricing Context
//!
//! One fetch of everything resolution needs for an order: the order row,
//! its (possibly absent) margin row, the owning client's (possibly
//! absent) override row, and the (possibly absent) system defaults row.
//!
//! Absence is normal at every level except the order itself - the
//! resolver treats a missing layer as "keep walking down".

use forge_core::{
    ClientOverride, MarginRate, Money, Order, OrderMargin, PricingDefaults,
    FALLBACK_ACCESSORY_MARGIN_BPS, FALLBACK_CLOTHING_FEE_CENTS, FALLBACK_PRODUCT_MARGIN_BPS,
    FALLBACK_SAMPLE_MARGIN_BPS, FALLBACK_SHIPPING_MARGIN_BPS,
};
use forge_db::Database;

use crate::error::{PricingError, PricingResult};

/// Everything the resolver consults above the item layer.
#[derive(Debug, Clone)]
pub(crate) struct PricingContext {
    pub order: Order,
    pub order_margin: Option<OrderMargin>,
    pub client: Option<ClientOverride>,
    pub defaults: Option<PricingDefaults>,
}

impl PricingContext {
    /// Loads the context for an order. Fails only when the order itself
    /// does not exist.
    pub async fn load(db: &Database, order_id: &str) -> PricingResult<Self> {
        let order = db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| PricingError::OrderNotFound {
                id: order_id.to_string(),
            })?;

        let order_margin = db.order_margins().get_by_order(order_id).await?;
        let client = db.client_overrides().get_by_client(&order.client_id).await?;
        let defaults = db.pricing_defaults().get().await?;

        Ok(PricingContext {
            order,
            order_margin,
            client,
            defaults,
        })
    }

    /// The system product margin: configured default or safety constant.
    pub fn system_product_margin(&self) -> MarginRate {
        self.defaults
            .as_ref()
            .map(|d| d.product_margin())
            .unwrap_or(MarginRate::from_bps(FALLBACK_PRODUCT_MARGIN_BPS))
    }

    /// The system shipping margin: configured default or safety constant.
    pub fn system_shipping_margin(&self) -> MarginRate {
        self.defaults
            .as_ref()
            .map(|d| d.shipping_margin())
            .unwrap_or(MarginRate::from_bps(FALLBACK_SHIPPING_MARGIN_BPS))
    }

    /// The system sample margin: configured default or safety constant.
    pub fn system_sample_margin(&self) -> MarginRate {
        self.defaults
            .as_ref()
            .map(|d| d.sample_margin())
            .unwrap_or(MarginRate::from_bps(FALLBACK_SAMPLE_MARGIN_BPS))
    }

    /// The system accessory margin: configured default or safety constant.
    pub fn system_accessory_margin(&self) -> MarginRate {
        self.defaults
            .as_ref()
            .map(|d| d.accessory_margin())
            .unwrap_or(MarginRate::from_bps(FALLBACK_ACCESSORY_MARGIN_BPS))
    }

    /// The system clothing fee: configured default or safety constant.
    pub fn system_clothing_fee(&self) -> Money {
        self.defaults
            .as_ref()
            .map(|d| d.clothing_fee())
            .unwrap_or(Money::from_cents(FALLBACK_CLOTHING_FEE_CENTS))
    }
}
