//! # Margin Resolver
//!
//! Resolves which override layer supplies the effective rate or fee for a
//! price category.
//!
//! ## Resolution Chains
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Per-Category Precedence (first non-null wins)              │
//! │                                                                         │
//! │  product    item ──► order ──► client ──► system ──► safety (80%)      │
//! │  shipping   item ──► order ──► client ──► system ──► safety (5%)       │
//! │  sample     ............... client ──► system ──► safety (80%)         │
//! │  accessory  ......................... system ──► safety (100%)         │
//! │  clothing   item ..................─► system ──► safety ($0 fee)       │
//! │                                                                         │
//! │  The gaps are intentional and preserved:                               │
//! │  • sample has NO item/order override columns                           │
//! │  • accessory has NO client override (asymmetry kept as observed)       │
//! │  • clothing is a flat FEE, with only item + system layers              │
//! │                                                                         │
//! │  Resolution ALWAYS terminates. A missing defaults row means "use the   │
//! │  safety constant", never an error.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each category resolves independently: an item-level product override
//! has no bearing on how the same item's shipping margin resolves.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{ClientOverride, LineItem, MarginRate, OrderMargin, PriceCategory, PricingDefaults};
use crate::{
    FALLBACK_ACCESSORY_MARGIN_BPS, FALLBACK_CLOTHING_FEE_CENTS, FALLBACK_PRODUCT_MARGIN_BPS,
    FALLBACK_SAMPLE_MARGIN_BPS, FALLBACK_SHIPPING_MARGIN_BPS,
};

// =============================================================================
// Resolution Output
// =============================================================================

/// Which layer produced the effective value.
///
/// Safety-constant fallbacks report `System`: the constant stands in for a
/// missing system defaults row, and callers only distinguish the four
/// real layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Item-level override on the line item itself.
    Item,
    /// Order-level override on the order's margin row.
    Order,
    /// Client-level override on the client's pricing row.
    Client,
    /// System-wide default (or the hard-coded safety constant).
    System,
}

/// The effective value: a margin percentage for most categories, a flat
/// fee for clothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RateOrFee {
    /// Multiplicative margin in basis points.
    Margin(MarginRate),
    /// Additive flat fee in cents (clothing only).
    Fee(Money),
}

/// The result of walking a category's precedence chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Resolution {
    /// The effective rate or fee.
    pub value: RateOrFee,
    /// The layer that supplied it.
    pub source: RateSource,
}

impl Resolution {
    /// Returns the margin rate, if this resolution carries one.
    #[inline]
    pub fn as_margin(&self) -> Option<MarginRate> {
        match self.value {
            RateOrFee::Margin(rate) => Some(rate),
            RateOrFee::Fee(_) => None,
        }
    }

    /// Returns the flat fee, if this resolution carries one.
    #[inline]
    pub fn as_fee(&self) -> Option<Money> {
        match self.value {
            RateOrFee::Fee(fee) => Some(fee),
            RateOrFee::Margin(_) => None,
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves the effective rate or fee for a category.
///
/// Walks the category's precedence chain top-down, skipping layers the
/// category does not have, and returns the first non-null value together
/// with the layer that supplied it. Never fails: the hard-coded safety
/// defaults terminate every chain.
///
/// ## Arguments
/// * `category` - Which price category to resolve
/// * `item` - The line item, when resolving item-scoped categories
/// * `order` - The order's margin row, if one exists yet
/// * `client` - The owning client's override row, if one exists
/// * `defaults` - The system defaults row, if present
///
/// ## Example
/// ```rust
/// use forge_core::resolver::{resolve_rate, RateSource};
/// use forge_core::types::PriceCategory;
///
/// // Nothing configured anywhere: the safety default answers as System.
/// let res = resolve_rate(PriceCategory::Product, None, None, None, None);
/// assert_eq!(res.source, RateSource::System);
/// assert_eq!(res.as_margin().unwrap().bps(), 8000);
/// ```
pub fn resolve_rate(
    category: PriceCategory,
    item: Option<&LineItem>,
    order: Option<&OrderMargin>,
    client: Option<&ClientOverride>,
    defaults: Option<&PricingDefaults>,
) -> Resolution {
    match category {
        PriceCategory::Product => resolve_margin_chain(
            item.and_then(|i| i.product_margin_override()),
            order.and_then(|o| o.product_margin()),
            client.and_then(|c| c.product_margin()),
            defaults.map(|d| d.product_margin()),
            MarginRate::from_bps(FALLBACK_PRODUCT_MARGIN_BPS),
        ),
        PriceCategory::Shipping => resolve_margin_chain(
            item.and_then(|i| i.shipping_margin_override()),
            order.and_then(|o| o.shipping_margin()),
            client.and_then(|c| c.shipping_margin()),
            defaults.map(|d| d.shipping_margin()),
            MarginRate::from_bps(FALLBACK_SHIPPING_MARGIN_BPS),
        ),
        // Sample margin has no item/order override columns: the chain
        // starts at the client layer.
        PriceCategory::Sample => resolve_margin_chain(
            None,
            None,
            client.and_then(|c| c.sample_margin()),
            defaults.map(|d| d.sample_margin()),
            MarginRate::from_bps(FALLBACK_SAMPLE_MARGIN_BPS),
        ),
        // Accessory margin resolves straight to the system default: no
        // client-level accessory override is modeled.
        PriceCategory::Accessory => resolve_margin_chain(
            None,
            None,
            None,
            defaults.map(|d| d.accessory_margin()),
            MarginRate::from_bps(FALLBACK_ACCESSORY_MARGIN_BPS),
        ),
        PriceCategory::Clothing => resolve_clothing_fee(item, defaults),
    }
}

/// Walks a margin chain: item → order → client → system → safety.
fn resolve_margin_chain(
    item: Option<MarginRate>,
    order: Option<MarginRate>,
    client: Option<MarginRate>,
    system: Option<MarginRate>,
    safety: MarginRate,
) -> Resolution {
    if let Some(rate) = item {
        return Resolution {
            value: RateOrFee::Margin(rate),
            source: RateSource::Item,
        };
    }
    if let Some(rate) = order {
        return Resolution {
            value: RateOrFee::Margin(rate),
            source: RateSource::Order,
        };
    }
    if let Some(rate) = client {
        return Resolution {
            value: RateOrFee::Margin(rate),
            source: RateSource::Client,
        };
    }
    Resolution {
        value: RateOrFee::Margin(system.unwrap_or(safety)),
        source: RateSource::System,
    }
}

/// Clothing resolves a FEE, not a margin: item override → system → safety.
fn resolve_clothing_fee(item: Option<&LineItem>, defaults: Option<&PricingDefaults>) -> Resolution {
    if let Some(fee) = item.and_then(|i| i.clothing_fee_override()) {
        return Resolution {
            value: RateOrFee::Fee(fee),
            source: RateSource::Item,
        };
    }
    let fee = defaults
        .map(|d| d.clothing_fee())
        .unwrap_or(Money::from_cents(FALLBACK_CLOTHING_FEE_CENTS));
    Resolution {
        value: RateOrFee::Fee(fee),
        source: RateSource::System,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn defaults() -> PricingDefaults {
        PricingDefaults {
            id: "default".to_string(),
            product_margin_bps: 8000,
            shipping_margin_bps: 500,
            sample_margin_bps: 8000,
            accessory_margin_bps: 10_000,
            clothing_fee_cents: 500,
            updated_at: Utc::now(),
        }
    }

    fn client() -> ClientOverride {
        ClientOverride {
            id: "co-1".to_string(),
            client_id: "client-1".to_string(),
            product_margin_bps: Some(6000),
            shipping_margin_bps: None,
            sample_margin_bps: Some(7000),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn order_margin() -> OrderMargin {
        OrderMargin {
            id: "om-1".to_string(),
            order_id: "order-1".to_string(),
            product_margin_bps: Some(9000),
            shipping_margin_bps: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item() -> LineItem {
        let now = Utc::now();
        LineItem {
            id: "item-1".to_string(),
            order_id: "order-1".to_string(),
            name: "Widget".to_string(),
            is_clothing: false,
            cost_cents: 1000,
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

    #[test]
    fn test_no_overrides_resolves_to_system_default() {
        let d = defaults();
        for category in [
            PriceCategory::Product,
            PriceCategory::Shipping,
            PriceCategory::Sample,
            PriceCategory::Accessory,
        ] {
            let res = resolve_rate(category, Some(&item()), None, None, Some(&d));
            assert_eq!(res.source, RateSource::System, "category {}", category);
        }
        let res = resolve_rate(PriceCategory::Product, Some(&item()), None, None, Some(&d));
        assert_eq!(res.as_margin().unwrap().bps(), 8000);
    }

    #[test]
    fn test_item_override_wins_over_everything() {
        let mut i = item();
        i.product_margin_bps_override = Some(12_000);

        let res = resolve_rate(
            PriceCategory::Product,
            Some(&i),
            Some(&order_margin()),
            Some(&client()),
            Some(&defaults()),
        );
        assert_eq!(res.source, RateSource::Item);
        assert_eq!(res.as_margin().unwrap().bps(), 12_000);
    }

    #[test]
    fn test_order_beats_client_and_system() {
        let res = resolve_rate(
            PriceCategory::Product,
            Some(&item()),
            Some(&order_margin()),
            Some(&client()),
            Some(&defaults()),
        );
        assert_eq!(res.source, RateSource::Order);
        assert_eq!(res.as_margin().unwrap().bps(), 9000);
    }

    #[test]
    fn test_client_beats_system() {
        let res = resolve_rate(
            PriceCategory::Product,
            Some(&item()),
            None,
            Some(&client()),
            Some(&defaults()),
        );
        assert_eq!(res.source, RateSource::Client);
        assert_eq!(res.as_margin().unwrap().bps(), 6000);
    }

    #[test]
    fn test_clearing_falls_through_recursively() {
        // Item cleared → order wins; order cleared too → client; client
        // cleared → system.
        let mut om = order_margin();
        let res = resolve_rate(
            PriceCategory::Product,
            Some(&item()),
            Some(&om),
            Some(&client()),
            Some(&defaults()),
        );
        assert_eq!(res.source, RateSource::Order);

        om.product_margin_bps = None;
        let res = resolve_rate(
            PriceCategory::Product,
            Some(&item()),
            Some(&om),
            Some(&client()),
            Some(&defaults()),
        );
        assert_eq!(res.source, RateSource::Client);

        let mut c = client();
        c.product_margin_bps = None;
        let res = resolve_rate(
            PriceCategory::Product,
            Some(&item()),
            Some(&om),
            Some(&c),
            Some(&defaults()),
        );
        assert_eq!(res.source, RateSource::System);
        assert_eq!(res.as_margin().unwrap().bps(), 8000);
    }

    #[test]
    fn test_sample_ignores_item_and_order_layers() {
        // Even with item/order product+shipping overrides present, sample
        // resolves client → system: there are no sample columns at those
        // layers to consult.
        let mut i = item();
        i.product_margin_bps_override = Some(12_000);
        i.shipping_margin_bps_override = Some(12_000);

        let res = resolve_rate(
            PriceCategory::Sample,
            Some(&i),
            Some(&order_margin()),
            Some(&client()),
            Some(&defaults()),
        );
        assert_eq!(res.source, RateSource::Client);
        assert_eq!(res.as_margin().unwrap().bps(), 7000);
    }

    #[test]
    fn test_accessory_resolves_straight_to_system() {
        let res = resolve_rate(
            PriceCategory::Accessory,
            Some(&item()),
            Some(&order_margin()),
            Some(&client()),
            Some(&defaults()),
        );
        assert_eq!(res.source, RateSource::System);
        assert_eq!(res.as_margin().unwrap().bps(), 10_000);
    }

    #[test]
    fn test_clothing_resolves_fee_not_margin() {
        let res = resolve_rate(PriceCategory::Clothing, Some(&item()), None, None, Some(&defaults()));
        assert_eq!(res.source, RateSource::System);
        assert_eq!(res.as_fee().unwrap().cents(), 500);
        assert!(res.as_margin().is_none());

        let mut i = item();
        i.clothing_fee_cents_override = Some(750);
        let res = resolve_rate(PriceCategory::Clothing, Some(&i), None, None, Some(&defaults()));
        assert_eq!(res.source, RateSource::Item);
        assert_eq!(res.as_fee().unwrap().cents(), 750);
    }

    #[test]
    fn test_missing_defaults_row_uses_safety_constants() {
        // No layer has data at all. Resolution still terminates, reporting
        // the safety constant as the system layer.
        let cases = [
            (PriceCategory::Product, FALLBACK_PRODUCT_MARGIN_BPS),
            (PriceCategory::Shipping, FALLBACK_SHIPPING_MARGIN_BPS),
            (PriceCategory::Sample, FALLBACK_SAMPLE_MARGIN_BPS),
            (PriceCategory::Accessory, FALLBACK_ACCESSORY_MARGIN_BPS),
        ];
        for (category, expected_bps) in cases {
            let res = resolve_rate(category, None, None, None, None);
            assert_eq!(res.source, RateSource::System);
            assert_eq!(res.as_margin().unwrap().bps(), expected_bps);
        }

        let res = resolve_rate(PriceCategory::Clothing, None, None, None, None);
        assert_eq!(res.as_fee().unwrap().cents(), FALLBACK_CLOTHING_FEE_CENTS);
    }

    #[test]
    fn test_categories_resolve_independently() {
        // A product override must not leak into shipping resolution.
        let mut i = item();
        i.product_margin_bps_override = Some(12_000);

        let res = resolve_rate(
            PriceCategory::Shipping,
            Some(&i),
            None,
            Some(&client()),
            Some(&defaults()),
        );
        // client shipping override is None, so system wins
        assert_eq!(res.source, RateSource::System);
        assert_eq!(res.as_margin().unwrap().bps(), 500);
    }
}
