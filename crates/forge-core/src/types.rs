//! # Domain Types
//!
//! Core domain types used throughout Forge Orders.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │   OrderMargin   │   │ ClientOverride  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  order_id       │   │  client_id      │       │
//! │  │  cost_cents     │   │  product_bps?   │   │  product_bps?   │       │
//! │  │  *_override?    │   │  shipping_bps?  │   │  shipping_bps?  │       │
//! │  │  client_*_price │   └─────────────────┘   │  sample_bps?    │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   MarginRate    │   │  PriceCategory  │   │ PricingDefaults │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Product        │   │  singleton row  │       │
//! │  │  8000 = 80%     │   │  Clothing       │   │  system-wide    │       │
//! │  └─────────────────┘   │  Shipping       │   │  rates          │       │
//! │                        │  Sample         │   └─────────────────┘       │
//! │                        │  Accessory      │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Override Representation
//! An override column is `Option<_>`: `None` means "inherit from the next
//! layer", `Some` means "a user explicitly diverged from inherited
//! defaults". The nullability IS the customized flag - there is no second
//! boolean to drift out of sync with the value it describes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Margin Rate
// =============================================================================

/// Margin rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 8000 bps = 80% (the standard product margin)
/// Rates up to 500% (50,000 bps) are legal; anything above is rejected
/// at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MarginRate(u32);

impl MarginRate {
    /// Creates a margin rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        MarginRate(bps)
    }

    /// Creates a margin rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        MarginRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero margin rate.
    #[inline]
    pub const fn zero() -> Self {
        MarginRate(0)
    }
}

impl Default for MarginRate {
    fn default() -> Self {
        MarginRate::zero()
    }
}

impl fmt::Display for MarginRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Price Category
// =============================================================================

/// The five price categories the engine resolves and computes.
///
/// Each category has its own override precedence chain - the layers a
/// category consults are NOT uniform (see `resolver`):
/// sample has no item/order layer, accessory has no client layer, and
/// clothing is priced by flat fee rather than margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceCategory {
    /// Regular (non-clothing) product margin.
    Product,
    /// Clothing products: flat fee added to cost, never multiplied.
    Clothing,
    /// Shipping margin (applied to both air and boat costs).
    Shipping,
    /// Sample fee margin.
    Sample,
    /// Accessory margin (applied to accessory inventory unit costs).
    Accessory,
}

impl fmt::Display for PriceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriceCategory::Product => "product",
            PriceCategory::Clothing => "clothing",
            PriceCategory::Shipping => "shipping",
            PriceCategory::Sample => "sample",
            PriceCategory::Accessory => "accessory",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// System Pricing Defaults
// =============================================================================

/// System-wide default rates. Singleton row, edited out-of-band on the
/// admin config screen; the pricing engine only ever reads it.
///
/// A missing row is legal: resolution falls back to the hard-coded safety
/// defaults in `resolver` rather than erroring.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PricingDefaults {
    /// Row key; always `"default"` - the table holds one row.
    pub id: String,

    /// Default product margin in basis points (8000 = 80%).
    pub product_margin_bps: u32,

    /// Default shipping margin in basis points.
    pub shipping_margin_bps: u32,

    /// Default sample margin in basis points.
    pub sample_margin_bps: u32,

    /// Default accessory margin in basis points.
    pub accessory_margin_bps: u32,

    /// Flat clothing fee in cents (additive, not a percentage).
    pub clothing_fee_cents: i64,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl PricingDefaults {
    /// Returns the default product margin.
    #[inline]
    pub fn product_margin(&self) -> MarginRate {
        MarginRate::from_bps(self.product_margin_bps)
    }

    /// Returns the default shipping margin.
    #[inline]
    pub fn shipping_margin(&self) -> MarginRate {
        MarginRate::from_bps(self.shipping_margin_bps)
    }

    /// Returns the default sample margin.
    #[inline]
    pub fn sample_margin(&self) -> MarginRate {
        MarginRate::from_bps(self.sample_margin_bps)
    }

    /// Returns the default accessory margin.
    #[inline]
    pub fn accessory_margin(&self) -> MarginRate {
        MarginRate::from_bps(self.accessory_margin_bps)
    }

    /// Returns the flat clothing fee.
    #[inline]
    pub fn clothing_fee(&self) -> Money {
        Money::from_cents(self.clothing_fee_cents)
    }
}

// =============================================================================
// Client Pricing Override
// =============================================================================

/// Per-client margin overrides. All nullable; NULL inherits the system
/// default. Edited out-of-band on the client config screen; the engine
/// only reads it.
///
/// There is deliberately NO clothing-fee or accessory override at this
/// layer - those categories skip the client layer entirely.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ClientOverride {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The client this override row belongs to (one row per client).
    pub client_id: String,

    /// Product margin override in bps; NULL = inherit system default.
    pub product_margin_bps: Option<u32>,

    /// Shipping margin override in bps; NULL = inherit system default.
    pub shipping_margin_bps: Option<u32>,

    /// Sample margin override in bps; NULL = inherit system default.
    pub sample_margin_bps: Option<u32>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ClientOverride {
    /// Returns the client product margin, if set.
    #[inline]
    pub fn product_margin(&self) -> Option<MarginRate> {
        self.product_margin_bps.map(MarginRate::from_bps)
    }

    /// Returns the client shipping margin, if set.
    #[inline]
    pub fn shipping_margin(&self) -> Option<MarginRate> {
        self.shipping_margin_bps.map(MarginRate::from_bps)
    }

    /// Returns the client sample margin, if set.
    #[inline]
    pub fn sample_margin(&self) -> Option<MarginRate> {
        self.sample_margin_bps.map(MarginRate::from_bps)
    }
}

// =============================================================================
// Order Margin
// =============================================================================

/// Order-level margin overrides. One row per order, upserted lazily on the
/// first order-level margin edit and updated on every subsequent edit;
/// never deleted.
///
/// Only product and shipping exist at this layer - sample and clothing
/// have no order-level override by design.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderMargin {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The order this margin row belongs to (one row per order).
    pub order_id: String,

    /// Product margin override in bps; NULL = inherit client/system.
    pub product_margin_bps: Option<u32>,

    /// Shipping margin override in bps; NULL = inherit client/system.
    pub shipping_margin_bps: Option<u32>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl OrderMargin {
    /// Returns the order product margin, if set.
    #[inline]
    pub fn product_margin(&self) -> Option<MarginRate> {
        self.product_margin_bps.map(MarginRate::from_bps)
    }

    /// Returns the order shipping margin, if set.
    #[inline]
    pub fn shipping_margin(&self) -> Option<MarginRate> {
        self.shipping_margin_bps.map(MarginRate::from_bps)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A manufacturing order. The surrounding order workflow (statuses, forms,
/// notifications) lives outside this engine; pricing only needs the
/// identity columns - which client owns the order and, for accessory
/// recalculation, which manufacturer it is placed with.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning client.
    pub client_id: String,

    /// Manufacturer the order is placed with, once assigned.
    pub manufacturer_id: Option<String>,

    /// Human-readable order reference shown to staff.
    pub reference: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Line Item
// =============================================================================

/// A product line within an order: manufacturer-supplied cost figures,
/// the item-level override layer, and the computed client-facing prices.
///
/// ## Field Groups
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  MANUFACTURER INPUTS          │  ITEM-LEVEL OVERRIDES (nullable)        │
/// │  cost_cents                   │  product_margin_bps_override            │
/// │  shipping_air_cost_cents      │  shipping_margin_bps_override           │
/// │  shipping_boat_cost_cents     │  clothing_fee_cents_override            │
/// │  sample_cost_cents            │  (sample has NO item-level override)    │
/// │                               │                                         │
/// │  COMPUTED CLIENT PRICES       │  SHIPPING LINK                          │
/// │  client_product_price_cents   │  shipping_linked_item_ids (primary)     │
/// │  client_shipping_air_price…   │  shipping_link_note                     │
/// │  client_shipping_boat_price…  │                                         │
/// │  client_sample_fee_cents      │                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The order this item belongs to.
    pub order_id: String,

    /// Display name shown on the order form.
    pub name: String,

    /// Clothing items are priced by flat fee instead of product margin.
    pub is_clothing: bool,

    /// Manufacturer unit cost in cents.
    pub cost_cents: i64,

    /// Manufacturer air shipping cost in cents.
    pub shipping_air_cost_cents: i64,

    /// Manufacturer boat shipping cost in cents.
    pub shipping_boat_cost_cents: i64,

    /// Manufacturer sample cost in cents; zero when no sample was made.
    pub sample_cost_cents: i64,

    /// Item-level product margin override; NULL = inherit.
    pub product_margin_bps_override: Option<u32>,

    /// Item-level shipping margin override; NULL = inherit.
    pub shipping_margin_bps_override: Option<u32>,

    /// Item-level clothing fee override; NULL = inherit.
    pub clothing_fee_cents_override: Option<i64>,

    /// Computed client product price.
    pub client_product_price_cents: i64,

    /// Computed client air shipping price.
    pub client_shipping_air_price_cents: i64,

    /// Computed client boat shipping price.
    pub client_shipping_boat_price_cents: i64,

    /// Computed client sample fee.
    pub client_sample_fee_cents: i64,

    /// When this item's shipping covers sibling items, their ids.
    /// Empty when this item is not a covering primary.
    pub shipping_linked_item_ids: Vec<String>,

    /// Human-readable note about the shipping link, on both sides of it.
    pub shipping_link_note: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl LineItem {
    /// Returns the manufacturer cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Returns the manufacturer air shipping cost as Money.
    #[inline]
    pub fn shipping_air_cost(&self) -> Money {
        Money::from_cents(self.shipping_air_cost_cents)
    }

    /// Returns the manufacturer boat shipping cost as Money.
    #[inline]
    pub fn shipping_boat_cost(&self) -> Money {
        Money::from_cents(self.shipping_boat_cost_cents)
    }

    /// Returns the manufacturer sample cost as Money.
    #[inline]
    pub fn sample_cost(&self) -> Money {
        Money::from_cents(self.sample_cost_cents)
    }

    /// Returns the item-level product margin override, if set.
    #[inline]
    pub fn product_margin_override(&self) -> Option<MarginRate> {
        self.product_margin_bps_override.map(MarginRate::from_bps)
    }

    /// Returns the item-level shipping margin override, if set.
    #[inline]
    pub fn shipping_margin_override(&self) -> Option<MarginRate> {
        self.shipping_margin_bps_override.map(MarginRate::from_bps)
    }

    /// Returns the item-level clothing fee override, if set.
    #[inline]
    pub fn clothing_fee_override(&self) -> Option<Money> {
        self.clothing_fee_cents_override.map(Money::from_cents)
    }

    /// True when this item's shipping cost covers sibling items.
    #[inline]
    pub fn is_shipping_primary(&self) -> bool {
        !self.shipping_linked_item_ids.is_empty()
    }

    /// True when the item has any shipping cost to price.
    #[inline]
    pub fn has_shipping_cost(&self) -> bool {
        self.shipping_air_cost_cents != 0 || self.shipping_boat_cost_cents != 0
    }
}

// =============================================================================
// Accessory
// =============================================================================

/// An accessory inventory record, scoped to a client (and optionally a
/// manufacturer). The one non-line-item entity bulk recalculation
/// mutates: the client unit cost is re-derived from the manufacturer
/// unit cost using the accessory margin.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Accessory {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The client whose inventory this accessory belongs to.
    pub client_id: String,

    /// Sourcing manufacturer, when known.
    pub manufacturer_id: Option<String>,

    /// Display name.
    pub name: String,

    /// Manufacturer unit cost in cents.
    pub manufacturer_unit_cost_cents: i64,

    /// Computed client unit cost in cents.
    pub client_unit_cost_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Accessory {
    /// Returns the manufacturer unit cost as Money.
    #[inline]
    pub fn manufacturer_unit_cost(&self) -> Money {
        Money::from_cents(self.manufacturer_unit_cost_cents)
    }

    /// Returns the client unit cost as Money.
    #[inline]
    pub fn client_unit_cost(&self) -> Money {
        Money::from_cents(self.client_unit_cost_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
