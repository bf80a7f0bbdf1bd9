//! # forge-core: Pure Pricing Logic for Forge Orders
//!
//! This crate is the **heart** of Forge Orders. It contains all pricing
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Forge Orders Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Staff / Manufacturer Forms                     │   │
//! │  │   Cost entry ──► Margin edit ──► Bulk recalc ──► Ship links    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                forge-pricing (Engine Layer)                     │   │
//! │  │    RecalculationEngine, PricePropagator, ShippingAllocator     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ forge-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ resolver  │  │   calc    │  │   │
//! │  │   │ LineItem  │  │   Money   │  │ 4 layers  │  │ one round │  │   │
//! │  │   │ MarginRate│  │ margins   │  │ per cat.  │  │  routine  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    forge-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, OrderMargin, MarginRate, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`resolver`] - Per-category override precedence resolution
//! - [`calc`] - The one shared price calculation routine
//! - [`input`] - Forgiving parsing of session-supplied custom values
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **One rounding routine**: every recompute path shares `Money::apply_margin`
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use forge_core::calc::compute_client_price;
//! use forge_core::resolver::{resolve_rate, RateSource};
//! use forge_core::money::Money;
//! use forge_core::types::PriceCategory;
//!
//! // Nothing configured anywhere: safety default answers for the system.
//! let res = resolve_rate(PriceCategory::Product, None, None, None, None);
//! assert_eq!(res.source, RateSource::System);
//!
//! // $10.00 at the resolved 80% = $18.00
//! let price = compute_client_price(Money::from_cents(1000), &res.value, PriceCategory::Product);
//! assert_eq!(price.unwrap().cents(), 1800);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calc;
pub mod error;
pub mod input;
pub mod money;
pub mod resolver;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use forge_core::Money` instead of
// `use forge_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use resolver::{resolve_rate, RateOrFee, RateSource, Resolution};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Hard-coded safety default: product margin 80%.
///
/// ## Why a constant?
/// Resolution must ALWAYS terminate. If the system defaults row has never
/// been created, the safety constants answer instead of erroring - a
/// missing config row is an operational state, not a bug.
pub const FALLBACK_PRODUCT_MARGIN_BPS: u32 = 8000;

/// Hard-coded safety default: shipping margin 5%.
pub const FALLBACK_SHIPPING_MARGIN_BPS: u32 = 500;

/// Hard-coded safety default: sample margin 80%.
pub const FALLBACK_SAMPLE_MARGIN_BPS: u32 = 8000;

/// Hard-coded safety default: accessory margin 100%.
pub const FALLBACK_ACCESSORY_MARGIN_BPS: u32 = 10_000;

/// Hard-coded safety default: clothing flat fee $0.00.
pub const FALLBACK_CLOTHING_FEE_CENTS: i64 = 0;

/// Maximum legal margin rate: 500% (50,000 basis points).
///
/// ## Business Reason
/// Rates above 500% have always meant a typo (8000 typed into a percent
/// box). Rejecting early keeps a fat-fingered rate from silently
/// five-hundred-folding an order's prices.
pub const MAX_MARGIN_BPS: u32 = 50_000;
