//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Worse for this system: three screens recomputing the same margin      │
//! │  with independent float math can disagree by a cent on the same        │
//! │  inputs. A client sees two different prices for one line item.         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + ONE shared rounding routine             │
//! │    Every recompute path (item edit, order edit, bulk) calls            │
//! │    Money::apply_margin. There is no second implementation to drift.    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use forge_core::money::Money;
//! use forge_core::types::MarginRate;
//!
//! // Create from cents (preferred)
//! let cost = Money::from_cents(1000); // $10.00
//!
//! // Apply an 80% margin
//! let price = cost.apply_margin(MarginRate::from_bps(8000));
//! assert_eq!(price.cents(), 1800); // $18.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::types::MarginRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative intermediate values (cost deltas)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  LineItem.cost_cents ──► apply_margin ──► client_product_price_cents   │
/// │  LineItem.cost_cents ──► add_fee      ──► client price (clothing)      │
/// │  Accessory.manufacturer_unit_cost ──► apply_margin ──► client cost     │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use forge_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    ///
    /// ## Why Cents?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// The database, calculations, and API all use cents.
    /// Only the UI converts to dollars for display.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a margin percentage to a cost, producing a client price
    /// rounded to the nearest cent.
    ///
    /// This is THE shared margin routine: the item-level, order-level, and
    /// bulk recalculation paths all price through this one function, so a
    /// given (cost, rate) pair produces the same client price no matter
    /// which screen triggered the write.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUNDING RULE: nearest cent, ties round up                         │
    /// │                                                                     │
    /// │  Integer form: (cost × (10000 + bps) + 5000) / 10000                │
    /// │  The +5000 provides the rounding (5000/10000 = 0.5)                 │
    /// │                                                                     │
    /// │  Costs and rates are never negative here, so "ties up" and          │
    /// │  "ties away from zero" are the same rule. Callers validate          │
    /// │  sign/range before pricing (see calc.rs).                           │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use forge_core::money::Money;
    /// use forge_core::types::MarginRate;
    ///
    /// // $10.00 at 80% margin = $18.00
    /// let price = Money::from_cents(1000).apply_margin(MarginRate::from_bps(8000));
    /// assert_eq!(price.cents(), 1800);
    ///
    /// // $50.00 at 5% margin = $52.50
    /// let shipping = Money::from_cents(5000).apply_margin(MarginRate::from_bps(500));
    /// assert_eq!(shipping.cents(), 5250);
    /// ```
    pub fn apply_margin(&self, rate: MarginRate) -> Money {
        // Use i128 to prevent overflow on large amounts
        // rate.bps() is basis points: 8000 = 80%
        // Formula: cost_cents * (10000 + bps) / 10000
        // With rounding: (cost_cents * (10000 + bps) + 5000) / 10000
        let priced = (self.0 as i128 * (10_000 + rate.bps() as i128) + 5_000) / 10_000;
        Money::from_cents(priced as i64)
    }

    /// Adds a flat fee to a cost, producing a client price.
    ///
    /// Used for clothing-category pricing, which is ADDITIVE: the clothing
    /// fee is a fixed amount on top of cost, never a percentage.
    ///
    /// ## Example
    /// ```rust
    /// use forge_core::money::Money;
    ///
    /// // $15.00 cost + $5.00 clothing fee = $20.00
    /// let price = Money::from_cents(1500).add_fee(Money::from_cents(500));
    /// assert_eq!(price.cents(), 2000);
    /// ```
    #[inline]
    pub const fn add_fee(&self, fee: Money) -> Money {
        Money(self.0 + fee.0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and log output. Use frontend formatting for
/// actual UI display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
    }

    #[test]
    fn test_apply_margin_basic() {
        // $10.00 at 80% = $18.00
        let cost = Money::from_cents(1000);
        let price = cost.apply_margin(MarginRate::from_bps(8000));
        assert_eq!(price.cents(), 1800);
    }

    #[test]
    fn test_apply_margin_shipping_rate() {
        // $50.00 at 5% = $52.50
        let cost = Money::from_cents(5000);
        let price = cost.apply_margin(MarginRate::from_bps(500));
        assert_eq!(price.cents(), 5250);
    }

    #[test]
    fn test_apply_margin_doubles_at_hundred_percent() {
        // $2.00 at 100% = $4.00
        let cost = Money::from_cents(200);
        let price = cost.apply_margin(MarginRate::from_bps(10_000));
        assert_eq!(price.cents(), 400);
    }

    #[test]
    fn test_apply_margin_rounds_half_up() {
        // $0.33 at 5% = 34.65 cents → rounds to 35
        let cost = Money::from_cents(33);
        let price = cost.apply_margin(MarginRate::from_bps(500));
        assert_eq!(price.cents(), 35);

        // $0.01 at 50% = 1.5 cents → ties round up to 2
        let cost = Money::from_cents(1);
        let price = cost.apply_margin(MarginRate::from_bps(5000));
        assert_eq!(price.cents(), 2);
    }

    #[test]
    fn test_apply_margin_zero_rate_is_identity() {
        let cost = Money::from_cents(1234);
        assert_eq!(cost.apply_margin(MarginRate::zero()).cents(), 1234);
    }

    #[test]
    fn test_add_fee_is_additive_not_multiplicative() {
        // $15.00 + $5.00 fee = $20.00
        let cost = Money::from_cents(1500);
        let price = cost.add_fee(Money::from_cents(500));
        assert_eq!(price.cents(), 2000);

        // Zero fee leaves cost unchanged
        assert_eq!(cost.add_fee(Money::zero()).cents(), 1500);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(!negative.is_zero());
        assert!(negative.is_negative());
    }

    /// The same (cost, rate) pair must price identically regardless of
    /// which path computes it. This pins the exact integer formula.
    #[test]
    fn test_rounding_is_deterministic() {
        for cost in [0i64, 1, 33, 99, 1000, 123_456_789] {
            for bps in [0u32, 500, 825, 8000, 10_000, 50_000] {
                let a = Money::from_cents(cost).apply_margin(MarginRate::from_bps(bps));
                let b = Money::from_cents(cost).apply_margin(MarginRate::from_bps(bps));
                assert_eq!(a, b);
                let expected = (cost as i128 * (10_000 + bps as i128) + 5_000) / 10_000;
                assert_eq!(a.cents() as i128, expected);
            }
        }
    }
}
