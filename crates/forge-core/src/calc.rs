//! # Price Calculator
//!
//! Applies a resolved rate or fee to a cost basis, producing the rounded
//! client-facing price.
//!
//! ## One Routine, Every Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  manufacturer cost entry ──┐                                            │
//! │  item override edit ───────┼──► compute_client_price ──► client price  │
//! │  order margin edit ────────┤         (THIS MODULE)                      │
//! │  bulk recalculation ───────┘                                            │
//! │                                                                         │
//! │  Historically each screen recomputed prices with its own copy of the   │
//! │  margin math, and copies drift. Here every write path calls this one   │
//! │  function, which delegates to Money::apply_margin / Money::add_fee.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::resolver::RateOrFee;
use crate::types::PriceCategory;
use crate::MAX_MARGIN_BPS;

/// Computes the client price for a cost under a resolved rate or fee.
///
/// Margin categories (product, shipping, sample, accessory) multiply:
/// `round2(cost × (1 + rate/100))`. The clothing category adds:
/// `cost + fee`, never a percentage.
///
/// ## Errors
/// Inputs are validated before computing - callers normally validate at
/// the edge too, but the calculator refuses rather than assumes:
/// - negative cost
/// - margin rate above 500%
/// - negative fee
/// - a fee supplied for a margin category, or a margin for clothing
///
/// ## Example
/// ```rust
/// use forge_core::calc::compute_client_price;
/// use forge_core::money::Money;
/// use forge_core::resolver::RateOrFee;
/// use forge_core::types::{MarginRate, PriceCategory};
///
/// let price = compute_client_price(
///     Money::from_cents(1000),
///     &RateOrFee::Margin(MarginRate::from_bps(8000)),
///     PriceCategory::Product,
/// ).unwrap();
/// assert_eq!(price.cents(), 1800);
/// ```
pub fn compute_client_price(
    cost: Money,
    value: &RateOrFee,
    category: PriceCategory,
) -> CoreResult<Money> {
    if cost.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "cost".to_string(),
            min: 0,
            max: i64::MAX,
        }
        .into());
    }

    match (category, value) {
        (PriceCategory::Clothing, RateOrFee::Fee(fee)) => {
            if fee.is_negative() {
                return Err(ValidationError::OutOfRange {
                    field: "clothing fee".to_string(),
                    min: 0,
                    max: i64::MAX,
                }
                .into());
            }
            Ok(cost.add_fee(*fee))
        }
        (PriceCategory::Clothing, RateOrFee::Margin(_)) => {
            Err(CoreError::RateKindMismatch { category })
        }
        (_, RateOrFee::Margin(rate)) => {
            if rate.bps() > MAX_MARGIN_BPS {
                return Err(ValidationError::OutOfRange {
                    field: "margin rate".to_string(),
                    min: 0,
                    max: MAX_MARGIN_BPS as i64,
                }
                .into());
            }
            Ok(cost.apply_margin(*rate))
        }
        (_, RateOrFee::Fee(_)) => Err(CoreError::RateKindMismatch { category }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
