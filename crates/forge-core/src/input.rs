//! # Custom-Value Parsing
//!
//! Bulk recalculation lets staff type a custom rate or fee to use for one
//! run, overriding the normal resolver chain for that operation only. The
//! text box arrives as-is; parsing is deliberately forgiving:
//!
//! - blank, non-numeric, negative, or out-of-range text → `None`
//! - zero → `None` as well
//!
//! `None` means "fall back to the category's resolved/system default" -
//! NEVER "use zero". A typo in the custom box must not zero out every
//! client price in the order.

use crate::money::Money;
use crate::types::MarginRate;
use crate::MAX_MARGIN_BPS;

/// Parses custom percentage text into a margin rate.
///
/// ## Example
/// ```rust
/// use forge_core::input::parse_custom_percent;
///
/// assert_eq!(parse_custom_percent("85").unwrap().bps(), 8500);
/// assert_eq!(parse_custom_percent(" 8.25 ").unwrap().bps(), 825);
/// assert!(parse_custom_percent("").is_none());
/// assert!(parse_custom_percent("abc").is_none());
/// assert!(parse_custom_percent("0").is_none());   // zero falls back
/// assert!(parse_custom_percent("-5").is_none());
/// assert!(parse_custom_percent("501").is_none()); // above the 500% cap
/// ```
pub fn parse_custom_percent(text: &str) -> Option<MarginRate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let pct: f64 = text.parse().ok()?;
    if pct.is_nan() || pct <= 0.0 {
        return None;
    }

    let rate = MarginRate::from_percentage(pct);
    if rate.bps() > MAX_MARGIN_BPS {
        return None;
    }

    Some(rate)
}

/// Parses custom fee text (in dollars) into a Money amount.
///
/// ## Example
/// ```rust
/// use forge_core::input::parse_custom_fee;
///
/// assert_eq!(parse_custom_fee("5").unwrap().cents(), 500);
/// assert_eq!(parse_custom_fee("5.50").unwrap().cents(), 550);
/// assert!(parse_custom_fee("").is_none());
/// assert!(parse_custom_fee("free").is_none());
/// assert!(parse_custom_fee("0").is_none()); // zero falls back
/// ```
pub fn parse_custom_fee(text: &str) -> Option<Money> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let dollars: f64 = text.parse().ok()?;
    if dollars.is_nan() || dollars <= 0.0 {
        return None;
    }

    Some(Money::from_cents((dollars * 100.0).round() as i64))
}

// =============================================================================
// Unit Tests
// =============================================================================
