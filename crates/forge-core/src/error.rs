//! # Error Types
//!
//! Domain-specific error types for forge-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  forge-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  forge-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  forge-pricing errors (separate crate)                                 │
//! │  └── PricingError     - Engine-level failures (wraps the above)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → PricingError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, category, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::PriceCategory;

// =============================================================================
// Core Error
// =============================================================================

/// Core pricing logic errors.
///
/// These errors represent business rule violations. They should be caught
/// and translated to user-friendly messages at the surface.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The resolved value kind does not fit the category: a flat fee was
    /// supplied for a margin category, or a margin for clothing.
    ///
    /// ## When This Occurs
    /// Only through a caller bug - resolution itself always produces the
    /// right kind for the category it was asked about.
    #[error("category {category} cannot be priced with that value kind")]
    RateKindMismatch { category: PriceCategory },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any write happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::RateKindMismatch {
            category: PriceCategory::Clothing,
        };
        assert_eq!(
            err.to_string(),
            "category clothing cannot be priced with that value kind"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "margin rate".to_string(),
            min: 0,
            max: 50_000,
        };
        assert_eq!(err.to_string(), "margin rate must be between 0 and 50000");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
