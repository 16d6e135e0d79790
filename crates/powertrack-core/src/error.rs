//! # Error Types
//!
//! Domain-specific error types for powertrack-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  powertrack-core errors (this file)                                    │
//! │  ├── CoreError        - Business rejections of a worksheet             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  powertrack-db errors                                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  powertrack-engine errors                                              │
//! │  └── EngineError      - Rejected(CoreError) | Persistence(DbError)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → ApiError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Reasons a worksheet submission is rejected before anything is written.
///
/// Every variant is a client-side problem: the boundary shows the message
/// as-is and nothing has been persisted.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No vehicle is registered under the normalized plate.
    ///
    /// ## When This Occurs
    /// - Plate typed at the worksheet was never registered
    /// - Plate registered with a different character (O vs 0)
    ///
    /// Fatal when committing. The preview reports it as a structured result
    /// instead of raising this error.
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    /// A selected service id does not exist in the catalog.
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// A required selection (services, employees) is empty.
    #[error("At least one {field} must be selected")]
    EmptySelection { field: String },

    /// Payment method outside {cash, card, plan}.
    #[error("Invalid payment method: '{0}' (expected cash, card or plan)")]
    InvalidPaymentMethod(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Amount above the accepted ceiling.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: String },

    /// Invalid format (e.g., malformed amount).
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
        let err = CoreError::VehicleNotFound("AB1234".to_string());
        assert_eq!(err.to_string(), "Vehicle not found: AB1234");

        let err = CoreError::EmptySelection {
            field: "service".to_string(),
        };
        assert_eq!(err.to_string(), "At least one service must be selected");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "plate".to_string(),
        };
        assert_eq!(err.to_string(), "plate is required");

        let err = ValidationError::Negative {
            field: "discount".to_string(),
        };
        assert_eq!(err.to_string(), "discount must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "plate".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
