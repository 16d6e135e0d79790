//! # Validation Module
//!
//! Worksheet input checks, run before anything is read or written.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Boundary (apps/worksheet)                                    │
//! │  ├── JSON shape, presence of required fields                           │
//! │  └── Decimal text → Money                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine (THIS MODULE, re-checked on every call)               │
//! │  ├── plate not empty after normalization                               │
//! │  ├── at least one service, at least one employee                       │
//! │  └── amounts not negative, text within column limits                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                        │
//! │  ├── CHECK constraints on cents columns                                │
//! │  └── Foreign keys on every child row                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::plate::normalize_plate;
use crate::{MAX_NOTES_LENGTH, MAX_PLATE_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Plate
// =============================================================================

/// Normalizes a plate and rejects what cannot identify a vehicle.
///
/// ## Example
/// ```rust
/// use powertrack_core::validation::validate_plate;
///
/// assert_eq!(validate_plate("ab-12 34").unwrap(), "AB1234");
/// assert!(validate_plate(" - ").is_err());
/// ```
pub fn validate_plate(raw: &str) -> ValidationResult<String> {
    let plate = normalize_plate(raw.trim());

    if plate.is_empty() {
        return Err(ValidationError::Required {
            field: "license plate".to_string(),
        });
    }

    if plate.chars().count() > MAX_PLATE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "license plate".to_string(),
            max: MAX_PLATE_LENGTH,
        });
    }

    Ok(plate)
}

// =============================================================================
// Selections
// =============================================================================

/// Requires a non-empty list of ids with no blank entries.
///
/// Duplicates are allowed: the same service twice is two lines, the same
/// employee twice is two rows.
pub fn validate_selection(field: &str, ids: &[String]) -> CoreResult<()> {
    if ids.is_empty() {
        return Err(CoreError::EmptySelection {
            field: field.to_string(),
        });
    }

    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(ValidationError::Required {
            field: format!("{field} id"),
        }
        .into());
    }

    Ok(())
}

// =============================================================================
// Amounts & Text
// =============================================================================

/// Parses a submitted decimal amount, rejecting negatives.
///
/// ## Example
/// ```rust
/// use powertrack_core::validation::parse_amount;
///
/// assert_eq!(parse_amount("fee", "2.5").unwrap().cents(), 250);
/// assert!(parse_amount("fee", "-1").is_err());
/// assert!(parse_amount("fee", "abc").is_err());
/// ```
pub fn parse_amount(field: &str, text: &str) -> ValidationResult<Money> {
    let amount: Money = text.parse().map_err(|e: crate::money::ParseMoneyError| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        }
    })?;

    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(amount)
}

/// Trims free-text notes; blank notes become `None`.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LENGTH,
        });
    }

    Ok(Some(notes.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
