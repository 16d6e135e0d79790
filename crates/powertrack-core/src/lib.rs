//! # powertrack-core: Pure Business Logic for the Wash POS
//!
//! Everything that decides what a wash costs lives here, as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PowerTrack Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Daily Worksheet (UI)                            │   │
//! │  │    Plate ──► Services ──► Staff ──► Adjustments ──► Payment    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         apps/worksheet  ──►  powertrack-engine                  │   │
//! │  │         (boundary)           (recorder, preview)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ powertrack-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌────────────┐ ┌─────────┐ ┌────────────────┐    │   │
//! │  │   │  plate  │ │ membership │ │ pricing │ │   adjustment   │    │   │
//! │  │   └─────────┘ └────────────┘ └─────────┘ └────────────────┘    │   │
//! │  │   ┌─────────┐ ┌────────────┐ ┌─────────┐ ┌────────────────┐    │   │
//! │  │   │  money  │ │   types    │ │worksheet│ │   validation   │    │   │
//! │  │   └─────────┘ └────────────┘ └─────────┘ └────────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                powertrack-db (Database Layer)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Vehicle, Service, ClientPlan, WashTransaction, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`plate`] - License plate normalization
//! - [`membership`] - Client plan membership detection and payment override
//! - [`pricing`] - Base price resolution per (service, vehicle category)
//! - [`adjustment`] - Discount / fee application with the zero clamp
//! - [`worksheet`] - The priced quote shared by preview and commit
//! - [`validation`] - Worksheet input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use powertrack_core::money::Money;
//! use powertrack_core::plate::normalize_plate;
//! use powertrack_core::pricing::{resolve_base_price, PricedLine};
//! use powertrack_core::worksheet::price_worksheet;
//! use powertrack_core::adjustment::AdjustmentInput;
//!
//! assert_eq!(normalize_plate("ab-12 34"), "AB1234");
//!
//! let lines = vec![
//!     PricedLine::new("svc-x", "Exterior", resolve_base_price(Some(Money::from_cents(1000)))),
//!     PricedLine::new("svc-y", "Interior", resolve_base_price(Some(Money::from_cents(1500)))),
//! ];
//! let fee = AdjustmentInput::new(Money::from_cents(200), Some("Mud".to_string()));
//! let quote = price_worksheet(lines, None, Some(&fee)).unwrap();
//!
//! assert_eq!(quote.total.to_decimal_string(), "27.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adjustment;
pub mod error;
pub mod membership;
pub mod money;
pub mod plate;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod worksheet;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest plate accepted after normalization (matches the `vehicles` column).
pub const MAX_PLATE_LENGTH: usize = 20;

/// Longest reason string stored on an adjustment row.
pub const MAX_ADJUSTMENT_REASON_LENGTH: usize = 100;

/// Longest free-text note kept on a transaction header.
pub const MAX_NOTES_LENGTH: usize = 500;

/// Largest discount or fee accepted on one worksheet, in cents (1,000,000.00).
pub const MAX_ADJUSTMENT_CENTS: i64 = 100_000_000;
