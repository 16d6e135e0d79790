//! # Domain Types
//!
//! Core domain types used throughout the wash POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  CATALOG                         REGISTRY                               │
//! │  ┌─────────────────┐            ┌─────────────────┐                    │
//! │  │ VehicleCategory │◄───────────│    Vehicle      │                    │
//! │  └────────┬────────┘            │  license_plate  │ (normalized)       │
//! │           │                     └────────┬────────┘                    │
//! │  ┌────────▼────────┐                     │       ┌─────────────────┐   │
//! │  │ ServicePricing  │            ┌────────▼──────┐│   ClientPlan    │   │
//! │  │ (svc, category) │            │ClientPlanVeh. ├►  is_active      │   │
//! │  └────────┬────────┘            │ removed_at?   │└─────────────────┘   │
//! │  ┌────────▼────────┐            └───────────────┘                      │
//! │  │    Service      │                                                    │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  SALES (append-only)                                                    │
//! │  ┌─────────────────┐  1..n  ┌──────────────────────────┐               │
//! │  │ WashTransaction │───────►│ WashTransactionService   │ (snapshot)    │
//! │  │ total_price     │───────►│ WashTransactionEmployee  │               │
//! │  │ payment_method  │───────►│ WashTransactionAdjustment│ 0..2          │
//! │  └─────────────────┘        └──────────────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by a UUID v4 string. Vehicles additionally carry a
//! unique business key: the normalized license plate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

/// Generates a fresh entity id (UUID v4, hyphenated).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a wash is paid for.
///
/// `Plan` is normally engine-assigned: an active client plan overrides
/// whatever the cashier picked (see [`crate::membership::resolve_payment_method`]).
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Billed to the client's membership plan.
    Plan,
}

impl PaymentMethod {
    /// Every accepted method, in display order.
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Plan];

    /// Wire/database spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Plan => "plan",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, whitespace-tolerant parse of `cash` / `card` / `plan`.
impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "plan" => Ok(PaymentMethod::Plan),
            _ => Err(CoreError::InvalidPaymentMethod(s.to_string())),
        }
    }
}

// =============================================================================
// Adjustment Kind
// =============================================================================

/// Kind of a transaction adjustment. Amounts are stored positive; the kind
/// gives the sign.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    /// Subtracted from the running total.
    Discount,
    /// Added to the running total.
    Fee,
}

impl AdjustmentKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AdjustmentKind::Discount => "discount",
            AdjustmentKind::Fee => "fee",
        }
    }

    /// Applies this adjustment to a running total (no clamping).
    ///
    /// Saturates rather than wrapping, so an extreme amount never flips sign.
    pub fn apply(&self, running: Money, amount: Money) -> Money {
        match self {
            AdjustmentKind::Discount => running.saturating_sub(amount),
            AdjustmentKind::Fee => running.saturating_add(amount),
        }
    }
}

// =============================================================================
// Billing Cycle
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    Monthly,
}

// =============================================================================
// Staff
// =============================================================================

/// A staff account. Credentials are managed outside the engine; only the
/// identity is referenced by transactions.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StaffMember {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub user_role: String,
    pub is_active: bool,
}

// =============================================================================
// Vehicle Registry
// =============================================================================

/// Pricing axis for vehicles (sedan, SUV, truck, ...).
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VehicleCategory {
    pub id: String,
    pub category_name: String,
}

/// A registered vehicle.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vehicle {
    pub id: String,
    /// Normalized plate (see [`crate::plate::normalize_plate`]). Unique.
    pub license_plate: String,
    pub vehicle_category_id: String,
    /// Free-text make and model, e.g. "Toyota Corolla".
    pub make_model: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Service Catalog
// =============================================================================

/// A wash offering. Soft-disabled through `is_active`, never deleted.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Service {
    pub id: String,
    pub service_name: String,
    pub service_description: Option<String>,
    pub is_active: bool,
}

/// Price of one service for one vehicle category. At most one row per pair.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServicePricing {
    pub id: String,
    pub service_id: String,
    pub vehicle_category_id: String,
    pub base_price_cents: i64,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ServicePricing {
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }
}

// =============================================================================
// Client Plans
// =============================================================================

/// A client's membership/billing arrangement.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientPlan {
    pub id: String,
    pub client_name: String,
    pub billing_cycle_type: BillingCycle,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Signature captured at signup. Opaque to the engine.
    #[serde(skip)]
    #[ts(skip)]
    pub client_signature: Vec<u8>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Link between a plan and a vehicle. "Currently linked" means
/// `removed_at` is unset.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientPlanVehicle {
    pub id: String,
    pub client_plan_id: String,
    pub vehicle_id: String,
    #[ts(as = "String")]
    pub assigned_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub removed_at: Option<DateTime<Utc>>,
}

impl ClientPlanVehicle {
    #[inline]
    pub fn is_current(&self) -> bool {
        self.removed_at.is_none()
    }
}

// =============================================================================
// Wash Transaction
// =============================================================================

/// Transaction header. Written once, never updated after commit.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WashTransaction {
    pub id: String,
    pub vehicle_id: String,
    /// Set only when an active plan was detected at sale time.
    pub client_plan_id: Option<String>,
    /// Always >= 0.
    pub total_price_cents: i64,
    pub payment_method: PaymentMethod,
    pub created_by_user_id: String,
    #[ts(as = "String")]
    pub logged_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl WashTransaction {
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// A service line frozen at sale time.
/// Uses snapshot pattern: name and price are copies, not catalog references.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WashTransactionService {
    pub id: String,
    pub wash_transaction_id: String,
    /// Order of the line within the worksheet (0-based). Duplicated service
    /// ids each get their own position.
    pub position: i64,
    pub service_id: String,
    /// Service name at time of sale (frozen).
    pub service_name_snapshot: String,
    /// Resolved price in cents at time of sale (frozen).
    pub service_price_snapshot_cents: i64,
}

impl WashTransactionService {
    #[inline]
    pub fn price_snapshot(&self) -> Money {
        Money::from_cents(self.service_price_snapshot_cents)
    }
}

/// Staff member who worked on the wash.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WashTransactionEmployee {
    pub id: String,
    pub wash_transaction_id: String,
    pub user_id: String,
}

/// A discount or fee applied to the transaction.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WashTransactionAdjustment {
    pub id: String,
    pub wash_transaction_id: String,
    pub adjustment_type: AdjustmentKind,
    /// Positive; sign given by `adjustment_type`.
    pub adjustment_amount_cents: i64,
    pub adjustment_reason: Option<String>,
}

impl WashTransactionAdjustment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.adjustment_amount_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
