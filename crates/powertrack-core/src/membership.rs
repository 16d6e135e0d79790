//! # Plan Membership Detector
//!
//! Decides whether a vehicle is covered by an active client plan, and what
//! that means for the payment method.
//!
//! ## Detection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  links for vehicle (from powertrack-db)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  keep removed_at IS NULL                                               │
//! │       │                                                                 │
//! │       ├── none left? ──────────────► Membership::none()                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pick most recent assigned_at (tie: greatest plan id)                  │
//! │       │                                                                 │
//! │       ├── plan inactive? ──────────► Membership::none()                │
//! │       │                                                                 │
//! │       └── plan active ─────────────► Membership::active(plan_id)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both the committing path and the preview call [`detect_membership`]; there
//! is no second implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::PaymentMethod;

/// A plan link as seen by the detector: the link row plus its plan's
/// active flag.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanLink {
    pub client_plan_id: String,
    pub plan_active: bool,
    pub assigned_at: DateTime<Utc>,
    pub removed_at: Option<DateTime<Utc>>,
}

/// Outcome of membership detection: `(is_member, plan_id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Membership {
    client_plan_id: Option<String>,
}

impl Membership {
    pub fn none() -> Self {
        Membership { client_plan_id: None }
    }

    pub fn active(client_plan_id: impl Into<String>) -> Self {
        Membership {
            client_plan_id: Some(client_plan_id.into()),
        }
    }

    #[inline]
    pub fn is_member(&self) -> bool {
        self.client_plan_id.is_some()
    }

    #[inline]
    pub fn plan_id(&self) -> Option<&str> {
        self.client_plan_id.as_deref()
    }

    pub fn into_plan_id(self) -> Option<String> {
        self.client_plan_id
    }
}

/// Detects membership from every link row recorded for one vehicle.
///
/// Only links without a removal timestamp count. Should more than one be
/// open, the most recently assigned one wins, with the plan id as a final
/// tie-break, so the answer never depends on row order.
pub fn detect_membership(links: &[PlanLink]) -> Membership {
    let current = links
        .iter()
        .filter(|link| link.removed_at.is_none())
        .max_by(|a, b| {
            a.assigned_at
                .cmp(&b.assigned_at)
                .then_with(|| a.client_plan_id.cmp(&b.client_plan_id))
        });

    match current {
        Some(link) if link.plan_active => Membership::active(link.client_plan_id.clone()),
        _ => Membership::none(),
    }
}

/// The payment override decision point.
///
/// A member always pays by plan, whatever was requested. Everyone else keeps
/// the requested method.
///
/// ## Example
/// ```rust
/// use powertrack_core::membership::{resolve_payment_method, Membership};
/// use powertrack_core::PaymentMethod;
///
/// let member = Membership::active("plan-1");
/// assert_eq!(resolve_payment_method(PaymentMethod::Cash, &member), PaymentMethod::Plan);
/// assert_eq!(resolve_payment_method(PaymentMethod::Card, &Membership::none()), PaymentMethod::Card);
/// ```
pub fn resolve_payment_method(requested: PaymentMethod, membership: &Membership) -> PaymentMethod {
    if membership.is_member() {
        PaymentMethod::Plan
    } else {
        requested
    }
}
