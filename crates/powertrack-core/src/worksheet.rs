//! # Worksheet Quote
//!
//! The one pricing pass shared by the preview and the committing path.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PricedLine × n  (resolved per service by the caller)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  subtotal = Σ line prices                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply_adjustments(subtotal, discount?, fee?)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Quote { lines, subtotal, adjustments, total }                         │
//! │       │                                                                 │
//! │       ├── preview ──► returned to the UI                               │
//! │       └── commit  ──► TransactionDraft ──► one atomic write            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::adjustment::{apply_adjustments, AdjustmentInput, AdjustmentLine};
use crate::error::CoreResult;
use crate::money::Money;
use crate::pricing::{subtotal, PricedLine};
use crate::types::PaymentMethod;

/// A fully priced worksheet. Nothing here has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// In submission order, duplicates kept.
    pub lines: Vec<PricedLine>,
    pub subtotal: Money,
    pub adjustments: Vec<AdjustmentLine>,
    /// Clamped at zero.
    pub total: Money,
}

/// Prices a worksheet from already-resolved lines.
pub fn price_worksheet(
    lines: Vec<PricedLine>,
    discount: Option<&AdjustmentInput>,
    fee: Option<&AdjustmentInput>,
) -> CoreResult<Quote> {
    let subtotal = subtotal(&lines);
    let outcome = apply_adjustments(subtotal, discount, fee)?;

    Ok(Quote {
        lines,
        subtotal,
        adjustments: outcome.lines,
        total: outcome.total,
    })
}

/// Everything the store needs to write one transaction atomically.
///
/// Built by the recorder after every read and every check has passed, so the
/// write itself only has storage failures left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub vehicle_id: String,
    /// Set only when membership was detected.
    pub client_plan_id: Option<String>,
    /// Already overridden to `Plan` for members.
    pub payment_method: PaymentMethod,
    pub created_by: String,
    pub employee_ids: Vec<String>,
    pub notes: Option<String>,
    pub quote: Quote,
}

impl TransactionDraft {
    #[inline]
    pub fn total(&self) -> Money {
        self.quote.total
    }
}
