//! # Pricing Resolver
//!
//! Turns a (service, vehicle category) lookup into the price charged.
//!
//! A missing pricing row is a configuration gap, not an error: the line is
//! charged at zero and the sale goes through. Spotting a 0.00 line is the
//! catalog administrator's job.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Resolves the configured base price, or zero when nothing is configured.
///
/// ## Example
/// ```rust
/// use powertrack_core::money::Money;
/// use powertrack_core::pricing::resolve_base_price;
///
/// assert_eq!(resolve_base_price(Some(Money::from_cents(1000))).cents(), 1000);
/// assert_eq!(resolve_base_price(None), Money::zero());
/// ```
#[inline]
pub fn resolve_base_price(configured: Option<Money>) -> Money {
    configured.unwrap_or_else(Money::zero)
}

/// One priced service on a worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub service_id: String,
    pub service_name: String,
    pub price: Money,
}

impl PricedLine {
    pub fn new(service_id: impl Into<String>, service_name: impl Into<String>, price: Money) -> Self {
        PricedLine {
            service_id: service_id.into(),
            service_name: service_name.into(),
            price,
        }
    }
}

/// Sum of line prices, before adjustments.
pub fn subtotal(lines: &[PricedLine]) -> Money {
    lines
        .iter()
        .fold(Money::zero(), |acc, line| acc.saturating_add(line.price))
}
