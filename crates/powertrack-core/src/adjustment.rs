//! # Adjustment Calculator
//!
//! Applies an optional discount and an optional fee to a running total.
//!
//! ## Order of Operations
//! ```text
//! running total
//!      │
//!      ▼
//! − discount   (skipped when absent or zero)
//!      │
//!      ▼
//! + fee        (skipped when absent or zero)
//!      │
//!      ▼
//! max(·, 0)    ◄── a discount bigger than the subtotal is absorbed here
//! ```
//!
//! Each applied amount also yields an [`AdjustmentLine`], which the
//! committing path persists as an audit row.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{AdjustmentKind, WashTransactionAdjustment};
use crate::{MAX_ADJUSTMENT_CENTS, MAX_ADJUSTMENT_REASON_LENGTH};

/// A requested discount or fee, as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentInput {
    pub amount: Money,
    pub reason: Option<String>,
}

impl AdjustmentInput {
    /// Blank reasons are treated as absent.
    pub fn new(amount: Money, reason: Option<String>) -> Self {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        AdjustmentInput { amount, reason }
    }
}

/// An adjustment that was actually applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentLine {
    pub kind: AdjustmentKind,
    /// Always positive.
    pub amount: Money,
    pub reason: Option<String>,
}

/// Result of [`apply_adjustments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentOutcome {
    /// Clamped total, never negative.
    pub total: Money,
    /// Zero, one or two lines: discount first, then fee.
    pub lines: Vec<AdjustmentLine>,
}

/// Subtracts the discount, adds the fee, clamps at zero.
///
/// ## Errors
/// Negative amounts, amounts above [`MAX_ADJUSTMENT_CENTS`] and over-long
/// reasons are rejected. Amounts are stored positive; the kind carries the sign.
///
/// ## Example
/// ```rust
/// use powertrack_core::adjustment::{apply_adjustments, AdjustmentInput};
/// use powertrack_core::money::Money;
///
/// let discount = AdjustmentInput::new(Money::from_cents(5000), Some("Loyalty".into()));
/// let outcome = apply_adjustments(Money::from_cents(2500), Some(&discount), None).unwrap();
///
/// assert_eq!(outcome.total, Money::zero());
/// assert_eq!(outcome.lines.len(), 1);
/// ```
pub fn apply_adjustments(
    running_total: Money,
    discount: Option<&AdjustmentInput>,
    fee: Option<&AdjustmentInput>,
) -> CoreResult<AdjustmentOutcome> {
    let mut total = running_total;
    let mut lines = Vec::with_capacity(2);

    for (kind, input) in [(AdjustmentKind::Discount, discount), (AdjustmentKind::Fee, fee)] {
        let Some(input) = input else { continue };
        validate_adjustment(kind, input)?;

        if input.amount.is_zero() {
            continue;
        }

        total = kind.apply(total, input.amount);
        lines.push(AdjustmentLine {
            kind,
            amount: input.amount,
            reason: input.reason.clone(),
        });
    }

    Ok(AdjustmentOutcome {
        total: total.clamp_non_negative(),
        lines,
    })
}

fn validate_adjustment(kind: AdjustmentKind, input: &AdjustmentInput) -> Result<(), ValidationError> {
    if input.amount.is_negative() {
        return Err(ValidationError::Negative {
            field: kind.as_str().to_string(),
        });
    }

    if input.amount.cents() > MAX_ADJUSTMENT_CENTS {
        return Err(ValidationError::TooLarge {
            field: kind.as_str().to_string(),
            max: Money::from_cents(MAX_ADJUSTMENT_CENTS).to_decimal_string(),
        });
    }

    if let Some(reason) = &input.reason {
        if reason.chars().count() > MAX_ADJUSTMENT_REASON_LENGTH {
            return Err(ValidationError::TooLong {
                field: format!("{} reason", kind.as_str()),
                max: MAX_ADJUSTMENT_REASON_LENGTH,
            });
        }
    }

    Ok(())
}

/// Rebuilds a committed total from its persisted rows.
///
/// `Σ snapshot prices − discounts + fees`, clamped at zero. Used to audit a
/// stored header against its children.
pub fn reconstruct_total(
    snapshot_prices: impl IntoIterator<Item = Money>,
    adjustments: &[WashTransactionAdjustment],
) -> Money {
    let subtotal = snapshot_prices
        .into_iter()
        .fold(Money::zero(), Money::saturating_add);
    adjustments
        .iter()
        .fold(subtotal, |running, adj| adj.adjustment_type.apply(running, adj.amount()))
        .clamp_non_negative()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn input(cents: i64, reason: &str) -> AdjustmentInput {
        AdjustmentInput::new(Money::from_cents(cents), Some(reason.to_string()))
    }

    #[test]
    fn test_no_adjustments() {
        let outcome = apply_adjustments(Money::from_cents(2500), None, None).unwrap();
        assert_eq!(outcome.total.cents(), 2500);
        assert!(outcome.lines.is_empty());
    }

    #[test]
    fn test_fee_only() {
        let fee = input(200, "Extra dirty");
        let outcome = apply_adjustments(Money::from_cents(2500), None, Some(&fee)).unwrap();
        assert_eq!(outcome.total.cents(), 2700);
        assert_eq!(
            outcome.lines,
            vec![AdjustmentLine {
                kind: AdjustmentKind::Fee,
                amount: Money::from_cents(200),
                reason: Some("Extra dirty".to_string()),
            }]
        );
    }

    #[test]
    fn test_discount_then_fee() {
        let discount = input(500, "Promo");
        let fee = input(300, "Pet hair");
        let outcome =
            apply_adjustments(Money::from_cents(2000), Some(&discount), Some(&fee)).unwrap();
        assert_eq!(outcome.total.cents(), 1800);
        assert_eq!(outcome.lines[0].kind, AdjustmentKind::Discount);
        assert_eq!(outcome.lines[1].kind, AdjustmentKind::Fee);
    }

    #[test]
    fn test_oversized_discount_clamps_to_zero() {
        let discount = input(10_000, "Goodwill");
        let outcome = apply_adjustments(Money::from_cents(2500), Some(&discount), None).unwrap();
        assert_eq!(outcome.total, Money::zero());
        assert_eq!(outcome.lines.len(), 1);
    }

    #[test]
    fn test_clamp_happens_after_fee() {
        // 10.00 - 15.00 + 2.00 = -3.00 → 0.00
        let discount = input(1500, "Goodwill");
        let fee = input(200, "Mud");
        let outcome =
            apply_adjustments(Money::from_cents(1000), Some(&discount), Some(&fee)).unwrap();
        assert_eq!(outcome.total, Money::zero());
    }

    #[test]
    fn test_zero_amounts_produce_no_rows() {
        let discount = input(0, "none");
        let fee = input(0, "none");
        let outcome =
            apply_adjustments(Money::from_cents(1000), Some(&discount), Some(&fee)).unwrap();
        assert_eq!(outcome.total.cents(), 1000);
        assert!(outcome.lines.is_empty());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let discount = input(-100, "sneaky");
        let err = apply_adjustments(Money::from_cents(1000), Some(&discount), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Negative { ref field }) if field == "discount"
        ));
    }

    #[test]
    fn test_huge_fee_rejected() {
        let fee = AdjustmentInput::new(Money::from_cents(i64::MAX), Some("Typo".to_string()));
        let err = apply_adjustments(Money::from_cents(2500), None, Some(&fee)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooLarge { ref field, .. }) if field == "fee"
        ));
        assert_eq!(err.to_string(), "Validation error: fee must be at most 1000000.00");
    }

    #[test]
    fn test_fee_at_ceiling_accepted() {
        let fee = input(MAX_ADJUSTMENT_CENTS, "Fleet contract");
        let outcome = apply_adjustments(Money::from_cents(2500), None, Some(&fee)).unwrap();
        assert_eq!(outcome.total.cents(), MAX_ADJUSTMENT_CENTS + 2500);
    }

    #[test]
    fn test_reconstruct_total_saturates() {
        let fee = WashTransactionAdjustment {
            id: "a1".to_string(),
            wash_transaction_id: "t1".to_string(),
            adjustment_type: AdjustmentKind::Fee,
            adjustment_amount_cents: i64::MAX,
            adjustment_reason: None,
        };
        let prices = [Money::from_cents(i64::MAX), Money::from_cents(2500)];
        assert_eq!(reconstruct_total(prices, &[fee]).cents(), i64::MAX);
    }

    #[test]
    fn test_blank_reason_is_absent() {
        let fee = AdjustmentInput::new(Money::from_cents(100), Some("   ".to_string()));
        assert_eq!(fee.reason, None);
    }

    #[test]
    fn test_long_reason_rejected() {
        let fee = input(100, &"x".repeat(MAX_ADJUSTMENT_REASON_LENGTH + 1));
        assert!(apply_adjustments(Money::zero(), None, Some(&fee)).is_err());
    }

    #[test]
    fn test_reconstruct_total() {
        let adjustments = vec![
            WashTransactionAdjustment {
                id: "a1".to_string(),
                wash_transaction_id: "t1".to_string(),
                adjustment_type: AdjustmentKind::Discount,
                adjustment_amount_cents: 500,
                adjustment_reason: None,
            },
            WashTransactionAdjustment {
                id: "a2".to_string(),
                wash_transaction_id: "t1".to_string(),
                adjustment_type: AdjustmentKind::Fee,
                adjustment_amount_cents: 200,
                adjustment_reason: None,
            },
        ];
        let prices = [Money::from_cents(1000), Money::from_cents(1500)];
        assert_eq!(reconstruct_total(prices, &adjustments).cents(), 2200);
        assert_eq!(reconstruct_total([Money::from_cents(100)], &adjustments), Money::zero());
    }
}
