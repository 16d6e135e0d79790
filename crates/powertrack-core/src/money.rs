//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Prices, snapshots, adjustments and totals are i64 cents.            │
//! │    Amounts enter as decimal text ("2.50") and leave as decimal         │
//! │    text ("27.00"). A float never touches a stored total.               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use powertrack_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let fee: Money = "2.00".parse().unwrap();
//!
//! assert_eq!((price + fee).to_decimal_string(), "12.99");
//! assert_eq!(Money::from_cents(-500).clamp_non_negative(), Money::zero());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// ServicePricing.base_price_cents ──► PricedLine.price ──► snapshot row
///                                            │
///                                            ▼
///                          subtotal ─ discount + fee ──► clamp ──► total
/// ```
///
/// Signed so that an intermediate total can dip below zero before the clamp;
/// nothing negative is ever persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use powertrack_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds, pinning at `i64::MAX`/`i64::MIN` instead of wrapping.
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtracts, pinning at `i64::MAX`/`i64::MIN` instead of wrapping.
    #[inline]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }

    /// Floors the value at zero.
    ///
    /// ## Example
    /// ```rust
    /// use powertrack_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-300).clamp_non_negative().cents(), 0);
    /// assert_eq!(Money::from_cents(300).clamp_non_negative().cents(), 300);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Formats the amount as exact decimal text with two fraction digits.
    ///
    /// This is the wire format for totals: no currency symbol, no float.
    ///
    /// ## Example
    /// ```rust
    /// use powertrack_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(2700).to_decimal_string(), "27.00");
    /// assert_eq!(Money::from_cents(5).to_decimal_string(), "0.05");
    /// assert_eq!(Money::from_cents(-550).to_decimal_string(), "-5.50");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Errors from parsing decimal text into [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a decimal amount")]
    Malformed(String),

    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),

    #[error("'{0}' is out of range")]
    Overflow(String),
}

/// Parses decimal text such as `"10"`, `"10.5"`, `"10.50"` or `"-3.25"`.
///
/// Fraction digits beyond the second are accepted only when they are zeros
/// (`"2.500"`), so no value is ever rounded.
impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (negative, unsigned) = match text.as_bytes()[0] {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (unsigned, None),
        };

        let malformed = || ParseMoneyError::Malformed(text.to_string());

        if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
            return Err(malformed());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let frac_digits = match frac_part {
            Some(frac) => {
                if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed());
                }
                if frac.len() > 2 && !frac[2..].bytes().all(|b| b == b'0') {
                    return Err(ParseMoneyError::TooPrecise(text.to_string()));
                }
                &frac[..frac.len().min(2)]
            }
            None => "",
        };

        let overflow = || ParseMoneyError::Overflow(text.to_string());

        let mut cents: i64 = 0;
        for b in int_part.bytes() {
            cents = cents
                .checked_mul(10)
                .and_then(|c| c.checked_add(i64::from(b - b'0')))
                .ok_or_else(overflow)?;
        }
        cents = cents.checked_mul(100).ok_or_else(overflow)?;

        let mut minor: i64 = 0;
        for b in frac_digits.bytes() {
            minor = minor * 10 + i64::from(b - b'0');
        }
        if frac_digits.len() == 1 {
            minor *= 10;
        }
        cents = cents.checked_add(minor).ok_or_else(overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// For logs only. The wire format is [`Money::to_decimal_string`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
