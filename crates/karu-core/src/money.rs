//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:  0.1 + 0.2 = 0.30000000000000004                          │
//! │                                                                         │
//! │  A till that sums float line totals drifts by fractions of a cent,      │
//! │  and 16% VAT on 10.99 is 1.7584, which has to land on a real cent.      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1099 cents × 1600 bps = 175.84 cents → 176 cents (half away from 0) │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use karu_core::money::Money;
//!
//! let price = Money::from_cents(1099);        // 10.99
//! let line_total = price.multiply_quantity(2); // 21.98
//! assert_eq!(line_total.cents(), 2198);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

const CENTS_PER_UNIT: i64 = 100;
const BPS_DENOMINATOR: i128 = 10_000;

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► CartLine.line_total ──► subtotal
///                                              │
///                          ┌───────────────────┼───────────────────┐
///                          ▼                   ▼                   ▼
///                      tax (16%)         discount (10%)      points = ⌊total/10⌋
///                          └─────────► total ◄─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// `bps` basis points of this amount, rounded half away from zero.
    ///
    /// ```rust
    /// use karu_core::money::Money;
    ///
    /// // 16% of 10.99 = 1.7584 → 1.76
    /// assert_eq!(Money::from_cents(1099).percentage(1600).cents(), 176);
    /// // 10% of 0.05 = 0.005 → 0.01
    /// assert_eq!(Money::from_cents(5).percentage(1000).cents(), 1);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        // widened so large totals cannot overflow mid-multiply
        let scaled = i128::from(self.0) * i128::from(bps);
        let half = BPS_DENOMINATOR / 2;
        let rounded = if scaled < 0 {
            (scaled - half) / BPS_DENOMINATOR
        } else {
            (scaled + half) / BPS_DENOMINATOR
        };
        Money(rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }

    /// Unit price times quantity. Saturates instead of wrapping.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

/// `$12.34` for logs. Screens format through the configured currency
/// symbol instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = CENTS_PER_UNIT as u64;
        write!(f, "{}${}.{:02}", sign, abs / unit, abs % unit)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(11600).to_string(), "$116.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_line_arithmetic() {
        let price = Money::from_cents(1000);
        let mut subtotal = price.multiply_quantity(3);
        subtotal += Money::from_cents(500);

        assert_eq!(subtotal.cents(), 3500);
        assert_eq!((subtotal - price).cents(), 2500);
    }

    #[test]
    fn test_vat_and_student_rates_on_round_amounts() {
        let hundred = Money::from_cents(10_000);
        assert_eq!(hundred.percentage(1600).cents(), 1_600);
        assert_eq!(hundred.percentage(1000).cents(), 1_000);
        assert_eq!(hundred.percentage(0).cents(), 0);
    }

    #[test]
    fn test_percentage_rounds_half_away_from_zero() {
        // 16% of 0.03 = 0.0048 → 0.00
        assert_eq!(Money::from_cents(3).percentage(1600).cents(), 0);
        // 10% of 0.15 = 0.015 → 0.02
        assert_eq!(Money::from_cents(15).percentage(1000).cents(), 2);
        assert_eq!(Money::from_cents(-15).percentage(1000).cents(), -2);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);

        assert_eq!(max.multiply_quantity(3).cents(), i64::MAX);
        assert_eq!((max + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);
        assert_eq!([max, max].iter().sum::<Money>().cents(), i64::MAX);
    }

    #[test]
    fn test_sum_of_totals() {
        let totals = [Money::from_cents(100), Money::from_cents(250)];
        assert_eq!(totals.iter().sum::<Money>().cents(), 350);
        assert!(Vec::<Money>::new().into_iter().sum::<Money>().is_zero());
    }
}
