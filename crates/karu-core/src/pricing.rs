//! # Pricing
//!
//! Checkout arithmetic as pure functions of the cart and the selected
//! customer.
//!
//! ```text
//! subtotal = Σ line totals
//! tax      = subtotal × 16%
//! discount = subtotal × 10%   (student customers only)
//! total    = subtotal + tax − discount
//! points   = ⌊total / 10⌋
//! ```
//!
//! Tax and discount round to the nearest cent for the stored amounts.
//! Points use the unrounded total, so 8.62 (total 9.9992) earns none.
//! There is no guard against a negative total.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::Money;
use crate::types::Customer;
use crate::{CENTS_PER_LOYALTY_POINT, STUDENT_DISCOUNT_BPS, TAX_RATE_BPS};

const BPS_DENOMINATOR: u32 = 10_000;

/// Totals shown in the cart panel and written to the transaction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingBreakdown {
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
    pub points_earned: i64,
}

impl PricingBreakdown {
    /// Prices the cart for an optional customer.
    pub fn compute(cart: &Cart, customer: Option<&Customer>) -> Self {
        let is_student = customer.is_some_and(|c| c.is_student);
        Self::from_subtotal(cart.subtotal(), is_student)
    }

    /// Prices a bare subtotal.
    ///
    /// ```rust
    /// use karu_core::{Money, PricingBreakdown};
    ///
    /// let student = PricingBreakdown::from_subtotal(Money::from_cents(10_000), true);
    /// assert_eq!(student.discount.cents(), 1_000);
    /// assert_eq!(student.total.cents(), 10_600);
    /// assert_eq!(student.points_earned, 10);
    /// ```
    pub fn from_subtotal(subtotal: Money, is_student: bool) -> Self {
        let tax = tax_for(subtotal);
        let discount = discount_for(subtotal, is_student);
        let total = subtotal + tax - discount;

        PricingBreakdown {
            subtotal,
            tax,
            discount,
            total,
            points_earned: loyalty_points_for(subtotal, is_student),
        }
    }

    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }
}

/// VAT on a subtotal.
pub fn tax_for(subtotal: Money) -> Money {
    subtotal.percentage(TAX_RATE_BPS)
}

/// Student discount on a subtotal; zero for everyone else.
pub fn discount_for(subtotal: Money, is_student: bool) -> Money {
    if is_student {
        subtotal.percentage(STUDENT_DISCOUNT_BPS)
    } else {
        Money::zero()
    }
}

/// One point per full 10.00 of the unrounded total, floored.
pub fn loyalty_points_for(subtotal: Money, is_student: bool) -> i64 {
    let discount_bps = if is_student { STUDENT_DISCOUNT_BPS } else { 0 };
    let rate_bps = i128::from(BPS_DENOMINATOR + TAX_RATE_BPS - discount_bps);
    // total in hundredths of a cent, exact
    let scaled_total = i128::from(subtotal.cents()) * rate_bps;
    let per_point = i128::from(BPS_DENOMINATOR) * i128::from(CENTS_PER_LOYALTY_POINT);
    scaled_total.div_euclid(per_point) as i64
}
