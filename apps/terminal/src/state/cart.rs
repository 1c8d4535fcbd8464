//! # Sale Session State
//!
//! Holds the open sale: the cart, the selected customer and the payment
//! method. It is discarded when the sale completes.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Session Operations                              │
//! │                                                                         │
//! │  Cashier Action           Command                 Session Change        │
//! │  ──────────────           ───────                 ──────────────        │
//! │                                                                         │
//! │  Pick product ───────────► add_to_cart() ───────► cart.add(p, 1)       │
//! │  Scan barcode ───────────► scan_barcode() ──────► cart.add(p, 1)       │
//! │  Change quantity ────────► update_cart_item() ──► cart.update(id, n)   │
//! │  Remove ─────────────────► remove_from_cart() ──► cart.remove(id)      │
//! │  Pick customer ──────────► select_customer() ───► customer = Some(c)   │
//! │  Pick payment ───────────► set_payment_method() ► payment_method = m   │
//! │  Complete ───────────────► checkout() ──────────► reset() on success   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use karu_core::{Cart, CartLine, Customer, PaymentMethod, PricingBreakdown};

/// The open sale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleSession {
    pub cart: Cart,
    pub customer: Option<Customer>,
    pub payment_method: PaymentMethod,
}

impl SaleSession {
    pub fn pricing(&self) -> PricingBreakdown {
        PricingBreakdown::compute(&self.cart, self.customer.as_ref())
    }

    /// Back to an empty cart, no customer, cash.
    pub fn reset(&mut self) {
        self.cart.clear();
        self.customer = None;
        self.payment_method = PaymentMethod::Cash;
    }
}

/// Cart panel contents.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_quantity: i64,
    pub pricing: PricingBreakdown,
    pub customer: Option<Customer>,
    pub payment_method: PaymentMethod,

    /// Only shown once a customer is selected.
    pub points_to_earn: Option<i64>,
}

impl From<&SaleSession> for CartView {
    fn from(session: &SaleSession) -> Self {
        let pricing = session.pricing();
        CartView {
            lines: session.cart.lines().to_vec(),
            total_quantity: session.cart.total_quantity(),
            pricing,
            customer: session.customer.clone(),
            payment_method: session.payment_method,
            points_to_earn: session.customer.as_ref().map(|_| pricing.points_earned),
        }
    }
}

/// Shared sale session.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<SaleSession>>`. Every operation is short and most
/// modify state, so a plain mutex is enough. The lock is never held
/// across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    session: Arc<Mutex<SaleSession>>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let view = cart_state.with_session(|s| CartView::from(s));
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SaleSession) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Runs `f` with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SaleSession) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    /// Copy of the session, for work that spans backend calls.
    pub fn snapshot(&self) -> SaleSession {
        self.with_session(SaleSession::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karu_core::Product;

    fn product() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Bread White 400g".to_string(),
            price_cents: 6_500,
            stock_quantity: 10,
            min_stock_level: 10,
            barcode: None,
            is_active: true,
        }
    }

    fn student() -> Customer {
        Customer {
            id: "c-1".to_string(),
            name: "Amina Wanjiru".to_string(),
            phone: "0712000001".to_string(),
            loyalty_points: 0,
            is_student: true,
            total_spent_cents: 0,
        }
    }

    #[test]
    fn test_points_hidden_without_customer() {
        let state = CartState::new();
        state.with_session_mut(|s| s.cart.add(&product(), 2)).unwrap();

        let view = state.with_session(|s| CartView::from(s));
        assert_eq!(view.pricing.subtotal.cents(), 13_000);
        assert_eq!(view.points_to_earn, None);
    }

    #[test]
    fn test_student_customer_gets_discount_and_points() {
        let state = CartState::new();
        state.with_session_mut(|s| {
            s.cart.add(&product(), 2).unwrap();
            s.customer = Some(student());
        });

        let view = state.with_session(|s| CartView::from(s));
        assert_eq!(view.pricing.discount.cents(), 1_300);
        // 130 + 20.80 - 13 = 137.80
        assert_eq!(view.pricing.total.cents(), 13_780);
        assert_eq!(view.points_to_earn, Some(13));
    }

    #[test]
    fn test_reset_returns_to_cash() {
        let state = CartState::new();
        state.with_session_mut(|s| {
            s.cart.add(&product(), 1).unwrap();
            s.customer = Some(student());
            s.payment_method = PaymentMethod::Mpesa;
        });

        state.with_session_mut(SaleSession::reset);

        assert_eq!(state.snapshot(), SaleSession::default());
    }
}
