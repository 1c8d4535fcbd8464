//! # Cart
//!
//! The transient checkout cart. It lives only for one checkout session and
//! is discarded on completion.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Scan / Add ──────────► add(product, qty) ──────► merge or push line    │
//! │                               │                                         │
//! │                               └── qty > known stock? reject, unchanged  │
//! │                                                                         │
//! │  +/- buttons ─────────► update_quantity(id, n) ─► n <= 0 removes line   │
//! │                               │                                         │
//! │                               └── n > known stock? reject, unchanged    │
//! │                                                                         │
//! │  Trash ───────────────► remove(id)                                      │
//! │  Sale completed ──────► clear()                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock checks use the quantity read when the product was loaded. Nothing
//! here reserves stock on the backend, so two tills can still oversell.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{NewTransactionItem, Product};
use crate::validation::validate_quantity;

/// A product snapshot with a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product fields as loaded when the line was created. The price and
    /// stock here are what checkout charges and decrements from.
    #[serde(flatten)]
    pub product: Product,

    pub quantity: i64,

    /// price × quantity, kept in step on every quantity change.
    pub line_total_cents: i64,
}

impl CartLine {
    fn new(product: &Product, quantity: i64) -> Self {
        CartLine {
            product: product.clone(),
            quantity,
            line_total_cents: product.price().multiply_quantity(quantity).cents(),
        }
    }

    fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.line_total_cents = self.product.price().multiply_quantity(quantity).cents();
    }

    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.product.price()
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }

    /// Stock level to write back once this line is sold.
    #[inline]
    pub fn remaining_stock(&self) -> i64 {
        self.product.stock_quantity - self.quantity
    }

    /// Line item payload for the given transaction.
    pub fn to_transaction_item(&self, transaction_id: &str) -> NewTransactionItem {
        NewTransactionItem {
            transaction_id: transaction_id.to_string(),
            product_id: self.product.id.clone(),
            quantity: self.quantity,
            unit_price_cents: self.product.price_cents,
            total_price_cents: self.line_total_cents,
        }
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding again merges quantities)
/// - Every line has quantity > 0
/// - No line's quantity exceeds its product's known stock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    /// Adds `quantity` of a product, merging into an existing line.
    ///
    /// ## Errors
    /// - `InsufficientStock` when the product alone, or the merged line,
    ///   would exceed the known stock. The cart is left unchanged.
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if product.stock_quantity < quantity {
            return Err(insufficient(product, quantity));
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            let new_quantity = line.quantity + quantity;
            if new_quantity > product.stock_quantity {
                return Err(insufficient(product, new_quantity));
            }
            line.set_quantity(new_quantity);
            return Ok(());
        }

        self.lines.push(CartLine::new(product, quantity));
        Ok(())
    }

    /// Replaces a line's quantity. Zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product.id == product_id)
            .ok_or_else(|| CoreError::NotInCart(product_id.to_string()))?;

        if quantity > line.product.stock_quantity {
            return Err(insufficient(&line.product, quantity));
        }

        line.set_quantity(quantity);
        Ok(())
    }

    pub fn remove(&mut self, product_id: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product.id != product_id);

        if self.lines.len() == before {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

fn insufficient(product: &Product, requested: i64) -> CoreError {
    CoreError::InsufficientStock {
        product: product.name.clone(),
        available: product.stock_quantity,
        requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents,
            stock_quantity: stock,
            min_stock_level: 10,
            barcode: None,
            is_active: true,
        }
    }

    #[test]
    fn test_add_new_line() {
        let mut cart = Cart::new();
        cart.add(&product("1", 999, 10), 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 1998);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let p = product("1", 500, 10);

        cart.add(&p, 2).unwrap();
        cart.add(&p, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line("1").unwrap().quantity, 5);
        assert_eq!(cart.line("1").unwrap().line_total_cents, 2500);
    }

    #[test]
    fn test_add_beyond_stock_is_rejected() {
        let mut cart = Cart::new();
        let err = cart.add(&product("1", 500, 2), 3).unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 2, requested: 3, .. }
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_merge_beyond_stock_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        let p = product("1", 500, 3);
        cart.add(&p, 2).unwrap();
        let before = cart.clone();

        let err = cart.add(&p, 2).unwrap_err();

        assert!(matches!(err, CoreError::InsufficientStock { requested: 4, .. }));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&product("1", 500, 3), 0),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add(&product("1", 250, 5), 1).unwrap();

        cart.update_quantity("1", 4).unwrap();

        let line = cart.line("1").unwrap();
        assert_eq!(line.quantity, 4);
        assert_eq!(line.line_total().cents(), 1000);
    }

    #[test]
    fn test_update_quantity_beyond_stock_is_rejected() {
        let mut cart = Cart::new();
        cart.add(&product("1", 250, 5), 5).unwrap();
        let before = cart.clone();

        assert!(cart.update_quantity("1", 6).is_err());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let mut cart = Cart::new();
        cart.add(&product("1", 250, 5), 2).unwrap();

        cart.update_quantity("1", 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_unknown_product() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.update_quantity("missing", 2),
            Err(CoreError::NotInCart(_))
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(&product("1", 100, 5), 1).unwrap();
        cart.add(&product("2", 200, 5), 1).unwrap();

        cart.remove("1").unwrap();
        assert_eq!(cart.line_count(), 1);
        assert!(cart.remove("1").is_err());

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());
    }

    #[test]
    fn test_line_projections() {
        let mut cart = Cart::new();
        cart.add(&product("1", 150, 8), 3).unwrap();
        let line = cart.line("1").unwrap();

        assert_eq!(line.remaining_stock(), 5);

        let item = line.to_transaction_item("txn-1");
        assert_eq!(item.transaction_id, "txn-1");
        assert_eq!(item.product_id, "1");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.unit_price_cents, 150);
        assert_eq!(item.total_price_cents, 450);
    }
}
