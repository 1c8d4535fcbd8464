//! # Cart Commands
//!
//! Cart and session manipulation for the sales screen.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Customer │────►│ Complete │       │
//! │  │  Cart    │     │          │     │ Payment  │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                 │              │
//! │                   add_to_cart                       checkout           │
//! │                   scan_barcode                      (sale.rs)          │
//! │                   update_cart_item                       │              │
//! │                   remove_from_cart                       ▼              │
//! │                                                   (back to empty)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock checks compare against the catalog snapshot, not the backend.

use tracing::debug;

use crate::error::{ApiError, Notice};
use crate::state::{CartState, CartView, CatalogState};
use karu_core::validation::normalize_barcode;
use karu_core::{CoreError, PaymentMethod};

pub fn get_cart(cart: &CartState) -> CartView {
    cart.with_session(|s| CartView::from(s))
}

/// Adds a catalog product to the cart.
///
/// ## Errors
/// - `NOT_FOUND` when the id is not in the loaded catalog
/// - `INSUFFICIENT_STOCK` ("Only N items available"), cart unchanged
pub fn add_to_cart(
    catalog: &CatalogState,
    cart: &CartState,
    product_id: &str,
    quantity: i64,
) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, quantity, "add_to_cart command");

    let product = catalog
        .product(product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    cart.with_session_mut(|s| s.cart.add(&product, quantity))?;
    Ok(get_cart(cart))
}

/// Looks up a scanned or typed barcode and adds one unit.
///
/// Blank input is ignored and yields no notice. Input that cannot be a
/// barcode (too long, inner spaces) is reported like any other miss.
pub fn scan_barcode(
    catalog: &CatalogState,
    cart: &CartState,
    input: &str,
) -> Result<Option<Notice>, ApiError> {
    let code = match normalize_barcode(input) {
        Ok(Some(code)) => code,
        Ok(None) => return Ok(None),
        Err(e) => {
            debug!(error = %e, "Unusable barcode input");
            return Err(CoreError::BarcodeNotFound(input.trim().to_string()).into());
        }
    };
    debug!(barcode = %code, "scan_barcode command");

    let product = catalog
        .find_by_barcode(&code)
        .ok_or(CoreError::BarcodeNotFound(code))?;

    cart.with_session_mut(|s| s.cart.add(&product, 1))?;

    Ok(Some(Notice::info(
        "Product Added",
        format!("{} added to cart", product.name),
    )))
}

/// Sets a line's quantity. Zero or less removes it.
pub fn update_cart_item(
    cart: &CartState,
    product_id: &str,
    quantity: i64,
) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, quantity, "update_cart_item command");

    cart.with_session_mut(|s| s.cart.update_quantity(product_id, quantity))?;
    Ok(get_cart(cart))
}

pub fn remove_from_cart(cart: &CartState, product_id: &str) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, "remove_from_cart command");

    cart.with_session_mut(|s| s.cart.remove(product_id))?;
    Ok(get_cart(cart))
}

pub fn clear_cart(cart: &CartState) -> CartView {
    cart.with_session_mut(|s| s.cart.clear());
    get_cart(cart)
}

/// Selects a loaded customer, or clears the selection with `None`.
pub fn select_customer(
    catalog: &CatalogState,
    cart: &CartState,
    customer_id: Option<&str>,
) -> Result<CartView, ApiError> {
    let customer = match customer_id {
        Some(id) => Some(
            catalog
                .customer(id)
                .ok_or_else(|| ApiError::not_found("Customer", id))?,
        ),
        None => None,
    };

    cart.with_session_mut(|s| s.customer = customer);
    Ok(get_cart(cart))
}

pub fn set_payment_method(cart: &CartState, method: &str) -> Result<CartView, ApiError> {
    let method: PaymentMethod = method.parse().map_err(CoreError::from)?;

    cart.with_session_mut(|s| s.payment_method = method);
    Ok(get_cart(cart))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use karu_core::{Customer, Product};

    fn setup() -> (CatalogState, CartState) {
        let catalog = CatalogState::new();
        catalog.replace_products(vec![
            Product {
                id: "p-1".to_string(),
                name: "Milk Fresh 500ml".to_string(),
                price_cents: 6_000,
                stock_quantity: 3,
                min_stock_level: 10,
                barcode: Some("6161100220017".to_string()),
                is_active: true,
            },
            Product {
                id: "p-2".to_string(),
                name: "Sugar 1kg".to_string(),
                price_cents: 18_000,
                stock_quantity: 30,
                min_stock_level: 10,
                barcode: None,
                is_active: true,
            },
        ]);
        catalog.replace_customers(vec![Customer {
            id: "c-1".to_string(),
            name: "Felix Mwangi".to_string(),
            phone: "0712000006".to_string(),
            loyalty_points: 4,
            is_student: true,
            total_spent_cents: 0,
        }]);
        (catalog, CartState::new())
    }

    #[test]
    fn test_add_beyond_stock_leaves_cart_unchanged() {
        let (catalog, cart) = setup();
        add_to_cart(&catalog, &cart, "p-1", 2).unwrap();

        let err = add_to_cart(&catalog, &cart, "p-1", 2).unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Only 3 items available");
        assert_eq!(get_cart(&cart).lines[0].quantity, 2);
    }

    #[test]
    fn test_add_unknown_product() {
        let (catalog, cart) = setup();
        let err = add_to_cart(&catalog, &cart, "p-404", 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_scan_barcode_hit_adds_one() {
        let (catalog, cart) = setup();

        let notice = scan_barcode(&catalog, &cart, "  6161100220017 ").unwrap().unwrap();

        assert_eq!(notice.title, "Product Added");
        assert_eq!(notice.description, "Milk Fresh 500ml added to cart");
        assert_eq!(get_cart(&cart).lines[0].quantity, 1);
    }

    #[test]
    fn test_scan_barcode_miss_and_blank() {
        let (catalog, cart) = setup();

        let err = scan_barcode(&catalog, &cart, "0000000000000").unwrap_err();
        assert_eq!(err.notice().title, "Product Not Found");
        assert_eq!(err.notice().description, "No product found with this barcode");

        assert!(scan_barcode(&catalog, &cart, "   ").unwrap().is_none());
        assert!(get_cart(&cart).lines.is_empty());
    }

    #[test]
    fn test_scan_barcode_malformed_input_is_a_miss() {
        let (catalog, cart) = setup();

        for input in ["9".repeat(80), "12 34".to_string()] {
            let err = scan_barcode(&catalog, &cart, &input).unwrap_err();
            assert_eq!(err.code, ErrorCode::ProductNotFound);
            assert_eq!(err.notice().title, "Product Not Found");
        }
        assert!(get_cart(&cart).lines.is_empty());
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let (catalog, cart) = setup();
        add_to_cart(&catalog, &cart, "p-2", 1).unwrap();

        let view = update_cart_item(&cart, "p-2", 0).unwrap();
        assert!(view.lines.is_empty());
    }

    #[test]
    fn test_customer_and_payment_selection() {
        let (catalog, cart) = setup();
        add_to_cart(&catalog, &cart, "p-2", 1).unwrap();

        let view = select_customer(&catalog, &cart, Some("c-1")).unwrap();
        assert!(view.pricing.has_discount());
        assert_eq!(view.points_to_earn, Some(19));

        let view = set_payment_method(&cart, "mpesa").unwrap();
        assert_eq!(view.payment_method, PaymentMethod::Mpesa);

        assert!(set_payment_method(&cart, "cheque").is_err());
        assert!(select_customer(&catalog, &cart, Some("c-404")).is_err());
    }
}
