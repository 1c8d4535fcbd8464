//! # Catalog State
//!
//! Products and customers as last loaded by the sales screen. Barcode
//! scans and stock pre-checks read from here, never from the backend.

use std::sync::{Arc, PoisonError, RwLock};

use karu_core::{Customer, Product};

#[derive(Debug, Default)]
struct Catalog {
    products: Vec<Product>,
    customers: Vec<Customer>,
}

/// Shared catalog snapshot.
///
/// Reads vastly outnumber the reloads, hence `RwLock`.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    inner: Arc<RwLock<Catalog>>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_products(&self, products: Vec<Product>) {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).products = products;
    }

    pub fn replace_customers(&self, customers: Vec<Customer>) {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).customers = customers;
    }

    pub fn products(&self) -> Vec<Product> {
        self.read(|c| c.products.clone())
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.read(|c| c.customers.clone())
    }

    pub fn product(&self, id: &str) -> Option<Product> {
        self.read(|c| c.products.iter().find(|p| p.id == id).cloned())
    }

    pub fn customer(&self, id: &str) -> Option<Customer> {
        self.read(|c| c.customers.iter().find(|cu| cu.id == id).cloned())
    }

    /// Exact match on an already trimmed barcode.
    pub fn find_by_barcode(&self, code: &str) -> Option<Product> {
        self.read(|c| {
            c.products
                .iter()
                .find(|p| p.barcode.as_deref() == Some(code))
                .cloned()
        })
    }

    fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Catalog) -> R,
    {
        let catalog = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, barcode: Option<&str>) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents: 1_000,
            stock_quantity: 5,
            min_stock_level: 10,
            barcode: barcode.map(str::to_string),
            is_active: true,
        }
    }

    #[test]
    fn test_barcode_lookup_is_exact() {
        let catalog = CatalogState::new();
        catalog.replace_products(vec![
            product("p-1", Some("6161100110011")),
            product("p-2", None),
        ]);

        assert_eq!(catalog.find_by_barcode("6161100110011").unwrap().id, "p-1");
        assert!(catalog.find_by_barcode("616110011001").is_none());
        assert!(catalog.product("p-2").is_some());
    }

    #[test]
    fn test_replace_drops_previous_products() {
        let catalog = CatalogState::new();
        catalog.replace_products(vec![product("p-1", None)]);
        catalog.replace_products(vec![product("p-9", None)]);

        assert!(catalog.product("p-1").is_none());
        assert_eq!(catalog.products().len(), 1);
    }
}
