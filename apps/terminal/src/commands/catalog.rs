//! # Catalog Commands
//!
//! Reads the sales screen issues on start and after every sale.
//!
//! ```text
//! sales screen start
//!      │
//!      ├──► sellable_products()        active, stock > 0
//!      └──► list_customers(limit)      first 50 by name
//!      │
//!      ▼
//! CatalogState (barcode scans and stock checks read this copy)
//! ```

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CatalogState, ConfigState};
use karu_core::{Customer, PosStore, Product};

/// Loads products and customers into the catalog.
pub async fn load_sales_screen<S>(
    store: &S,
    catalog: &CatalogState,
    config: &ConfigState,
) -> Result<(), ApiError>
where
    S: PosStore,
    ApiError: From<S::Error>,
{
    let products = refresh_products(store, catalog).await?;
    let customers = store.list_customers(config.customer_limit).await?;

    info!(products, customers = customers.len(), "Sales screen loaded");
    catalog.replace_customers(customers);
    Ok(())
}

/// Reloads the sellable products. Returns how many there are.
pub async fn refresh_products<S>(store: &S, catalog: &CatalogState) -> Result<usize, ApiError>
where
    S: PosStore,
    ApiError: From<S::Error>,
{
    let products = store.sellable_products().await?;
    let count = products.len();

    debug!(count, "Catalog refreshed");
    catalog.replace_products(products);
    Ok(count)
}

/// Sellable products, straight from the backend.
pub async fn list_products<S>(store: &S) -> Result<Vec<Product>, ApiError>
where
    S: PosStore,
    ApiError: From<S::Error>,
{
    Ok(store.sellable_products().await?)
}

pub async fn list_customers<S>(store: &S, config: &ConfigState) -> Result<Vec<Customer>, ApiError>
where
    S: PosStore,
    ApiError: From<S::Error>,
{
    Ok(store.list_customers(config.customer_limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use karu_db::{Database, DbConfig};

    fn product(id: &str, stock: i64, active: bool) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents: 1_000,
            stock_quantity: stock,
            min_stock_level: 10,
            barcode: None,
            is_active: active,
        }
    }

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            phone: String::new(),
            loyalty_points: 0,
            is_student: false,
            total_spent_cents: 0,
        }
    }

    #[tokio::test]
    async fn test_sales_screen_loads_sellable_products_and_limited_customers() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for p in [
            product("p-1", 5, true),
            product("p-2", 0, true),
            product("p-3", 5, false),
        ] {
            db.products().insert(&p).await.unwrap();
        }
        for (id, name) in [("c-1", "Cynthia"), ("c-2", "Amina"), ("c-3", "Brian")] {
            db.customers().insert(&customer(id, name)).await.unwrap();
        }

        let config = ConfigState {
            customer_limit: 2,
            ..ConfigState::default()
        };
        let catalog = CatalogState::new();

        load_sales_screen(&db, &catalog, &config).await.unwrap();

        let ids: Vec<_> = catalog.products().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p-1"]);

        let names: Vec<_> = catalog.customers().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Amina", "Brian"]);
    }
}
