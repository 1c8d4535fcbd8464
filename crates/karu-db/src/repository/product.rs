//! # Product Repository
//!
//! ## Key Operations
//! - Sellable catalog (active, stock above zero)
//! - Low-stock list (active, stock below minimum)
//! - Absolute stock writes from checkout

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use karu_core::{LowStockProduct, Product};

const PRODUCT_COLUMNS: &str =
    "id, name, price_cents, stock_quantity, min_stock_level, barcode, is_active";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Active products with stock above zero, by name.
    pub async fn sellable(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND stock_quantity > 0 \
             ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Loaded sellable products");
        Ok(products)
    }

    /// Active products below their minimum stock level, lowest stock first.
    pub async fn low_stock(&self) -> DbResult<Vec<LowStockProduct>> {
        let products = sqlx::query_as::<_, LowStockProduct>(
            r#"
            SELECT id, name, stock_quantity, min_stock_level
            FROM products
            WHERE is_active = 1 AND stock_quantity < min_stock_level
            ORDER BY stock_quantity, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a product. The id must be set by the caller.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - barcode already taken
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, price_cents, stock_quantity, min_stock_level,
                barcode, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(product.min_stock_level)
        .bind(&product.barcode)
        .bind(product.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites the stock level. No read-modify-write: the caller's value
    /// wins.
    pub async fn set_stock(&self, id: &str, stock_quantity: i64) -> DbResult<()> {
        debug!(id = %id, stock_quantity, "Setting product stock");

        let result = sqlx::query(
            "UPDATE products SET stock_quantity = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(stock_quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
