//! # Backend Seam
//!
//! Everything the POS needs from its backend, expressed as row operations.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          PosStore                                       │
//! │                                                                         │
//! │  select ─── sellable_products, list_customers, completed_totals,        │
//! │             customer_count, low_stock_products, top_selling_product     │
//! │  insert ─── insert_transaction, insert_transaction_items                │
//! │  update ─── set_product_stock, update_customer_loyalty                  │
//! │  rpc ────── generate_transaction_number                                 │
//! │                                                                         │
//! │  impl for karu_db::Database          (SQLite, embedded migrations)      │
//! │  impl for karu_remote::RestStore     (PostgREST over HTTPS)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each call is independent. Nothing here groups calls into a backend
//! transaction, so a caller that stops halfway leaves the earlier writes
//! in place.

use async_trait::async_trait;

use crate::dashboard::DateRange;
use crate::money::Money;
use crate::types::{Customer, LowStockProduct, NewTransaction, NewTransactionItem, Product, Transaction};

#[async_trait]
pub trait PosStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Active products with stock above zero.
    async fn sellable_products(&self) -> Result<Vec<Product>, Self::Error>;

    /// Up to `limit` customers.
    async fn list_customers(&self, limit: u32) -> Result<Vec<Customer>, Self::Error>;

    /// Issues the next transaction number.
    async fn generate_transaction_number(&self) -> Result<String, Self::Error>;

    /// Inserts a transaction and returns the stored row.
    async fn insert_transaction(&self, txn: &NewTransaction) -> Result<Transaction, Self::Error>;

    /// Inserts line items as one batch.
    async fn insert_transaction_items(&self, items: &[NewTransactionItem]) -> Result<(), Self::Error>;

    /// Overwrites a product's stock level.
    async fn set_product_stock(&self, product_id: &str, stock_quantity: i64) -> Result<(), Self::Error>;

    /// Overwrites a customer's loyalty balance and lifetime spend.
    async fn update_customer_loyalty(
        &self,
        customer_id: &str,
        loyalty_points: i64,
        total_spent: Money,
    ) -> Result<(), Self::Error>;

    /// Totals of completed transactions, optionally limited to a creation
    /// time window.
    async fn completed_totals(&self, range: Option<DateRange>) -> Result<Vec<Money>, Self::Error>;

    /// Exact number of customers.
    async fn customer_count(&self) -> Result<i64, Self::Error>;

    /// Active products whose stock is below their minimum level.
    async fn low_stock_products(&self) -> Result<Vec<LowStockProduct>, Self::Error>;

    /// Name of the product with the most units sold, if anything has sold.
    async fn top_selling_product(&self) -> Result<Option<String>, Self::Error>;
}
