//! # PosStore for SQLite
//!
//! Maps each backend operation onto a repository call.

use async_trait::async_trait;
use chrono::Utc;

use crate::error::DbError;
use crate::pool::Database;
use karu_core::dashboard::DateRange;
use karu_core::{
    Customer, LowStockProduct, Money, NewTransaction, NewTransactionItem, PosStore, Product,
    Transaction,
};

#[async_trait]
impl PosStore for Database {
    type Error = DbError;

    async fn sellable_products(&self) -> Result<Vec<Product>, DbError> {
        self.products().sellable().await
    }

    async fn list_customers(&self, limit: u32) -> Result<Vec<Customer>, DbError> {
        self.customers().list(limit).await
    }

    async fn generate_transaction_number(&self) -> Result<String, DbError> {
        self.transactions().next_number(Utc::now()).await
    }

    async fn insert_transaction(&self, txn: &NewTransaction) -> Result<Transaction, DbError> {
        self.transactions().insert(txn).await
    }

    async fn insert_transaction_items(&self, items: &[NewTransactionItem]) -> Result<(), DbError> {
        self.transactions().insert_items(items).await
    }

    async fn set_product_stock(&self, product_id: &str, stock_quantity: i64) -> Result<(), DbError> {
        self.products().set_stock(product_id, stock_quantity).await
    }

    async fn update_customer_loyalty(
        &self,
        customer_id: &str,
        loyalty_points: i64,
        total_spent: Money,
    ) -> Result<(), DbError> {
        self.customers()
            .set_loyalty(customer_id, loyalty_points, total_spent.cents())
            .await
    }

    async fn completed_totals(&self, range: Option<DateRange>) -> Result<Vec<Money>, DbError> {
        let totals = self.transactions().completed_totals(range).await?;
        Ok(totals.into_iter().map(Money::from_cents).collect())
    }

    async fn customer_count(&self) -> Result<i64, DbError> {
        self.customers().count().await
    }

    async fn low_stock_products(&self) -> Result<Vec<LowStockProduct>, DbError> {
        self.products().low_stock().await
    }

    async fn top_selling_product(&self) -> Result<Option<String>, DbError> {
        self.transactions().top_selling_product().await
    }
}
