//! PosStore over PostgREST

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde_json::json;
use tracing::debug;

use crate::client::RestClient;
use crate::config::RestConfig;
use crate::error::{RemoteError, RemoteResult};
use crate::wire::{
    money_from_decimal, money_to_decimal, CustomerRow, LoyaltyUpdate, ProductRow, SoldItemRow,
    StockLevelRow, StockUpdate, TotalRow, TransactionInsert, TransactionItemInsert, TransactionRow,
};
use karu_core::dashboard::{top_seller, DateRange};
use karu_core::{
    Customer, LowStockProduct, Money, NewTransaction, NewTransactionItem, PosStore, Product,
    Transaction, TransactionStatus,
};

/// Hosted backend
#[derive(Debug, Clone)]
pub struct RestStore {
    client: RestClient,
}

impl RestStore {
    pub fn new(config: &RestConfig) -> RemoteResult<Self> {
        Ok(Self {
            client: RestClient::new(config)?,
        })
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }
}

fn timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl PosStore for RestStore {
    type Error = RemoteError;

    async fn sellable_products(&self) -> RemoteResult<Vec<Product>> {
        let rows: Vec<ProductRow> = self
            .client
            .select(
                "products",
                &[
                    ("select", "*".to_string()),
                    ("is_active", "eq.true".to_string()),
                    ("stock_quantity", "gt.0".to_string()),
                ],
            )
            .await?;

        debug!(count = rows.len(), "Loaded sellable products");
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn list_customers(&self, limit: u32) -> RemoteResult<Vec<Customer>> {
        let rows: Vec<CustomerRow> = self
            .client
            .select(
                "customers",
                &[("select", "*".to_string()), ("limit", limit.to_string())],
            )
            .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    async fn generate_transaction_number(&self) -> RemoteResult<String> {
        self.client.rpc("generate_transaction_number", &json!({})).await
    }

    async fn insert_transaction(&self, txn: &NewTransaction) -> RemoteResult<Transaction> {
        let rows: Vec<TransactionRow> = self
            .client
            .insert("transactions", &TransactionInsert::from(txn))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::decode("insert returned no transaction row"))?;
        Transaction::try_from(row)
    }

    async fn insert_transaction_items(&self, items: &[NewTransactionItem]) -> RemoteResult<()> {
        let body: Vec<TransactionItemInsert<'_>> = items.iter().map(Into::into).collect();
        self.client.insert_minimal("transaction_items", &body).await
    }

    async fn set_product_stock(&self, product_id: &str, stock_quantity: i64) -> RemoteResult<()> {
        self.client
            .update_by_id("products", product_id, &StockUpdate { stock_quantity })
            .await
    }

    async fn update_customer_loyalty(
        &self,
        customer_id: &str,
        loyalty_points: i64,
        total_spent: Money,
    ) -> RemoteResult<()> {
        let body = LoyaltyUpdate {
            loyalty_points,
            total_spent: money_to_decimal(total_spent),
        };
        self.client.update_by_id("customers", customer_id, &body).await
    }

    async fn completed_totals(&self, range: Option<DateRange>) -> RemoteResult<Vec<Money>> {
        let mut query = vec![
            ("select", "total_amount".to_string()),
            ("status", format!("eq.{}", TransactionStatus::Completed.as_str())),
        ];
        if let Some(range) = range {
            query.push(("created_at", format!("gte.{}", timestamp(range.start))));
            query.push(("created_at", format!("lt.{}", timestamp(range.end))));
        }

        let rows: Vec<TotalRow> = self.client.select("transactions", &query).await?;
        rows.into_iter()
            .map(|row| money_from_decimal(row.total_amount))
            .collect()
    }

    async fn customer_count(&self) -> RemoteResult<i64> {
        self.client.count("customers").await
    }

    async fn low_stock_products(&self) -> RemoteResult<Vec<LowStockProduct>> {
        // PostgREST cannot compare two columns, so filter here
        let rows: Vec<StockLevelRow> = self
            .client
            .select(
                "products",
                &[
                    ("select", "id,name,stock_quantity,min_stock_level".to_string()),
                    ("is_active", "eq.true".to_string()),
                    ("order", "stock_quantity.asc,name.asc".to_string()),
                ],
            )
            .await?;

        Ok(rows
            .into_iter()
            .filter(StockLevelRow::is_low)
            .map(LowStockProduct::from)
            .collect())
    }

    async fn top_selling_product(&self) -> RemoteResult<Option<String>> {
        let rows: Vec<SoldItemRow> = self
            .client
            .select(
                "transaction_items",
                &[
                    (
                        "select",
                        "product_id,quantity,products(name),transactions!inner(status)".to_string(),
                    ),
                    (
                        "transactions.status",
                        format!("eq.{}", TransactionStatus::Completed.as_str()),
                    ),
                ],
            )
            .await?;

        let best = top_seller(rows.iter().map(|r| (r.product_id.as_str(), r.quantity)));

        Ok(best.and_then(|id| {
            rows.iter()
                .find(|r| r.product_id == id)
                .and_then(|r| r.products.as_ref())
                .map(|p| p.name.clone())
        }))
    }
}
