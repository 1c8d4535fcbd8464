//! Row shapes as PostgREST sends and receives them
//!
//! Numeric columns (`price`, `total_amount`, ...) are decimal numbers in
//! major units on the wire. They become [`Money`] cents at this boundary,
//! rounded half away from zero.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RemoteError, RemoteResult};
use karu_core::{
    Customer, LowStockProduct, Money, NewTransaction, NewTransactionItem, PaymentMethod, Product,
    Transaction, TransactionStatus, DEFAULT_MIN_STOCK_LEVEL,
};

const MINOR_UNITS: u32 = 2;

// =============================================================================
// Money conversion
// =============================================================================

pub fn money_from_decimal(value: Decimal) -> RemoteResult<Money> {
    (value * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(Money::from_cents)
        .ok_or_else(|| RemoteError::decode(format!("amount out of range: {}", value)))
}

pub fn money_to_decimal(money: Money) -> Decimal {
    Decimal::new(money.cents(), MINOR_UNITS)
}

fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, MINOR_UNITS)
}

fn default_min_stock() -> i64 {
    DEFAULT_MIN_STOCK_LEVEL
}

// =============================================================================
// Reads
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock_quantity: i64,
    #[serde(default = "default_min_stock")]
    pub min_stock_level: i64,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl TryFrom<ProductRow> for Product {
    type Error = RemoteError;

    fn try_from(row: ProductRow) -> RemoteResult<Self> {
        Ok(Product {
            price_cents: money_from_decimal(row.price)?.cents(),
            id: row.id,
            name: row.name,
            stock_quantity: row.stock_quantity,
            min_stock_level: row.min_stock_level,
            barcode: row.barcode,
            is_active: row.is_active,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockLevelRow {
    pub id: String,
    pub name: String,
    pub stock_quantity: i64,
    #[serde(default = "default_min_stock")]
    pub min_stock_level: i64,
}

impl StockLevelRow {
    pub fn is_low(&self) -> bool {
        self.stock_quantity < self.min_stock_level
    }
}

impl From<StockLevelRow> for LowStockProduct {
    fn from(row: StockLevelRow) -> Self {
        LowStockProduct {
            id: row.id,
            name: row.name,
            stock_quantity: row.stock_quantity,
            min_stock_level: row.min_stock_level,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub loyalty_points: i64,
    #[serde(default)]
    pub is_student: bool,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RemoteError;

    fn try_from(row: CustomerRow) -> RemoteResult<Self> {
        Ok(Customer {
            total_spent_cents: money_from_decimal(row.total_spent)?.cents(),
            id: row.id,
            name: row.name,
            phone: row.phone.unwrap_or_default(),
            loyalty_points: row.loyalty_points,
            is_student: row.is_student,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub transaction_number: String,
    pub cashier_id: String,
    pub customer_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub points_earned: i64,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = RemoteError;

    fn try_from(row: TransactionRow) -> RemoteResult<Self> {
        Ok(Transaction {
            subtotal_cents: money_from_decimal(row.subtotal)?.cents(),
            tax_cents: money_from_decimal(row.tax_amount)?.cents(),
            discount_cents: money_from_decimal(row.discount_amount)?.cents(),
            total_cents: money_from_decimal(row.total_amount)?.cents(),
            id: row.id,
            transaction_number: row.transaction_number,
            cashier_id: row.cashier_id,
            customer_id: row.customer_id,
            payment_method: row.payment_method,
            points_earned: row.points_earned,
            status: row.status,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TotalRow {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameRow {
    pub name: String,
}

/// A sold line with its product name embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct SoldItemRow {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub products: Option<NameRow>,
}

// =============================================================================
// Writes
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TransactionInsert<'a> {
    pub transaction_number: &'a str,
    pub cashier_id: &'a str,
    pub customer_id: Option<&'a str>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub points_earned: i64,
    pub status: TransactionStatus,
}

impl<'a> From<&'a NewTransaction> for TransactionInsert<'a> {
    fn from(txn: &'a NewTransaction) -> Self {
        TransactionInsert {
            transaction_number: &txn.transaction_number,
            cashier_id: &txn.cashier_id,
            customer_id: txn.customer_id.as_deref(),
            subtotal: cents_to_decimal(txn.subtotal_cents),
            tax_amount: cents_to_decimal(txn.tax_cents),
            discount_amount: cents_to_decimal(txn.discount_cents),
            total_amount: cents_to_decimal(txn.total_cents),
            payment_method: txn.payment_method,
            points_earned: txn.points_earned,
            status: txn.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionItemInsert<'a> {
    pub transaction_id: &'a str,
    pub product_id: &'a str,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl<'a> From<&'a NewTransactionItem> for TransactionItemInsert<'a> {
    fn from(item: &'a NewTransactionItem) -> Self {
        TransactionItemInsert {
            transaction_id: &item.transaction_id,
            product_id: &item.product_id,
            quantity: item.quantity,
            unit_price: cents_to_decimal(item.unit_price_cents),
            total_price: cents_to_decimal(item.total_price_cents),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockUpdate {
    pub stock_quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoyaltyUpdate {
    pub loyalty_points: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}
