//! # Domain Types
//!
//! Rows the POS reads from and writes to its backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    Product      │   │    Customer     │   │    Transaction       │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  id             │   │  id             │   │  id                  │  │
//! │  │  name           │   │  name, phone    │   │  transaction_number  │  │
//! │  │  price_cents    │   │  loyalty_points │   │  cashier_id          │  │
//! │  │  stock_quantity │   │  is_student     │   │  customer_id?        │  │
//! │  │  barcode?       │   │  total_spent    │   │  amounts, points     │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────┬───────────┘  │
//! │                                                         │ 1..n         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────▼───────────┐  │
//! │  │ PaymentMethod   │   │TransactionStatus│   │  TransactionItem     │  │
//! │  │  Cash | Card    │   │  Completed      │   │  product_id          │  │
//! │  │  Mpesa          │   │  Voided         │   │  quantity, prices    │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these rows are owned by this code; the backend is the source of
//! truth and every type here is a snapshot of it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the store catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Units on hand, as last read from the backend.
    pub stock_quantity: i64,

    /// Below this level the product shows up in the low-stock alert.
    pub min_stock_level: i64,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Inactive products are hidden from the sales screen.
    pub is_active: bool,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the sales screen offers this product.
    pub fn is_sellable(&self) -> bool {
        self.is_active && self.stock_quantity > 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.is_active && self.stock_quantity < self.min_stock_level
    }
}

/// Projection used by the low-stock alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LowStockProduct {
    pub id: String,
    pub name: String,
    pub stock_quantity: i64,
    pub min_stock_level: i64,
}

impl From<&Product> for LowStockProduct {
    fn from(product: &Product) -> Self {
        LowStockProduct {
            id: product.id.clone(),
            name: product.name.clone(),
            stock_quantity: product.stock_quantity,
            min_stock_level: product.min_stock_level,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer who can earn loyalty points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,

    /// Current reward balance.
    pub loyalty_points: i64,

    /// Students get the fixed student discount.
    pub is_student: bool,

    /// Lifetime spend in cents.
    pub total_spent_cents: i64,
}

impl Customer {
    #[inline]
    pub fn total_spent(&self) -> Money {
        Money::from_cents(self.total_spent_cents)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentMethod {
    #[default]
    Cash,
    /// Card on an external terminal.
    Card,
    /// M-Pesa mobile money.
    Mpesa,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Mpesa];

    /// Wire/database representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Mpesa => "mpesa",
        }
    }

    /// Label shown on the payment buttons and receipts.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Mpesa => "M-Pesa",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "mpesa" | "m-pesa" => Ok(PaymentMethod::Mpesa),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Transaction Status
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TransactionStatus {
    /// Paid and recorded. The only status checkout writes.
    #[default]
    Completed,
    /// Cancelled after the fact by back-office tooling.
    Voided,
}

impl TransactionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Voided => "voided",
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Insert payload for a transaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTransaction {
    /// Number issued by the backend's `generate_transaction_number`.
    pub transaction_number: String,
    pub cashier_id: String,
    pub customer_id: Option<String>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub points_earned: i64,
    pub status: TransactionStatus,
}

/// A stored transaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub transaction_number: String,
    pub cashier_id: String,
    pub customer_id: Option<String>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub points_earned: i64,
    pub status: TransactionStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Transaction Item
// =============================================================================

/// Insert payload for a transaction line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTransactionItem {
    pub transaction_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// unit_price × quantity
    pub total_price_cents: i64,
}

/// A stored line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min: i64, active: bool) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Milk 500ml".to_string(),
            price_cents: 65,
            stock_quantity: stock,
            min_stock_level: min,
            barcode: None,
            is_active: active,
        }
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(" Card ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!("M-Pesa".parse::<PaymentMethod>().unwrap(), PaymentMethod::Mpesa);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_default_and_labels() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::Mpesa.as_str(), "mpesa");
        assert_eq!(PaymentMethod::Mpesa.to_string(), "M-Pesa");
    }

    #[test]
    fn test_payment_method_serde() {
        let json = serde_json::to_string(&PaymentMethod::Mpesa).unwrap();
        assert_eq!(json, "\"mpesa\"");
        let status = serde_json::to_string(&TransactionStatus::Completed).unwrap();
        assert_eq!(status, "\"completed\"");
    }

    #[test]
    fn test_product_stock_flags() {
        assert!(product(5, 10, true).is_low_stock());
        assert!(!product(10, 10, true).is_low_stock());
        assert!(!product(5, 10, false).is_low_stock());

        assert!(product(1, 10, true).is_sellable());
        assert!(!product(0, 10, true).is_sellable());
        assert!(!product(3, 10, false).is_sellable());
    }
}
