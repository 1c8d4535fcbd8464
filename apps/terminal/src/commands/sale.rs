//! # Sale Commands
//!
//! Checkout: turns the open sale into stored rows.
//!
//! ## Commit Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    checkout()                                           │
//! │                                                                         │
//! │  cart empty? ──────────────────────────► "Empty Cart" (no writes)       │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  1. rpc generate_transaction_number ──► "TXN-20261019-0007"             │
//! │  2. insert transactions (completed) ──► stored row (id)                 │
//! │  3. insert transaction_items (batch)                                    │
//! │  4. per line: set stock = snapshot − qty                                │
//! │  5. customer && points > 0: set points / lifetime spend                 │
//! │      │                                                                  │
//! │      ├── any step fails ──► "Transaction Failed", cart kept             │
//! │      │                      earlier writes stay in place                │
//! │      ▼                                                                  │
//! │  reset session, reload catalog, "Transaction Successful"                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The steps are separate backend calls with nothing wrapping them. Stock
//! writes are last-write-wins from the snapshot taken when the product
//! was added, so two tills selling the same product can oversell it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::commands::catalog::refresh_products;
use crate::error::{ApiError, Notice};
use crate::state::{CartState, CatalogState, ConfigState, SaleSession};
use karu_core::{
    CoreError, NewTransaction, PaymentMethod, PosStore, PricingBreakdown, Transaction,
    TransactionStatus,
};

/// Printed receipt.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub transaction_number: String,
    pub store_name: String,
    pub cashier_name: String,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<ReceiptItem>,
    pub pricing: PricingBreakdown,
    pub payment_method: PaymentMethod,
    pub customer_name: Option<String>,

    /// Customer's balance after this sale.
    pub loyalty_balance: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub receipt: Receipt,
    pub notice: Notice,
}

/// Completes the open sale.
///
/// ## Errors
/// - `EMPTY_CART` before anything is written
/// - `TRANSACTION_FAILED` when any write fails; the cart is left as it was
pub async fn checkout<S>(
    store: &S,
    cart: &CartState,
    catalog: &CatalogState,
    config: &ConfigState,
) -> Result<CheckoutOutcome, ApiError>
where
    S: PosStore,
    ApiError: From<S::Error>,
{
    let session = cart.snapshot();
    if session.cart.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let pricing = session.pricing();
    debug!(
        lines = session.cart.line_count(),
        total = %pricing.total,
        "checkout command"
    );

    let txn = match commit(store, &session, &pricing, config).await {
        Ok(txn) => txn,
        Err(e) => {
            error!(error = %e, "Transaction error");
            return Err(ApiError::transaction_failed());
        }
    };

    info!(
        transaction_number = %txn.transaction_number,
        total = %pricing.total,
        points = pricing.points_earned,
        "Sale completed"
    );

    cart.with_session_mut(SaleSession::reset);

    // the sale is stored; a stale catalog is only a display problem
    if let Err(e) = refresh_products(store, catalog).await {
        warn!(error = %e, "Catalog refresh after sale failed");
    }

    let notice = Notice::info(
        "Transaction Successful",
        format!("Transaction {} completed successfully", txn.transaction_number),
    );

    Ok(CheckoutOutcome {
        receipt: receipt(&session, &pricing, &txn, config),
        notice,
    })
}

/// Steps 1-5, stopping at the first failure.
async fn commit<S: PosStore>(
    store: &S,
    session: &SaleSession,
    pricing: &PricingBreakdown,
    config: &ConfigState,
) -> Result<Transaction, S::Error> {
    let transaction_number = store.generate_transaction_number().await?;

    let txn = store
        .insert_transaction(&NewTransaction {
            transaction_number,
            cashier_id: config.cashier_id.clone(),
            customer_id: session.customer.as_ref().map(|c| c.id.clone()),
            subtotal_cents: pricing.subtotal.cents(),
            tax_cents: pricing.tax.cents(),
            discount_cents: pricing.discount.cents(),
            total_cents: pricing.total.cents(),
            payment_method: session.payment_method,
            points_earned: pricing.points_earned,
            status: TransactionStatus::Completed,
        })
        .await?;
    debug!(id = %txn.id, number = %txn.transaction_number, "Transaction row stored");

    let items: Vec<_> = session
        .cart
        .lines()
        .iter()
        .map(|line| line.to_transaction_item(&txn.id))
        .collect();
    store.insert_transaction_items(&items).await?;

    for line in session.cart.lines() {
        store
            .set_product_stock(line.product_id(), line.remaining_stock())
            .await?;
    }

    if let Some(customer) = &session.customer {
        if pricing.points_earned > 0 {
            store
                .update_customer_loyalty(
                    &customer.id,
                    customer.loyalty_points + pricing.points_earned,
                    customer.total_spent() + pricing.total,
                )
                .await?;
        }
    }

    Ok(txn)
}

fn receipt(
    session: &SaleSession,
    pricing: &PricingBreakdown,
    txn: &Transaction,
    config: &ConfigState,
) -> Receipt {
    Receipt {
        transaction_number: txn.transaction_number.clone(),
        store_name: config.store_name.clone(),
        cashier_name: config.cashier_name.clone(),
        timestamp: txn.created_at,
        items: session
            .cart
            .lines()
            .iter()
            .map(|l| ReceiptItem {
                name: l.product.name.clone(),
                quantity: l.quantity,
                unit_price_cents: l.unit_price().cents(),
                line_total_cents: l.line_total_cents,
            })
            .collect(),
        pricing: *pricing,
        payment_method: session.payment_method,
        customer_name: session.customer.as_ref().map(|c| c.name.clone()),
        loyalty_balance: session
            .customer
            .as_ref()
            .map(|c| c.loyalty_points + pricing.points_earned),
    }
}
