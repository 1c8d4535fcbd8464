//! # Transaction Repository
//!
//! Transactions, their line items, and the daily numbering sequence.
//!
//! ## Checkout Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Writes                                   │
//! │                                                                         │
//! │  1. next_number(now)   → "TXN-20261019-0007"  (transaction_counters)    │
//! │  2. insert(&txn)       → Transaction { status: Completed }              │
//! │  3. insert_items(..)   → one SQLite transaction for the batch           │
//! │                                                                         │
//! │  Steps are separate statements. A failure in step 3 leaves the row      │
//! │  from step 2 in place.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use karu_core::dashboard::DateRange;
use karu_core::{NewTransaction, NewTransactionItem, Transaction, TransactionItem};

const TRANSACTION_COLUMNS: &str = "id, transaction_number, cashier_id, customer_id, \
     subtotal_cents, tax_cents, discount_cents, total_cents, \
     payment_method, points_earned, status, created_at";

#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Issues the next number for the day of `now`.
    ///
    /// ## Format
    /// `TXN-YYYYMMDD-NNNN`, with NNNN restarting at 0001 each UTC day.
    pub async fn next_number(&self, now: DateTime<Utc>) -> DbResult<String> {
        let day = now.format("%Y%m%d").to_string();

        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transaction_counters (day, last_seq) VALUES (?1, 1)
            ON CONFLICT (day) DO UPDATE SET last_seq = last_seq + 1
            RETURNING last_seq
            "#,
        )
        .bind(&day)
        .fetch_one(&self.pool)
        .await?;

        let number = format_transaction_number(&day, seq);
        debug!(transaction_number = %number, "Issued transaction number");
        Ok(number)
    }

    /// Inserts a transaction stamped with the current time.
    pub async fn insert(&self, txn: &NewTransaction) -> DbResult<Transaction> {
        self.insert_at(txn, Utc::now()).await
    }

    /// Inserts a transaction with an explicit creation time and returns
    /// the stored row.
    pub async fn insert_at(
        &self,
        txn: &NewTransaction,
        created_at: DateTime<Utc>,
    ) -> DbResult<Transaction> {
        let id = Uuid::new_v4().to_string();

        debug!(
            id = %id,
            transaction_number = %txn.transaction_number,
            total_cents = txn.total_cents,
            "Inserting transaction"
        );

        let stored = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions (
                id, transaction_number, cashier_id, customer_id,
                subtotal_cents, tax_cents, discount_cents, total_cents,
                payment_method, points_earned, status, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12
            )
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(&id)
        .bind(&txn.transaction_number)
        .bind(&txn.cashier_id)
        .bind(&txn.customer_id)
        .bind(txn.subtotal_cents)
        .bind(txn.tax_cents)
        .bind(txn.discount_cents)
        .bind(txn.total_cents)
        .bind(txn.payment_method)
        .bind(txn.points_earned)
        .bind(txn.status)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let txn = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(txn)
    }

    /// Inserts line items all-or-nothing.
    pub async fn insert_items(&self, items: &[NewTransactionItem]) -> DbResult<()> {
        debug!(count = items.len(), "Inserting transaction items");

        let mut tx = self.pool.begin().await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO transaction_items (
                    id, transaction_id, product_id,
                    quantity, unit_price_cents, total_price_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&item.transaction_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.total_price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn items(&self, transaction_id: &str) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT id, transaction_id, product_id,
                   quantity, unit_price_cents, total_price_cents
            FROM transaction_items
            WHERE transaction_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Totals (in cents) of completed transactions, optionally restricted
    /// to `[range.start, range.end)`.
    pub async fn completed_totals(&self, range: Option<DateRange>) -> DbResult<Vec<i64>> {
        let totals: Vec<i64> = match range {
            Some(range) => {
                sqlx::query_scalar(
                    r#"
                    SELECT total_cents FROM transactions
                    WHERE status = 'completed' AND created_at >= ?1 AND created_at < ?2
                    "#,
                )
                .bind(range.start)
                .bind(range.end)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT total_cents FROM transactions WHERE status = 'completed'")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(totals)
    }

    /// Name of the product with the most units sold in completed
    /// transactions. Ties go to the name that sorts first.
    pub async fn top_selling_product(&self) -> DbResult<Option<String>> {
        let name: Option<String> = sqlx::query_scalar(
            r#"
            SELECT p.name
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            JOIN products p ON p.id = ti.product_id
            WHERE t.status = 'completed'
            GROUP BY ti.product_id, p.name
            ORDER BY SUM(ti.quantity) DESC, p.name ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(name)
    }
}

/// `TXN-<day>-<seq padded to 4>`.
pub fn format_transaction_number(day: &str, seq: i64) -> String {
    format!("TXN-{}-{:04}", day, seq)
}
