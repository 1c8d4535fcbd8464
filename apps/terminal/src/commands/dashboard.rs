//! # Dashboard Command
//!
//! Read-only. Issues every query on load and sums client-side; nothing is
//! cached between loads.
//!
//! ```text
//! completed_totals(today) ─┐
//! completed_totals(all) ───┤
//! customer_count() ────────┼──► DashboardStats::aggregate ──► Dashboard
//! low_stock_products() ────┤
//! top_selling_product() ───┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::ConfigState;
use karu_core::dashboard::{DashboardInputs, DashboardStats, DateRange, Greeting};
use karu_core::PosStore;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// "Good Morning, Achieng"
    pub greeting: String,
    pub stats: DashboardStats,
}

pub async fn load_dashboard<S>(
    store: &S,
    config: &ConfigState,
    now: DateTime<Utc>,
) -> Result<Dashboard, ApiError>
where
    S: PosStore,
    ApiError: From<S::Error>,
{
    let today = DateRange::day_of(now);
    debug!(start = %today.start, end = %today.end, "load_dashboard command");

    let inputs = DashboardInputs {
        today_totals: store.completed_totals(Some(today)).await?,
        all_totals: store.completed_totals(None).await?,
        customer_count: store.customer_count().await?,
        low_stock: store.low_stock_products().await?,
        top_seller: store.top_selling_product().await?,
    };

    let stats = DashboardStats::aggregate(inputs, config.low_stock_preview);
    debug!(
        transactions = stats.total_transactions,
        low_stock = stats.low_stock.total,
        "Dashboard aggregated"
    );

    Ok(Dashboard {
        greeting: format!("Good {}, {}", Greeting::at(now).as_str(), config.cashier_name),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use karu_core::dashboard::NO_TOP_SELLER;
    use karu_core::{Customer, NewTransaction, PaymentMethod, Product, TransactionStatus};
    use karu_db::{Database, DbConfig};

    fn txn(number: &str, total_cents: i64, status: TransactionStatus) -> NewTransaction {
        NewTransaction {
            transaction_number: number.to_string(),
            cashier_id: "cashier-01".to_string(),
            customer_id: None,
            subtotal_cents: total_cents,
            tax_cents: 0,
            discount_cents: 0,
            total_cents,
            payment_method: PaymentMethod::Cash,
            points_earned: 0,
            status,
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();

        let dashboard = load_dashboard(&db, &ConfigState::default(), now).await.unwrap();

        assert_eq!(dashboard.greeting, "Good Morning, Cashier");
        assert!(dashboard.stats.average_sale.is_zero());
        assert_eq!(dashboard.stats.top_selling_product, NO_TOP_SELLER);
        assert!(dashboard.stats.low_stock.is_empty());
    }

    #[tokio::test]
    async fn test_today_excludes_yesterday_and_voided() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 19, 30, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2026, 10, 18, 23, 59, 0).unwrap();
        let this_morning = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();

        let repo = db.transactions();
        repo.insert_at(&txn("T-1", 10_000, TransactionStatus::Completed), yesterday)
            .await
            .unwrap();
        repo.insert_at(&txn("T-2", 5_000, TransactionStatus::Completed), this_morning)
            .await
            .unwrap();
        repo.insert_at(&txn("T-3", 7_000, TransactionStatus::Voided), this_morning)
            .await
            .unwrap();

        for (i, stock) in [2, 4, 6, 8, 9, 1, 50].into_iter().enumerate() {
            db.products()
                .insert(&Product {
                    id: format!("p-{}", i),
                    name: format!("Product {}", i),
                    price_cents: 100,
                    stock_quantity: stock,
                    min_stock_level: 10,
                    barcode: None,
                    is_active: true,
                })
                .await
                .unwrap();
        }
        db.customers()
            .insert(&Customer {
                id: "c-1".to_string(),
                name: "Brian Otieno".to_string(),
                phone: "0712000002".to_string(),
                loyalty_points: 0,
                is_student: false,
                total_spent_cents: 0,
            })
            .await
            .unwrap();

        let dashboard = load_dashboard(&db, &ConfigState::default(), now).await.unwrap();
        let stats = dashboard.stats;

        assert_eq!(dashboard.greeting, "Good Evening, Cashier");
        assert_eq!(stats.today_sales.cents(), 5_000);
        assert_eq!(stats.total_revenue.cents(), 15_000);
        assert_eq!(stats.total_transactions, 2);
        assert_eq!(stats.average_sale.cents(), 7_500);
        assert_eq!(stats.total_customers, 1);
        assert_eq!(stats.low_stock.total, 6);
        assert_eq!(stats.low_stock.preview.len(), 5);
        assert_eq!(stats.low_stock.remaining, 1);
    }
}
