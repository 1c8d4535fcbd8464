//! # Dashboard Aggregation
//!
//! The dashboard fetches raw rows and sums them client-side. This module
//! holds that summation so the terminal and any other front-end agree on
//! the numbers.
//!
//! ```text
//! today's completed totals ──┐
//! all completed totals ──────┼──► DashboardStats::aggregate ──► metrics
//! customer count ────────────┤
//! low-stock products ────────┤
//! top seller ────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::LowStockProduct;

/// Shown when nothing has sold yet.
pub const NO_TOP_SELLER: &str = "No data";

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// The UTC calendar day containing `now`.
    pub fn day_of(now: DateTime<Utc>) -> Self {
        let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        DateRange {
            start,
            end: start + Duration::days(1),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

/// Time-of-day greeting in the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
}

impl Greeting {
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            0..=11 => Greeting::Morning,
            12..=17 => Greeting::Afternoon,
            _ => Greeting::Evening,
        }
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Greeting::for_hour(now.hour())
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Greeting::Morning => "Morning",
            Greeting::Afternoon => "Afternoon",
            Greeting::Evening => "Evening",
        }
    }
}

/// Low-stock alert: a short preview plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LowStockAlert {
    pub total: usize,
    pub preview: Vec<LowStockProduct>,
    pub remaining: usize,
}

impl LowStockAlert {
    pub fn new(mut products: Vec<LowStockProduct>, preview_len: usize) -> Self {
        let total = products.len();
        products.truncate(preview_len);
        LowStockAlert {
            total,
            remaining: total - products.len(),
            preview: products,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Raw reads the dashboard issues on load.
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    pub today_totals: Vec<Money>,
    pub all_totals: Vec<Money>,
    pub customer_count: i64,
    pub low_stock: Vec<LowStockProduct>,
    pub top_seller: Option<String>,
}

/// Display metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub today_sales: Money,
    pub total_revenue: Money,
    pub total_transactions: usize,
    pub total_customers: i64,
    pub low_stock: LowStockAlert,
    pub top_selling_product: String,
    pub average_sale: Money,
}

impl DashboardStats {
    pub fn aggregate(inputs: DashboardInputs, low_stock_preview: usize) -> Self {
        let today_sales: Money = inputs.today_totals.iter().sum();
        let total_revenue: Money = inputs.all_totals.iter().sum();
        let total_transactions = inputs.all_totals.len();

        DashboardStats {
            today_sales,
            total_revenue,
            total_transactions,
            total_customers: inputs.customer_count,
            low_stock: LowStockAlert::new(inputs.low_stock, low_stock_preview),
            top_selling_product: inputs
                .top_seller
                .unwrap_or_else(|| NO_TOP_SELLER.to_string()),
            average_sale: average(total_revenue, total_transactions),
        }
    }
}

/// Revenue per transaction, zero when there are none.
pub fn average(revenue: Money, count: usize) -> Money {
    if count == 0 {
        return Money::zero();
    }
    let count = count as i64;
    // round half up on the cent
    Money::from_cents((revenue.cents() * 2 + count).div_euclid(count * 2))
}

/// Picks the product id with the highest quantity sold.
///
/// Ties go to the id that sorts first so repeated loads agree.
pub fn top_seller<'a, I>(sold: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    let mut by_product: HashMap<&str, i64> = HashMap::new();
    for (product_id, quantity) in sold {
        *by_product.entry(product_id).or_default() += quantity;
    }

    by_product
        .into_iter()
        .max_by(|(a_id, a_qty), (b_id, b_qty)| a_qty.cmp(b_qty).then_with(|| b_id.cmp(a_id)))
        .map(|(id, _)| id.to_string())
}
