//! # karu-core: Pure Business Logic for KarU POS
//!
//! This crate holds the checkout arithmetic and the domain types shared by
//! every other crate in the workspace. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KarU POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 karu-terminal (front-end)                       │   │
//! │  │     Dashboard ──► Sales screen ──► Checkout commit              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ karu-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌───────┐  │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │  pricing  │ │ store │  │   │
//! │  │   │ Product │ │  Money  │ │  Cart   │ │ 16% tax   │ │ trait │  │   │
//! │  │   │Customer │ │         │ │CartLine │ │ 10% disc  │ │       │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └───────────┘ └───┬───┘  │   │
//! │  │                                                          │      │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS     │      │   │
//! │  └──────────────────────────────────────────────────────────┼──────┘   │
//! │                                                             │          │
//! │              ┌──────────────────────────────┬───────────────┘          │
//! │              ▼                              ▼                          │
//! │     karu-db (SQLite)              karu-remote (PostgREST)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Transaction, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - The transient checkout cart
//! - [`pricing`] - Tax, discount, total and loyalty points
//! - [`dashboard`] - Client-side dashboard aggregation
//! - [`store`] - The backend seam implemented by the store crates
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use karu_core::money::Money;
//! use karu_core::pricing::PricingBreakdown;
//!
//! let breakdown = PricingBreakdown::from_subtotal(Money::from_cents(10_000), false);
//! assert_eq!(breakdown.tax.cents(), 1_600);
//! assert_eq!(breakdown.total.cents(), 11_600);
//! assert_eq!(breakdown.points_earned, 11);
//! ```

pub mod cart;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod pricing;
pub mod store;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartLine};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use pricing::PricingBreakdown;
pub use store::PosStore;
pub use types::*;

/// VAT applied to every sale, in basis points (16%).
pub const TAX_RATE_BPS: u32 = 1_600;

/// Discount for customers flagged as students, in basis points (10%).
pub const STUDENT_DISCOUNT_BPS: u32 = 1_000;

/// One loyalty point is earned per this many cents of the sale total (10.00).
pub const CENTS_PER_LOYALTY_POINT: i64 = 1_000;

/// Default minimum stock level below which a product counts as low stock.
pub const DEFAULT_MIN_STOCK_LEVEL: i64 = 10;
