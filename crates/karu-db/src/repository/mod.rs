//! # Repository Module
//!
//! SQL lives here, one repository per table group.
//!
//! ```text
//! Database::products()      ──► ProductRepository
//! Database::customers()     ──► CustomerRepository
//! Database::transactions()  ──► TransactionRepository
//!                                 (transactions, transaction_items,
//!                                  transaction_counters)
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog reads and stock writes
//! - [`customer::CustomerRepository`] - Customer list and loyalty writes
//! - [`transaction::TransactionRepository`] - Transactions, line items, numbering

pub mod customer;
pub mod product;
pub mod transaction;
