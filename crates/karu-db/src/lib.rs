//! # karu-db: Local SQLite Store for KarU POS
//!
//! This crate provides the local backend for the POS. It uses SQLite with
//! sqlx for async operations and implements [`karu_core::PosStore`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KarU POS Data Flow                               │
//! │                                                                         │
//! │  karu-terminal command (checkout)                                       │
//! │       │                                                                 │
//! │       │  store.insert_transaction(&txn)                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     karu-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │    Repositories    │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded) │  │   │
//! │  │   │               │    │ ProductRepository  │  │            │  │   │
//! │  │   │ SqlitePool    │◄───│ CustomerRepository │  │ 001_init   │  │   │
//! │  │   │ impl PosStore │    │ TransactionRepo    │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/karu/karu.db                                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`store`] - `PosStore` implementation for [`Database`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use karu_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./karu.db")).await?;
//! let products = db.products().sellable().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};

pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::transaction::TransactionRepository;
