//! # Error Types
//!
//! Domain-specific error types for karu-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  karu-core errors (this file)                                          │
//! │  ├── CoreError        - Cart and checkout rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  karu-db      └── DbError      - SQLite failures                       │
//! │  karu-remote  └── RemoteError  - REST backend failures                 │
//! │                                                                         │
//! │  karu-terminal└── ApiError     - What the cashier sees                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │        DbError / RemoteError ───────┴──► ApiError → Notice             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Cart and checkout rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the loaded catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No catalog product carries this barcode.
    #[error("No product found with barcode {0}")]
    BarcodeNotFound(String),

    /// Requested quantity exceeds the stock known at selection time.
    ///
    /// ## User Workflow
    /// ```text
    /// Add "Milk 500ml" (stock 3) a fourth time
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Milk 500ml", available: 3, requested: 4 }
    ///      │
    ///      ▼
    /// Notice: "Insufficient Stock - Only 3 items available"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Cart operation on a product that is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(String),

    /// Checkout was submitted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

pub type CoreResult<T> = Result<T, CoreError>;
