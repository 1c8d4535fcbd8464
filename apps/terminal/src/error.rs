//! # Command Error Type
//!
//! Unified error type for terminal commands, and the notices the cashier
//! sees in their place.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in KarU POS                               │
//! │                                                                         │
//! │  Command Function  ──►  Result<T, ApiError>                             │
//! │                                                                         │
//! │  CoreError::InsufficientStock ──► INSUFFICIENT_STOCK                    │
//! │        "Only 3 items available"                                         │
//! │                                                                         │
//! │  DbError / RemoteError ─────────► BACKEND_ERROR  (details logged only)  │
//! │                                                                         │
//! │  any failure during checkout ───► TRANSACTION_FAILED                    │
//! │                                                                         │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  ApiError::notice() ──► Notice { title, description, variant }          │
//! │                          "Insufficient Stock"                           │
//! │                          "Only 3 items available"                       │
//! │                          Destructive                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backend failures are never classified for the cashier. The underlying
//! error goes to the log and the message stays generic.

use serde::Serialize;

use karu_core::CoreError;
use karu_db::DbError;
use karu_remote::RemoteError;

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Only 3 items available"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Barcode did not match a catalog product
    ProductNotFound,

    /// Input validation failed
    ValidationError,

    /// Backend read or write failed
    BackendError,

    /// Cart operation failed
    CartError,

    /// Requested more than the known stock
    InsufficientStock,

    /// Checkout submitted with nothing in the cart
    EmptyCart,

    /// A checkout write failed
    TransactionFailed,

    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Notice heading shown for this code.
    pub const fn title(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "Not Found",
            ErrorCode::ProductNotFound => "Product Not Found",
            ErrorCode::ValidationError => "Invalid Input",
            ErrorCode::BackendError => "Something Went Wrong",
            ErrorCode::CartError => "Cart Error",
            ErrorCode::InsufficientStock => "Insufficient Stock",
            ErrorCode::EmptyCart => "Empty Cart",
            ErrorCode::TransactionFailed => "Transaction Failed",
            ErrorCode::Internal => "Error",
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    /// Generic checkout failure. The cause must already be logged.
    pub fn transaction_failed() -> Self {
        ApiError::new(
            ErrorCode::TransactionFailed,
            "Failed to process transaction. Please try again.",
        )
    }

    /// Logs a backend failure and hides it behind a generic message.
    pub fn backend(err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "Backend operation failed");
        ApiError::new(ErrorCode::BackendError, "Could not reach the store database")
    }

    /// The notice shown in place of this error.
    pub fn notice(&self) -> Notice {
        Notice::destructive(self.code.title(), &self.message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            other => ApiError::backend(other),
        }
    }
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Config(msg) => {
                tracing::error!(%msg, "Backend configuration rejected");
                ApiError::internal("Backend is not configured correctly")
            }
            other => ApiError::backend(other),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::BarcodeNotFound(_) => ApiError::new(
                ErrorCode::ProductNotFound,
                "No product found with this barcode",
            ),
            CoreError::InsufficientStock { available, .. } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!("Only {} items available", available),
            ),
            CoreError::NotInCart(id) => ApiError::cart(format!("Product {} is not in the cart", id)),
            CoreError::EmptyCart => ApiError::new(
                ErrorCode::EmptyCart,
                "Please add items to cart before processing",
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Notices
// =============================================================================

/// Toast-style message for the cashier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notice {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notice {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = match self.variant {
            NoticeVariant::Default => "✓",
            NoticeVariant::Destructive => "✗",
        };
        write!(f, "{} {} - {}", marker, self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_notice() {
        let err = ApiError::from(CoreError::InsufficientStock {
            product: "Milk 500ml".to_string(),
            available: 3,
            requested: 4,
        });

        let notice = err.notice();
        assert_eq!(notice.title, "Insufficient Stock");
        assert_eq!(notice.description, "Only 3 items available");
        assert!(notice.is_destructive());
    }

    #[test]
    fn test_backend_details_are_hidden() {
        let err = ApiError::from(DbError::QueryFailed("no such table: products".to_string()));

        assert_eq!(err.code, ErrorCode::BackendError);
        assert!(!err.message.contains("products"));
    }

    #[test]
    fn test_unauthorized_is_a_backend_error() {
        let err = ApiError::from(RemoteError::Unauthorized);
        assert_eq!(err.code, ErrorCode::BackendError);
    }

    #[test]
    fn test_code_serializes_screaming_snake() {
        let json = serde_json::to_value(ApiError::transaction_failed()).unwrap();
        assert_eq!(json["code"], "TRANSACTION_FAILED");
    }

    #[test]
    fn test_notice_display() {
        let notice = Notice::info("Product Added", "Bread added to cart");
        assert_eq!(notice.to_string(), "✓ Product Added - Bread added to cart");
    }
}
