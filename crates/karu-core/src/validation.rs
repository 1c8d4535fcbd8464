//! # Validation Module
//!
//! Input checks applied before cart and checkout logic runs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: CLI parsing (clap, line commands)                             │
//! │  Layer 2: THIS MODULE - quantities, barcodes, ids                       │
//! │  Layer 3: Backend constraints (NOT NULL, UNIQUE, FOREIGN KEY)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum barcode length accepted from a scanner.
pub const MAX_BARCODE_LEN: usize = 64;

/// Validates a quantity being added to the cart.
///
/// Zero and negatives are rejected here; `Cart::update_quantity` treats
/// them as "remove" instead and never calls this.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Normalizes scanner input.
///
/// Returns `Ok(None)` for blank input, which the sales screen ignores.
///
/// ```rust
/// use karu_core::validation::normalize_barcode;
///
/// assert_eq!(normalize_barcode("  5449000000996 \n").unwrap().as_deref(), Some("5449000000996"));
/// assert_eq!(normalize_barcode("   ").unwrap(), None);
/// ```
pub fn normalize_barcode(input: &str) -> ValidationResult<Option<String>> {
    let code = input.trim();

    if code.is_empty() {
        return Ok(None);
    }

    if code.len() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    if code.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(Some(code.to_string()))
}

/// Validates a UUID string.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}
