//! # Validation Module
//!
//! Input validation utilities for VanLedger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web client                                                   │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Caps payments at the shop's pending balance                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── THIS MODULE + billing: Business rule validation                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (users.phone)                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vanledger_core::validation::{validate_shop_name, validate_quantity};
//!
//! assert!(validate_shop_name("Sharma General Store").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Checks that a trimmed value is present and at most `max` characters.
fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a shop name (1-120 characters).
pub fn validate_shop_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 120)
}

/// Validates a shop's area / route label (1-120 characters).
pub fn validate_area(area: &str) -> ValidationResult<()> {
    validate_text("area", area, 120)
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use vanledger_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Amul Taaza 500ml").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 200)
}

/// Key for the case-insensitive product name check. Folds full Unicode
/// case, so "Ägg" and "ägg" collide.
///
/// ```rust
/// use vanledger_core::validation::product_name_key;
///
/// assert_eq!(product_name_key(" ÄGG "), product_name_key("ägg"));
/// ```
pub fn product_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Validates a selling unit label ("packet", "kg").
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    validate_text("unit", unit, 32)
}

/// Validates an expense description.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    validate_text("description", description, 500)
}

/// Validates an optional free-text note on a stock log.
pub fn validate_note(note: Option<&str>) -> ValidationResult<()> {
    match note {
        Some(note) if note.chars().count() > 500 => Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: 500,
        }),
        _ => Ok(()),
    }
}

/// Validates a reference to another record (`shopId`, `productId`).
pub fn validate_reference(field: &str, id: &str) -> ValidationResult<()> {
    validate_text(field, id, 64)
}

/// Validates a user's display name.
pub fn validate_user_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 120)
}

/// Validates a login phone number.
///
/// ## Rules
/// - 10 to 15 digits
/// - An optional leading `+` (country code)
///
/// ## Example
/// ```rust
/// use vanledger_core::validation::validate_phone;
///
/// assert!(validate_phone("9876543210").is_ok());
/// assert!(validate_phone("+919876543210").is_ok());
/// assert!(validate_phone("98765-43210").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if !digits.chars().all(|c| c.is_ascii_digit()) || !(10..=15).contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be 10 to 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a new password (at least 6 characters).
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line or stock-movement quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Bill: Add Line                                                         │
/// │                                                                         │
/// │  Seller enters quantity: 12                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(12) ← THIS FUNCTION                                 │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 9999? → Error: "quantity must be between 1 and 9999"   │
/// │       │                                                                 │
/// │       └── OK → line is priced                                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an opening or corrected stock count (zero allowed).
pub fn validate_stock_count(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a price or discount.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free samples, no discount)
/// - Must not exceed [`MAX_AMOUNT`]
///
/// ## Example
/// ```rust
/// use vanledger_core::money::Money;
/// use vanledger_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("price", Money::from_paise(0)).is_ok());
/// assert!(validate_non_negative("price", Money::from_paise(-100)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    validate_within_cap(field, amount, 0)
}

/// Validates a payment or expense amount.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_AMOUNT`]
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    validate_within_cap(field, amount, 1)
}

fn validate_within_cap(field: &str, amount: Money, min: i64) -> ValidationResult<()> {
    if amount > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max: MAX_AMOUNT.paise(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert!(validate_shop_name("Sharma General Store").is_ok());
        assert!(validate_shop_name("").is_err());
        assert!(validate_shop_name("   ").is_err());
        assert!(validate_shop_name(&"A".repeat(121)).is_err());

        assert!(validate_product_name("Parle-G 100g").is_ok());
        assert!(validate_product_name(&"A".repeat(300)).is_err());

        assert!(validate_unit("packet").is_ok());
        assert!(validate_unit("").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+919876543210").is_ok());

        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("98765 43210").is_err());
        assert!(validate_phone("phone-number").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("abc").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_amount("amount", Money::from_paise(1)).is_ok());
        assert!(validate_amount("amount", Money::zero()).is_err());
        assert!(validate_amount("amount", Money::from_paise(-5)).is_err());

        assert!(validate_non_negative("discount", Money::zero()).is_ok());
        assert!(validate_non_negative("discount", Money::from_paise(-1)).is_err());

        assert!(validate_stock_count(0).is_ok());
        assert!(validate_stock_count(-3).is_err());
    }

    #[test]
    fn test_amounts_are_capped() {
        assert!(validate_amount("amount", MAX_AMOUNT).is_ok());
        assert!(validate_non_negative("price", MAX_AMOUNT).is_ok());

        let over = MAX_AMOUNT + Money::from_paise(1);
        assert!(matches!(
            validate_amount("amount", over),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_non_negative("price", over).is_err());
        assert!(validate_amount("amount", Money::from_paise(i64::MAX / 2 + 1)).is_err());
    }

    #[test]
    fn test_validate_note() {
        assert!(validate_note(None).is_ok());
        assert!(validate_note(Some("crate dropped")).is_ok());
        assert!(validate_note(Some(&"x".repeat(501))).is_err());
    }
}
