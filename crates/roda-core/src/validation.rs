//! # Validation Module
//!
//! Field validators shared by the checkout, sign-in/sign-up and product
//! forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE                                                  │
//! │  ├── Required fields (trimmed, blank = missing)                        │
//! │  └── Simple format checks (e-mail shape, lengths, price ≥ 0)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend (external)                                           │
//! │  └── Business rules, uniqueness, authorization                         │
//! │                                                                         │
//! │  Failures here never reach the network.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use roda_core::validation::{require, validate_email};
//!
//! assert_eq!(require("name", "  Ana ").unwrap(), "Ana");
//! assert!(require("name", "   ").is_err());
//! assert!(validate_email("ana@example.com").is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::NewProduct;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name accepted by the product form.
pub const MAX_PRODUCT_NAME_LEN: usize = 120;

/// Minimum password length on sign-up and reset.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

/// Requires a non-blank value and returns it trimmed.
pub fn require<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Validates the shape of an e-mail address.
///
/// ## Rules
/// - Required
/// - Exactly one `@` with text on both sides
/// - A dot somewhere in the domain part
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = require("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid());
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a password for sign-up and reset.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use roda_core::validation::validate_product_name;
///
/// assert!(validate_product_name("X-Burger").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = require("name", name)?;

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates the product form before `POST /establishment/product/new`.
///
/// Zero is a valid price (free add-ons); negative prices are not.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;

    if product.price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
