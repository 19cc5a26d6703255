//! # Error Types
//!
//! Domain-specific error types for roda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  roda-core errors (this file)                                          │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures (one per field)      │
//! │                                                                         │
//! │  roda-client errors (separate crate)                                   │
//! │  └── ClientError      - HTTP / storage / config failures               │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── Notice           - What the user sees (toast)                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → Notice → User       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart operations never fail; unknown product ids are no-ops. Errors
//! here come from form validation and from decoding persisted snapshots.

use thiserror::Error;

use crate::checkout::CheckoutErrors;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Persisted session snapshot could not be parsed.
    #[error("Invalid session snapshot: {0}")]
    InvalidSnapshot(String),

    /// Persisted session snapshot was written by an unknown format version.
    #[error("Unsupported session snapshot version: {0}")]
    UnsupportedSnapshotVersion(u32),

    /// Snapshot claims to be authenticated but is missing its user or token.
    #[error("Session snapshot is inconsistent: {reason}")]
    InconsistentSnapshot { reason: String },

    /// Checkout form or cart failed validation.
    #[error("Checkout is invalid: {0}")]
    Checkout(#[from] CheckoutErrors),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Each variant names the offending field so the page can render the
/// message next to that control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// A choice (payment method, delivery type, ...) was never made.
    #[error("{field} must be selected")]
    NotSelected { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., malformed e-mail).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::NotSelected { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::TooShort { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = ValidationError::Required {
            field: "phone".to_string(),
        };
        assert_eq!(err.to_string(), "phone is required");

        let err = ValidationError::NotSelected {
            field: "paymentMethod".to_string(),
        };
        assert_eq!(err.to_string(), "paymentMethod must be selected");
    }

    #[test]
    fn test_validation_error_field() {
        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 10,
        };
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn test_wraps_into_core_error() {
        let validation_err = ValidationError::Required {
            field: "email".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
