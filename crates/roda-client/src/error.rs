//! # Client Error Types
//!
//! Error types for configuration, storage and HTTP operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  Unauthorized (401)     │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Forbidden (403)        │ │
//! │  │  ConfigLoad/Save│  │                 │  │  Api { status, msg }    │ │
//! │  └─────────────────┘  └─────────────────┘  │  Decode                 │ │
//! │                                            └─────────────────────────┘ │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Storage      │  │   Client-side   │                              │
//! │  │                 │  │                 │                              │
//! │  │  Storage        │  │  Validation     │                              │
//! │  │  Snapshot       │  │                 │                              │
//! │  │                 │  │  Checkout       │                              │
//! │  │                 │  │  NotSignedIn    │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use roda_core::{CheckoutErrors, CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Fallback shown when the server gives no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Shown after a 401 that carried no message.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Session snapshot error: {0}")]
    Snapshot(#[from] CoreError),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// 401. The session has already been logged out when this is returned.
    #[error("Unauthorized")]
    Unauthorized { message: Option<String> },

    /// 403.
    #[error("Forbidden")]
    Forbidden { message: Option<String> },

    /// Any other non-success status.
    #[error("Request failed with status {status}")]
    Api { status: u16, message: Option<String> },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Client-side Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Checkout is invalid: {0}")]
    Checkout(#[from] CheckoutErrors),

    #[error("Not signed in")]
    NotSignedIn,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if err.is_builder() {
            ClientError::InvalidUrl(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Whether a failed read (GET) may be retried.
    ///
    /// Network failures, timeouts and statuses other than 401/403.
    pub fn is_retryable_read(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_) | ClientError::Timeout | ClientError::Api { .. }
        )
    }

    /// HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The text to put in a toast.
    ///
    /// Server-provided messages win; otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthorized { message } => message
                .clone()
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            ClientError::Forbidden { message } | ClientError::Api { message, .. } => message
                .clone()
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            ClientError::Validation(e) => e.to_string(),
            ClientError::Checkout(e) => e.to_string(),
            ClientError::NotSignedIn => "Please sign in to continue.".to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
