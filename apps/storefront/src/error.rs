//! # Notices
//!
//! Every command failure becomes a [`Notice`]: the toast the user sees.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Flow in the Storefront                       │
//! │                                                                         │
//! │  Command Function: Result<T, Notice>                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Form invalid? ───── CheckoutErrors ────────────┐                      │
//! │         │                                        │  VALIDATION_ERROR    │
//! │         ▼                                        │  + per-field list    │
//! │  Request failed? ─── ClientError::Api ──────────┤  REQUEST_FAILED      │
//! │         │            ClientError::Unauthorized ─┤  SESSION_EXPIRED     │
//! │         │            ClientError::Network ──────┤  NETWORK_ERROR       │
//! │         ▼                                        ▼                      │
//! │  Success ─────────────────────────────────► Notice { level, code,      │
//! │                                                      message, fields } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serialized:
//! ```json
//! {
//!   "level": "error",
//!   "code": "VALIDATION_ERROR",
//!   "message": "Please fix the highlighted fields.",
//!   "fields": [{ "field": "email", "message": "email is required" }]
//! }
//! ```

use serde::Serialize;
use tracing::error;

use roda_client::ClientError;
use roda_core::{CheckoutErrors, CoreError, ValidationError};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Machine-readable notice codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Form or input validation failed
    ValidationError,

    /// 401: the session was cleared
    SessionExpired,

    /// 403, or a role check failed locally
    Forbidden,

    /// Resource not found
    NotFound,

    /// Backend returned a non-success status
    RequestFailed,

    /// The backend could not be reached
    NetworkError,

    /// A submission is already in flight
    SubmitInProgress,

    /// Configuration or local storage problem
    ConfigError,

    /// Anything else
    Internal,

    /// Not an error
    Ok,
}

/// One inline form error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

/// A toast, plus inline field errors when a form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldMessage>,
}

impl Notice {
    pub fn new(level: NoticeLevel, code: ErrorCode, message: impl Into<String>) -> Self {
        Notice {
            level,
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice::new(NoticeLevel::Success, ErrorCode::Ok, message)
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        Notice::new(
            NoticeLevel::Error,
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Notice::new(NoticeLevel::Error, ErrorCode::ValidationError, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Notice::new(NoticeLevel::Error, ErrorCode::Forbidden, message)
    }

    pub fn submit_in_progress() -> Self {
        Notice::new(
            NoticeLevel::Warning,
            ErrorCode::SubmitInProgress,
            "Your order is already being sent.",
        )
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for Notice {}

// =============================================================================
// Conversions
// =============================================================================

impl From<CheckoutErrors> for Notice {
    fn from(errors: CheckoutErrors) -> Self {
        let mut notice = Notice::validation("Please fix the highlighted fields.");
        notice.fields = errors
            .errors()
            .iter()
            .map(|e| FieldMessage {
                field: e.field().to_string(),
                message: e.to_string(),
            })
            .collect();
        notice
    }
}

impl From<ValidationError> for Notice {
    fn from(err: ValidationError) -> Self {
        let mut notice = Notice::validation(err.to_string());
        notice.fields = vec![FieldMessage {
            field: err.field().to_string(),
            message: err.to_string(),
        }];
        notice
    }
}

impl From<CoreError> for Notice {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Checkout(errors) => errors.into(),
            CoreError::Validation(e) => e.into(),
            other => {
                error!("Unexpected core error: {}", other);
                Notice::new(
                    NoticeLevel::Error,
                    ErrorCode::Internal,
                    roda_client::GENERIC_ERROR_MESSAGE,
                )
            }
        }
    }
}

impl From<ClientError> for Notice {
    fn from(err: ClientError) -> Self {
        let message = err.user_message();
        let detail = err.to_string();
        match err {
            ClientError::Checkout(errors) => errors.into(),
            ClientError::Validation(e) => e.into(),
            ClientError::Unauthorized { .. } => {
                Notice::new(NoticeLevel::Warning, ErrorCode::SessionExpired, message)
            }
            ClientError::Forbidden { .. } => Notice::forbidden(message),
            ClientError::NotSignedIn => {
                Notice::new(NoticeLevel::Warning, ErrorCode::SessionExpired, message)
            }
            ClientError::Api { status: 404, .. } => {
                Notice::new(NoticeLevel::Error, ErrorCode::NotFound, message)
            }
            ClientError::Api { .. } => {
                Notice::new(NoticeLevel::Error, ErrorCode::RequestFailed, message)
            }
            ClientError::Network(ref e) => {
                error!("Network failure: {}", e);
                Notice::new(NoticeLevel::Error, ErrorCode::NetworkError, message)
            }
            ClientError::Timeout => {
                Notice::new(NoticeLevel::Error, ErrorCode::NetworkError, message)
            }
            ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_)
            | ClientError::Storage(_)
            | ClientError::Snapshot(_) => {
                error!("Local setup error: {}", detail);
                Notice::new(NoticeLevel::Error, ErrorCode::ConfigError, detail)
            }
            ClientError::Decode(ref e) => {
                error!("Undecodable response: {}", e);
                Notice::new(NoticeLevel::Error, ErrorCode::Internal, message)
            }
        }
    }
}
