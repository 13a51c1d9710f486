//! # API Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Orbit POS                              │
//! │                                                                         │
//! │  Command Function ── Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Cart / combo rule? ─── CoreError::InsufficientStock ──┐               │
//! │         │                                              │               │
//! │         ▼                                              ▼               │
//! │  Backend failure? ──── BackendError::Unavailable ──── ApiError ──► UI  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────────────► UI │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error reaches the front end as `{ "code": "...", "message": "..." }`.

use serde::Serialize;

use crate::backend::BackendError;
use crate::export::ExportError;
use crate::state::ConfigError;
use orbit_core::CoreError;

/// Error returned from terminal commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Tea Time: available 5, requested 6"
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
    /// Entity or transaction not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Combo does not bundle 2-3 distinct products
    InvalidComboComposition,

    /// Requested quantity exceeds live stock
    InsufficientStock,

    /// Checkout with nothing in the cart
    EmptyCart,

    /// Cart operation rejected (unknown line, too many lines)
    CartError,

    /// The backend could not record or read data
    PersistenceFailure,

    /// The session's role may not perform this operation
    Forbidden,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Anything else
    Internal,
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

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// A write or read against the backend failed. The session is untouched.
    pub fn persistence(err: impl std::fmt::Display) -> Self {
        tracing::error!("Backend operation failed: {}", err);
        ApiError::new(
            ErrorCode::PersistenceFailure,
            format!("Could not save or load data: {}", err),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InvalidComboComposition { .. } => ErrorCode::InvalidComboComposition,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::EmptyCart => ErrorCode::EmptyCart,
            CoreError::ProductNotFound(_)
            | CoreError::ComboNotFound(_)
            | CoreError::TransactionNotFound(_) => ErrorCode::NotFound,
            CoreError::ItemNotInCart(_) | CoreError::CartTooLarge { .. } => ErrorCode::CartError,
            CoreError::NoBranchAssigned | CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<orbit_core::ValidationError> for ApiError {
    fn from(err: orbit_core::ValidationError) -> Self {
        ApiError::from(CoreError::from(err))
    }
}

/// Converts backend errors to API errors.
impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            BackendError::Rejected(message) => ApiError::validation(message),
            BackendError::Unavailable(_) => ApiError::persistence(err),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        tracing::error!("Export failed: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
