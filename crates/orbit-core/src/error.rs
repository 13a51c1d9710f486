//! # Error Types
//!
//! Domain-specific error types for orbit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orbit-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  orbit-db errors                                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  orbit-terminal errors                                                 │
//! │  ├── BackendError     - Backend request failures                       │
//! │  └── ApiError         - What the front end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │        DbError → BackendError ──────┴──► ApiError → Front end          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` is raised before any state changes: a rejected cart or
//! pricing operation leaves the session exactly as it was.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A combo must bundle 2 or 3 distinct products.
    #[error("A combo pack needs 2-3 distinct products, got {count}")]
    InvalidComboComposition { count: usize },

    /// The requested quantity exceeds live stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap "Summer Combo" (in cart: 5, stock: 5)
    ///      │
    ///      ▼
    /// InsufficientStock { item: "Summer Combo", available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient stock!" and the cart is unchanged
    /// ```
    #[error("Insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Combo not found: {0}")]
    ComboNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// A quantity change targeted a line that is not in the cart.
    #[error("{0} is not in the cart")]
    ItemNotInCart(String),

    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// The session has no branch, so there is nowhere to attribute a sale.
    #[error("No branch is assigned to this session")]
    NoBranchAssigned,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must not be negative")]
    Negative { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// An offer price above the list price.
    #[error("offer price {offer} exceeds price {price}")]
    OfferAbovePrice { price: i64, offer: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
