//! # orbit-core: Pure Business Logic for Orbit POS
//!
//! Combo pricing, the cart, transaction assembly and the history/receipt
//! projections. Everything here is deterministic and free of I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orbit POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 orbit-terminal (commands, CLI)                  │   │
//! │  │    items ──► sell ──► checkout ──► history / reprint / export   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ orbit-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   catalog ──► combo ──► cart ──► checkout ──► history/receipt   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    orbit-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` (integer cents) and `Percent` (basis points)
//! - [`types`] - Domain types (Product, Combo, Transaction, ...)
//! - [`catalog`] - In-memory catalog snapshot and register views
//! - [`combo`] - Combo pricing engine
//! - [`cart`] - Stock-constrained cart
//! - [`session`] - Per-register session (cart + customer + operator)
//! - [`checkout`] - Cart → transaction draft
//! - [`history`] - History filters and summary
//! - [`receipt`] - Receipt view and share text
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use orbit_core::cart::Cart;
//! use orbit_core::types::{ItemKey, SaleableItem};
//!
//! let combo = SaleableItem {
//!     key: ItemKey::combo("k1"),
//!     name: "Tea Time".to_string(),
//!     unit_price_cents: 2000,
//!     stock: 2,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(&combo).unwrap();
//! cart.add_item(&combo).unwrap();
//! assert!(cart.add_item(&combo).is_err()); // only 2 in stock
//! assert_eq!(cart.total().cents(), 4000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod combo;
pub mod error;
pub mod history;
pub mod money;
pub mod receipt;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals};
pub use catalog::{CatalogSnapshot, StockLookup};
pub use combo::{ComboPricing, PricedCombo};
pub use error::{CoreError, CoreResult, ValidationError};
pub use history::{DateScope, HistoryQuery, HistorySummary};
pub use money::{Money, Percent};
pub use receipt::Receipt;
pub use session::PosSession;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single cart.
pub const MAX_CART_LINES: usize = 100;
