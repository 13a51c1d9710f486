//! # orbit-db: Database Layer for Orbit POS
//!
//! SQLite storage for the catalog, customers and the append-only transaction
//! log, via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orbit POS Data Flow                              │
//! │                                                                         │
//! │  Terminal command (sell, history, ...)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     orbit-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ Product  Combo     │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ Branch   Customer  │  │ 001_init   │  │   │
//! │  │   │               │    │ Transaction ...    │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (path from the terminal's [database] config)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orbit_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("orbit.db")).await?;
//! let combos = db.combos().list(Some("branch-1")).await?;
//! let tx = db.transactions().append(&draft).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::combo::ComboRepository;
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::reference::{BranchRepository, BrandRepository, CategoryRepository};
pub use repository::transaction::TransactionRepository;
