//! # State Module
//!
//! Application state for the terminal, split into focused types so each
//! command only takes what it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  SessionState    │  │  CatalogState    │  │  TerminalConfig      │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  Mutex<          │  │  RwLock<         │  │  store, session,     │  │
//! │  │    PosSession    │  │    Catalog-      │  │  database, checkout  │  │
//! │  │  >               │  │    Snapshot>     │  │                      │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: exclusive; checkout holds it across the append        │
//! │  • CatalogState: many readers, refresh swaps the snapshot              │
//! │  • TerminalConfig: read-only after startup                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod session;

pub use catalog::CatalogState;
pub use config::{
    CheckoutConfig, ConfigError, ConfigResult, DatabaseConfig, SessionConfig, StoreConfig,
    TerminalConfig,
};
pub use session::SessionState;
