//! # Backend Interfaces
//!
//! The terminal talks to storage only through these traits, so commands can
//! be exercised against an in-memory fake and the SQLite database alike.
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │  CatalogBackend  │   │  TransactionLog  │   │ CustomerRegistry │
//! │  products/combos │   │  append / list   │   │  create          │
//! │  reference data  │   │  get by id       │   │                  │
//! └────────┬─────────┘   └────────┬─────────┘   └────────┬─────────┘
//!          └──────────────────────┼──────────────────────┘
//!                                 ▼
//!                       orbit_db::Database
//! ```

use async_trait::async_trait;
use thiserror::Error;

use orbit_core::{
    Branch, Brand, Category, Combo, Customer, NewCustomer, NewTransaction, Product, Transaction,
};
use orbit_db::{Database, DbError};

// =============================================================================
// Errors
// =============================================================================

/// Backend-neutral storage error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The store refused the write (duplicate, broken reference, constraint).
    #[error("{0}")]
    Rejected(String),

    /// The store could not be reached or the operation failed midway.
    #[error("{0}")]
    Unavailable(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

impl From<DbError> for BackendError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => BackendError::NotFound { entity, id },
            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. }
            | DbError::CheckViolation(_)
            | DbError::Invalid(_) => BackendError::Rejected(err.to_string()),
            other => BackendError::Unavailable(other.to_string()),
        }
    }
}

// =============================================================================
// Traits
// =============================================================================

#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Products assigned to `branch_id`, or all of them for `None`.
    async fn list_products(&self, branch_id: Option<&str>) -> BackendResult<Vec<Product>>;

    /// Combo definitions assigned to `branch_id`, or all of them for `None`.
    async fn list_combos(&self, branch_id: Option<&str>) -> BackendResult<Vec<Combo>>;

    async fn list_branches(&self) -> BackendResult<Vec<Branch>>;

    async fn list_categories(&self) -> BackendResult<Vec<Category>>;

    async fn list_brands(&self) -> BackendResult<Vec<Brand>>;

    /// Inserts or replaces a combo definition.
    async fn save_combo(&self, combo: &Combo) -> BackendResult<()>;
}

#[async_trait]
pub trait TransactionLog: Send + Sync {
    /// Records a sale. The log assigns the id and the timestamp.
    async fn append_transaction(&self, draft: &NewTransaction) -> BackendResult<Transaction>;

    async fn list_transactions(&self, branch_id: Option<&str>) -> BackendResult<Vec<Transaction>>;

    async fn get_transaction(&self, id: &str) -> BackendResult<Option<Transaction>>;
}

#[async_trait]
pub trait CustomerRegistry: Send + Sync {
    async fn create_customer(&self, customer: &NewCustomer) -> BackendResult<Customer>;
}

// =============================================================================
// SQLite
// =============================================================================

#[async_trait]
impl CatalogBackend for Database {
    async fn list_products(&self, branch_id: Option<&str>) -> BackendResult<Vec<Product>> {
        Ok(self.products().list(branch_id).await?)
    }

    async fn list_combos(&self, branch_id: Option<&str>) -> BackendResult<Vec<Combo>> {
        Ok(self.combos().list(branch_id).await?)
    }

    async fn list_branches(&self) -> BackendResult<Vec<Branch>> {
        Ok(self.branches().list().await?)
    }

    async fn list_categories(&self) -> BackendResult<Vec<Category>> {
        Ok(self.categories().list().await?)
    }

    async fn list_brands(&self) -> BackendResult<Vec<Brand>> {
        Ok(self.brands().list().await?)
    }

    async fn save_combo(&self, combo: &Combo) -> BackendResult<()> {
        Ok(self.combos().save(combo).await?)
    }
}

#[async_trait]
impl TransactionLog for Database {
    async fn append_transaction(&self, draft: &NewTransaction) -> BackendResult<Transaction> {
        Ok(self.transactions().append(draft).await?)
    }

    async fn list_transactions(&self, branch_id: Option<&str>) -> BackendResult<Vec<Transaction>> {
        Ok(self.transactions().list(branch_id).await?)
    }

    async fn get_transaction(&self, id: &str) -> BackendResult<Option<Transaction>> {
        Ok(self.transactions().get_by_id(id).await?)
    }
}

#[async_trait]
impl CustomerRegistry for Database {
    async fn create_customer(&self, customer: &NewCustomer) -> BackendResult<Customer> {
        Ok(self.customers().create(customer).await?)
    }
}

// =============================================================================
// In-memory fake
// =============================================================================
