//! # Repository Module
//!
//! Database repository implementations for Orbit POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Terminal backend                                                       │
//! │       │                                                                 │
//! │       │  db.combos().list(Some(branch))                                 │
//! │       ▼                                                                 │
//! │  ComboRepository                                                        │
//! │  ├── list(&self, branch)                                                │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── save(&self, combo)                                                 │
//! │  └── delete(&self, id)                                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD, branch listing
//! - [`combo::ComboRepository`] - Combo definitions (inputs only)
//! - [`reference`] - Branches, categories, brands
//! - [`customer::CustomerRepository`] - Customers registered at checkout
//! - [`transaction::TransactionRepository`] - Append-only transaction log

pub mod combo;
pub mod customer;
pub mod product;
pub mod reference;
pub mod transaction;

use crate::error::{DbError, DbResult};

/// Serializes an id set for a JSON TEXT column.
pub(crate) fn encode_ids(column: &str, ids: &[String]) -> DbResult<String> {
    serde_json::to_string(ids).map_err(|e| DbError::corrupt(column, e))
}

/// Reads an id set back from a JSON TEXT column.
pub(crate) fn decode_ids(column: &str, raw: &str) -> DbResult<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| DbError::corrupt(column, e))
}

/// Filter clause matching rows whose `branch_ids` array contains `?1`, or
/// every row when `?1` is NULL.
pub(crate) const BRANCH_FILTER: &str = "(?1 IS NULL OR EXISTS (
    SELECT 1 FROM json_each(branch_ids) WHERE json_each.value = ?1
))";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_set_encoding() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let raw = encode_ids("branch_ids", &ids).unwrap();
        assert_eq!(raw, r#"["a","b"]"#);
        assert_eq!(decode_ids("branch_ids", &raw).unwrap(), ids);

        assert!(matches!(
            decode_ids("branch_ids", "not json"),
            Err(DbError::CorruptColumn { .. })
        ));
    }
}
