//! # Commands Module
//!
//! Every operation the front end can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports, receipt helper)
//! ├── catalog.rs   ◄─── Item grid, combo list, combo editor
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── checkout.rs  ◄─── Customer registration, checkout
//! └── history.rs   ◄─── History, reprint, export
//! ```
//!
//! ## State Injection
//! Each command declares only the state and backend it needs:
//! ```rust,ignore
//! // Only needs the session
//! async fn get_cart(session: &SessionState)
//!
//! // Needs session and catalog
//! async fn add_to_cart(session: &SessionState, catalog: &CatalogState, key: &str)
//!
//! // Needs a transaction log too
//! async fn checkout(session: &SessionState, catalog: &CatalogState, log: &dyn TransactionLog, ...)
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod history;

use orbit_core::{CatalogSnapshot, Receipt, Transaction};

use crate::state::StoreConfig;

/// Receipt for `transaction`, with the store and branch header filled in.
pub(crate) fn build_receipt(
    transaction: &Transaction,
    snapshot: &CatalogSnapshot,
    store: &StoreConfig,
) -> Receipt {
    let receipt = Receipt::from(transaction)
        .with_store_name(store.name.clone())
        .with_currency_symbol(store.currency_symbol.clone());

    match snapshot.branch(&transaction.branch_id) {
        Some(branch) => receipt.with_branch(branch),
        None => receipt,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;

    use crate::backend::memory::MemoryBackend;
    use crate::state::{CatalogState, SessionState};
    use orbit_core::{Branch, Combo, Product, SessionContext, UserRole};

    pub fn product(id: &str, name: &str, price: i64, offer: Option<i64>, stock: i64, branch: &str) -> Product {
        let now = Utc::now();
        Product {
            id: id.into(),
            name: name.into(),
            barcode: None,
            description: None,
            brand_id: None,
            category_id: None,
            price_cents: price,
            offer_price_cents: offer,
            stock,
            branch_ids: vec![branch.into()],
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn combo(id: &str, name: &str, products: &[&str], price: i64, offer: Option<i64>) -> Combo {
        let now = Utc::now();
        Combo {
            id: id.into(),
            name: name.into(),
            description: format!("{} pack", name),
            product_ids: products.iter().map(|p| p.to_string()).collect(),
            price_cents: price,
            offer_price_cents: offer,
            branch_ids: vec!["b1".into()],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn context(role: UserRole, branch: Option<&str>) -> SessionContext {
        SessionContext {
            user_id: "u1".into(),
            name: "Asha".into(),
            role,
            branch_id: branch.map(str::to_string),
        }
    }

    /// Downtown (b1) sells tea, croissant, banana bread and the Tea Time
    /// combo; lime soda is only sold at the airport (b2).
    pub fn backend() -> MemoryBackend {
        let backend = MemoryBackend::new();

        *backend.products.lock().unwrap() = vec![
            product("p-tea", "Masala Tea", 1000, None, 40, "b1"),
            product("p-croissant", "Butter Croissant", 1500, None, 12, "b1"),
            product("p-bread", "Banana Bread", 1200, Some(1000), 2, "b1"),
            product("p-lime", "Fresh Lime Soda", 900, None, 30, "b2"),
        ];
        *backend.combos.lock().unwrap() = vec![
            combo("k-tea-time", "Tea Time", &["p-tea", "p-croissant"], 2400, Some(2000)),
            combo("k-ghost", "Ghost Pack", &["p-tea", "p-gone"], 1500, None),
        ];
        *backend.branches.lock().unwrap() = vec![
            Branch {
                id: "b1".into(),
                name: "Downtown".into(),
                address: Some("12 Main St".into()),
                phone: None,
            },
            Branch {
                id: "b2".into(),
                name: "Airport".into(),
                address: None,
                phone: None,
            },
        ];

        backend
    }

    /// A POS operator at Downtown with the catalog loaded.
    pub async fn terminal() -> (MemoryBackend, SessionState, CatalogState) {
        terminal_as(context(UserRole::PosOperator, Some("b1"))).await
    }

    pub async fn terminal_as(ctx: SessionContext) -> (MemoryBackend, SessionState, CatalogState) {
        let backend = backend();
        let catalog = CatalogState::new();
        catalog.refresh(&backend).await.unwrap();
        (backend, SessionState::new(ctx), catalog)
    }
}
