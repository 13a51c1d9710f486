//! # Checkout Commands
//!
//! Customer registration and the checkout itself.
//!
//! ## Checkout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lock session ─────────────────────────────────────────────────────┐   │
//! │     │                                                              │   │
//! │     ▼                                                              │   │
//! │  assemble(cart, branch, payment) ── EmptyCart? ──► error           │   │
//! │     │                                                              │   │
//! │     ▼  (checkout.recheck_stock only)                               │   │
//! │  verify_stock(catalog snapshot) ── short? ──► InsufficientStock    │   │
//! │     │                                                              │   │
//! │     ▼                                                              │   │
//! │  log.append_transaction ── failed? ──► PersistenceFailure          │   │
//! │     │                                  (cart + customer kept)      │   │
//! │     ▼                                                              │   │
//! │  clear cart + customer                                             │   │
//! │     │                                                              │   │
//! │  unlock ◄──────────────────────────────────────────────────────────┘   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Receipt                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use super::build_receipt;
use crate::backend::{CustomerRegistry, TransactionLog};
use crate::error::ApiError;
use crate::state::{CatalogState, CheckoutConfig, SessionState, StoreConfig};
use orbit_core::checkout::assemble;
use orbit_core::validation::validate_new_customer;
use orbit_core::{Customer, NewCustomer, PaymentMethod, Receipt, Transaction};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub transaction: Transaction,
    pub receipt: Receipt,
}

/// Registers a walk-in customer and attaches them to the current sale.
pub async fn register_customer(
    session: &SessionState,
    registry: &dyn CustomerRegistry,
    name: &str,
    phone: &str,
    email: Option<&str>,
) -> Result<Customer, ApiError> {
    let new = NewCustomer {
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.map(str::to_string),
    };
    validate_new_customer(&new)?;

    let customer = registry.create_customer(&new).await?;
    debug!(id = %customer.id, "Customer registered");

    session
        .with_session_mut(|s| s.attach_customer(customer.clone()))
        .await;
    Ok(customer)
}

pub async fn detach_customer(session: &SessionState) -> Option<Customer> {
    session.with_session_mut(|s| s.detach_customer()).await
}

/// Records the sale in progress.
///
/// `payment` falls back to `checkout.default_payment_method`. The session
/// lock is held from assembly until the cart is cleared.
pub async fn checkout(
    session: &SessionState,
    catalog: &CatalogState,
    log: &dyn TransactionLog,
    store: &StoreConfig,
    options: &CheckoutConfig,
    payment: Option<PaymentMethod>,
) -> Result<CheckoutResponse, ApiError> {
    let payment = payment.unwrap_or(options.default_payment_method);
    let mut current = session.lock().await;

    let branch = current.context().branch_id.clone().unwrap_or_default();
    let draft = assemble(&current, &branch, payment)?;
    debug!(
        branch = %draft.branch_id,
        lines = draft.lines.len(),
        total_cents = draft.total_cents,
        "Checkout assembled"
    );

    if options.recheck_stock {
        let snapshot = catalog.read().await;
        if let Err(e) = current.cart().verify_stock(&*snapshot) {
            warn!(error = %e, "Stock changed since items were added");
            return Err(e.into());
        }
    }

    let transaction = log
        .append_transaction(&draft)
        .await
        .map_err(ApiError::persistence)?;

    current.clear();
    drop(current);

    info!(
        id = %transaction.id,
        total_cents = transaction.total_cents,
        payment = %transaction.payment_method,
        "Sale recorded"
    );

    let receipt = build_receipt(&transaction, &*catalog.read().await, store);
    Ok(CheckoutResponse {
        transaction,
        receipt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::{add_to_cart, get_cart, set_cart_quantity};
    use crate::commands::fixtures;
    use crate::error::ErrorCode;
    use orbit_core::UserRole;
    use std::sync::Arc;
    use std::time::Duration;

    fn store() -> StoreConfig {
        StoreConfig {
            name: "Orbit Coffee".into(),
            currency_symbol: "$".into(),
        }
    }

    #[tokio::test]
    async fn test_checkout_records_and_clears() {
        let (backend, session, catalog) = fixtures::terminal().await;
        add_to_cart(&session, &catalog, "c:k-tea-time").await.unwrap();
        set_cart_quantity(&session, &catalog, "c:k-tea-time", 5).await.unwrap();
        add_to_cart(&session, &catalog, "p:p-tea").await.unwrap();
        register_customer(&session, &backend, "Ravi", "9876543210", None)
            .await
            .unwrap();

        let done = checkout(
            &session,
            &catalog,
            &backend,
            &store(),
            &CheckoutConfig::default(),
            Some(PaymentMethod::Card),
        )
        .await
        .unwrap();

        let tx = &done.transaction;
        assert_eq!(tx.lines.len(), 2);
        assert_eq!(tx.lines[0].quantity, 5);
        // 5 x 20.00 + 1 x 10.00
        assert_eq!(tx.total_cents, 11000);
        assert_eq!(tx.total(), tx.lines_total());
        assert_eq!(tx.cashier, "Asha");
        assert_eq!(tx.branch_id, "b1");
        assert_eq!(tx.payment_method, PaymentMethod::Card);
        assert_eq!(tx.customer.as_ref().map(|c| c.name.as_str()), Some("Ravi"));

        assert_eq!(done.receipt.branch_name.as_deref(), Some("Downtown"));
        assert_eq!(done.receipt.store_name.as_deref(), Some("Orbit Coffee"));
        assert_eq!(done.receipt.customer_name, "Ravi");

        let cart = get_cart(&session).await;
        assert!(cart.lines.is_empty());
        assert!(cart.customer.is_none());
        assert_eq!(backend.transaction_count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_uses_default_payment_method() {
        let (backend, session, catalog) = fixtures::terminal().await;
        add_to_cart(&session, &catalog, "p:p-tea").await.unwrap();

        let options = CheckoutConfig {
            default_payment_method: PaymentMethod::Card,
            recheck_stock: false,
        };
        let done = checkout(&session, &catalog, &backend, &store(), &options, None)
            .await
            .unwrap();
        assert_eq!(done.transaction.payment_method, PaymentMethod::Card);
        assert_eq!(done.receipt.customer_name, "Walk-in Customer");
    }

    #[tokio::test]
    async fn test_empty_cart_leaves_log_unchanged() {
        let (backend, session, catalog) = fixtures::terminal().await;

        let err = checkout(
            &session,
            &catalog,
            &backend,
            &store(),
            &CheckoutConfig::default(),
            None,
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::EmptyCart);
        assert_eq!(backend.transaction_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_append_keeps_cart_and_customer() {
        let (backend, session, catalog) = fixtures::terminal().await;
        add_to_cart(&session, &catalog, "p:p-tea").await.unwrap();
        register_customer(&session, &backend, "Ravi", "9876543210", None)
            .await
            .unwrap();
        let before = get_cart(&session).await;

        backend.fail_writes(true);
        let err = checkout(
            &session,
            &catalog,
            &backend,
            &store(),
            &CheckoutConfig::default(),
            None,
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::PersistenceFailure);
        assert_eq!(get_cart(&session).await, before);
        assert_eq!(backend.transaction_count(), 0);

        // Retry succeeds once the backend recovers.
        backend.fail_writes(false);
        checkout(
            &session,
            &catalog,
            &backend,
            &store(),
            &CheckoutConfig::default(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(backend.transaction_count(), 1);
    }

    #[tokio::test]
    async fn test_recheck_stock_when_enabled() {
        let (backend, session, catalog) = fixtures::terminal().await;
        add_to_cart(&session, &catalog, "p:p-bread").await.unwrap();
        add_to_cart(&session, &catalog, "p:p-bread").await.unwrap();

        // Another register sold a loaf meanwhile.
        {
            let mut snapshot = catalog.write().await;
            let mut bread = snapshot.product("p-bread").unwrap().clone();
            bread.stock = 1;
            snapshot.upsert_product(bread);
        }

        let strict = CheckoutConfig {
            default_payment_method: PaymentMethod::Cash,
            recheck_stock: true,
        };
        let err = checkout(&session, &catalog, &backend, &store(), &strict, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(get_cart(&session).await.totals.item_count, 2);

        // Without the recheck the sale goes through.
        checkout(
            &session,
            &catalog,
            &backend,
            &store(),
            &CheckoutConfig::default(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(backend.transaction_count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_without_branch() {
        let (backend, session, catalog) =
            fixtures::terminal_as(fixtures::context(UserRole::Admin, None)).await;
        add_to_cart(&session, &catalog, "p:p-tea").await.unwrap();

        let err = checkout(
            &session,
            &catalog,
            &backend,
            &store(),
            &CheckoutConfig::default(),
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_cart(&session).await.lines.len(), 1);
    }

    #[tokio::test]
    async fn test_register_customer() {
        let (backend, session, _) = fixtures::terminal().await;

        let err = register_customer(&session, &backend, "Ravi", "12", None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(get_cart(&session).await.customer.is_none());

        let customer =
            register_customer(&session, &backend, " Ravi ", "9876543210", Some("ravi@example.com"))
                .await
                .unwrap();
        assert_eq!(customer.name, "Ravi");
        assert_eq!(get_cart(&session).await.customer, Some(customer.clone()));

        assert_eq!(detach_customer(&session).await, Some(customer));
        assert!(get_cart(&session).await.customer.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_cart_checkout_and_refresh_finish() {
        let (backend, session, catalog) = fixtures::terminal().await;
        let backend = Arc::new(backend);
        let session = Arc::new(session);
        let catalog = Arc::new(catalog);
        let strict = CheckoutConfig {
            default_payment_method: PaymentMethod::Cash,
            recheck_stock: true,
        };

        let mut handles = Vec::new();
        for i in 0..60 {
            let (backend, session, catalog) = (backend.clone(), session.clone(), catalog.clone());
            let strict = strict.clone();
            handles.push(tokio::spawn(async move {
                match i % 3 {
                    0 => {
                        let _ = add_to_cart(&session, &catalog, "p:p-tea").await;
                    }
                    1 => {
                        let _ = checkout(&session, &catalog, &*backend, &store(), &strict, None).await;
                    }
                    _ => catalog.refresh(&*backend).await.unwrap(),
                }
            }));
        }

        let all = async {
            for handle in handles {
                handle.await.unwrap();
            }
        };
        tokio::time::timeout(Duration::from_secs(10), all)
            .await
            .expect("cart, checkout and refresh deadlocked");
    }

    #[tokio::test]
    async fn test_register_customer_backend_failure() {
        let (backend, session, _) = fixtures::terminal().await;
        backend.fail_writes(true);

        let err = register_customer(&session, &backend, "Ravi", "9876543210", None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PersistenceFailure);
        assert!(get_cart(&session).await.customer.is_none());
    }
}
