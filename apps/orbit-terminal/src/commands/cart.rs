//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│ Recorded │       │
//! │  │  Cart    │     │          │     │          │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                   │            │
//! │                   add_to_cart                              │            │
//! │                   set_cart_quantity                        ▼            │
//! │                   remove_from_cart               cart + customer        │
//! │                        │                         cleared                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────► (back to empty)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are addressed by key (`p:<id>` or `c:<id>`). Stock always comes
//! from the current catalog snapshot, never from the cart line.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CatalogState, SessionState};
use orbit_core::{
    CartLine, CartTotals, CatalogSnapshot, Customer, ItemKey, ItemKind, PosSession, StockLookup,
};

/// Cart response including lines, totals and the attached customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    pub customer: Option<Customer>,
}

impl From<&PosSession> for CartResponse {
    fn from(session: &PosSession) -> Self {
        CartResponse {
            lines: session.cart().lines().to_vec(),
            totals: CartTotals::from(session.cart()),
            customer: session.customer().cloned(),
        }
    }
}

/// Whether the item behind `key` is sold at the session's branch.
fn offered_at(snapshot: &CatalogSnapshot, key: &ItemKey, branch_id: &str) -> bool {
    match key.kind {
        ItemKind::Product => snapshot
            .product(&key.id)
            .is_some_and(|p| p.is_in_branch(branch_id)),
        ItemKind::Combo => snapshot
            .combo(&key.id)
            .is_some_and(|c| c.is_in_branch(branch_id)),
    }
}

pub async fn get_cart(session: &SessionState) -> CartResponse {
    debug!("get_cart command");
    session.with_session(|s| CartResponse::from(s)).await
}

/// Adds one unit of an item to the cart.
///
/// ## Behavior
/// - Already in cart: quantity + 1, unless that exceeds live stock
/// - Not in cart: new line with quantity 1 at the item's current final price
/// - Items not sold at the session's branch are rejected as not found
pub async fn add_to_cart(
    session: &SessionState,
    catalog: &CatalogState,
    key: &str,
) -> Result<CartResponse, ApiError> {
    let key: ItemKey = key.parse()?;
    debug!(key = %key, "add_to_cart command");

    // Never wait on the session while holding the catalog guard.
    let branch = session
        .with_session(|s| s.context().branch_id.clone())
        .await;

    let item = {
        let snapshot = catalog.read().await;
        let item = snapshot.saleable(&key)?;
        if let Some(branch) = branch.as_deref() {
            if !offered_at(&snapshot, &key, branch) {
                return Err(ApiError::not_found("Item", &key.to_string()));
            }
        }
        item
    };

    session
        .with_session_mut(|s| -> Result<CartResponse, ApiError> {
            s.cart_mut().add_item(&item)?;
            Ok(CartResponse::from(&*s))
        })
        .await
}

/// Sets a line's quantity. Zero removes the line.
pub async fn set_cart_quantity(
    session: &SessionState,
    catalog: &CatalogState,
    key: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    let key: ItemKey = key.parse()?;
    debug!(key = %key, quantity, "set_cart_quantity command");

    // An item that left the catalog has nothing left to sell.
    let stock = catalog.read().await.stock_of(&key).unwrap_or(0);

    session
        .with_session_mut(|s| {
            s.cart_mut().set_quantity(&key, quantity, stock)?;
            Ok(CartResponse::from(&*s))
        })
        .await
}

pub async fn remove_from_cart(session: &SessionState, key: &str) -> Result<CartResponse, ApiError> {
    let key: ItemKey = key.parse()?;
    debug!(key = %key, "remove_from_cart command");

    Ok(session
        .with_session_mut(|s| {
            s.cart_mut().remove_item(&key);
            CartResponse::from(&*s)
        })
        .await)
}

/// Empties the cart and detaches the customer.
pub async fn clear_cart(session: &SessionState) -> CartResponse {
    debug!("clear_cart command");
    session
        .with_session_mut(|s| {
            s.clear();
            CartResponse::from(&*s)
        })
        .await
}
