//! # Transaction Assembly
//!
//! Turns a session's cart into a [`NewTransaction`] ready for the log.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PosSession                                                             │
//! │  ├── cart lines ──── copied by value ──► TransactionLine[]              │
//! │  ├── customer ────── copied ───────────► customer snapshot              │
//! │  └── context.name ─────────────────────► cashier                        │
//! │                                                                         │
//! │  total = Σ unit price × quantity over the COPIED lines                  │
//! │                                                                         │
//! │  NewTransaction ──► TransactionLog::append ──► Transaction (id, time)   │
//! │                          │                                              │
//! │                          ├── Ok  ──► session.clear()                    │
//! │                          └── Err ──► session untouched                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Assembly reads the session and never mutates it. Clearing happens in the
//! caller once the append has succeeded.

use crate::cart::CartLine;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::session::PosSession;
use crate::types::{NewTransaction, PaymentMethod, TransactionLine};

/// Builds the transaction draft for the current sale.
///
/// ## Errors
/// - [`CoreError::EmptyCart`] when the cart has no lines
/// - [`CoreError::NoBranchAssigned`] when `branch_id` is blank
pub fn assemble(
    session: &PosSession,
    branch_id: &str,
    payment_method: PaymentMethod,
) -> CoreResult<NewTransaction> {
    let cart = session.cart();
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    if branch_id.trim().is_empty() {
        return Err(CoreError::NoBranchAssigned);
    }

    let lines: Vec<TransactionLine> = cart
        .lines()
        .iter()
        .map(CartLine::to_transaction_line)
        .collect();
    let total: Money = lines.iter().map(TransactionLine::line_total).sum();

    Ok(NewTransaction {
        branch_id: branch_id.to_string(),
        lines,
        total_cents: total.cents(),
        customer: session.customer().cloned(),
        cashier: session.context().name.clone(),
        payment_method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Customer, ItemKey, ItemKind, SaleableItem, SessionContext, UserRole};

    fn session() -> PosSession {
        PosSession::new(SessionContext {
            user_id: "u1".into(),
            name: "Asha".into(),
            role: UserRole::PosOperator,
            branch_id: Some("b1".into()),
        })
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        assert_eq!(
            assemble(&session(), "b1", PaymentMethod::Cash),
            Err(CoreError::EmptyCart)
        );
    }

    #[test]
    fn test_assemble_copies_lines_and_totals() {
        let mut session = session();
        let combo = SaleableItem {
            key: ItemKey::combo("k1"),
            name: "Tea Time".into(),
            unit_price_cents: 2000,
            stock: 5,
        };
        for _ in 0..5 {
            session.cart_mut().add_item(&combo).unwrap();
        }
        session.attach_customer(Customer {
            id: "c1".into(),
            name: "Ravi".into(),
            phone: "9876543210".into(),
            email: None,
        });

        let draft = assemble(&session, "b1", PaymentMethod::Card).unwrap();

        assert_eq!(draft.lines.len(), 1);
        assert_eq!(draft.lines[0].kind, ItemKind::Combo);
        assert_eq!(draft.lines[0].quantity, 5);
        // 5 × $20.00
        assert_eq!(draft.total_cents, 10_000);
        assert_eq!(draft.cashier, "Asha");
        assert_eq!(draft.payment_method, PaymentMethod::Card);
        assert_eq!(draft.customer.as_ref().map(|c| c.name.as_str()), Some("Ravi"));

        // The session is left as it was.
        assert_eq!(session.cart().item_count(), 5);
        assert!(session.customer().is_some());
    }

    #[test]
    fn test_total_matches_lines() {
        let mut session = session();
        for (id, price) in [("1", 1099), ("2", 250), ("3", 1)] {
            let item = SaleableItem {
                key: ItemKey::product(id),
                name: id.into(),
                unit_price_cents: price,
                stock: 3,
            };
            session.cart_mut().add_item(&item).unwrap();
            session.cart_mut().add_item(&item).unwrap();
        }

        let draft = assemble(&session, "b1", PaymentMethod::Cash).unwrap();
        let sum: i64 = draft
            .lines
            .iter()
            .map(|l| l.unit_price_cents * l.quantity)
            .sum();
        assert_eq!(draft.total_cents, sum);
        assert_eq!(draft.total_cents, session.cart().total().cents());
    }

    #[test]
    fn test_blank_branch_is_rejected() {
        let mut session = session();
        session
            .cart_mut()
            .add_item(&SaleableItem {
                key: ItemKey::product("1"),
                name: "Tea".into(),
                unit_price_cents: 100,
                stock: 1,
            })
            .unwrap();

        assert_eq!(
            assemble(&session, " ", PaymentMethod::Cash),
            Err(CoreError::NoBranchAssigned)
        );
    }
}
