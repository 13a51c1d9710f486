//! # Cart Engine
//!
//! The ordered list of lines being rung up in a session.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Register Action         Cart Call                 Effect               │
//! │  ───────────────         ─────────                 ──────               │
//! │  Tap item        ──────► add_item(item)    ──────► qty + 1 or new line  │
//! │  Type quantity   ──────► set_quantity(k,n) ──────► qty = n (0 removes)  │
//! │  Tap remove      ──────► remove_item(k)    ──────► line dropped         │
//! │  Sale recorded   ──────► clear()           ──────► empty                │
//! │                                                                         │
//! │  Every rejected call returns an error and leaves the cart untouched.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by [`ItemKey`], so a product and a combo sharing an id
//!   are separate lines.
//! - Quantity is always positive and never above the stock seen at the time
//!   of the mutation.
//! - The unit price is frozen when the line is first added.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::StockLookup;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ItemKey, ItemKind, SaleableItem, TransactionLine};
use crate::validation::validate_quantity;
use crate::MAX_CART_LINES;

// =============================================================================
// Cart Line
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub key: ItemKey,
    pub name: String,
    /// Final price at the moment the line was added.
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl CartLine {
    fn from_item(item: &SaleableItem) -> Self {
        CartLine {
            key: item.key.clone(),
            name: item.name.clone(),
            unit_price_cents: item.unit_price_cents,
            quantity: 1,
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Copies the line into an immutable transaction line.
    pub fn to_transaction_line(&self) -> TransactionLine {
        TransactionLine {
            item_id: self.key.id.clone(),
            kind: self.key.kind,
            name: self.name.clone(),
            unit_price_cents: self.unit_price_cents,
            quantity: self.quantity,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, key: &ItemKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.key == key)
    }

    /// Adds one unit of `item`.
    ///
    /// ## Behavior
    /// - Line already present: quantity + 1, unless that passes `item.stock`
    /// - Line absent: appended with quantity 1, unless `item.stock < 1` or the
    ///   cart already holds [`MAX_CART_LINES`] lines
    ///
    /// Returns the line's new quantity.
    pub fn add_item(&mut self, item: &SaleableItem) -> CoreResult<i64> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.key == item.key) {
            let requested = line.quantity + 1;
            if requested > item.stock {
                return Err(insufficient(&item.name, item.stock, requested));
            }
            line.quantity = requested;
            return Ok(requested);
        }

        if item.stock < 1 {
            return Err(insufficient(&item.name, item.stock, 1));
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_item(item));
        Ok(1)
    }

    /// Sets a line's quantity against the item's current `stock`.
    ///
    /// Zero removes the line (a no-op when it is absent). Negative quantities
    /// fail validation.
    pub fn set_quantity(&mut self, key: &ItemKey, quantity: i64, stock: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if quantity == 0 {
            self.remove_item(key);
            return Ok(());
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| &l.key == key)
            .ok_or_else(|| CoreError::ItemNotInCart(key.to_string()))?;

        if quantity > stock {
            return Err(insufficient(&line.name, stock, quantity));
        }

        line.quantity = quantity;
        Ok(())
    }

    /// Drops a line. Absent keys are ignored.
    pub fn remove_item(&mut self, key: &ItemKey) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| &l.key == key)?;
        Some(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Σ unit price × quantity.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Σ quantity.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Re-checks every line against current stock.
    ///
    /// Fails on the first line whose entity is gone or whose quantity no
    /// longer fits.
    pub fn verify_stock<S: StockLookup + ?Sized>(&self, lookup: &S) -> CoreResult<()> {
        for line in &self.lines {
            let available = lookup.stock_of(&line.key).ok_or_else(|| match line.key.kind {
                ItemKind::Product => CoreError::ProductNotFound(line.key.id.clone()),
                ItemKind::Combo => CoreError::ComboNotFound(line.key.id.clone()),
            })?;

            if line.quantity > available {
                return Err(insufficient(&line.name, available, line.quantity));
            }
        }
        Ok(())
    }
}

fn insufficient(name: &str, available: i64, requested: i64) -> CoreError {
    CoreError::InsufficientStock {
        item: name.to_string(),
        available,
        requested,
    }
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.item_count(),
            total_cents: cart.total().cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn item(key: ItemKey, price: i64, stock: i64) -> SaleableItem {
        SaleableItem {
            name: format!("Item {}", key),
            key,
            unit_price_cents: price,
            stock,
        }
    }

    struct FixedStock(HashMap<ItemKey, i64>);

    impl StockLookup for FixedStock {
        fn stock_of(&self, key: &ItemKey) -> Option<i64> {
            self.0.get(key).copied()
        }
    }

    #[test]
    fn test_add_increments_up_to_stock() {
        let mut cart = Cart::new();
        let combo = item(ItemKey::combo("9"), 2000, 5);

        for expected in 1..=5 {
            assert_eq!(cart.add_item(&combo).unwrap(), expected);
        }

        let err = cart.add_item(&combo).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                item: combo.name.clone(),
                available: 5,
                requested: 6,
            }
        );
        assert_eq!(cart.line(&combo.key).unwrap().quantity, 5);
        assert_eq!(cart.total().cents(), 10_000);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_add_out_of_stock_item_is_rejected() {
        let mut cart = Cart::new();
        let empty = item(ItemKey::product("1"), 500, 0);

        assert!(matches!(
            cart.add_item(&empty),
            Err(CoreError::InsufficientStock { available: 0, .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_product_and_combo_with_same_id_are_separate_lines() {
        let mut cart = Cart::new();
        cart.add_item(&item(ItemKey::product("1"), 1000, 3)).unwrap();
        cart.add_item(&item(ItemKey::combo("1"), 2000, 3)).unwrap();

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total().cents(), 3000);
    }

    #[test]
    fn test_line_price_is_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut tea = item(ItemKey::product("1"), 1000, 3);
        cart.add_item(&tea).unwrap();

        tea.unit_price_cents = 1200;
        cart.add_item(&tea).unwrap();

        assert_eq!(cart.line(&tea.key).unwrap().unit_price_cents, 1000);
        assert_eq!(cart.total().cents(), 2000);
    }

    #[test]
    fn test_cart_line_limit() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_LINES {
            cart.add_item(&item(ItemKey::product(i.to_string()), 100, 1))
                .unwrap();
        }

        let err = cart
            .add_item(&item(ItemKey::product("overflow"), 100, 1))
            .unwrap_err();
        assert_eq!(err, CoreError::CartTooLarge { max: MAX_CART_LINES });
        assert_eq!(cart.line_count(), MAX_CART_LINES);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        let tea = item(ItemKey::product("1"), 1000, 4);
        cart.add_item(&tea).unwrap();

        cart.set_quantity(&tea.key, 4, 4).unwrap();
        assert_eq!(cart.item_count(), 4);

        let before = cart.clone();
        assert!(matches!(
            cart.set_quantity(&tea.key, 5, 4),
            Err(CoreError::InsufficientStock { requested: 5, .. })
        ));
        assert!(matches!(
            cart.set_quantity(&tea.key, -1, 4),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(
            cart.set_quantity(&ItemKey::combo("1"), 1, 4),
            Err(CoreError::ItemNotInCart("c:1".to_string()))
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let tea = item(ItemKey::product("1"), 1000, 4);
        let cake = item(ItemKey::product("2"), 1500, 4);

        let mut a = Cart::new();
        a.add_item(&tea).unwrap();
        a.add_item(&cake).unwrap();
        let mut b = a.clone();

        a.set_quantity(&tea.key, 0, 4).unwrap();
        b.remove_item(&tea.key);

        assert_eq!(a, b);
        assert_eq!(a.line_count(), 1);

        // Zero on an absent line mirrors an absent remove.
        a.set_quantity(&tea.key, 0, 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_totals_summary() {
        let mut cart = Cart::new();
        cart.add_item(&item(ItemKey::product("1"), 1000, 3)).unwrap();
        cart.add_item(&item(ItemKey::product("1"), 1000, 3)).unwrap();
        cart.add_item(&item(ItemKey::combo("1"), 2000, 3)).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.total_cents, 4000);

        cart.clear();
        assert_eq!(CartTotals::from(&cart).total_cents, 0);
    }

    #[test]
    fn test_verify_stock() {
        let mut cart = Cart::new();
        let tea = item(ItemKey::product("1"), 1000, 3);
        cart.add_item(&tea).unwrap();
        cart.add_item(&tea).unwrap();

        let mut stock = FixedStock(HashMap::from([(tea.key.clone(), 2)]));
        assert!(cart.verify_stock(&stock).is_ok());

        stock.0.insert(tea.key.clone(), 1);
        assert!(matches!(
            cart.verify_stock(&stock),
            Err(CoreError::InsufficientStock { available: 1, requested: 2, .. })
        ));

        stock.0.clear();
        assert_eq!(
            cart.verify_stock(&stock),
            Err(CoreError::ProductNotFound("1".to_string()))
        );
    }

    #[test]
    fn test_to_transaction_line() {
        let mut cart = Cart::new();
        let combo = item(ItemKey::combo("7"), 2000, 3);
        cart.add_item(&combo).unwrap();

        let line = cart.lines()[0].to_transaction_line();
        assert_eq!(line.item_id, "7");
        assert_eq!(line.kind, ItemKind::Combo);
        assert_eq!(line.line_total().cents(), 2000);
    }
}
