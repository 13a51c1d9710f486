//! # Combo Pricing Engine
//!
//! Derives a combo pack's totals, percentages and stock from its constituent
//! products.
//!
//! ## Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Constituents            Combo inputs          Derived (never stored)  │
//! │  ────────────            ────────────          ─────────────────────   │
//! │  Tea   final $10.00 ──┐  price  $24.00         total_original  $25.00  │
//! │        stock 12       ├─ offer  $20.00  ──►    final_price     $20.00  │
//! │  Cake  final $15.00 ──┘                        discount        16.67%  │
//! │        stock  5                                savings         20.00%  │
//! │                                                stock               5   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing is recomputed from live product snapshots on every read, so a
//! product price or stock edit shows up in every combo that contains it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Percent};
use crate::types::{Combo, Product, SaleableItem};

/// Smallest number of distinct products in a combo.
pub const MIN_COMBO_PRODUCTS: usize = 2;

/// Largest number of distinct products in a combo.
pub const MAX_COMBO_PRODUCTS: usize = 3;

// =============================================================================
// Pricing Result
// =============================================================================

/// The derived figures of a combo pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComboPricing {
    /// Sum of the constituents' final prices.
    pub total_original_price_cents: i64,
    /// Combo offer price if present, else combo list price.
    pub final_price_cents: i64,
    /// List price → offer price reduction.
    pub discount_percent: Percent,
    /// Summed originals → final price reduction.
    pub savings_percent: Percent,
    /// Stock of the scarcest constituent.
    pub stock: i64,
}

impl ComboPricing {
    #[inline]
    pub fn total_original_price(&self) -> Money {
        Money::from_cents(self.total_original_price_cents)
    }

    #[inline]
    pub fn final_price(&self) -> Money {
        Money::from_cents(self.final_price_cents)
    }

    /// Absolute amount saved against buying the products separately (never negative).
    pub fn savings(&self) -> Money {
        let diff = self.total_original_price() - self.final_price();
        if diff.is_positive() {
            diff
        } else {
            Money::zero()
        }
    }
}

/// A combo definition together with freshly derived pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedCombo {
    #[serde(flatten)]
    pub combo: Combo,
    pub pricing: ComboPricing,
}

impl PricedCombo {
    pub fn to_saleable(&self) -> SaleableItem {
        SaleableItem {
            key: self.combo.key(),
            name: self.combo.name.clone(),
            unit_price_cents: self.pricing.final_price_cents,
            stock: self.pricing.stock,
        }
    }
}

// =============================================================================
// Composition
// =============================================================================

/// Resolves constituent ids to product snapshots.
///
/// Duplicate ids collapse to one (first occurrence wins the position). Fails
/// with [`CoreError::InvalidComboComposition`] unless 2 or 3 distinct products
/// remain, and with [`CoreError::ProductNotFound`] for an unknown id.
pub fn resolve_constituents<'a, F>(ids: &[String], lookup: F) -> CoreResult<Vec<&'a Product>>
where
    F: Fn(&str) -> Option<&'a Product>,
{
    let mut distinct: Vec<&str> = Vec::with_capacity(ids.len());
    for id in ids {
        if !distinct.contains(&id.as_str()) {
            distinct.push(id);
        }
    }

    check_count(distinct.len())?;

    distinct
        .into_iter()
        .map(|id| lookup(id).ok_or_else(|| CoreError::ProductNotFound(id.to_string())))
        .collect()
}

fn check_count(count: usize) -> CoreResult<()> {
    if !(MIN_COMBO_PRODUCTS..=MAX_COMBO_PRODUCTS).contains(&count) {
        return Err(CoreError::InvalidComboComposition { count });
    }
    Ok(())
}

// =============================================================================
// Pricing
// =============================================================================

/// Computes combo pricing over 2–3 product snapshots.
///
/// ## Rules
/// - `discount_percent` is 0 without an offer price.
/// - `savings_percent` is 0 without an offer price.
/// - Any percentage with a zero base or a negative value is 0.
///
/// ## Example
/// ```rust,ignore
/// let pricing = price_combo(&[&tea, &cake], Money::from_cents(2400), Some(Money::from_cents(2000)))?;
/// assert_eq!(pricing.savings_percent.bps(), 2000);
/// ```
pub fn price_combo(
    products: &[&Product],
    price: Money,
    offer_price: Option<Money>,
) -> CoreResult<ComboPricing> {
    let mut distinct: Vec<&Product> = Vec::with_capacity(products.len());
    for product in products {
        if !distinct.iter().any(|p| p.id == product.id) {
            distinct.push(product);
        }
    }
    check_count(distinct.len())?;

    let total_original: Money = distinct.iter().map(|p| p.final_price()).sum();
    let final_price = offer_price.unwrap_or(price);

    let (discount_percent, savings_percent) = match offer_price {
        Some(offer) => (
            Percent::reduction(price, offer),
            Percent::reduction(total_original, offer),
        ),
        None => (Percent::zero(), Percent::zero()),
    };

    // Non-empty after check_count.
    let stock = distinct.iter().map(|p| p.stock).min().unwrap_or(0).max(0);

    Ok(ComboPricing {
        total_original_price_cents: total_original.cents(),
        final_price_cents: final_price.cents(),
        discount_percent,
        savings_percent,
        stock,
    })
}

/// Prices a stored combo against the current catalog.
pub fn price_stored_combo<'a, F>(combo: &Combo, lookup: F) -> CoreResult<PricedCombo>
where
    F: Fn(&str) -> Option<&'a Product>,
{
    let products = resolve_constituents(&combo.product_ids, lookup)?;
    let pricing = price_combo(&products, combo.price(), combo.offer_price())?;

    Ok(PricedCombo {
        combo: combo.clone(),
        pricing,
    })
}

/// Live preview for the combo editor while products are being picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComboPreview {
    pub products: Vec<Product>,
    pub pricing: ComboPricing,
    pub savings_cents: i64,
}

/// Prices a candidate selection before it is saved.
pub fn preview_combo<'a, F>(
    product_ids: &[String],
    price: Money,
    offer_price: Option<Money>,
    lookup: F,
) -> CoreResult<ComboPreview>
where
    F: Fn(&str) -> Option<&'a Product>,
{
    let products = resolve_constituents(product_ids, lookup)?;
    let pricing = price_combo(&products, price, offer_price)?;

    Ok(ComboPreview {
        products: products.into_iter().cloned().collect(),
        savings_cents: pricing.savings().cents(),
        pricing,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn product(id: &str, price: i64, offer: Option<i64>, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            barcode: None,
            description: None,
            brand_id: None,
            category_id: None,
            price_cents: price,
            offer_price_cents: offer,
            stock,
            branch_ids: vec!["b1".to_string()],
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reference_scenario() {
        // $10 + $15 = $25 original, offer $20 → 20% savings
        let a = product("a", 1000, None, 12);
        let b = product("b", 1500, None, 5);

        let pricing = price_combo(
            &[&a, &b],
            Money::from_cents(2400),
            Some(Money::from_cents(2000)),
        )
        .unwrap();

        assert_eq!(pricing.total_original_price_cents, 2500);
        assert_eq!(pricing.final_price_cents, 2000);
        assert_eq!(pricing.savings_percent.bps(), 2000);
        // (24 - 20) / 24 = 16.666..% → 16.67%
        assert_eq!(pricing.discount_percent.bps(), 1667);
        assert_eq!(pricing.stock, 5);
        assert_eq!(pricing.savings().cents(), 500);
    }

    #[test]
    fn test_constituent_offer_prices_are_used() {
        let a = product("a", 1000, Some(800), 3);
        let b = product("b", 1500, None, 3);
        let c = product("c", 500, Some(450), 3);

        let pricing = price_combo(&[&a, &b, &c], Money::from_cents(2500), None).unwrap();

        assert_eq!(pricing.total_original_price_cents, 800 + 1500 + 450);
        assert_eq!(pricing.final_price_cents, 2500);
    }

    #[test]
    fn test_no_offer_means_zero_percentages() {
        let a = product("a", 1000, None, 3);
        let b = product("b", 1500, None, 3);

        let pricing = price_combo(&[&a, &b], Money::from_cents(2000), None).unwrap();

        assert!(pricing.discount_percent.is_zero());
        assert!(pricing.savings_percent.is_zero());
        assert_eq!(pricing.final_price_cents, 2000);
    }

    #[test]
    fn test_percentages_clamp_to_zero() {
        // Offer above both the list price and the summed originals.
        let a = product("a", 500, None, 3);
        let b = product("b", 500, None, 3);

        let pricing = price_combo(
            &[&a, &b],
            Money::from_cents(900),
            Some(Money::from_cents(1200)),
        )
        .unwrap();

        assert!(pricing.discount_percent.is_zero());
        assert!(pricing.savings_percent.is_zero());
        assert!(pricing.savings().is_zero());
    }

    #[test]
    fn test_zero_bases_do_not_divide() {
        let a = product("a", 0, None, 3);
        let b = product("b", 0, None, 3);

        let pricing = price_combo(&[&a, &b], Money::zero(), Some(Money::zero())).unwrap();

        assert!(pricing.discount_percent.is_zero());
        assert!(pricing.savings_percent.is_zero());
    }

    #[test]
    fn test_composition_bounds() {
        let a = product("a", 100, None, 1);
        let b = product("b", 100, None, 1);
        let c = product("c", 100, None, 1);
        let d = product("d", 100, None, 1);

        assert_eq!(
            price_combo(&[&a], Money::from_cents(100), None),
            Err(CoreError::InvalidComboComposition { count: 1 })
        );
        assert_eq!(
            price_combo(&[&a, &b, &c, &d], Money::from_cents(100), None),
            Err(CoreError::InvalidComboComposition { count: 4 })
        );
        // Duplicates count once.
        assert_eq!(
            price_combo(&[&a, &a], Money::from_cents(100), None),
            Err(CoreError::InvalidComboComposition { count: 1 })
        );
    }

    #[test]
    fn test_resolve_constituents() {
        let catalog: HashMap<String, Product> = ["a", "b", "c"]
            .iter()
            .map(|id| (id.to_string(), product(id, 100, None, 1)))
            .collect();
        let lookup = |id: &str| catalog.get(id);

        let resolved = resolve_constituents(&ids(&["b", "a", "b"]), lookup).unwrap();
        let order: Vec<&str> = resolved.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);

        assert_eq!(
            resolve_constituents(&ids(&["a", "zz"]), lookup).unwrap_err(),
            CoreError::ProductNotFound("zz".to_string())
        );
        assert_eq!(
            resolve_constituents(&ids(&["a"]), lookup).unwrap_err(),
            CoreError::InvalidComboComposition { count: 1 }
        );
    }

    #[test]
    fn test_stock_follows_scarcest_constituent() {
        let mut catalog: HashMap<String, Product> = HashMap::new();
        catalog.insert("a".into(), product("a", 1000, None, 9));
        catalog.insert("b".into(), product("b", 1500, None, 7));

        let now = Utc::now();
        let combo = Combo {
            id: "k1".into(),
            name: "Pair".into(),
            description: String::new(),
            product_ids: ids(&["a", "b"]),
            price_cents: 2200,
            offer_price_cents: None,
            branch_ids: vec!["b1".into()],
            created_at: now,
            updated_at: now,
        };

        let before = price_stored_combo(&combo, |id| catalog.get(id)).unwrap();
        assert_eq!(before.pricing.stock, 7);

        catalog.get_mut("a").unwrap().stock = 2;
        let after = price_stored_combo(&combo, |id| catalog.get(id)).unwrap();
        assert_eq!(after.pricing.stock, 2);
        assert!(after.pricing.stock <= before.pricing.stock);
    }

    #[test]
    fn test_preview_reports_absolute_savings() {
        let catalog: HashMap<String, Product> = [("a", 1000), ("b", 1500)]
            .iter()
            .map(|(id, price)| (id.to_string(), product(id, *price, None, 4)))
            .collect();

        let preview = preview_combo(
            &ids(&["a", "b"]),
            Money::from_cents(2500),
            Some(Money::from_cents(2000)),
            |id| catalog.get(id),
        )
        .unwrap();

        assert_eq!(preview.products.len(), 2);
        assert_eq!(preview.savings_cents, 500);
    }
}
