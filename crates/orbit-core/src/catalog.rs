//! # Catalog Snapshot
//!
//! In-memory, normalized copy of the backend catalog that the register sells
//! from.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Backend ──replace_all()──► CatalogSnapshot                             │
//! │                               │                                         │
//! │        ┌──────────────────────┼───────────────────────┐                 │
//! │        ▼                      ▼                       ▼                 │
//! │  available_items()      combos_for()             saleable(key)          │
//! │  (POS grid)             (combo screen)           (cart add)             │
//! │        │                      │                       │                 │
//! │        └──── combo pricing recomputed on every call ──┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock figures are whatever the last refresh saw. Nothing here is locked
//! against other terminals.

use std::collections::BTreeMap;

use crate::combo::{price_stored_combo, PricedCombo};
use crate::error::{CoreError, CoreResult};
use crate::types::{
    Branch, Brand, Category, Combo, ItemKey, ItemKind, Product, SaleableItem, SessionContext,
};

// =============================================================================
// Stock Lookup
// =============================================================================

/// Live stock for a sellable key. `None` when the entity no longer exists.
pub trait StockLookup {
    fn stock_of(&self, key: &ItemKey) -> Option<i64>;
}

// =============================================================================
// Snapshot
// =============================================================================

/// Products, combos and reference data keyed by id.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: BTreeMap<String, Product>,
    combos: BTreeMap<String, Combo>,
    branches: BTreeMap<String, Branch>,
    categories: BTreeMap<String, Category>,
    brands: BTreeMap<String, Brand>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a complete fresh copy of the catalog.
    pub fn replace_all(
        &mut self,
        products: Vec<Product>,
        combos: Vec<Combo>,
        branches: Vec<Branch>,
        categories: Vec<Category>,
        brands: Vec<Brand>,
    ) {
        self.products = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        self.combos = combos.into_iter().map(|c| (c.id.clone(), c)).collect();
        self.branches = branches.into_iter().map(|b| (b.id.clone(), b)).collect();
        self.categories = categories.into_iter().map(|c| (c.id.clone(), c)).collect();
        self.brands = brands.into_iter().map(|b| (b.id.clone(), b)).collect();
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn combo(&self, id: &str) -> Option<&Combo> {
        self.combos.get(id)
    }

    pub fn branch(&self, id: &str) -> Option<&Branch> {
        self.branches.get(id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn brand(&self, id: &str) -> Option<&Brand> {
        self.brands.get(id)
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    pub fn brands(&self) -> impl Iterator<Item = &Brand> {
        self.brands.values()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn combo_count(&self) -> usize {
        self.combos.len()
    }

    // -------------------------------------------------------------------------
    // Combo Pricing
    // -------------------------------------------------------------------------

    /// Prices one combo against the current products.
    pub fn priced_combo(&self, id: &str) -> CoreResult<PricedCombo> {
        let combo = self
            .combos
            .get(id)
            .ok_or_else(|| CoreError::ComboNotFound(id.to_string()))?;

        price_stored_combo(combo, |pid| self.products.get(pid))
    }

    /// Prices every combo whose constituents still resolve.
    pub fn priced_combos(&self) -> Vec<PricedCombo> {
        self.combos
            .values()
            .filter_map(|combo| price_stored_combo(combo, |pid| self.products.get(pid)).ok())
            .collect()
    }

    // -------------------------------------------------------------------------
    // Register Views
    // -------------------------------------------------------------------------

    /// Resolves a key to what the cart needs: name, final unit price, live stock.
    pub fn saleable(&self, key: &ItemKey) -> CoreResult<SaleableItem> {
        match key.kind {
            ItemKind::Product => self
                .products
                .get(&key.id)
                .map(SaleableItem::from)
                .ok_or_else(|| CoreError::ProductNotFound(key.id.clone())),
            ItemKind::Combo => self.priced_combo(&key.id).map(|pc| pc.to_saleable()),
        }
    }

    /// Everything the POS grid offers at a branch: in stock, assigned to the
    /// branch and matching `search`. Products first, then combos, each by name.
    ///
    /// Products match on name or barcode, combos on name or description.
    pub fn available_items(&self, branch_id: &str, search: &str) -> Vec<SaleableItem> {
        let needle = search.trim().to_lowercase();

        let mut products: Vec<SaleableItem> = self
            .products
            .values()
            .filter(|p| p.is_in_branch(branch_id) && p.stock > 0)
            .filter(|p| {
                contains_ci(&p.name, &needle)
                    || p.barcode.as_deref().is_some_and(|b| contains_ci(b, &needle))
            })
            .map(SaleableItem::from)
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));

        let mut combos: Vec<SaleableItem> = self
            .priced_combos()
            .into_iter()
            .filter(|pc| pc.combo.is_in_branch(branch_id) && pc.pricing.stock > 0)
            .filter(|pc| combo_matches(&pc.combo, &needle))
            .map(|pc| pc.to_saleable())
            .collect();
        combos.sort_by(|a, b| a.name.cmp(&b.name));

        products.extend(combos);
        products
    }

    /// Combos visible to the session, priced, filtered by name/description.
    pub fn combos_for(&self, context: &SessionContext, search: &str) -> Vec<PricedCombo> {
        let needle = search.trim().to_lowercase();

        let mut combos: Vec<PricedCombo> = self
            .priced_combos()
            .into_iter()
            .filter(|pc| context.can_see(&pc.combo.branch_ids))
            .filter(|pc| combo_matches(&pc.combo, &needle))
            .collect();
        combos.sort_by(|a, b| a.combo.name.cmp(&b.combo.name));
        combos
    }

    /// Products visible to the session.
    pub fn products_for(&self, context: &SessionContext) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .values()
            .filter(|p| context.can_see(&p.branch_ids))
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    // -------------------------------------------------------------------------
    // Cache Updates
    // -------------------------------------------------------------------------

    pub fn upsert_product(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    pub fn remove_product(&mut self, id: &str) -> Option<Product> {
        self.products.remove(id)
    }

    pub fn upsert_combo(&mut self, combo: Combo) {
        self.combos.insert(combo.id.clone(), combo);
    }

    pub fn remove_combo(&mut self, id: &str) -> Option<Combo> {
        self.combos.remove(id)
    }
}

impl StockLookup for CatalogSnapshot {
    fn stock_of(&self, key: &ItemKey) -> Option<i64> {
        match key.kind {
            ItemKind::Product => self.products.get(&key.id).map(|p| p.stock),
            ItemKind::Combo => self.priced_combo(&key.id).ok().map(|pc| pc.pricing.stock),
        }
    }
}

/// Case-insensitive substring match; `needle` must already be lowercase.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

fn combo_matches(combo: &Combo, needle: &str) -> bool {
    contains_ci(&combo.name, needle) || contains_ci(&combo.description, needle)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserRole;
    use chrono::Utc;

    fn product(id: &str, name: &str, price: i64, stock: i64, branches: &[&str]) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: name.to_string(),
            barcode: Some(format!("890{}", id)),
            description: None,
            brand_id: None,
            category_id: None,
            price_cents: price,
            offer_price_cents: None,
            stock,
            branch_ids: branches.iter().map(|b| b.to_string()).collect(),
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn combo(id: &str, name: &str, products: &[&str], branches: &[&str]) -> Combo {
        let now = Utc::now();
        Combo {
            id: id.to_string(),
            name: name.to_string(),
            description: "Breakfast bundle".to_string(),
            product_ids: products.iter().map(|p| p.to_string()).collect(),
            price_cents: 2400,
            offer_price_cents: Some(2000),
            branch_ids: branches.iter().map(|b| b.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    fn snapshot() -> CatalogSnapshot {
        let mut catalog = CatalogSnapshot::new();
        catalog.replace_all(
            vec![
                product("1", "Tea", 1000, 12, &["b1"]),
                product("2", "Cake", 1500, 5, &["b1", "b2"]),
                product("3", "Juice", 800, 0, &["b1"]),
            ],
            vec![
                combo("1", "Tea Time", &["1", "2"], &["b1"]),
                combo("2", "Dry Pair", &["1", "3"], &["b1"]),
                combo("3", "Broken", &["1", "missing"], &["b1"]),
            ],
            vec![Branch {
                id: "b1".into(),
                name: "Downtown".into(),
                address: None,
                phone: None,
            }],
            vec![],
            vec![],
        );
        catalog
    }

    fn operator(branch: &str) -> SessionContext {
        SessionContext {
            user_id: "u1".into(),
            name: "Asha".into(),
            role: UserRole::PosOperator,
            branch_id: Some(branch.into()),
        }
    }

    #[test]
    fn test_priced_combo_uses_live_products() {
        let mut catalog = snapshot();

        let priced = catalog.priced_combo("1").unwrap();
        assert_eq!(priced.pricing.total_original_price_cents, 2500);
        assert_eq!(priced.pricing.stock, 5);

        let mut cake = catalog.product("2").unwrap().clone();
        cake.offer_price_cents = Some(1000);
        cake.stock = 1;
        catalog.upsert_product(cake);

        let priced = catalog.priced_combo("1").unwrap();
        assert_eq!(priced.pricing.total_original_price_cents, 2000);
        assert_eq!(priced.pricing.stock, 1);
    }

    #[test]
    fn test_priced_combo_errors() {
        let catalog = snapshot();
        assert_eq!(
            catalog.priced_combo("nope").unwrap_err(),
            CoreError::ComboNotFound("nope".into())
        );
        assert_eq!(
            catalog.priced_combo("3").unwrap_err(),
            CoreError::ProductNotFound("missing".into())
        );
        // The broken combo is left out of listings.
        assert_eq!(catalog.priced_combos().len(), 2);
    }

    #[test]
    fn test_available_items_filters_stock_branch_and_search() {
        let catalog = snapshot();

        let items = catalog.available_items("b1", "");
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        // Juice and Dry Pair have no stock, Broken does not price.
        assert_eq!(names, vec!["Cake", "Tea", "Tea Time"]);

        let items = catalog.available_items("b2", "");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, ItemKey::product("2"));

        let by_barcode = catalog.available_items("b1", "8901");
        assert_eq!(by_barcode.len(), 1);
        assert_eq!(by_barcode[0].name, "Tea");

        let by_description = catalog.available_items("b1", "BREAKFAST");
        assert_eq!(by_description.len(), 1);
        assert!(by_description[0].key.is_combo());
    }

    #[test]
    fn test_same_id_product_and_combo_resolve_separately() {
        let catalog = snapshot();

        let product = catalog.saleable(&ItemKey::product("1")).unwrap();
        let combo = catalog.saleable(&ItemKey::combo("1")).unwrap();

        assert_eq!(product.name, "Tea");
        assert_eq!(product.unit_price_cents, 1000);
        assert_eq!(combo.name, "Tea Time");
        assert_eq!(combo.unit_price_cents, 2000);
        assert_eq!(combo.stock, 5);
    }

    #[test]
    fn test_role_scoped_listings() {
        let catalog = snapshot();

        let admin = SessionContext {
            user_id: "u0".into(),
            name: "Root".into(),
            role: UserRole::Admin,
            branch_id: None,
        };
        assert_eq!(catalog.combos_for(&admin, "").len(), 2);
        assert_eq!(catalog.products_for(&admin).len(), 3);

        assert!(catalog.combos_for(&operator("b2"), "").is_empty());
        assert_eq!(catalog.products_for(&operator("b2")).len(), 1);
        assert_eq!(catalog.combos_for(&operator("b1"), "tea").len(), 1);
    }

    #[test]
    fn test_stock_lookup() {
        let mut catalog = snapshot();

        assert_eq!(catalog.stock_of(&ItemKey::product("1")), Some(12));
        assert_eq!(catalog.stock_of(&ItemKey::combo("1")), Some(5));
        assert_eq!(catalog.stock_of(&ItemKey::combo("3")), None);

        catalog.remove_product("2");
        assert_eq!(catalog.stock_of(&ItemKey::combo("1")), None);
    }
}
