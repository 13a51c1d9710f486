//! # Domain Types
//!
//! Core domain types used throughout Orbit POS.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  LIVE CATALOG (mutable, backend-owned)                                 │
//! │  ┌─────────────┐   ┌─────────────┐   ┌────────┐ ┌──────────┐ ┌───────┐ │
//! │  │  Product    │◄──│   Combo     │   │ Branch │ │ Category │ │ Brand │ │
//! │  │  price      │2-3│ product_ids │   └────────┘ └──────────┘ └───────┘ │
//! │  │  offer      │   │ price/offer │                                     │
//! │  │  stock      │   │ (no derived │                                     │
//! │  └─────────────┘   │   fields)   │                                     │
//! │                    └─────────────┘                                     │
//! │                                                                         │
//! │  FROZEN HISTORY (immutable snapshots)                                  │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────┐          │
//! │  │  Transaction    │──►│ TransactionLine  │   │  Customer   │          │
//! │  │  id, branch     │   │ name, unit price │   │  name/phone │          │
//! │  │  total, cashier │   │ quantity         │   └─────────────┘          │
//! │  └─────────────────┘   └──────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Product and combo ids come from different tables and may collide, so every
//! sellable thing is addressed by an [`ItemKey`]: the pair `(id, kind)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Item Identity
// =============================================================================

/// Whether a sellable entity is a single product or a combo pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Product,
    Combo,
}

impl ItemKind {
    #[inline]
    pub const fn is_combo(&self) -> bool {
        matches!(self, ItemKind::Combo)
    }
}

/// Identity of a sellable entity: `(id, kind)`.
///
/// The textual form is `p:<id>` for products and `c:<id>` for combos.
///
/// ```rust
/// use orbit_core::types::{ItemKey, ItemKind};
///
/// let key: ItemKey = "c:42".parse().unwrap();
/// assert_eq!(key.kind, ItemKind::Combo);
/// assert_eq!(key.to_string(), "c:42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemKey {
    pub id: String,
    pub kind: ItemKind,
}

impl ItemKey {
    pub fn product(id: impl Into<String>) -> Self {
        ItemKey {
            id: id.into(),
            kind: ItemKind::Product,
        }
    }

    pub fn combo(id: impl Into<String>) -> Self {
        ItemKey {
            id: id.into(),
            kind: ItemKind::Combo,
        }
    }

    #[inline]
    pub fn is_combo(&self) -> bool {
        self.kind.is_combo()
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            ItemKind::Product => "p",
            ItemKind::Combo => "c",
        };
        write!(f, "{}:{}", prefix, self.id)
    }
}

impl FromStr for ItemKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "item".to_string(),
            reason: "expected p:<product id> or c:<combo id>".to_string(),
        };

        let (prefix, id) = s.trim().split_once(':').ok_or_else(invalid)?;
        if id.is_empty() {
            return Err(invalid());
        }

        match prefix {
            "p" | "product" => Ok(ItemKey::product(id)),
            "c" | "combo" => Ok(ItemKey::combo(id)),
            _ => Err(invalid()),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    pub name: String,

    /// Barcode (EAN-13, UPC-A, etc.), searchable at the register.
    pub barcode: Option<String>,

    pub description: Option<String>,

    pub brand_id: Option<String>,

    pub category_id: Option<String>,

    /// List price in cents.
    pub price_cents: i64,

    /// Offer price in cents. Never above `price_cents`.
    pub offer_price_cents: Option<i64>,

    /// Units on hand. Read from a snapshot, never locked.
    pub stock: i64,

    /// Branches where this product may be sold.
    pub branch_ids: Vec<String>,

    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn offer_price(&self) -> Option<Money> {
        self.offer_price_cents.map(Money::from_cents)
    }

    /// The effective unit price: the offer price when present, else the list price.
    #[inline]
    pub fn final_price(&self) -> Money {
        self.offer_price().unwrap_or_else(|| self.price())
    }

    #[inline]
    pub fn key(&self) -> ItemKey {
        ItemKey::product(&self.id)
    }

    pub fn is_in_branch(&self, branch_id: &str) -> bool {
        self.branch_ids.iter().any(|b| b == branch_id)
    }
}

// =============================================================================
// Combo
// =============================================================================

/// A combo pack definition: 2–3 products sold together at their own price.
///
/// Only the inputs live here. Totals, percentages and stock are derived by
/// [`crate::combo::price_combo`] every time they are needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Combo {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Constituent product ids, in display order.
    pub product_ids: Vec<String>,
    pub price_cents: i64,
    pub offer_price_cents: Option<i64>,
    pub branch_ids: Vec<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Combo {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn offer_price(&self) -> Option<Money> {
        self.offer_price_cents.map(Money::from_cents)
    }

    #[inline]
    pub fn key(&self) -> ItemKey {
        ItemKey::combo(&self.id)
    }

    pub fn is_in_branch(&self, branch_id: &str) -> bool {
        self.branch_ids.iter().any(|b| b == branch_id)
    }
}

// =============================================================================
// Reference Data
// =============================================================================

/// A physical sales location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Sellable View
// =============================================================================

/// Something the register can put in a cart right now.
///
/// Built from the live catalog: for combos, `unit_price_cents` is the combo's
/// final price and `stock` the scarcest constituent's stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleableItem {
    pub key: ItemKey,
    pub name: String,
    pub unit_price_cents: i64,
    pub stock: i64,
}

impl SaleableItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

impl From<&Product> for SaleableItem {
    fn from(product: &Product) -> Self {
        SaleableItem {
            key: product.key(),
            name: product.name.clone(),
            unit_price_cents: product.final_price().cents(),
            stock: product.stock,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer registered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Customer details as typed at the register, before registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl NewCustomer {
    /// Assigns a fresh id. Blank emails are dropped.
    pub fn into_customer(self) -> Customer {
        Customer {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => f.write_str("Cash"),
            PaymentMethod::Card => f.write_str("Card"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec!["cash".to_string(), "card".to_string()],
            }),
        }
    }
}

// =============================================================================
// Session Identity
// =============================================================================

/// Dashboard role handed over by the auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    BranchManager,
    #[default]
    PosOperator,
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "admin" => Ok(UserRole::Admin),
            "branch_manager" | "manager" => Ok(UserRole::BranchManager),
            "pos_operator" | "pos" | "cashier" => Ok(UserRole::PosOperator),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec![
                    "admin".to_string(),
                    "branch_manager".to_string(),
                    "pos_operator".to_string(),
                ],
            }),
        }
    }
}

/// Who is operating the register. Opaque to the core: it never authenticates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_id: String,
    /// Display name; recorded as the cashier on transactions.
    pub name: String,
    pub role: UserRole,
    pub branch_id: Option<String>,
}

impl SessionContext {
    /// Whether an entity assigned to `branch_ids` is visible to this user.
    /// Admins see everything; everybody else only their own branch.
    pub fn can_see(&self, branch_ids: &[String]) -> bool {
        if self.role == UserRole::Admin {
            return true;
        }

        match &self.branch_id {
            Some(own) => branch_ids.iter().any(|b| b == own),
            None => false,
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A line on a recorded transaction, frozen at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub item_id: String,
    pub kind: ItemKind,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl TransactionLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// A transaction assembled from a cart but not yet recorded.
///
/// The transaction log assigns `id` and `timestamp` when it persists one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub branch_id: String,
    pub lines: Vec<TransactionLine>,
    pub total_cents: i64,
    pub customer: Option<Customer>,
    pub cashier: String,
    pub payment_method: PaymentMethod,
}

impl NewTransaction {
    /// Stamps the draft with its identity, producing the immutable record.
    pub fn into_transaction(self, id: String, timestamp: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            branch_id: self.branch_id,
            lines: self.lines,
            total_cents: self.total_cents,
            customer: self.customer,
            cashier: self.cashier,
            payment_method: self.payment_method,
            timestamp,
        }
    }
}

/// A recorded sale. Create-once, read-many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub branch_id: String,
    pub lines: Vec<TransactionLine>,
    pub total_cents: i64,
    pub customer: Option<Customer>,
    pub cashier: String,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Sum of `unit price × quantity` over the stored lines.
    pub fn lines_total(&self) -> Money {
        self.lines.iter().map(TransactionLine::line_total).sum()
    }

    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
