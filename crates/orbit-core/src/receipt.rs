//! # Receipts
//!
//! Presentation view of a recorded transaction, plus the plain-text forms
//! used for the terminal printout and for sharing through messaging apps.
//!
//! ## Layout
//! ```text
//! ┌──────────────────────────────────────┐
//! │              Orbit POS               │  store name
//! │              Downtown                │  branch header
//! │        12 Main St · 555-0100         │
//! ├──────────────────────────────────────┤
//! │ Transaction: #0042   2026-01-15 10:02│
//! │ Cashier: Asha                        │
//! │ Customer: Walk-in Customer           │
//! ├──────────────────────────────────────┤
//! │ Tea Time x5                  $100.00 │
//! ├──────────────────────────────────────┤
//! │ TOTAL                        $100.00 │
//! │ Payment: Cash                        │
//! │     Thank you for your purchase!     │
//! └──────────────────────────────────────┘
//! ```
//!
//! Receipts never recompute anything from the catalog: every figure comes
//! from the transaction snapshot.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Branch, PaymentMethod, Transaction};

/// Name printed when a sale has no attached customer.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

const THANK_YOU: &str = "Thank you for your purchase!";
const SHORT_ID_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub store_name: Option<String>,
    pub branch_name: Option<String>,
    pub branch_address: Option<String>,
    pub branch_phone: Option<String>,
    pub transaction_id: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub cashier: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub lines: Vec<ReceiptLine>,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub currency_symbol: String,
}

impl From<&Transaction> for Receipt {
    fn from(tx: &Transaction) -> Self {
        Receipt {
            store_name: None,
            branch_name: None,
            branch_address: None,
            branch_phone: None,
            transaction_id: tx.id.clone(),
            timestamp: tx.timestamp,
            cashier: tx.cashier.clone(),
            customer_name: tx
                .customer
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| WALK_IN_CUSTOMER.to_string()),
            customer_phone: tx.customer.as_ref().map(|c| c.phone.clone()),
            lines: tx
                .lines
                .iter()
                .map(|l| ReceiptLine {
                    name: l.name.clone(),
                    quantity: l.quantity,
                    unit_price_cents: l.unit_price_cents,
                    line_total_cents: l.line_total().cents(),
                })
                .collect(),
            total_cents: tx.total_cents,
            payment_method: tx.payment_method,
            currency_symbol: "$".to_string(),
        }
    }
}

impl Receipt {
    pub fn with_branch(mut self, branch: &Branch) -> Self {
        self.branch_name = Some(branch.name.clone());
        self.branch_address = branch.address.clone();
        self.branch_phone = branch.phone.clone();
        self
    }

    pub fn with_store_name(mut self, name: impl Into<String>) -> Self {
        self.store_name = Some(name.into());
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Last six characters of the id, as printed in the receipt header.
    pub fn short_id(&self) -> &str {
        let start = self
            .transaction_id
            .char_indices()
            .rev()
            .nth(SHORT_ID_LEN - 1)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.transaction_id[start..]
    }

    fn money(&self, cents: i64) -> String {
        Money::from_cents(cents).format_with(&self.currency_symbol)
    }

    /// Message body for sharing a receipt through a messaging app.
    pub fn share_text(&self) -> String {
        let from = self
            .branch_name
            .as_deref()
            .or(self.store_name.as_deref())
            .unwrap_or("our store");

        format!(
            "Receipt from {}\n\nTransaction: #{}\nTotal: {}\n{}",
            from,
            self.transaction_id,
            self.money(self.total_cents),
            THANK_YOU
        )
    }

    /// Fixed-width printout for the terminal.
    pub fn render_text(&self, width: usize) -> String {
        let mut out = String::new();
        let rule = "-".repeat(width);

        for header in [&self.store_name, &self.branch_name, &self.branch_address, &self.branch_phone]
            .into_iter()
            .flatten()
        {
            let _ = writeln!(out, "{:^width$}", header, width = width);
        }
        let _ = writeln!(out, "{}", rule);

        let stamp = self.timestamp.format("%Y-%m-%d %H:%M").to_string();
        push_columns(&mut out, &format!("Transaction: #{}", self.short_id()), &stamp, width);
        let _ = writeln!(out, "Cashier: {}", self.cashier);
        let _ = writeln!(out, "Customer: {}", self.customer_name);
        let _ = writeln!(out, "{}", rule);

        for line in &self.lines {
            push_columns(
                &mut out,
                &format!("{} x{}", line.name, line.quantity),
                &self.money(line.line_total_cents),
                width,
            );
        }
        let _ = writeln!(out, "{}", rule);

        push_columns(&mut out, "TOTAL", &self.money(self.total_cents), width);
        let _ = writeln!(out, "Payment: {}", self.payment_method);
        let _ = writeln!(out, "{:^width$}", THANK_YOU, width = width);
        out
    }
}

fn push_columns(out: &mut String, left: &str, right: &str, width: usize) {
    let used = left.chars().count() + right.chars().count();
    let pad = width.saturating_sub(used).max(1);
    let _ = writeln!(out, "{}{}{}", left, " ".repeat(pad), right);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Customer, ItemKind, TransactionLine};

    fn transaction(customer: Option<Customer>) -> Transaction {
        Transaction {
            id: "TXN-20260115-0042".into(),
            branch_id: "b1".into(),
            lines: vec![TransactionLine {
                item_id: "k1".into(),
                kind: ItemKind::Combo,
                name: "Tea Time".into(),
                unit_price_cents: 2000,
                quantity: 5,
            }],
            total_cents: 10_000,
            customer,
            cashier: "Asha".into(),
            payment_method: PaymentMethod::Cash,
            timestamp: Utc::now(),
        }
    }

    fn downtown() -> Branch {
        Branch {
            id: "b1".into(),
            name: "Downtown".into(),
            address: Some("12 Main St".into()),
            phone: Some("555-0100".into()),
        }
    }

    #[test]
    fn test_walk_in_default() {
        let receipt = Receipt::from(&transaction(None));
        assert_eq!(receipt.customer_name, WALK_IN_CUSTOMER);
        assert!(receipt.customer_phone.is_none());
        assert_eq!(receipt.lines[0].line_total_cents, 10_000);
    }

    #[test]
    fn test_named_customer() {
        let receipt = Receipt::from(&transaction(Some(Customer {
            id: "c1".into(),
            name: "Ravi".into(),
            phone: "9876543210".into(),
            email: None,
        })));
        assert_eq!(receipt.customer_name, "Ravi");
        assert_eq!(receipt.customer_phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_share_text() {
        let receipt = Receipt::from(&transaction(None)).with_branch(&downtown());
        assert_eq!(
            receipt.share_text(),
            "Receipt from Downtown\n\nTransaction: #TXN-20260115-0042\nTotal: $100.00\nThank you for your purchase!"
        );
    }

    #[test]
    fn test_short_id() {
        let receipt = Receipt::from(&transaction(None));
        assert_eq!(receipt.short_id(), "5-0042");

        let mut short = receipt.clone();
        short.transaction_id = "42".into();
        assert_eq!(short.short_id(), "42");
    }

    #[test]
    fn test_render_text() {
        let text = Receipt::from(&transaction(None))
            .with_store_name("Orbit POS")
            .with_branch(&downtown())
            .with_currency_symbol("₹")
            .render_text(40);

        assert!(text.contains("Downtown"));
        assert!(text.contains("Customer: Walk-in Customer"));
        assert!(text.contains("Tea Time x5"));
        assert!(text.contains("₹100.00"));
        assert!(text.contains("Payment: Cash"));
        assert!(text.trim_end().ends_with("Thank you for your purchase!"));
    }
}
