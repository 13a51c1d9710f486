//! # Command-Line Front End
//!
//! ```text
//! orbit-terminal items   [--search TEXT]
//! orbit-terminal combos  [--search TEXT]
//! orbit-terminal sell    p:ID|c:ID ... [--customer-name N --customer-phone P [--customer-email E]]
//!                                      [--payment cash|card]
//! orbit-terminal history [--scope today|week|month|all] [--search TEXT] [--branch ID]
//! orbit-terminal reprint ID [--share]
//! orbit-terminal export  [--output FILE] [--scope ...] [--search TEXT] [--branch ID]
//! ```
//!
//! `--json` prints command responses as JSON instead of text.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::history::HistoryResponse;
use orbit_core::{DateScope, Money, PaymentMethod, PricedCombo, SaleableItem};

/// Receipt width in characters (58mm thermal paper).
pub const RECEIPT_WIDTH: usize = 40;

#[derive(Debug, Parser)]
#[command(name = "orbit-terminal", version, about = "Orbit POS register terminal")]
pub struct Cli {
    /// Config file (defaults to terminal.toml in the platform config dir)
    #[arg(long, short = 'c', global = true, env = "ORBIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print responses as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Items for sale at this register's branch
    Items {
        #[arg(long, short, default_value = "")]
        search: String,
    },

    /// Combo packs with derived pricing
    Combos {
        #[arg(long, short, default_value = "")]
        search: String,
    },

    /// Ring up a sale and print the receipt
    Sell {
        /// Items to add, one unit per occurrence
        #[arg(required = true, value_name = "p:ID|c:ID")]
        items: Vec<String>,

        #[arg(long, requires = "customer_phone")]
        customer_name: Option<String>,

        #[arg(long, requires = "customer_name")]
        customer_phone: Option<String>,

        #[arg(long, requires = "customer_name")]
        customer_email: Option<String>,

        /// Defaults to checkout.default_payment_method
        #[arg(long)]
        payment: Option<PaymentMethod>,
    },

    /// Past transactions
    History {
        #[arg(long, default_value_t = DateScope::Today)]
        scope: DateScope,

        #[arg(long, short, default_value = "")]
        search: String,

        /// Admins only; everybody else sees their own branch
        #[arg(long)]
        branch: Option<String>,
    },

    /// Print a stored receipt again
    Reprint {
        id: String,

        /// Also print the message for sharing through a messaging app
        #[arg(long)]
        share: bool,
    },

    /// Export the filtered history as CSV
    Export {
        /// Defaults to transactions_YYYY-MM-DD.csv in the current directory
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long, default_value_t = DateScope::Today)]
        scope: DateScope,

        #[arg(long, short, default_value = "")]
        search: String,

        #[arg(long)]
        branch: Option<String>,
    },
}

// =============================================================================
// Text Rendering
// =============================================================================

pub fn render_items(items: &[SaleableItem], symbol: &str) -> String {
    if items.is_empty() {
        return "No items available.\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{:<40} {:<28} {:>10}  stock {}",
            item.key.to_string(),
            item.name,
            item.unit_price().format_with(symbol),
            item.stock
        );
    }
    out
}

pub fn render_combos(combos: &[PricedCombo], symbol: &str) -> String {
    if combos.is_empty() {
        return "No combo packs.\n".to_string();
    }

    let mut out = String::new();
    for pc in combos {
        let p = &pc.pricing;
        let _ = writeln!(out, "{}  [c:{}]", pc.combo.name, pc.combo.id);
        let _ = writeln!(
            out,
            "  {} (was {}), save {}  stock {}",
            p.final_price().format_with(symbol),
            p.total_original_price().format_with(symbol),
            p.savings_percent,
            p.stock
        );
    }
    out
}

pub fn render_history(history: &HistoryResponse, symbol: &str) -> String {
    let mut out = String::new();
    for t in &history.transactions {
        let customer = t
            .customer
            .as_ref()
            .map_or(orbit_core::receipt::WALK_IN_CUSTOMER, |c| c.name.as_str());
        let _ = writeln!(
            out,
            "{}  {}  {:<20} {:>3} items {:>10}  {}",
            t.id,
            t.timestamp.format("%Y-%m-%d %H:%M"),
            customer,
            t.item_count(),
            t.total().format_with(symbol),
            t.payment_method
        );
    }

    let s = &history.summary;
    let _ = writeln!(
        out,
        "{} transactions, {} items, revenue {}",
        s.transaction_count,
        s.item_count,
        Money::from_cents(s.revenue_cents).format_with(symbol)
    );
    out
}
