//! # Transaction Export
//!
//! Writes the (already filtered) transaction history as CSV for
//! spreadsheets.
//!
//! ```text
//! "Transaction ID","Date","Customer","Phone","Items","Total","Cashier","Payment Method"
//! "TXN-20260115-0001","2026-01-15 09:30:00","Ravi","9876543210","Tea Time x5, Masala Tea x1","$110.00","Asha","Card"
//! "TXN-20260115-0002","2026-01-15 09:41:12","Walk-in Customer","","Masala Tea x2","$20.00","Asha","Cash"
//! ```
//!
//! Every field is quoted.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{NaiveDate, TimeZone};
use csv::{QuoteStyle, WriterBuilder};
use thiserror::Error;
use tracing::info;

use orbit_core::receipt::WALK_IN_CUSTOMER;
use orbit_core::{Money, Transaction};

pub const HEADERS: [&str; 8] = [
    "Transaction ID",
    "Date",
    "Customer",
    "Phone",
    "Items",
    "Total",
    "Cashier",
    "Payment Method",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("File write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// `transactions_YYYY-MM-DD.csv`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("transactions_{}.csv", date.format("%Y-%m-%d"))
}

/// `"name xqty"` per line, joined by `", "`.
fn items_summary(transaction: &Transaction) -> String {
    transaction
        .lines
        .iter()
        .map(|l| format!("{} x{}", l.name, l.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writes `transactions` as CSV, dates rendered in `tz`.
pub fn write_transactions<W, Tz>(
    writer: W,
    transactions: &[Transaction],
    currency_symbol: &str,
    tz: &Tz,
) -> Result<(), ExportError>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    csv.write_record(HEADERS)?;

    for t in transactions {
        let date = t
            .timestamp
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        let customer = t.customer.as_ref();

        csv.write_record([
            t.id.as_str(),
            date.as_str(),
            customer.map_or(WALK_IN_CUSTOMER, |c| c.name.as_str()),
            customer.map_or("", |c| c.phone.as_str()),
            items_summary(t).as_str(),
            Money::from_cents(t.total_cents)
                .format_with(currency_symbol)
                .as_str(),
            t.cashier.as_str(),
            t.payment_method.to_string().as_str(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Writes the export to a file, replacing it if it exists.
pub fn export_to_path<Tz>(
    path: &Path,
    transactions: &[Transaction],
    currency_symbol: &str,
    tz: &Tz,
) -> Result<(), ExportError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let file = File::create(path)?;
    write_transactions(file, transactions, currency_symbol, tz)?;

    info!(path = %path.display(), rows = transactions.len(), "History exported");
    Ok(())
}
