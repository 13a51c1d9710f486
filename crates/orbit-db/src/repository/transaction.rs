//! # Transaction Repository
//!
//! The append-only sales log.
//!
//! ## Append
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  append(NewTransaction)                                                 │
//! │     │                                                                   │
//! │     ▼  BEGIN IMMEDIATE (write lock first)                               │
//! │  next sequence = MAX(sequence) + 1 for today's business date            │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  id = TXN-20260115-0042                                                 │
//! │     │                                                                   │
//! │     ├── INSERT transactions       (header + customer snapshot)          │
//! │     └── INSERT transaction_lines  (one row per line, in order)          │
//! │     │                                                                   │
//! │     ▼  COMMIT ──► Transaction { id, timestamp, ... }                    │
//! │                                                                         │
//! │  Any failure rolls back: no id is consumed, no partial sale is stored.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no update or delete: a recorded sale is immutable.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use orbit_core::{Customer, ItemKind, NewTransaction, PaymentMethod, Transaction, TransactionLine};

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    branch_id: String,
    total_cents: i64,
    customer_id: Option<String>,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    customer_email: Option<String>,
    cashier: String,
    payment_method: PaymentMethod,
    timestamp: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self, lines: Vec<TransactionLine>) -> Transaction {
        let customer = match (self.customer_id, self.customer_name, self.customer_phone) {
            (Some(id), Some(name), Some(phone)) => Some(Customer {
                id,
                name,
                phone,
                email: self.customer_email,
            }),
            _ => None,
        };

        Transaction {
            id: self.id,
            branch_id: self.branch_id,
            lines,
            total_cents: self.total_cents,
            customer,
            cashier: self.cashier,
            payment_method: self.payment_method,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    transaction_id: String,
    item_id: String,
    kind: ItemKind,
    name: String,
    unit_price_cents: i64,
    quantity: i64,
}

impl From<LineRow> for TransactionLine {
    fn from(row: LineRow) -> Self {
        TransactionLine {
            item_id: row.item_id,
            kind: row.kind,
            name: row.name,
            unit_price_cents: row.unit_price_cents,
            quantity: row.quantity,
        }
    }
}

const SELECT_HEADER: &str = r#"
    SELECT
        id, branch_id, total_cents,
        customer_id, customer_name, customer_phone, customer_email,
        cashier, payment_method, timestamp
    FROM transactions
"#;

const SELECT_LINES: &str = r#"
    SELECT transaction_id, item_id, kind, name, unit_price_cents, quantity
    FROM transaction_lines
"#;

/// Formats a transaction id from its business date and daily sequence.
pub fn format_transaction_id(business_date: &str, sequence: i64) -> String {
    format!("TXN-{}-{:04}", business_date, sequence)
}

#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Records a sale now. See [`Self::append_at`].
    pub async fn append(&self, draft: &NewTransaction) -> DbResult<Transaction> {
        self.append_at(draft, Utc::now()).await
    }

    /// Records a sale with an explicit timestamp.
    ///
    /// The id and the per-day sequence behind it are assigned inside the
    /// same database transaction as the inserts. The transaction starts
    /// IMMEDIATE, so the write lock is held before the sequence is read.
    pub async fn append_at(
        &self,
        draft: &NewTransaction,
        timestamp: DateTime<Utc>,
    ) -> DbResult<Transaction> {
        let business_date = timestamp.format("%Y%m%d").to_string();

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let sequence: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sequence), 0) + 1 FROM transactions WHERE business_date = ?1",
        )
        .bind(&business_date)
        .fetch_one(&mut *tx)
        .await?;

        let id = format_transaction_id(&business_date, sequence);
        let customer = draft.customer.as_ref();

        debug!(id = %id, lines = draft.lines.len(), "Appending transaction");

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, business_date, sequence, branch_id, total_cents,
                customer_id, customer_name, customer_phone, customer_email,
                cashier, payment_method, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&id)
        .bind(&business_date)
        .bind(sequence)
        .bind(&draft.branch_id)
        .bind(draft.total_cents)
        .bind(customer.map(|c| c.id.as_str()))
        .bind(customer.map(|c| c.name.as_str()))
        .bind(customer.map(|c| c.phone.as_str()))
        .bind(customer.and_then(|c| c.email.as_deref()))
        .bind(&draft.cashier)
        .bind(draft.payment_method)
        .bind(timestamp)
        .execute(&mut *tx)
        .await?;

        for (position, line) in draft.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO transaction_lines (
                    transaction_id, position, item_id, kind, name, unit_price_cents, quantity
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&id)
            .bind(position as i64)
            .bind(&line.item_id)
            .bind(line.kind)
            .bind(&line.name)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(id = %id, total_cents = draft.total_cents, "Transaction recorded");
        Ok(draft.clone().into_transaction(id, timestamp))
    }

    /// Transactions for `branch_id`, or every branch for `None`. Newest first.
    pub async fn list(&self, branch_id: Option<&str>) -> DbResult<Vec<Transaction>> {
        let sql = format!(
            "{} WHERE (?1 IS NULL OR branch_id = ?1) ORDER BY business_date DESC, sequence DESC",
            SELECT_HEADER
        );
        let headers: Vec<TransactionRow> = sqlx::query_as(&sql)
            .bind(branch_id)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!(
            "{} WHERE transaction_id IN (SELECT id FROM transactions WHERE (?1 IS NULL OR branch_id = ?1)) ORDER BY transaction_id, position",
            SELECT_LINES
        );
        let line_rows: Vec<LineRow> = sqlx::query_as(&sql)
            .bind(branch_id)
            .fetch_all(&self.pool)
            .await?;

        let mut lines: HashMap<String, Vec<TransactionLine>> = HashMap::new();
        for row in line_rows {
            lines
                .entry(row.transaction_id.clone())
                .or_default()
                .push(TransactionLine::from(row));
        }

        debug!(branch = ?branch_id, count = headers.len(), "Listed transactions");

        Ok(headers
            .into_iter()
            .map(|h| {
                let own = lines.remove(&h.id).unwrap_or_default();
                h.into_transaction(own)
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let sql = format!("{} WHERE id = ?1", SELECT_HEADER);
        let header: Option<TransactionRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let sql = format!("{} WHERE transaction_id = ?1 ORDER BY position", SELECT_LINES);
        let lines: Vec<LineRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(header.into_transaction(
            lines.into_iter().map(TransactionLine::from).collect(),
        )))
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
