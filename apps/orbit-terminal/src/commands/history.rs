//! # History Commands
//!
//! Transaction history, reprints and CSV export.
//!
//! Branch scoping: admins may look at any branch (or all of them); everybody
//! else is pinned to their own branch whatever the query says.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use tracing::debug;

use super::build_receipt;
use crate::backend::TransactionLog;
use crate::error::ApiError;
use crate::export;
use crate::state::{CatalogState, SessionState, StoreConfig};
use orbit_core::{
    CoreError, HistoryQuery, HistorySummary, Receipt, SessionContext, Transaction, UserRole,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub transactions: Vec<Transaction>,
    pub summary: HistorySummary,
}

/// Narrows the query to what the session may see.
fn scoped(ctx: &SessionContext, mut query: HistoryQuery) -> Result<HistoryQuery, ApiError> {
    if ctx.role != UserRole::Admin {
        let own = ctx
            .branch_id
            .clone()
            .filter(|b| !b.is_empty())
            .ok_or(CoreError::NoBranchAssigned)?;
        query.branch_id = Some(own);
    }
    Ok(query)
}

/// History as seen now, in the terminal's local time zone.
pub async fn transaction_history(
    session: &SessionState,
    log: &dyn TransactionLog,
    query: HistoryQuery,
) -> Result<HistoryResponse, ApiError> {
    transaction_history_at(session, log, query, &Local::now()).await
}

/// History as seen at `now`. "Today" is the calendar date in `now`'s zone.
pub async fn transaction_history_at<Tz>(
    session: &SessionState,
    log: &dyn TransactionLog,
    query: HistoryQuery,
    now: &DateTime<Tz>,
) -> Result<HistoryResponse, ApiError>
where
    Tz: TimeZone,
{
    let ctx = session.with_session(|s| s.context().clone()).await;
    let query = scoped(&ctx, query)?;
    debug!(
        branch = ?query.branch_id,
        scope = %query.scope,
        search = %query.search,
        "transaction_history command"
    );

    let all = log.list_transactions(query.branch_id.as_deref()).await?;
    let transactions = query.apply(all, now);
    let summary = HistorySummary::from_transactions(&transactions);

    Ok(HistoryResponse {
        transactions,
        summary,
    })
}

/// The stored receipt for a past sale, exactly as it was recorded.
pub async fn reprint_transaction(
    session: &SessionState,
    catalog: &CatalogState,
    log: &dyn TransactionLog,
    store: &StoreConfig,
    id: &str,
) -> Result<Receipt, ApiError> {
    debug!(id = %id, "reprint_transaction command");

    let ctx = session.with_session(|s| s.context().clone()).await;
    let transaction = log
        .get_transaction(id.trim())
        .await?
        .filter(|t| ctx.can_see(std::slice::from_ref(&t.branch_id)))
        .ok_or_else(|| CoreError::TransactionNotFound(id.trim().to_string()))?;

    Ok(build_receipt(&transaction, &*catalog.read().await, store))
}

/// Exports the filtered history to `output`, or to
/// `transactions_YYYY-MM-DD.csv` in `dir` when no output is given.
pub async fn export_history(
    session: &SessionState,
    log: &dyn TransactionLog,
    store: &StoreConfig,
    query: HistoryQuery,
    output: Option<PathBuf>,
    dir: &Path,
) -> Result<(PathBuf, usize), ApiError> {
    let now = Local::now();
    let history = transaction_history_at(session, log, query, &now).await?;

    let path = output.unwrap_or_else(|| dir.join(export::default_file_name(now.date_naive())));
    export::export_to_path(&path, &history.transactions, &store.currency_symbol, &Local)?;

    Ok((path, history.transactions.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::commands::fixtures;
    use crate::error::ErrorCode;
    use chrono::{Duration, Utc};
    use orbit_core::{Customer, DateScope, ItemKind, PaymentMethod, TransactionLine};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn record(backend: &MemoryBackend, id: &str, branch: &str, customer: Option<&str>, when: &str) {
        let line = TransactionLine {
            item_id: "p-tea".into(),
            kind: ItemKind::Product,
            name: "Masala Tea".into(),
            unit_price_cents: 1000,
            quantity: 2,
        };
        backend.transactions.lock().unwrap().push(Transaction {
            id: id.into(),
            branch_id: branch.into(),
            lines: vec![line],
            total_cents: 2000,
            customer: customer.map(|name| Customer {
                id: format!("c-{}", name),
                name: name.into(),
                phone: "9876543210".into(),
                email: None,
            }),
            cashier: "Asha".into(),
            payment_method: PaymentMethod::Cash,
            timestamp: at(when),
        });
    }

    fn seeded() -> MemoryBackend {
        let backend = fixtures::backend();
        record(&backend, "TXN-20260110-0001", "b1", None, "2026-01-10T10:00:00Z");
        record(&backend, "TXN-20260115-0001", "b1", Some("Ravi"), "2026-01-15T09:00:00Z");
        record(&backend, "TXN-20260115-0002", "b2", None, "2026-01-15T11:00:00Z");
        record(&backend, "TXN-20260115-0003", "b1", None, "2026-01-15T12:00:00Z");
        backend
    }

    #[tokio::test]
    async fn test_history_today_for_own_branch() {
        let backend = seeded();
        let session = SessionState::new(fixtures::context(UserRole::PosOperator, Some("b1")));
        let now = at("2026-01-15T18:00:00Z");

        // The operator asks for b2 but only ever sees b1.
        let query = HistoryQuery {
            branch_id: Some("b2".into()),
            ..HistoryQuery::default()
        };
        let history = transaction_history_at(&session, &backend, query, &now)
            .await
            .unwrap();

        let ids: Vec<&str> = history.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["TXN-20260115-0003", "TXN-20260115-0001"]);
        assert_eq!(history.summary.transaction_count, 2);
        assert_eq!(history.summary.revenue_cents, 4000);
    }

    #[tokio::test]
    async fn test_admin_sees_all_branches() {
        let backend = seeded();
        let session = SessionState::new(fixtures::context(UserRole::Admin, None));
        let now = at("2026-01-15T18:00:00Z");

        let query = HistoryQuery {
            scope: DateScope::Week,
            ..HistoryQuery::default()
        };
        let history = transaction_history_at(&session, &backend, query, &now)
            .await
            .unwrap();
        assert_eq!(history.transactions.len(), 4);

        let query = HistoryQuery {
            scope: DateScope::All,
            search: "ravi".into(),
            ..HistoryQuery::default()
        };
        let history = transaction_history_at(&session, &backend, query, &now)
            .await
            .unwrap();
        assert_eq!(history.transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_history_backend_failure() {
        let backend = seeded();
        backend.fail_reads(true);
        let session = SessionState::new(fixtures::context(UserRole::PosOperator, Some("b1")));

        let err = transaction_history(&session, &backend, HistoryQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PersistenceFailure);
    }

    #[tokio::test]
    async fn test_reprint_is_verbatim() {
        let backend = seeded();
        let (_, session, catalog) = fixtures::terminal().await;
        let store = StoreConfig::default();

        let receipt = reprint_transaction(&session, &catalog, &backend, &store, "TXN-20260115-0001")
            .await
            .unwrap();
        assert_eq!(receipt.customer_name, "Ravi");
        assert_eq!(receipt.total_cents, 2000);
        assert_eq!(receipt.branch_name.as_deref(), Some("Downtown"));
        assert_eq!(receipt.short_id(), "5-0001");

        // Other branch, and unknown ids.
        let err = reprint_transaction(&session, &catalog, &backend, &store, "TXN-20260115-0002")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let err = reprint_transaction(&session, &catalog, &backend, &store, "TXN-1")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_export_history_writes_file() {
        let backend = fixtures::backend();
        let recent = (Utc::now() - Duration::minutes(5)).to_rfc3339();
        record(&backend, "TXN-A", "b1", Some("Ravi"), &recent);

        let session = SessionState::new(fixtures::context(UserRole::PosOperator, Some("b1")));
        let dir = std::env::temp_dir().join(format!("orbit-export-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let query = HistoryQuery {
            scope: DateScope::All,
            ..HistoryQuery::default()
        };
        let (path, rows) = export_history(
            &session,
            &backend,
            &StoreConfig::default(),
            query,
            None,
            &dir,
        )
        .await
        .unwrap();

        assert_eq!(rows, 1);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("transactions_") && name.ends_with(".csv"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"TXN-A\""));
        assert!(contents.contains("\"Masala Tea x2\""));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
