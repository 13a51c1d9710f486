//! # Transaction History
//!
//! Read-side projection over recorded transactions: the history list, its
//! filters and the summary strip shown above it.
//!
//! ## Filter Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  all transactions                                                       │
//! │       │                                                                 │
//! │       ▼  filter_by_branch     branch_id == session branch               │
//! │       ▼  filter_by_date_range today │ week (7d) │ month (30d) │ all     │
//! │       ▼  filter_by_search     id │ customer name (ci) │ customer phone  │
//! │       ▼  sort                 newest first                              │
//! │  history list                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Today" is the calendar date in the time zone of the `now` passed in, so a
//! terminal in UTC+5:30 and one in UTC see different "todays" for the same
//! instant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Transaction;

// =============================================================================
// Date Scope
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DateScope {
    #[default]
    Today,
    Week,
    Month,
    All,
}

impl DateScope {
    /// Whether `timestamp` falls inside this scope as seen at `now`.
    pub fn contains<Tz: TimeZone>(&self, timestamp: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        match self {
            DateScope::Today => {
                timestamp.with_timezone(&now.timezone()).date_naive() == now.date_naive()
            }
            DateScope::Week => *timestamp >= now.with_timezone(&Utc) - Duration::days(7),
            DateScope::Month => *timestamp >= now.with_timezone(&Utc) - Duration::days(30),
            DateScope::All => true,
        }
    }
}

impl fmt::Display for DateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DateScope::Today => "today",
            DateScope::Week => "week",
            DateScope::Month => "month",
            DateScope::All => "all",
        };
        f.write_str(s)
    }
}

impl FromStr for DateScope {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(DateScope::Today),
            "week" => Ok(DateScope::Week),
            "month" => Ok(DateScope::Month),
            "all" => Ok(DateScope::All),
            _ => Err(ValidationError::NotAllowed {
                field: "scope".to_string(),
                allowed: vec![
                    "today".to_string(),
                    "week".to_string(),
                    "month".to_string(),
                    "all".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Filters
// =============================================================================

pub fn filter_by_branch(transactions: Vec<Transaction>, branch_id: &str) -> Vec<Transaction> {
    transactions
        .into_iter()
        .filter(|t| t.branch_id == branch_id)
        .collect()
}

pub fn filter_by_date_range<Tz: TimeZone>(
    transactions: Vec<Transaction>,
    scope: DateScope,
    now: &DateTime<Tz>,
) -> Vec<Transaction> {
    transactions
        .into_iter()
        .filter(|t| scope.contains(&t.timestamp, now))
        .collect()
}

/// Keeps transactions whose id contains `search`, whose customer name
/// contains it (case-insensitive), or whose customer phone contains it.
/// A blank search keeps everything.
pub fn filter_by_search(transactions: Vec<Transaction>, search: &str) -> Vec<Transaction> {
    let term = search.trim();
    if term.is_empty() {
        return transactions;
    }
    let lowered = term.to_lowercase();

    transactions
        .into_iter()
        .filter(|t| {
            t.id.to_lowercase().contains(&lowered)
                || t.customer.as_ref().is_some_and(|c| {
                    c.name.to_lowercase().contains(&lowered) || c.phone.contains(term)
                })
        })
        .collect()
}

/// Newest first.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

// =============================================================================
// Query
// =============================================================================

/// The history screen's filter bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    /// `None` keeps every branch (admin view).
    pub branch_id: Option<String>,
    pub scope: DateScope,
    pub search: String,
}

impl HistoryQuery {
    pub fn for_branch(branch_id: impl Into<String>) -> Self {
        HistoryQuery {
            branch_id: Some(branch_id.into()),
            ..Self::default()
        }
    }

    /// branch ∧ date ∧ search, newest first.
    pub fn apply<Tz: TimeZone>(
        &self,
        transactions: Vec<Transaction>,
        now: &DateTime<Tz>,
    ) -> Vec<Transaction> {
        let mut result = match &self.branch_id {
            Some(branch) => filter_by_branch(transactions, branch),
            None => transactions,
        };
        result = filter_by_date_range(result, self.scope, now);
        result = filter_by_search(result, &self.search);
        sort_newest_first(&mut result);
        result
    }
}

/// Looks up a stored transaction for reprinting. The record comes back
/// exactly as it was stored.
pub fn reprint<'a>(transactions: &'a [Transaction], id: &str) -> CoreResult<&'a Transaction> {
    transactions
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))
}

// =============================================================================
// Summary
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub transaction_count: usize,
    pub revenue_cents: i64,
    pub item_count: i64,
}

impl HistorySummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        HistorySummary {
            transaction_count: transactions.len(),
            revenue_cents: transactions.iter().map(Transaction::total).sum::<Money>().cents(),
            item_count: transactions.iter().map(Transaction::item_count).sum(),
        }
    }

    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
