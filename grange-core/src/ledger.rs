//! Finance ledger entries and the monthly aggregation pass.
//!
//! Amounts are stored as whole cents; `occurred_at` stays the raw
//! `YYYY-MM-DD` text the database returned and is parsed at the point of
//! use, so a malformed entry drops out of the summary instead of failing
//! the whole request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Income,
    Expense,
}

/// One ledger row as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub label: String,
    pub amount_cents: u64,
    pub kind: LedgerKind,
    /// Date as stored (`YYYY-MM-DD`); parse with [`LedgerEntry::date`].
    pub occurred_at: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl LedgerEntry {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.occurred_at.trim(), "%Y-%m-%d").ok()
    }
}

/// A ledger row that has not been stored yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    pub label: String,
    pub amount_cents: u64,
    pub kind: LedgerKind,
    pub occurred_at: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Income, expense and net totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    /// `YYYY-MM`.
    pub month: String,
    pub income_cents: u64,
    pub expense_cents: u64,
    /// `income - expense`; negative months spend more than they take in.
    pub net_cents: i64,
}

/// Group entries by calendar month and total them, months ascending.
///
/// Entries whose `occurred_at` does not parse are logged and left out.
pub fn monthly_summary(entries: &[LedgerEntry]) -> Vec<MonthSummary> {
    use std::collections::BTreeMap;

    let mut months: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for entry in entries {
        let Some(date) = entry.date() else {
            warn!(
                entry = %entry.id,
                occurred_at = %entry.occurred_at,
                "skipping ledger entry with unparseable date"
            );
            continue;
        };
        let totals = months.entry(date.format("%Y-%m").to_string()).or_default();
        match entry.kind {
            LedgerKind::Income => totals.0 += entry.amount_cents,
            LedgerKind::Expense => totals.1 += entry.amount_cents,
        }
    }

    months
        .into_iter()
        .map(|(month, (income, expense))| MonthSummary {
            month,
            income_cents: income,
            expense_cents: expense,
            net_cents: income as i64 - expense as i64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(label: &str, amount_cents: u64, kind: LedgerKind, occurred_at: &str) -> LedgerEntry {
        LedgerEntry {
            id: label.to_string(),
            label: label.to_string(),
            amount_cents,
            kind,
            occurred_at: occurred_at.to_string(),
            note: None,
        }
    }

    #[test]
    fn test_summary_groups_by_month_and_sums_kinds() {
        let entries = vec![
            make_entry("Hall rental", 25_00, LedgerKind::Income, "2024-03-02"),
            make_entry("Bake sale", 140_50, LedgerKind::Income, "2024-03-18"),
            make_entry("Insurance", 90_00, LedgerKind::Expense, "2024-03-05"),
        ];

        let summary = monthly_summary(&entries);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].month, "2024-03");
        assert_eq!(summary[0].income_cents, 165_50);
        assert_eq!(summary[0].expense_cents, 90_00);
        assert_eq!(summary[0].net_cents, 75_50);
    }

    #[test]
    fn test_summary_orders_months_ascending() {
        let entries = vec![
            make_entry("Dec dues", 10_00, LedgerKind::Income, "2024-12-01"),
            make_entry("Jan dues", 10_00, LedgerKind::Income, "2024-01-01"),
            make_entry("Mar dues", 10_00, LedgerKind::Income, "2024-03-01"),
        ];

        let summary = monthly_summary(&entries);
        let months: Vec<&str> = summary.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-03", "2024-12"]);
    }

    #[test]
    fn test_summary_net_can_be_negative() {
        let entries = vec![
            make_entry("Dues", 10_00, LedgerKind::Income, "2024-05-01"),
            make_entry("Roof repair", 500_00, LedgerKind::Expense, "2024-05-20"),
        ];

        let summary = monthly_summary(&entries);
        assert_eq!(summary[0].net_cents, -490_00);
    }

    #[test]
    fn test_summary_skips_unparseable_dates() {
        let entries = vec![
            make_entry("Good", 10_00, LedgerKind::Income, "2024-05-01"),
            make_entry("Bad", 99_00, LedgerKind::Income, "sometime in spring"),
        ];

        let summary = monthly_summary(&entries);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].income_cents, 10_00);
    }

    #[test]
    fn test_summary_of_empty_ledger_is_empty() {
        assert!(monthly_summary(&[]).is_empty());
    }
}
