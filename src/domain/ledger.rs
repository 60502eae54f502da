use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, Entry, EntryKind, money::units};

/// One chart point: a single entry placed on the time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    #[serde(with = "units")]
    pub amount: Cents,
    pub kind: EntryKind,
}

/// Totals for one category within a set of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    #[serde(with = "units")]
    pub total: Cents,
    pub count: i64,
    #[serde(with = "units")]
    pub average: Cents,
    pub percentage: f64,
}

/// Sum of all amounts. An empty slice totals zero.
/// Saturates at `Cents::MAX`; use [`checked_total_of`] where overflow must be reported.
pub fn total_of(entries: &[Entry]) -> Cents {
    entries
        .iter()
        .fold(0, |total: Cents, e| total.saturating_add(e.amount))
}

/// Sum of all amounts, `None` if it doesn't fit in `Cents`.
pub fn checked_total_of(entries: &[Entry]) -> Option<Cents> {
    entries
        .iter()
        .try_fold(0, |total: Cents, e| total.checked_add(e.amount))
}

/// Balance = total income - total expenses. Can go negative.
pub fn balance(income: &[Entry], expenses: &[Entry]) -> Cents {
    total_of(income).saturating_sub(total_of(expenses))
}

/// Balance, `None` if either total overflows.
pub fn checked_balance(income: &[Entry], expenses: &[Entry]) -> Option<Cents> {
    checked_total_of(income)?.checked_sub(checked_total_of(expenses)?)
}

/// Share of `part` in `whole` as a percentage; 0 when `whole` is 0.
pub fn percent_of_total(part: Cents, whole: Cents) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Recency ordering used for listings: newest date first, then newest record.
pub fn by_recency(a: &Entry, b: &Entry) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Chart series, one point per entry, oldest first.
/// Same-day entries keep their recording order; nothing is merged.
pub fn time_series(entries: &[Entry]) -> Vec<SeriesPoint> {
    let mut ordered: Vec<&Entry> = entries.iter().collect();
    ordered.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    ordered
        .into_iter()
        .map(|e| SeriesPoint {
            date: e.date,
            amount: e.amount,
            kind: e.kind,
        })
        .collect()
}

/// Income and expenses combined into a single history, most recent first.
/// Entries with equal date and `created_at` keep their input order (income first);
/// the store's insertion-sequence tie-break is not visible here.
pub fn merge_history(income: &[Entry], expenses: &[Entry]) -> Vec<Entry> {
    let mut history: Vec<Entry> = income.iter().chain(expenses).cloned().collect();
    history.sort_by(by_recency);
    history
}

/// Per-category totals, largest first (ties by category name).
pub fn category_breakdown(entries: &[Entry]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<&str, (Cents, i64)> = BTreeMap::new();
    for entry in entries {
        let group = groups.entry(entry.category.as_str()).or_insert((0, 0));
        group.0 = group.0.saturating_add(entry.amount);
        group.1 += 1;
    }

    let whole = total_of(entries);
    let mut summaries: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category, (total, count))| CategorySummary {
            category: category.to_string(),
            total,
            count,
            average: total / count,
            percentage: percent_of_total(total, whole),
        })
        .collect();

    // BTreeMap already yields names in order, so a stable sort keeps ties sorted.
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}
