use serde::{Deserialize, Serialize};

use crate::domain::{CategorySummary, Cents, Entry, SeriesPoint, units};

/// Everything the dashboard needs for one owner.
/// Serialized keys match what the chart layer reads (`totalIncome`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(with = "units")]
    pub total_income: Cents,
    #[serde(with = "units")]
    pub total_expenses: Cents,
    #[serde(with = "units")]
    pub balance: Cents,
    /// Income and expenses combined, most recent first
    pub history: Vec<Entry>,
    /// One point per entry, oldest first
    pub series: Vec<SeriesPoint>,
}

/// Income vs expenses split, as shown in the pie chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    #[serde(with = "units")]
    pub total_income: Cents,
    #[serde(with = "units")]
    pub total_expenses: Cents,
    pub income_percentage: f64,
    pub expense_percentage: f64,
    pub income_categories: Vec<CategorySummary>,
    pub expense_categories: Vec<CategorySummary>,
}
