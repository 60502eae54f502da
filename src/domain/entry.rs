use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, money::units};

pub type EntryId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money coming in (salary, refunds, ...)
    Income,
    /// Money going out (rent, groceries, ...)
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(EntryKind::Income),
            "expense" => Some(EntryKind::Expense),
            _ => None,
        }
    }

    /// Sign applied to the amount when it contributes to a balance.
    pub fn sign(&self) -> Cents {
        match self {
            EntryKind::Income => 1,
            EntryKind::Expense => -1,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense record as stored in the ledger.
///
/// The amount is always positive; whether it adds to or subtracts from the
/// balance is decided by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub owner_id: String,
    pub kind: EntryKind,
    /// Amount in cents, serialized as currency units
    #[serde(with = "units")]
    pub amount: Cents,
    pub title: String,
    pub category: String,
    /// When the transaction happened in the real world
    pub date: NaiveDate,
    pub description: Option<String>,
    /// When the store recorded the entry
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Amount with the sign implied by the entry kind.
    pub fn signed_amount(&self) -> Cents {
        self.kind.sign() * self.amount
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }
}
