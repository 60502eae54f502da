use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{Cents, cents_from_units, format_cents, parse_cents};

/// Raw add-entry payload as it arrives from a client.
///
/// Every field is optional here; `validate` decides what is acceptable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryPayload {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl EntryPayload {
    pub fn new(
        amount: impl Into<Value>,
        title: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            amount: Some(amount.into()),
            title: Some(title.into()),
            category: Some(category.into()),
            date: Some(date.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A payload that passed validation. Kind, owner, id and creation time are
/// attached later by the service and the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    amount: Cents,
    title: String,
    category: String,
    date: NaiveDate,
    description: Option<String>,
}

impl ValidatedEntry {
    pub fn amount(&self) -> Cents {
        self.amount
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Largest accepted amount: 100 billion currency units.
/// At this cap an owner needs over 900,000 maximal entries before a total leaves `Cents`.
pub const MAX_AMOUNT_CENTS: Cents = 10_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Check a payload and normalize it into a [`ValidatedEntry`].
///
/// Fields are checked in order amount, title, category, date, so a bad
/// amount is reported as such no matter what else is wrong.
pub fn validate(payload: &EntryPayload) -> Result<ValidatedEntry, ValidationError> {
    let amount = validate_amount(payload.amount.as_ref())?;
    let title = required_text(payload.title.as_deref(), "title")?;
    let category = required_text(payload.category.as_deref(), "category")?;
    let date = validate_date(payload.date.as_deref())?;
    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok(ValidatedEntry {
        amount,
        title,
        category,
        date,
        description,
    })
}

fn validate_amount(amount: Option<&Value>) -> Result<Cents, ValidationError> {
    let cents = match amount {
        None | Some(Value::Null) => {
            return Err(ValidationError::InvalidAmount("amount is required".into()));
        }
        Some(Value::Number(n)) => n.as_f64().and_then(cents_from_units),
        Some(Value::String(s)) => parse_cents(s).ok(),
        Some(_) => None,
    };

    match cents {
        Some(cents) if cents > MAX_AMOUNT_CENTS => Err(ValidationError::InvalidAmount(format!(
            "amount must not exceed {}",
            format_cents(MAX_AMOUNT_CENTS)
        ))),
        Some(cents) if cents > 0 => Ok(cents),
        Some(_) => Err(ValidationError::InvalidAmount(
            "amount must be positive".into(),
        )),
        None => Err(ValidationError::InvalidAmount(
            "amount must be a number".into(),
        )),
    }
}

fn required_text(value: Option<&str>, field: &'static str) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn validate_date(date: Option<&str>) -> Result<NaiveDate, ValidationError> {
    let raw = date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ValidationError::InvalidDate("date is required".into()))?;

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| ValidationError::InvalidDate(format!("'{}' is not a calendar date", raw)))
}
