use crate::domain::{
    Cents, Entry, EntryId, EntryKind, EntryPayload, category_breakdown, checked_balance,
    checked_total_of, percent_of_total, time_series, validate,
};
use crate::storage::Repository;

use super::{AppError, Breakdown, Summary};

/// Application service providing the ledger operations.
/// This is the only interface transport adapters (CLI, HTTP, ...) should use.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a database at the given path, creating it if needed.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        tracing::info!(path = database_path, "database initialized");
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Release the connection pool. Call once on shutdown.
    pub async fn close(self) {
        self.repo.close().await;
        tracing::debug!("ledger service closed");
    }

    // ========================
    // Entry operations
    // ========================

    pub async fn add_income(
        &self,
        owner_id: &str,
        payload: &EntryPayload,
    ) -> Result<Entry, AppError> {
        self.add_entry(owner_id, EntryKind::Income, payload).await
    }

    pub async fn add_expense(
        &self,
        owner_id: &str,
        payload: &EntryPayload,
    ) -> Result<Entry, AppError> {
        self.add_entry(owner_id, EntryKind::Expense, payload).await
    }

    async fn add_entry(
        &self,
        owner_id: &str,
        kind: EntryKind,
        payload: &EntryPayload,
    ) -> Result<Entry, AppError> {
        let owner_id = require_owner(owner_id)?;
        let validated = validate(payload).inspect_err(|e| {
            tracing::warn!(owner = owner_id, %kind, "rejected entry: {e}");
        })?;

        let entry = self.repo.insert(owner_id, kind, &validated).await?;
        tracing::info!(
            owner = owner_id,
            id = %entry.id,
            %kind,
            amount = entry.amount,
            "added entry"
        );
        Ok(entry)
    }

    pub async fn list_incomes(&self, owner_id: &str) -> Result<Vec<Entry>, AppError> {
        self.list_kind(owner_id, EntryKind::Income).await
    }

    pub async fn list_expenses(&self, owner_id: &str) -> Result<Vec<Entry>, AppError> {
        self.list_kind(owner_id, EntryKind::Expense).await
    }

    /// Every entry of the owner, most recent first.
    pub async fn list_all(&self, owner_id: &str) -> Result<Vec<Entry>, AppError> {
        let owner_id = require_owner(owner_id)?;
        Ok(self.repo.list_by_owner(owner_id, None).await?)
    }

    async fn list_kind(&self, owner_id: &str, kind: EntryKind) -> Result<Vec<Entry>, AppError> {
        let owner_id = require_owner(owner_id)?;
        Ok(self.repo.list_by_owner(owner_id, Some(kind)).await?)
    }

    /// Delete one of the owner's entries. `NotFound` if nothing was removed,
    /// which includes ids owned by someone else.
    pub async fn delete_entry(&self, owner_id: &str, id: EntryId) -> Result<(), AppError> {
        let owner_id = require_owner(owner_id)?;
        let removed = self.repo.delete_by_id(owner_id, id).await?;
        deleted_or_not_found(owner_id, id, removed)
    }

    pub async fn delete_income(&self, owner_id: &str, id: EntryId) -> Result<(), AppError> {
        self.delete_kind(owner_id, id, EntryKind::Income).await
    }

    pub async fn delete_expense(&self, owner_id: &str, id: EntryId) -> Result<(), AppError> {
        self.delete_kind(owner_id, id, EntryKind::Expense).await
    }

    async fn delete_kind(
        &self,
        owner_id: &str,
        id: EntryId,
        kind: EntryKind,
    ) -> Result<(), AppError> {
        let owner_id = require_owner(owner_id)?;
        let removed = self.repo.delete_by_id_of_kind(owner_id, id, kind).await?;
        deleted_or_not_found(owner_id, id, removed)
    }

    // ========================
    // Aggregate views
    // ========================

    /// Totals, balance, combined history and the chart series for an owner.
    ///
    /// History comes straight from the store, so it shares the listing order.
    pub async fn summarize(&self, owner_id: &str) -> Result<Summary, AppError> {
        let owner_id = require_owner(owner_id)?;
        let history = self.repo.list_by_owner(owner_id, None).await?;
        let (incomes, expenses) = split_by_kind(&history);

        let total_income = checked_total(owner_id, &incomes)?;
        let total_expenses = checked_total(owner_id, &expenses)?;
        let balance = checked_balance(&incomes, &expenses)
            .ok_or_else(|| totals_out_of_range(owner_id))?;

        // Reversed store order is oldest first with recording order kept for ties.
        let oldest_first: Vec<Entry> = history.iter().rev().cloned().collect();
        let series = time_series(&oldest_first);

        Ok(Summary {
            total_income,
            total_expenses,
            balance,
            history,
            series,
        })
    }

    /// Income/expense shares and per-category totals for an owner.
    pub async fn breakdown(&self, owner_id: &str) -> Result<Breakdown, AppError> {
        let owner_id = require_owner(owner_id)?;
        let entries = self.repo.list_by_owner(owner_id, None).await?;
        let (incomes, expenses) = split_by_kind(&entries);

        let total_income = checked_total(owner_id, &incomes)?;
        let total_expenses = checked_total(owner_id, &expenses)?;
        let combined = total_income
            .checked_add(total_expenses)
            .ok_or_else(|| totals_out_of_range(owner_id))?;

        Ok(Breakdown {
            total_income,
            total_expenses,
            income_percentage: percent_of_total(total_income, combined),
            expense_percentage: percent_of_total(total_expenses, combined),
            income_categories: category_breakdown(&incomes),
            expense_categories: category_breakdown(&expenses),
        })
    }
}

fn split_by_kind(entries: &[Entry]) -> (Vec<Entry>, Vec<Entry>) {
    entries.iter().cloned().partition(Entry::is_income)
}

fn checked_total(owner_id: &str, entries: &[Entry]) -> Result<Cents, AppError> {
    checked_total_of(entries).ok_or_else(|| totals_out_of_range(owner_id))
}

fn totals_out_of_range(owner_id: &str) -> AppError {
    tracing::error!(owner = owner_id, "ledger totals overflow");
    AppError::InvalidAmount("ledger totals are out of range".to_string())
}

fn require_owner(owner_id: &str) -> Result<&str, AppError> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        return Err(AppError::MissingField("ownerId".to_string()));
    }
    Ok(owner_id)
}

fn deleted_or_not_found(owner_id: &str, id: EntryId, removed: bool) -> Result<(), AppError> {
    if removed {
        tracing::info!(owner = owner_id, %id, "deleted entry");
        Ok(())
    } else {
        tracing::debug!(owner = owner_id, %id, "nothing to delete");
        Err(AppError::NotFound(id))
    }
}
