use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Entry, EntryId, EntryKind, ValidatedEntry};

use super::MIGRATION_001_ENTRIES;

const ENTRY_COLUMNS: &str =
    "id, owner_id, kind, amount_cents, title, category, date, description, created_at";

/// Repository for persisting and querying ledger entries.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run more than once.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_ENTRIES)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close the pool, waiting for in-flight queries to finish.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Persist a validated entry for `owner_id`.
    /// The id and creation timestamp are assigned here.
    pub async fn insert(
        &self,
        owner_id: &str,
        kind: EntryKind,
        entry: &ValidatedEntry,
    ) -> Result<Entry> {
        let stored = Entry {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            kind,
            amount: entry.amount(),
            title: entry.title().to_string(),
            category: entry.category().to_string(),
            date: entry.date(),
            description: entry.description().map(str::to_string),
            // Stored with microsecond precision, so keep the returned value identical.
            created_at: Utc::now().trunc_subsecs(6),
        };

        sqlx::query(
            r#"
            INSERT INTO entries
                (id, owner_id, kind, amount_cents, title, category, date, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(stored.id.to_string())
        .bind(&stored.owner_id)
        .bind(stored.kind.as_str())
        .bind(stored.amount)
        .bind(&stored.title)
        .bind(&stored.category)
        .bind(stored.date.to_string())
        .bind(&stored.description)
        .bind(format_timestamp(stored.created_at))
        .execute(&self.pool)
        .await
        .context("Failed to save entry")?;

        tracing::debug!(id = %stored.id, owner = owner_id, kind = %kind, "stored entry");
        Ok(stored)
    }

    /// Get a single entry by id, regardless of owner.
    pub async fn get(&self, id: EntryId) -> Result<Option<Entry>> {
        let row = sqlx::query(&format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch entry")?;

        row.as_ref().map(Self::row_to_entry).transpose()
    }

    /// List an owner's entries, optionally only one kind.
    /// Newest date first; same-day entries newest record first.
    pub async fn list_by_owner(
        &self,
        owner_id: &str,
        kind: Option<EntryKind>,
    ) -> Result<Vec<Entry>> {
        let mut query = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE owner_id = ?");
        if kind.is_some() {
            query.push_str(" AND kind = ?");
        }
        query.push_str(" ORDER BY date DESC, created_at DESC, seq DESC");

        let mut sql_query = sqlx::query(&query).bind(owner_id);
        if let Some(kind) = kind {
            sql_query = sql_query.bind(kind.as_str());
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list entries")?;

        tracing::debug!(owner = owner_id, count = rows.len(), "listed entries");
        rows.iter().map(Self::row_to_entry).collect()
    }

    /// Count all entries belonging to an owner.
    pub async fn count_by_owner(&self, owner_id: &str) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM entries WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count entries")?;

        Ok(row.get("count"))
    }

    /// Delete an entry if it belongs to `owner_id`.
    /// Returns whether a row was removed; unknown or foreign ids give `false`.
    pub async fn delete_by_id(&self, owner_id: &str, id: EntryId) -> Result<bool> {
        self.delete_where(owner_id, id, None).await
    }

    /// Like [`Repository::delete_by_id`], but the entry must also be of `kind`.
    pub async fn delete_by_id_of_kind(
        &self,
        owner_id: &str,
        id: EntryId,
        kind: EntryKind,
    ) -> Result<bool> {
        self.delete_where(owner_id, id, Some(kind)).await
    }

    async fn delete_where(
        &self,
        owner_id: &str,
        id: EntryId,
        kind: Option<EntryKind>,
    ) -> Result<bool> {
        // A single statement: the owner check and the delete can't be split by another writer.
        let mut query = String::from("DELETE FROM entries WHERE id = ? AND owner_id = ?");
        if kind.is_some() {
            query.push_str(" AND kind = ?");
        }

        let mut sql_query = sqlx::query(&query).bind(id.to_string()).bind(owner_id);
        if let Some(kind) = kind {
            sql_query = sql_query.bind(kind.as_str());
        }

        let result = sql_query
            .execute(&self.pool)
            .await
            .context("Failed to delete entry")?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<Entry> {
        let id_str: String = row.get("id");
        let kind_str: String = row.get("kind");
        let date_str: String = row.get("date");
        let created_at_str: String = row.get("created_at");

        Ok(Entry {
            id: Uuid::parse_str(&id_str).context("Invalid entry ID")?,
            owner_id: row.get("owner_id"),
            kind: EntryKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid entry kind: {}", kind_str))?,
            amount: row.get("amount_cents"),
            title: row.get("title"),
            category: row.get("category"),
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .context("Invalid entry date")?,
            description: row.get("description"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

/// Fixed-width RFC 3339 so that text ordering in SQL matches time ordering.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
