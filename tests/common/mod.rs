// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use tallybook::application::LedgerService;
use tallybook::domain::{Entry, EntryPayload};
use tempfile::TempDir;

pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Payload with a numeric amount in currency units
pub fn payload(amount: f64, title: &str, category: &str, date: &str) -> EntryPayload {
    EntryPayload::new(amount, title, category, date)
}

/// Test fixture: the salary + rent scenario
pub struct MonthOne {
    pub salary: Entry,
    pub rent: Entry,
}

impl MonthOne {
    pub async fn record(service: &LedgerService, owner: &str) -> Result<Self> {
        let salary = service
            .add_income(owner, &payload(5000.0, "Salary", "Job", "2024-01-01"))
            .await?;
        let rent = service
            .add_expense(owner, &payload(1200.0, "Rent", "Housing", "2024-01-02"))
            .await?;
        Ok(Self { salary, rent })
    }
}
