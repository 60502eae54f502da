use anyhow::Result;
use std::io::Write;

use crate::application::{LedgerService, Summary};
use crate::domain::format_cents;

/// Writes one owner's ledger out as CSV or JSON.
pub struct Exporter<'a> {
    service: &'a LedgerService,
    owner_id: &'a str,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService, owner_id: &'a str) -> Self {
        Self { service, owner_id }
    }

    /// Export all entries to CSV, most recent first. Returns the row count.
    pub async fn export_entries_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let entries = self.service.list_all(self.owner_id).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "kind",
            "date",
            "amount",
            "title",
            "category",
            "description",
            "created_at",
        ])?;

        for entry in &entries {
            csv_writer.write_record([
                entry.id.to_string(),
                entry.kind.to_string(),
                entry.date.to_string(),
                format_cents(entry.amount),
                entry.title.clone(),
                entry.category.clone(),
                entry.description.clone().unwrap_or_default(),
                entry.created_at.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(entries.len())
    }

    /// Export the summary as pretty JSON, the same shape the chart layer reads.
    /// Returns the summary that was written.
    pub async fn export_summary_json<W: Write>(&self, mut writer: W) -> Result<Summary> {
        let summary = self.service.summarize(self.owner_id).await?;

        let json = serde_json::to_string_pretty(&summary)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(summary)
    }
}
