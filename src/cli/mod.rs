use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::application::{AppError, LedgerService};
use crate::domain::{Entry, EntryKind, EntryPayload, format_cents};

/// Tallybook - income and expense tracker
#[derive(Parser)]
#[command(name = "tallybook")]
#[command(about = "Track income and expenses and see where the money goes")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "TALLYBOOK_DATABASE", default_value = "tallybook.db")]
    pub database: String,

    /// Owner whose ledger is used
    #[arg(short, long, global = true, env = "TALLYBOOK_OWNER", default_value = "default")]
    pub owner: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Income commands
    #[command(subcommand)]
    Income(EntryCommands),

    /// Expense commands
    #[command(subcommand)]
    Expense(EntryCommands),

    /// Delete an entry of any kind
    Delete {
        /// Entry ID
        id: String,
    },

    /// Totals, balance and recent history
    Summary {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Number of history rows to show in table output
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Income vs expense split and per-category totals
    Breakdown {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Export entries (CSV) or the summary (JSON)
    Export {
        /// What to export
        #[arg(value_enum)]
        export_type: ExportType,

        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum EntryCommands {
    /// Record a new entry
    Add {
        /// Amount (e.g., "50.00" or "50")
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Short label
        title: String,

        /// Category tag (e.g., "Job", "Housing")
        #[arg(short, long)]
        category: String,

        /// Date of the transaction (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Free text description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// List entries, most recent first
    List,

    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportType {
    Entries,
    Summary,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if matches!(self.command, Commands::Init) {
            let service = LedgerService::init(&self.database).await?;
            println!("Database initialized: {}", self.database);
            service.close().await;
            return Ok(());
        }

        let service = LedgerService::connect(&self.database)
            .await
            .with_context(|| {
                format!("Cannot open '{}'. Run `tallybook init` first", self.database)
            })?;
        let outcome = self.dispatch(&service).await;
        service.close().await;
        outcome
    }

    async fn dispatch(&self, service: &LedgerService) -> Result<()> {
        let owner = self.owner.as_str();

        match &self.command {
            // Handled in `run` before connecting.
            Commands::Init => Ok(()),
            Commands::Income(cmd) => {
                run_entry_command(service, owner, EntryKind::Income, cmd).await
            }
            Commands::Expense(cmd) => {
                run_entry_command(service, owner, EntryKind::Expense, cmd).await
            }
            Commands::Delete { id } => {
                let id = parse_id(id)?;
                report_delete(service.delete_entry(owner, id).await, id)
            }
            Commands::Summary { format, limit } => {
                run_summary_command(service, owner, *format, *limit).await
            }
            Commands::Breakdown { format } => run_breakdown_command(service, owner, *format).await,
            Commands::Export {
                export_type,
                output,
            } => run_export_command(service, owner, *export_type, output.as_deref()).await,
        }
    }
}

async fn run_entry_command(
    service: &LedgerService,
    owner: &str,
    kind: EntryKind,
    cmd: &EntryCommands,
) -> Result<()> {
    match cmd {
        EntryCommands::Add {
            amount,
            title,
            category,
            date,
            description,
        } => {
            let payload = EntryPayload {
                amount: Some(amount.clone().into()),
                title: Some(title.clone()),
                category: Some(category.clone()),
                date: Some(date.clone()),
                description: description.clone(),
            };

            let entry = match kind {
                EntryKind::Income => service.add_income(owner, &payload).await?,
                EntryKind::Expense => service.add_expense(owner, &payload).await?,
            };

            println!(
                "Recorded {}: {} {} ({})",
                entry.kind,
                format_cents(entry.amount),
                entry.title,
                entry.id
            );
        }

        EntryCommands::List => {
            let entries = match kind {
                EntryKind::Income => service.list_incomes(owner).await?,
                EntryKind::Expense => service.list_expenses(owner).await?,
            };
            if entries.is_empty() {
                println!("No {} entries found.", kind);
            } else {
                print_entries(&entries);
            }
        }

        EntryCommands::Delete { id } => {
            let id = parse_id(id)?;
            let result = match kind {
                EntryKind::Income => service.delete_income(owner, id).await,
                EntryKind::Expense => service.delete_expense(owner, id).await,
            };
            report_delete(result, id)?;
        }
    }
    Ok(())
}

async fn run_summary_command(
    service: &LedgerService,
    owner: &str,
    format: OutputFormat,
    limit: usize,
) -> Result<()> {
    let summary = service.summarize(owner).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => {
            println!("Total income:   {:>12}", format_cents(summary.total_income));
            println!("Total expenses: {:>12}", format_cents(summary.total_expenses));
            println!("Balance:        {:>12}", format_cents(summary.balance));
            println!();

            if summary.history.is_empty() {
                println!("No entries yet.");
            } else {
                println!("Recent history:");
                let shown = summary.history.len().min(limit);
                print_entries(&summary.history[..shown]);
                if summary.history.len() > shown {
                    println!("  ... and {} more", summary.history.len() - shown);
                }
            }
        }
    }
    Ok(())
}

async fn run_breakdown_command(
    service: &LedgerService,
    owner: &str,
    format: OutputFormat,
) -> Result<()> {
    let breakdown = service.breakdown(owner).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&breakdown)?),
        OutputFormat::Table => {
            println!(
                "Income:   {:>12} ({:.1}%)",
                format_cents(breakdown.total_income),
                breakdown.income_percentage
            );
            println!(
                "Expenses: {:>12} ({:.1}%)",
                format_cents(breakdown.total_expenses),
                breakdown.expense_percentage
            );

            for (label, categories) in [
                ("Income", &breakdown.income_categories),
                ("Expense", &breakdown.expense_categories),
            ] {
                if categories.is_empty() {
                    continue;
                }
                println!();
                println!(
                    "{:<20} {:>12} {:>6} {:>7}",
                    label.to_uppercase(),
                    "TOTAL",
                    "COUNT",
                    "SHARE"
                );
                println!("{}", "-".repeat(48));
                for c in categories {
                    println!(
                        "{:<20} {:>12} {:>6} {:>6.1}%",
                        truncate(&c.category, 20),
                        format_cents(c.total),
                        c.count,
                        c.percentage
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    owner: &str,
    export_type: ExportType,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service, owner);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        ExportType::Entries => {
            let count = exporter.export_entries_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} entries", count);
            }
        }
        ExportType::Summary => {
            let summary = exporter.export_summary_json(writer).await?;
            if output.is_some() {
                eprintln!("Exported summary of {} entries", summary.history.len());
            }
        }
    }
    Ok(())
}

/// `NotFound` is an expected answer to a delete, not a failure.
fn report_delete(result: Result<(), AppError>, id: Uuid) -> Result<()> {
    match result {
        Ok(()) => println!("Deleted entry {}", id),
        Err(AppError::NotFound(_)) => println!("Nothing to delete: no entry {}", id),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn print_entries(entries: &[Entry]) {
    println!(
        "{:<12} {:<8} {:>10} {:<20} {:<15} ID",
        "DATE", "KIND", "AMOUNT", "TITLE", "CATEGORY"
    );
    println!("{}", "-".repeat(104));
    for entry in entries {
        println!(
            "{:<12} {:<8} {:>10} {:<20} {:<15} {}",
            entry.date.format("%Y-%m-%d"),
            entry.kind,
            format_cents(entry.amount),
            truncate(&entry.title, 20),
            truncate(&entry.category, 15),
            entry.id
        );
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id.trim()).with_context(|| format!("Invalid entry ID '{}'", id))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_add_income() {
        let cli = Cli::try_parse_from([
            "tallybook",
            "--owner",
            "alice",
            "income",
            "add",
            "5000",
            "Salary",
            "--category",
            "Job",
            "--date",
            "2024-01-01",
        ])
        .unwrap();

        assert_eq!(cli.owner, "alice");
        assert!(matches!(
            cli.command,
            Commands::Income(EntryCommands::Add { ref amount, .. }) if amount == "5000"
        ));
    }

    #[test]
    fn test_cli_keeps_negative_amount_as_value() {
        let cli = Cli::try_parse_from([
            "tallybook",
            "expense",
            "add",
            "-50",
            "Rent",
            "--category",
            "Housing",
            "--date",
            "2024-01-03",
        ])
        .unwrap();

        // Reaches validation as an amount instead of failing as an unknown flag
        assert!(matches!(
            cli.command,
            Commands::Expense(EntryCommands::Add { ref amount, ref title, .. })
                if amount == "-50" && title == "Rent"
        ));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Groceries and more", 10), "Groceri...");
        assert_eq!(truncate("ééééééééééé", 5), "éé...");
    }
}
