use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use crate::application::{
    AppError, DashboardReport, ImportError, RowErrorPolicy, SummaryConfig, SummaryService,
};
use crate::domain::{format_cents, ExcludedCategories, MonthBucketing};
use crate::io::{Dataset, Exporter};

/// Tally - household ledger dashboard
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Summarize a Date,Category,Amount ledger into income, expense and savings figures")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Category to leave out of the expense breakdown (repeatable, replaces the configured set)
    #[arg(long = "exclude", global = true)]
    pub exclude: Vec<String>,

    /// Keep the same month of different years apart
    #[arg(long, global = true)]
    pub by_year: bool,

    /// Skip malformed rows instead of aborting
    #[arg(long, global = true)]
    pub skip_invalid: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the dashboard summary for a ledger
    Summary {
        /// Ledger CSV file ("-" for stdin)
        input: String,

        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Export one dataset as CSV
    Export {
        /// What to export: categories, monthly, summary, breakdown
        dataset: String,

        /// Ledger CSV file ("-" for stdin)
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a ledger without summarizing it
    Check {
        /// Ledger CSV file ("-" for stdin)
        input: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let config = self.resolve_config()?;
        let service = SummaryService::new(config);

        match &self.command {
            Commands::Summary { input, format } => {
                let report = summarize(&service, input)?;
                match format.as_str() {
                    "json" => Exporter::new(&report).export_json(io::stdout().lock())?,
                    _ => print_report(&report),
                }
            }

            Commands::Export {
                dataset,
                input,
                output,
            } => {
                let dataset: Dataset = dataset.parse().map_err(anyhow::Error::msg)?;
                let report = summarize(&service, input)?;
                let exporter = Exporter::new(&report);

                let count = match output {
                    Some(path) => {
                        let file = File::create(path)
                            .with_context(|| format!("Cannot create {}", path.display()))?;
                        exporter.export_csv(dataset, BufWriter::new(file))?
                    }
                    None => exporter.export_csv(dataset, io::stdout().lock())?,
                };
                eprintln!("Exported {} {} row(s)", count, dataset.as_str());
            }

            Commands::Check { input } => run_check_command(&service, input)?,
        }

        Ok(())
    }

    /// File configuration first, then command line overrides.
    fn resolve_config(&self) -> Result<SummaryConfig> {
        let mut config = SummaryConfig::load_or_default(self.config.as_deref())?;

        if !self.exclude.is_empty() {
            config.excluded_categories = self.exclude.iter().cloned().collect::<ExcludedCategories>();
        }
        if self.by_year {
            config.bucketing = MonthBucketing::YearMonth;
        }
        if self.skip_invalid {
            config.on_row_error = RowErrorPolicy::Skip;
        }

        tracing::debug!(?config, "configuration resolved");
        Ok(config)
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over the verbose flag.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "tally=debug" } else { "tally=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn summarize(service: &SummaryService, input: &str) -> Result<DashboardReport> {
    let report = if input == "-" {
        service.summarize_reader(io::stdin().lock())
    } else {
        service.summarize_path(Path::new(input))
    };
    let report = report.with_context(|| format!("Failed to summarize ledger '{}'", input))?;

    for row in &report.skipped {
        eprintln!("Skipped line {}: {}", row.line, row.reason);
    }
    Ok(report)
}

fn run_check_command(service: &SummaryService, input: &str) -> Result<()> {
    // Collect every problem rather than stopping at the first one
    let mut config = service.config().clone();
    config.on_row_error = RowErrorPolicy::Skip;
    let checker = SummaryService::new(config);

    match summarize(&checker, input) {
        Ok(report) if report.skipped.is_empty() => {
            println!("✓ {} transaction(s), no problems found", report.transaction_count);
            Ok(())
        }
        Ok(report) => {
            println!(
                "✗ {} valid transaction(s), {} invalid row(s)",
                report.transaction_count,
                report.skipped.len()
            );
            anyhow::bail!("ledger has invalid rows")
        }
        Err(e) => {
            if let Some(AppError::Import(ImportError::EmptyInput)) = e.downcast_ref::<AppError>() {
                println!("✗ ledger contains no transactions");
            }
            Err(e)
        }
    }
}

fn print_report(report: &DashboardReport) {
    let summary = &report.summary;

    println!("Summary");
    println!("Total Income:   {:>15}", format_cents(summary.total_income));
    println!("Total Expenses: {:>15}", format_cents(summary.total_expenses.abs()));
    println!("{}", "-".repeat(32));
    println!("Total Savings:  {:>15}", format_cents(summary.total_savings));
    match summary.savings_percentage {
        Some(percentage) => println!("Savings Rate:   {:>14.1}%", percentage),
        None => println!("Savings Rate:   {:>15}", "n/a"),
    }

    println!();
    println!("Monthly Income and Expenses");
    println!(
        "{:<16} {:>12} {:>12} {:>12}",
        "MONTH", "INCOME", "EXPENSES", "NET"
    );
    println!("{}", "-".repeat(55));
    for row in &report.monthly {
        println!(
            "{:<16} {:>12} {:>12} {:>12}",
            row.label(),
            format_cents(row.income),
            format_cents(row.expenses),
            format_cents(row.net)
        );
    }

    println!();
    println!("Expenses by Category");
    if report.expense_breakdown.is_empty() {
        println!("No expense data available.");
    } else {
        let total: i64 = report.expense_breakdown.iter().map(|b| b.amount).sum();
        for row in &report.expense_breakdown {
            let share = row.amount as f64 / total as f64 * 100.0;
            println!(
                "  {:<20} {:>12} ({:.1}%)",
                truncate(&row.category, 20),
                format_cents(row.amount),
                share
            );
        }
    }

    println!();
    println!("Category Totals");
    for row in &report.categories {
        println!("  {:<20} {:>12}", truncate(&row.category, 20), format_cents(row.total));
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
