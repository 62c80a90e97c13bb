use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::domain::{
    compute_category_summary, compute_expense_breakdown, compute_global_summary,
    compute_monthly_summary, ledger_volume, Transaction,
};
use crate::io::import::{ImportOptions, Importer};

use super::{AppError, DashboardReport, SummaryConfig};

/// Application service turning a raw ledger into a dashboard report.
/// This is the primary interface for any client (CLI, web handler, etc.).
///
/// Holds no per-request state, so one instance can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct SummaryService {
    config: SummaryConfig,
}

impl SummaryService {
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Parse a CSV ledger and summarize it. A parse failure aborts before
    /// any aggregation runs.
    pub fn summarize_reader<R: Read>(&self, reader: R) -> Result<DashboardReport, AppError> {
        let imported = Importer::new(ImportOptions::from(&self.config)).import_csv(reader)?;

        let mut report = self.summarize_transactions(&imported.transactions)?;
        report.skipped = imported.skipped;
        Ok(report)
    }

    /// Summarize the CSV ledger stored at `path`.
    pub fn summarize_path(&self, path: &Path) -> Result<DashboardReport, AppError> {
        let file = File::open(path).map_err(|source| AppError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "summarizing ledger");
        self.summarize_reader(BufReader::new(file))
    }

    /// Summarize already parsed transactions. Fails only when the ledger is
    /// too large for its totals to be represented.
    pub fn summarize_transactions(
        &self,
        transactions: &[Transaction],
    ) -> Result<DashboardReport, AppError> {
        ledger_volume(transactions)?;

        let categories = compute_category_summary(transactions);
        let monthly = compute_monthly_summary(transactions, self.config.bucketing);
        let summary = compute_global_summary(transactions);
        let expense_breakdown =
            compute_expense_breakdown(&categories, &self.config.excluded_categories);

        debug!(
            transactions = transactions.len(),
            categories = categories.len(),
            months = monthly.len(),
            expense_categories = expense_breakdown.len(),
            "ledger summarized"
        );
        if summary.savings_percentage.is_none() {
            debug!("no income recorded, savings rate is undefined");
        }

        Ok(DashboardReport {
            transaction_count: transactions.len(),
            categories,
            monthly,
            summary,
            expense_breakdown,
            skipped: Vec::new(),
        })
    }
}
