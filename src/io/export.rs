use anyhow::Result;
use std::io::Write;
use std::str::FromStr;
use tracing::debug;

use crate::application::DashboardReport;

/// A single dataset of a report, for consumers that want one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Categories,
    Monthly,
    Summary,
    Breakdown,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Categories => "categories",
            Dataset::Monthly => "monthly",
            Dataset::Summary => "summary",
            Dataset::Breakdown => "breakdown",
        }
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "categories" => Ok(Dataset::Categories),
            "monthly" => Ok(Dataset::Monthly),
            "summary" => Ok(Dataset::Summary),
            "breakdown" => Ok(Dataset::Breakdown),
            _ => Err(format!(
                "unknown dataset '{}' (valid: categories, monthly, summary, breakdown)",
                s
            )),
        }
    }
}

/// Exporter for writing a report to CSV or JSON
pub struct Exporter<'a> {
    report: &'a DashboardReport,
}

impl<'a> Exporter<'a> {
    pub fn new(report: &'a DashboardReport) -> Self {
        Self { report }
    }

    /// Export the whole report as pretty-printed JSON.
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<()> {
        let json = serde_json::to_string_pretty(self.report)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Export one dataset to CSV. Amounts are integer cents, as the
    /// `_cents` column names say.
    /// Returns the number of data rows written.
    pub fn export_csv<W: Write>(&self, dataset: Dataset, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let report = self.report;

        let count = match dataset {
            Dataset::Categories => {
                csv_writer.write_record(["category", "total_cents"])?;
                for row in &report.categories {
                    csv_writer.write_record([row.category.clone(), row.total.to_string()])?;
                }
                report.categories.len()
            }
            Dataset::Monthly => {
                csv_writer.write_record(["month", "year", "net_cents", "income_cents", "expenses_cents"])?;
                for row in &report.monthly {
                    csv_writer.write_record([
                        row.month.to_string(),
                        row.year.map(|y| y.to_string()).unwrap_or_default(),
                        row.net.to_string(),
                        row.income.to_string(),
                        row.expenses.to_string(),
                    ])?;
                }
                report.monthly.len()
            }
            Dataset::Summary => {
                let summary = &report.summary;
                csv_writer.write_record([
                    "total_income_cents",
                    "total_expenses_cents",
                    "total_savings_cents",
                    "savings_percentage",
                ])?;
                // An undefined rate stays an empty cell, never 0
                csv_writer.write_record([
                    summary.total_income.to_string(),
                    summary.total_expenses.to_string(),
                    summary.total_savings.to_string(),
                    summary
                        .savings_percentage
                        .map(|p| format!("{:.2}", p))
                        .unwrap_or_default(),
                ])?;
                1
            }
            Dataset::Breakdown => {
                csv_writer.write_record(["category", "amount_cents"])?;
                for row in &report.expense_breakdown {
                    csv_writer.write_record([row.category.clone(), row.amount.to_string()])?;
                }
                report.expense_breakdown.len()
            }
        };

        csv_writer.flush()?;
        debug!(dataset = dataset.as_str(), rows = count, "dataset exported");
        Ok(count)
    }
}
